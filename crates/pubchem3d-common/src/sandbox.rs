use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;
use crate::error::Pubchem3dError;

/// Hosts reachable without extra configuration.
const DEFAULT_ALLOWLIST: &[&str] = &[
    "pubchem.ncbi.nlm.nih.gov", // PUG REST
];

/// An HTTP client capped to an allowlist of hosts.
///
/// Only PubChem is reachable by default. Mirrors or local stand-ins must be
/// allowed explicitly, so a mistyped or hostile base URL is refused before
/// any request leaves the machine.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// `timeout` of `None` leaves reqwest's own default in place.
    pub fn new(timeout: Option<Duration>) -> Result<Self, Pubchem3dError> {
        let mut builder = ClientBuilder::new()
            .user_agent(concat!("pubchem3d/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Pubchem3dError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let mut sandbox = Self { client, allowlist: HashSet::new() };
        for host in DEFAULT_ALLOWLIST {
            sandbox.allow_domain(host);
        }
        Ok(sandbox)
    }

    /// Allows `domain` and its subdomains. Hostnames compare case-insensitively.
    pub fn allow_domain(&mut self, domain: &str) {
        let domain = domain.trim().trim_end_matches('.').to_ascii_lowercase();
        if !domain.is_empty() {
            self.allowlist.insert(domain);
        }
    }

    /// Whether requests to `url` pass the allowlist.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        self.allowlist.iter().any(|allowed| {
            host == allowed
                || host
                    .strip_suffix(allowed.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    /// Fails with `SecurityError` unless `url` passes the allowlist.
    pub fn check(&self, url: &str) -> Result<(), Pubchem3dError> {
        if self.is_allowed(url) {
            Ok(())
        } else {
            Err(Pubchem3dError::SecurityError(format!(
                "host of {} is not in the allowlist",
                url
            )))
        }
    }

    /// GET request builder for an allowed URL.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, Pubchem3dError> {
        self.check(url)?;
        Ok(self.client.get(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allowlist_accepts_pubchem() {
        let client = SandboxClient::new(None).unwrap();
        assert!(client.is_allowed("https://pubchem.ncbi.nlm.nih.gov/rest/pug/compound/cid/962/SDF"));
        assert!(client.check("https://PubChem.ncbi.nlm.nih.gov/rest/pug").is_ok());
    }

    #[test]
    fn test_rejects_unknown_host() {
        let client = SandboxClient::new(None).unwrap();
        assert!(!client.is_allowed("https://example.com/rest/pug"));
        assert!(!client.is_allowed("not a url"));
        assert!(matches!(
            client.get("https://example.com/"),
            Err(Pubchem3dError::SecurityError(_))
        ));
    }

    #[test]
    fn test_suffix_must_be_subdomain() {
        let client = SandboxClient::new(None).unwrap();
        assert!(!client.is_allowed("https://evilpubchem.ncbi.nlm.nih.gov/"));
        assert!(!client.is_allowed("https://pubchem.ncbi.nlm.nih.gov.example.com/"));
        assert!(client.is_allowed("https://www.pubchem.ncbi.nlm.nih.gov/"));
    }

    #[test]
    fn test_local_host_needs_explicit_allow() {
        let mut client = SandboxClient::new(Some(Duration::from_secs(5))).unwrap();
        let local = "http://127.0.0.1:8080/rest/pug/compound/cid/1/SDF";
        assert!(matches!(client.check(local), Err(Pubchem3dError::SecurityError(_))));

        client.allow_domain(" 127.0.0.1 ");
        assert!(client.check(local).is_ok());
    }
}
