//! PubChem PUG REST client.
//!
//! PubChem is NCBI's open chemistry database. Two endpoints are used:
//!   - name → CID:  `compound/name/{name}/JSON?record_type=3d`
//!   - CID → SDF:   `compound/cid/{cid}/SDF?record_type=3d`
//!
//! API docs: https://pubchem.ncbi.nlm.nih.gov/docs/pug-rest
//!
//! Neither call retries. A failed lookup or download is reported once and
//! the caller decides what to skip.

use async_trait::async_trait;
use pubchem3d_common::sandbox::SandboxClient as Client;
use pubchem3d_common::{Cid, Pubchem3dError, Result, StructureDocument};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

pub const PUBCHEM_API_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";

/// Fault code PubChem returns with HTTP 404 when a name has no match.
const FAULT_NOT_FOUND: &str = "PUGREST.NotFound";

/// Conformer flavour requested from PubChem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecordType {
    #[default]
    #[serde(rename = "3d")]
    ThreeD,
    #[serde(rename = "2d")]
    TwoD,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThreeD => "3d",
            Self::TwoD => "2d",
        }
    }
}

// ── Stage interfaces ──────────────────────────────────────────────────────────

/// Compound name → identifier.
#[async_trait]
pub trait CompoundResolver: Send + Sync {
    /// Returns the first matching CID, or an error when nothing matched or
    /// the service failed.
    async fn resolve(&self, name: &str) -> Result<Cid>;
}

/// Identifier → structure document.
#[async_trait]
pub trait StructureRetriever: Send + Sync {
    /// Returns the raw document body, unmodified.
    async fn retrieve(&self, cid: Cid) -> Result<StructureDocument>;
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CompoundsResponse {
    #[serde(rename = "PC_Compounds", default)]
    compounds: Vec<PcCompound>,
}

#[derive(Deserialize)]
struct PcCompound {
    id: PcCompoundId,
}

#[derive(Deserialize)]
struct PcCompoundId {
    id: Option<PcCid>,
}

#[derive(Deserialize)]
struct PcCid {
    cid: u64,
}

#[derive(Deserialize)]
struct FaultResponse {
    #[serde(rename = "Fault")]
    fault: Fault,
}

#[derive(Debug, Deserialize)]
struct Fault {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message", default)]
    message: String,
}

// ── Client ────────────────────────────────────────────────────────────────────

/// PubChem client acting as both resolver and retriever.
pub struct PubChemClient {
    client: Client,
    base_url: String,
    record_type: RecordType,
}

impl PubChemClient {
    pub fn new(client: Client, base_url: impl Into<String>, record_type: RecordType) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url, record_type }
    }

    /// Client against the public PubChem endpoint with transport defaults.
    pub fn public() -> Result<Self> {
        Ok(Self::new(Client::new(None)?, PUBCHEM_API_URL, RecordType::default()))
    }

    /// URL of the name lookup. The name is percent-encoded as one path segment.
    pub fn name_lookup_url(&self, name: &str) -> Result<Url> {
        self.endpoint(&["compound", "name", name, "JSON"])
    }

    /// URL of the structure download for `cid`.
    pub fn structure_url(&self, cid: Cid) -> Result<Url> {
        self.endpoint(&["compound", "cid", &cid.to_string(), "SDF"])
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Pubchem3dError::Config(format!("Invalid base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Pubchem3dError::Config(format!("Base URL cannot take a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair("record_type", self.record_type.as_str());
        Ok(url)
    }
}

#[async_trait]
impl CompoundResolver for PubChemClient {
    #[instrument(skip(self))]
    async fn resolve(&self, name: &str) -> Result<Cid> {
        let url = self.name_lookup_url(name)?;
        debug!(url = %url, "Resolving compound name");

        let resp = self.client.get(url.as_str())?.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if status.is_success() {
            parse_first_cid(name, &body)
        } else {
            Err(classify_failure(Some(name), status, &body))
        }
    }
}

#[async_trait]
impl StructureRetriever for PubChemClient {
    #[instrument(skip(self))]
    async fn retrieve(&self, cid: Cid) -> Result<StructureDocument> {
        let url = self.structure_url(cid)?;
        debug!(url = %url, "Downloading structure");

        let resp = self.client.get(url.as_str())?.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(classify_failure(None, status, &body));
        }
        Ok(StructureDocument::new(body))
    }
}

/// First CID in a `PC_Compounds` response; an empty list means no match.
fn parse_first_cid(name: &str, body: &str) -> Result<Cid> {
    if let Some(fault) = parse_fault(body) {
        return Err(fault_error(Some(name), fault));
    }
    let parsed: CompoundsResponse = serde_json::from_str(body)?;
    parsed
        .compounds
        .iter()
        .filter_map(|c| c.id.id.as_ref())
        .find_map(|id| Cid::new(id.cid))
        .ok_or_else(|| Pubchem3dError::NoMatches(name.to_string()))
}

fn parse_fault(body: &str) -> Option<Fault> {
    serde_json::from_str::<FaultResponse>(body).ok().map(|r| r.fault)
}

fn fault_error(name: Option<&str>, fault: Fault) -> Pubchem3dError {
    match name {
        Some(name) if fault.code == FAULT_NOT_FOUND => Pubchem3dError::NoMatches(name.to_string()),
        _ => Pubchem3dError::Fault { code: fault.code, message: fault.message },
    }
}

/// Maps a non-success response to an error. `name` is set for lookups, where
/// a not-found fault means zero matches rather than a service failure.
fn classify_failure(name: Option<&str>, status: StatusCode, body: &str) -> Pubchem3dError {
    match parse_fault(body) {
        Some(fault) => fault_error(name, fault),
        None => Pubchem3dError::Status(status),
    }
}
