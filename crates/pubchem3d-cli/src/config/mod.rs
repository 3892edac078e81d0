//! Configuration loading for pubchem3d.
//! Reads the file named by `--config`, else the PUBCHEM3D_CONFIG env var,
//! else pubchem3d.toml from the current directory. Every field has a default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use pubchem3d_molecules::{RecordType, PUBCHEM_API_URL};

/// Config file looked up in the working directory when nothing else is named.
pub const DEFAULT_CONFIG_FILE: &str = "pubchem3d.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pubchem: PubChemConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubChemConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub record_type: RecordType,
    /// Unset leaves the HTTP client's own default in place.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Extra hosts `base_url` may point at. PubChem itself is always allowed.
    #[serde(default)]
    pub allow_hosts: Vec<String>,
}

impl Default for PubChemConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            record_type: RecordType::default(),
            timeout_secs: None,
            allow_hosts: Vec::new(),
        }
    }
}

impl PubChemConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn default_base_url() -> String { PUBCHEM_API_URL.to_string() }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: default_output_dir() }
    }
}

fn default_output_dir() -> PathBuf { PathBuf::from(".") }


impl Config {
    /// Load configuration.
    /// An explicit path (flag or env var) must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("PUBCHEM3D_CONFIG").map(PathBuf::from));

        match explicit {
            Some(path) => Self::from_file(&path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.pubchem.timeout_secs == Some(0) {
            anyhow::bail!("pubchem.timeout_secs must be greater than zero");
        }
        Ok(config)
    }
}
