//! pubchem3d — download 3D structures from PubChem for a CSV of compound names.
//! Entry point for the CLI binary.

mod config;

use std::path::PathBuf;

use clap::Parser;
use pubchem3d_common::sandbox::SandboxClient;
use pubchem3d_common::Pubchem3dError;
use pubchem3d_molecules::{DownloadPipeline, PubChemClient, StructureWriter};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::{Config, PubChemConfig};

/// Download 3D compound structures from PubChem using a CSV file of compound names.
#[derive(Debug, Parser)]
#[command(name = "pubchem3d", version, about)]
struct Cli {
    /// Path to the CSV file containing compound names in a column named "compound_name".
    csv_file: PathBuf,

    /// Directory for the written .sdf files (overrides the config file).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Config file to use instead of PUBCHEM3D_CONFIG / pubchem3d.toml.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Client for the configured endpoint. A `base_url` outside PubChem and
/// `allow_hosts` is refused here, before the input is read.
fn build_pubchem_client(config: &PubChemConfig) -> Result<PubChemClient, Pubchem3dError> {
    let mut sandbox = SandboxClient::new(config.timeout())?;
    for host in &config.allow_hosts {
        sandbox.allow_domain(host);
    }
    sandbox.check(&config.base_url)?;

    Ok(PubChemClient::new(sandbox, config.base_url.clone(), config.record_type))
}

/// Runs one download. Every failure is logged; none changes the exit status.
async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!("Could not load configuration: {e}");
            return Ok(());
        }
    };
    if let Some(dir) = cli.output_dir {
        config.output.dir = dir;
    }
    info!(
        "PubChem endpoint: {} (record type {}), output: {:?}",
        config.pubchem.base_url,
        config.pubchem.record_type.as_str(),
        config.output.dir
    );

    let client = match build_pubchem_client(&config.pubchem) {
        Ok(c) => c,
        Err(e) => {
            error!("Refusing PubChem endpoint {}: {e}", config.pubchem.base_url);
            return Ok(());
        }
    };
    let pipeline = DownloadPipeline::with_pubchem(client, StructureWriter::new(&config.output.dir));

    // Only loading the input can fail the run as a whole.
    if let Err(e) = pipeline.run(&cli.csv_file).await {
        error!("Error: {e}");
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pubchem3d=info,warn")),
        )
        .init();

    run(Cli::parse()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn cli_for(dir: &std::path::Path, csv_file: PathBuf, config_toml: &str) -> Cli {
        let config_path = dir.join("pubchem3d.toml");
        std::fs::write(&config_path, config_toml).unwrap();
        Cli {
            csv_file,
            output_dir: Some(dir.join("out")),
            config: Some(config_path),
        }
    }

    #[test]
    fn test_default_endpoint_is_accepted() {
        assert!(build_pubchem_client(&PubChemConfig::default()).is_ok());
    }

    #[test]
    fn test_foreign_endpoint_is_refused() {
        let config = PubChemConfig {
            base_url: "http://127.0.0.1:8080/rest/pug".to_string(),
            ..PubChemConfig::default()
        };
        assert!(matches!(
            build_pubchem_client(&config),
            Err(Pubchem3dError::SecurityError(_))
        ));
    }

    #[test]
    fn test_allow_hosts_admits_endpoint() {
        let config = PubChemConfig {
            base_url: "http://127.0.0.1:8080/rest/pug".to_string(),
            allow_hosts: vec!["127.0.0.1".to_string()],
            ..PubChemConfig::default()
        };
        assert!(build_pubchem_client(&config).is_ok());
    }

    #[tokio::test]
    async fn test_refused_endpoint_stops_before_output() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("compounds.csv");
        std::fs::write(&csv, "compound_name\nwater\n").unwrap();
        let cli = cli_for(
            dir.path(),
            csv,
            "[pubchem]\nbase_url = \"https://example.com/rest/pug\"\n",
        );

        run(cli).await.unwrap();

        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_missing_input_returns_normally() {
        let dir = tempdir().unwrap();
        let cli = cli_for(dir.path(), dir.path().join("absent.csv"), "");

        run(cli).await.unwrap();

        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_unreadable_input_returns_normally() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("compounds.csv");
        std::fs::write(&csv, [b'c', 0xff, 0xfe, b'\n']).unwrap();
        let cli = cli_for(dir.path(), csv, "");

        run(cli).await.unwrap();

        assert!(!dir.path().join("out").exists());
    }
}
