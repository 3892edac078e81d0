use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Pubchem3dError {
    #[error("Input file not found: {}", .0.display())]
    InputMissing(PathBuf),

    #[error("Input table error: {0}")]
    InputTable(String),

    #[error("No 3D compound found for name '{0}'")]
    NoMatches(String),

    #[error("PubChem fault {code}: {message}")]
    Fault { code: String, message: String },

    #[error("HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Security error: {0}")]
    SecurityError(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Pubchem3dError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_error_message_not_doubled() {
        let mut reader = csv::Reader::from_reader("a,b\n1\n".as_bytes());
        let csv_err = reader.records().next().unwrap().unwrap_err();
        let expected = csv_err.to_string();

        let msg = Pubchem3dError::from(csv_err).to_string();
        assert_eq!(msg, expected);
        assert!(!msg.contains("CSV error: CSV error"), "{msg}");
    }

    #[test]
    fn test_input_missing_names_path() {
        let msg = Pubchem3dError::InputMissing(PathBuf::from("compounds.csv")).to_string();
        assert_eq!(msg, "Input file not found: compounds.csv");
    }
}
