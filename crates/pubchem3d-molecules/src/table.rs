//! Input table loading.
//!
//! The input is a CSV file with a header row and a `compound_name` column.
//! Other columns are ignored. Row order is kept. Rows may be short or long;
//! a row without a `compound_name` field yields a record with an empty name.

use std::io::ErrorKind;
use std::path::Path;

use pubchem3d_common::{CompoundRecord, Pubchem3dError, Result};
use tracing::debug;

/// Header of the column holding compound names.
pub const NAME_COLUMN: &str = "compound_name";

/// Load one `CompoundRecord` per data row of the CSV at `path`.
pub async fn load_records(path: &Path) -> Result<Vec<CompoundRecord>> {
    debug!("Loading compound table from {:?}", path);

    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Pubchem3dError::InputMissing(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    parse_records(&content)
}

/// Parse CSV text into records, one per data row.
pub fn parse_records(content: &str) -> Result<Vec<CompoundRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let name_idx = reader
        .headers()?
        .iter()
        .position(|h| h.trim() == NAME_COLUMN)
        .ok_or_else(|| {
            Pubchem3dError::InputTable(format!("missing required column '{}'", NAME_COLUMN))
        })?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let name = row.get(name_idx).unwrap_or_default();
        records.push(CompoundRecord::new(name));
    }

    debug!("Parsed {} compound rows", records.len());
    Ok(records)
}
