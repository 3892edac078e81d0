//! Structure file persistence.

use std::path::{Path, PathBuf};

use pubchem3d_common::{Result, StructureDocument};
use tokio::fs;
use tracing::debug;

/// Extension of written structure files.
pub const STRUCTURE_EXTENSION: &str = "sdf";

/// Writes structure documents as `<output_dir>/<compound_name>.sdf`.
///
/// Compound names are used verbatim. Two records with the same name write
/// the same path and the later one wins.
pub struct StructureWriter {
    output_dir: PathBuf,
}

impl StructureWriter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Target path for a compound name.
    pub fn path_for(&self, compound_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", compound_name, STRUCTURE_EXTENSION))
    }

    /// Persist `document`, replacing any existing file at the same path.
    pub async fn write(&self, compound_name: &str, document: StructureDocument) -> Result<PathBuf> {
        let path = self.path_for(compound_name);

        fs::create_dir_all(&self.output_dir).await?;
        fs::write(&path, document.into_inner()).await?;

        debug!("Wrote {:?}", path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_path_for_uses_name_verbatim() {
        let writer = StructureWriter::new("out");
        assert_eq!(writer.path_for("water"), PathBuf::from("out/water.sdf"));
        assert_eq!(writer.path_for("Vitamin C"), PathBuf::from("out/Vitamin C.sdf"));
    }

    #[tokio::test]
    async fn test_write_creates_output_dir() {
        let dir = tempdir().unwrap();
        let writer = StructureWriter::new(dir.path().join("nested").join("sdf"));

        let path = writer.write("water", StructureDocument::new("962\n$$$$\n")).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "962\n$$$$\n");
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let dir = tempdir().unwrap();
        let writer = StructureWriter::new(dir.path());

        writer.write("water", StructureDocument::new("first, and longer")).await.unwrap();
        let path = writer.write("water", StructureDocument::new("second")).await.unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_write_into_file_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();
        let writer = StructureWriter::new(&blocker);

        assert!(writer.write("water", StructureDocument::new("body")).await.is_err());
    }
}
