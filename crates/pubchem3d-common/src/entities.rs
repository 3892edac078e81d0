//! Core entity types for the compound download pipeline.
//! One `CompoundRecord` per input row; the table is an ordered `Vec` of them.

use std::fmt;
use std::num::NonZeroU64;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Identifier
// ---------------------------------------------------------------------------

/// PubChem compound identifier. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cid(NonZeroU64);

impl Cid {
    /// Returns `None` for zero, which PubChem never assigns.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Structure document
// ---------------------------------------------------------------------------

/// Raw structure file body as returned by the retrieval service.
/// Not parsed or validated; consumed by the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureDocument(String);

impl StructureDocument {
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Record lifecycle
// ---------------------------------------------------------------------------

/// Where a record is in `pending → resolved → retrieved → written`.
/// Every `*Failed` state is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordState {
    Pending,
    Resolved,
    ResolveFailed { reason: String },
    Retrieved,
    RetrieveFailed { reason: String },
    Written { path: PathBuf },
    WriteFailed { reason: String },
}

impl RecordState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::ResolveFailed { .. }
                | Self::RetrieveFailed { .. }
                | Self::Written { .. }
                | Self::WriteFailed { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundRecord {
    pub name: String,
    pub cid: Option<Cid>,
    pub state: RecordState,
}

impl CompoundRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cid: None,
            state: RecordState::Pending,
        }
    }

    /// Path of the written structure file, if the record got that far.
    pub fn written_path(&self) -> Option<&PathBuf> {
        match &self.state {
            RecordState::Written { path } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cid_rejects_zero() {
        assert!(Cid::new(0).is_none());
        assert_eq!(Cid::new(962).map(Cid::get), Some(962));
    }

    #[test]
    fn test_cid_display() {
        assert_eq!(Cid::new(2244).unwrap().to_string(), "2244");
    }

    #[test]
    fn test_new_record_is_pending() {
        let r = CompoundRecord::new("water");
        assert_eq!(r.state, RecordState::Pending);
        assert!(r.cid.is_none());
        assert!(!r.state.is_terminal());
        assert!(r.written_path().is_none());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!RecordState::Resolved.is_terminal());
        assert!(!RecordState::Retrieved.is_terminal());
        assert!(RecordState::ResolveFailed { reason: "x".into() }.is_terminal());
        assert!(RecordState::Written { path: PathBuf::from("water.sdf") }.is_terminal());
    }
}
