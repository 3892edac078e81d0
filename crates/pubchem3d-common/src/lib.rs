//! pubchem3d-common — Shared types, errors, and the capped HTTP client used across all pubchem3d crates.

pub mod error;
pub mod entities;
pub mod sandbox;

// Re-export commonly used types
pub use entities::{Cid, CompoundRecord, RecordState, StructureDocument};
pub use error::{Pubchem3dError, Result};
