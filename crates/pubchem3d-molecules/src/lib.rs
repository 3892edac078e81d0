//! pubchem3d Molecules - compound name to 3D structure file pipeline.
//!
//! 1. Loading compound names from a CSV table
//! 2. Resolving each name to a PubChem CID
//! 3. Downloading the SDF structure for each CID
//! 4. Writing `<compound_name>.sdf` to the output directory

pub mod table;
pub mod pubchem;
pub mod writer;
pub mod pipeline;

pub use pipeline::DownloadPipeline;
pub use pubchem::{CompoundResolver, PubChemClient, RecordType, StructureRetriever, PUBCHEM_API_URL};
pub use writer::StructureWriter;

pub type Result<T> = pubchem3d_common::Result<T>;
