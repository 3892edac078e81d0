//! Orchestrator for the download pipeline.
//!
//! Two passes over the record table, in input order:
//!   1. Resolve every compound name to a CID.
//!   2. For each resolved record, download the structure and write it.
//!
//! A failure at any stage is logged and ends that record's run; it never
//! stops the other records. Only input loading errors are fatal.

use std::path::Path;
use std::sync::Arc;

use pubchem3d_common::{CompoundRecord, RecordState, Result};
use tracing::{debug, info, instrument, warn};

use crate::pubchem::{CompoundResolver, PubChemClient, StructureRetriever};
use crate::table::load_records;
use crate::writer::StructureWriter;

pub struct DownloadPipeline {
    resolver: Arc<dyn CompoundResolver>,
    retriever: Arc<dyn StructureRetriever>,
    writer: StructureWriter,
}

impl DownloadPipeline {
    pub fn new(
        resolver: Arc<dyn CompoundResolver>,
        retriever: Arc<dyn StructureRetriever>,
        writer: StructureWriter,
    ) -> Self {
        Self { resolver, retriever, writer }
    }

    /// Pipeline using one PubChem client for both lookup and download.
    pub fn with_pubchem(client: PubChemClient, writer: StructureWriter) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client, writer)
    }

    /// Load the table at `input` and run both passes over it.
    ///
    /// Returns the final record table. Errors only when the input cannot be
    /// loaded, in which case no request has been made.
    #[instrument(skip(self))]
    pub async fn run(&self, input: &Path) -> Result<Vec<CompoundRecord>> {
        let mut records = load_records(input).await?;
        info!("Loaded {} compound names from {:?}", records.len(), input);

        self.resolve_all(&mut records).await;
        self.download_all(&mut records).await;

        Ok(records)
    }

    /// Pass 1: assign a CID to every pending record.
    pub async fn resolve_all(&self, records: &mut [CompoundRecord]) {
        for record in records.iter_mut() {
            if record.state != RecordState::Pending {
                continue;
            }

            if record.name.trim().is_empty() {
                warn!("Error searching PubChem for an empty compound name");
                record.state = RecordState::ResolveFailed {
                    reason: "empty compound name".to_string(),
                };
                continue;
            }

            match self.resolver.resolve(&record.name).await {
                Ok(cid) => {
                    debug!("Resolved {} to CID {}", record.name, cid);
                    record.cid = Some(cid);
                    record.state = RecordState::Resolved;
                }
                Err(e) => {
                    warn!("Error searching PubChem for {}: {}", record.name, e);
                    record.state = RecordState::ResolveFailed { reason: e.to_string() };
                }
            }
        }
    }

    /// Pass 2: download and write every resolved record.
    pub async fn download_all(&self, records: &mut [CompoundRecord]) {
        for record in records.iter_mut() {
            self.download_one(record).await;
        }
    }

    async fn download_one(&self, record: &mut CompoundRecord) {
        let cid = match (&record.state, record.cid) {
            (RecordState::Resolved, Some(cid)) => cid,
            (RecordState::ResolveFailed { .. }, _) => {
                warn!("No CID found for {}", record.name);
                return;
            }
            _ => return,
        };

        let document = match self.retriever.retrieve(cid).await {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Error downloading SDF for CID {}: {}", cid, e);
                warn!("Unable to download SDF for {}", record.name);
                record.state = RecordState::RetrieveFailed { reason: e.to_string() };
                return;
            }
        };
        record.state = RecordState::Retrieved;

        match self.writer.write(&record.name, document).await {
            Ok(path) => {
                info!("Downloaded SDF for {}", record.name);
                record.state = RecordState::Written { path };
            }
            Err(e) => {
                warn!("Error saving SDF for {}: {}", record.name, e);
                record.state = RecordState::WriteFailed { reason: e.to_string() };
            }
        }
    }
}
