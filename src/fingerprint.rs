//! Hand-off of container records to a provenance store.
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::container::{ContainerHandle, ContainerRecord};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("container `{0}` has already been recorded")]
    AlreadyRecorded(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Receives the records of containers used by a build.
pub trait RecordSink {
    fn submit(
        &self,
        record: ContainerRecord,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Keeps records in memory, at most one per container.
#[derive(Debug, Default)]
pub struct MemoryRecordSink {
    records: DashMap<ContainerHandle, ContainerRecord>,
}

impl MemoryRecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, container: &ContainerHandle) -> Option<ContainerRecord> {
        self.records.get(container).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Snapshot of all records, ordered by creation time.
    pub fn records(&self) -> Vec<ContainerRecord> {
        let mut records: Vec<ContainerRecord> =
            self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by_key(|r| (r.created(), r.container_id().clone()));
        records
    }
}

impl RecordSink for MemoryRecordSink {
    async fn submit(&self, record: ContainerRecord) -> Result<()> {
        match self.records.entry(record.container_id().clone()) {
            Entry::Occupied(entry) => Err(Error::AlreadyRecorded(entry.key().to_string())),
            Entry::Vacant(entry) => {
                log::debug!(
                    "recorded container {} ({})",
                    record.container_name(),
                    record.container_id().short()
                );
                entry.insert(record);
                Ok(())
            }
        }
    }
}
