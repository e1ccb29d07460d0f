//! Two-generation snapshot store

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::models::deployment::Deployment;
use crate::snapshot::diff::{diff, StatusTransition};

/// The full deployment list as observed at one poll tick.
///
/// Immutable after capture; keyed by `id` for lookup.
#[derive(Debug, Clone)]
pub struct Snapshot {
    records: Vec<Deployment>,
    index: HashMap<String, usize>,
    taken_at: DateTime<Utc>,
}

impl Snapshot {
    /// Capture a snapshot from a freshly fetched list
    pub fn from_records(records: Vec<Deployment>, taken_at: DateTime<Utc>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            // ids are unique by contract; keep the first occurrence if not
            index.entry(record.id.clone()).or_insert(pos);
        }
        Self {
            records,
            index,
            taken_at,
        }
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<&Deployment> {
        self.index.get(id).map(|pos| &self.records[*pos])
    }

    /// Records in the order the backend returned them
    pub fn records(&self) -> &[Deployment] {
        &self.records
    }

    /// When this snapshot was captured
    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether any record is still pending or building
    pub fn has_active(&self) -> bool {
        self.records.iter().any(|r| r.status.is_active())
    }
}

#[derive(Debug, Default)]
struct Generations {
    previous: Option<Snapshot>,
    current: Option<Snapshot>,
}

/// Holds the current authoritative deployment list and the immediately
/// preceding one. Written only by the poll loop; read by the server layer
/// and the analytics aggregator.
pub struct SnapshotStore {
    generations: RwLock<Generations>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            generations: RwLock::new(Generations::default()),
        }
    }

    /// Atomically replace the current snapshot with a freshly fetched list.
    ///
    /// Returns the status transitions between the outgoing and incoming
    /// generations. The very first replace has nothing to diff against and
    /// returns no transitions. Never fails; an empty list is a valid
    /// (empty) snapshot.
    pub fn replace(
        &self,
        records: Vec<Deployment>,
        now: DateTime<Utc>,
    ) -> Vec<StatusTransition> {
        let incoming = Snapshot::from_records(records, now);
        let mut generations = self
            .generations
            .write()
            .unwrap_or_else(|e| e.into_inner());

        let outgoing = generations.current.take();
        let transitions = match &outgoing {
            Some(previous) => diff(previous, &incoming),
            None => Vec::new(),
        };

        generations.previous = outgoing;
        generations.current = Some(incoming);
        transitions
    }

    /// Clone of the current snapshot, if a fetch has succeeded yet
    pub fn current(&self) -> Option<Snapshot> {
        let generations = self.generations.read().unwrap_or_else(|e| e.into_inner());
        generations.current.clone()
    }

    /// Clone of the previous snapshot
    pub fn previous(&self) -> Option<Snapshot> {
        let generations = self.generations.read().unwrap_or_else(|e| e.into_inner());
        generations.previous.clone()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
