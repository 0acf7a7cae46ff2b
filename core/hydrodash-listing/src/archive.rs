//! Archive partition transitions.
//!
//! A record is in exactly one partition at a time. Transitions are single
//! statements in the store, and repeating one is a no-op that still succeeds.

use hydrodash_types::{RecordId, ResourceKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{ListingError, ListingResult};
use crate::store::RecordStore;

/// Effect of an archive or unarchive call on an existing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveTransition {
    /// The flag flipped.
    Changed,
    /// The row was already in the target partition.
    Unchanged,
}

/// Result of an archive transition, as returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveOutcome {
    pub id: RecordId,
    pub archived: bool,
    pub changed: bool,
}

/// Moves records of one kind between the active and archived partitions.
pub struct ArchivePartitioner<S> {
    kind: ResourceKind,
    store: Arc<S>,
}

impl<S> Clone for ArchivePartitioner<S> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RecordStore> ArchivePartitioner<S> {
    pub fn new(kind: ResourceKind, store: Arc<S>) -> Self {
        Self { kind, store }
    }

    /// Moves a record into the archived partition.
    pub fn archive(&self, id: RecordId) -> ListingResult<ArchiveOutcome> {
        self.transition(id, true)
    }

    /// Moves a record back into the active partition.
    pub fn unarchive(&self, id: RecordId) -> ListingResult<ArchiveOutcome> {
        self.transition(id, false)
    }

    fn transition(&self, id: RecordId, archived: bool) -> ListingResult<ArchiveOutcome> {
        match self.store.set_archived(self.kind, id, archived)? {
            None => {
                warn!(kind = %self.kind, %id, archived, "archive transition on missing record");
                Err(ListingError::RecordNotFound {
                    kind: self.kind,
                    id,
                })
            }
            Some(transition) => {
                let changed = transition == ArchiveTransition::Changed;
                info!(kind = %self.kind, %id, archived, changed, "archive transition");
                Ok(ArchiveOutcome {
                    id,
                    archived,
                    changed,
                })
            }
        }
    }
}
