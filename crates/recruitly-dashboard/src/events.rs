//! Structured notification channel for the presentation layer

use crate::error::{DashboardError, Operation};
use recruitly_core::{EmployeeRecord, RecordId};
use tokio::sync::broadcast;
use tracing::trace;

/// Something the presentation layer may want to show
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// A list response landed and replaced the collection
    RecordsReplaced {
        /// Sequence number of the landed request
        sequence: u64,
        /// Number of records now held
        count: usize,
    },

    /// A list response arrived after a newer request was issued and was ignored
    StaleDiscarded {
        /// Sequence number of the ignored request
        sequence: u64,
        /// Latest issued sequence number at arrival
        latest: u64,
    },

    /// The latest list request failed; the collection is unchanged
    FetchFailed {
        /// Sequence number of the failed request
        sequence: u64,
        /// The failure
        error: DashboardError,
    },

    /// A record was created
    Created(EmployeeRecord),

    /// A record was updated
    Updated(EmployeeRecord),

    /// A record was deleted
    Deleted(RecordId),

    /// A draft was rejected before any request
    ValidationFailed(DashboardError),

    /// A create, update or delete round trip failed
    MutationFailed(DashboardError),
}

impl DashboardEvent {
    /// Whether the event reports a failure
    pub const fn is_error(&self) -> bool {
        matches!(
            self,
            Self::FetchFailed { .. } | Self::ValidationFailed(_) | Self::MutationFailed(_)
        )
    }

    /// Short user-facing notice, if the event deserves one
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Self::Created(_) => Some("Employee added"),
            Self::Updated(_) => Some("Employee updated"),
            Self::Deleted(_) => Some("Employee deleted"),
            Self::FetchFailed { .. } => Some("Error fetching employees"),
            Self::ValidationFailed(_) => Some("Please fill in all required fields"),
            Self::MutationFailed(error) => match error.operation() {
                Some(Operation::Delete) => Some("Delete failed"),
                _ => Some("Failed to save employee"),
            },
            Self::RecordsReplaced { .. } | Self::StaleDiscarded { .. } => None,
        }
    }
}

/// Fan-out of dashboard events to any number of subscribers
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DashboardEvent>,
}

impl EventBus {
    /// Create a bus retaining up to `capacity` undelivered events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.tx.subscribe()
    }

    /// Publish an event; having no subscribers is not an error
    pub fn emit(&self, event: DashboardEvent) {
        if self.tx.send(event).is_err() {
            trace!("dashboard event dropped, no subscribers");
        }
    }
}
