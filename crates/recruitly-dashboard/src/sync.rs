//! List synchronizer: filter changes in, record collection out
//!
//! Every list request gets a sequence number at the moment it is issued. When
//! a response arrives it may only land if its number is still the latest
//! issued one; anything older is a stale response and is dropped, whether it
//! succeeded or failed. This keeps the collection equal to the result of the
//! most recently issued request no matter in which order responses arrive.

use crate::collection::RecordCollection;
use crate::error::DashboardError;
use crate::events::{DashboardEvent, EventBus};
use crate::gateway::EmployeeGateway;
use parking_lot::RwLock;
use recruitly_core::{EmployeeRecord, FilterState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// What happened to one list request
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The response replaced the collection
    Applied {
        /// Sequence number of the request
        sequence: u64,
        /// Records now held
        count: usize,
    },
    /// A newer request had been issued; the response was ignored
    Discarded {
        /// Sequence number of the request
        sequence: u64,
        /// Latest issued sequence number when it arrived
        latest: u64,
    },
    /// The request failed; the collection is unchanged
    Failed {
        /// Sequence number of the request
        sequence: u64,
        /// The failure
        error: DashboardError,
    },
}

/// Request counters, published on every issue and completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStatus {
    /// List requests issued so far
    pub issued: u64,
    /// List requests that have completed, in any way
    pub completed: u64,
}

impl SyncStatus {
    /// Whether some request is still outstanding
    pub const fn is_loading(&self) -> bool {
        self.completed < self.issued
    }
}

/// Keeps the record collection in step with the filter
#[derive(Debug)]
pub struct ListSynchronizer<G: EmployeeGateway + ?Sized> {
    gateway: Arc<G>,
    collection: RwLock<RecordCollection>,
    status: watch::Sender<SyncStatus>,
    events: EventBus,
}

impl<G: EmployeeGateway + ?Sized> ListSynchronizer<G> {
    /// Create a synchronizer with an empty collection
    pub fn new(gateway: Arc<G>, events: EventBus) -> Self {
        let (status, _) = watch::channel(SyncStatus::default());
        Self {
            gateway,
            collection: RwLock::new(RecordCollection::default()),
            status,
            events,
        }
    }

    /// Issue one list request for `filter`.
    ///
    /// The sequence number is taken when this is called, not when the
    /// returned future is first polled.
    pub fn refresh(&self, filter: FilterState) -> impl Future<Output = SyncOutcome> + Send + '_ {
        let sequence = self.issue(&filter);
        self.complete(sequence, filter)
    }

    async fn complete(&self, sequence: u64, filter: FilterState) -> SyncOutcome {
        let result = self.gateway.list(&filter).await;
        let outcome = self.land(sequence, result);
        self.status.send_modify(|status| status.completed += 1);
        outcome
    }

    fn issue(&self, filter: &FilterState) -> u64 {
        let mut sequence = 0;
        self.status.send_modify(|status| {
            status.issued += 1;
            sequence = status.issued;
        });
        debug!(sequence, ?filter, gateway = self.gateway.name(), "issuing list request");
        sequence
    }

    fn land(
        &self,
        sequence: u64,
        result: Result<Vec<EmployeeRecord>, DashboardError>,
    ) -> SyncOutcome {
        let mut collection = self.collection.write();
        let latest = self.status.borrow().issued;

        if sequence != latest {
            drop(collection);
            warn!(sequence, latest, "discarding stale list response");
            self.events
                .emit(DashboardEvent::StaleDiscarded { sequence, latest });
            return SyncOutcome::Discarded { sequence, latest };
        }

        match result {
            Ok(records) => {
                collection.replace(sequence, records);
                let count = collection.len();
                drop(collection);

                info!(sequence, count, "employee list updated");
                self.events
                    .emit(DashboardEvent::RecordsReplaced { sequence, count });
                SyncOutcome::Applied { sequence, count }
            }
            Err(error) => {
                drop(collection);

                warn!(sequence, %error, "list request failed");
                self.events.emit(DashboardEvent::FetchFailed {
                    sequence,
                    error: error.clone(),
                });
                SyncOutcome::Failed { sequence, error }
            }
        }
    }

    /// Snapshot of the current collection
    pub fn collection(&self) -> RecordCollection {
        self.collection.read().clone()
    }

    /// Read the collection in place
    pub fn with_collection<R>(&self, read: impl FnOnce(&RecordCollection) -> R) -> R {
        read(&self.collection.read())
    }

    /// Current request counters
    pub fn status(&self) -> SyncStatus {
        *self.status.borrow()
    }

    /// Receiver for request counter changes
    pub fn watch_status(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    /// Wait until at least `issued` requests have been issued and none is
    /// outstanding. A hung request makes this wait forever.
    pub async fn wait_settled(&self, issued: u64) {
        let mut rx = self.status.subscribe();
        // The sender lives in `self`, so the channel cannot close here
        let _ = rx
            .wait_for(|status| status.issued >= issued && !status.is_loading())
            .await;
    }
}

impl<G: EmployeeGateway + ?Sized + 'static> ListSynchronizer<G> {
    /// Like [`refresh`](Self::refresh), but the returned future owns the
    /// synchronizer and can be spawned. The sequence number is still taken
    /// before this returns.
    pub fn refresh_owned(
        self: Arc<Self>,
        filter: FilterState,
    ) -> impl Future<Output = SyncOutcome> + Send + 'static {
        let sequence = self.issue(&filter);
        async move { self.complete(sequence, filter).await }
    }

    /// Issue a list request for every observed filter change until the
    /// filter cells are dropped.
    ///
    /// Changes that happen before the previous one is observed coalesce into
    /// one request; a non-zero `debounce` extends that to any burst of edits
    /// separated by less than `debounce`.
    pub async fn follow(self: Arc<Self>, mut filters: watch::Receiver<FilterState>, debounce: Duration) {
        while filters.changed().await.is_ok() {
            if !debounce.is_zero() {
                loop {
                    match tokio::time::timeout(debounce, filters.changed()).await {
                        Ok(Ok(())) => {}
                        Ok(Err(_)) => return,
                        Err(_) => break,
                    }
                }
            }

            let filter = filters.borrow_and_update().clone();
            // Numbered here, in observation order, not when the task first runs
            tokio::spawn(Arc::clone(&self).refresh_owned(filter));
        }
        debug!("filter cells dropped, list synchronizer stopping");
    }
}
