//! Dashboard composition root
//!
//! Wires the filter cells, list synchronizer, form overlay and mutation
//! dispatcher around one gateway, the way the presentation layer drives them.

use crate::collection::RecordCollection;
use crate::dispatcher::MutationDispatcher;
use crate::error::DashboardResult;
use crate::events::{DashboardEvent, EventBus};
use crate::filters::FilterCells;
use crate::gateway::EmployeeGateway;
use crate::overlay::{Draft, FormOverlay};
use crate::render::Table;
use crate::sync::{ListSynchronizer, SyncOutcome, SyncStatus};
use recruitly_core::{DashboardConfig, Department, EmployeeRecord, FilterState, RecordId};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Employee dashboard view state
///
/// Filter setters only touch the filter cells; the background follower
/// started by [`Dashboard::start`] turns changes into list requests.
pub struct Dashboard<G: EmployeeGateway + ?Sized + 'static> {
    filters: FilterCells,
    sync: Arc<ListSynchronizer<G>>,
    dispatcher: MutationDispatcher<G>,
    overlay: FormOverlay,
    events: EventBus,
    debounce: Duration,
    follower: Option<JoinHandle<()>>,
}

impl<G: EmployeeGateway + ?Sized + 'static> Dashboard<G> {
    /// Build a dashboard over `gateway`. Nothing is fetched until
    /// [`Dashboard::start`].
    pub fn new(gateway: Arc<G>, config: &DashboardConfig) -> Self {
        let events = EventBus::new(config.event_capacity);
        let filters = FilterCells::new();
        let sync = Arc::new(ListSynchronizer::new(Arc::clone(&gateway), events.clone()));
        let dispatcher = MutationDispatcher::new(gateway, Arc::clone(&sync), filters.subscribe(), events.clone());

        Self {
            filters,
            sync,
            dispatcher,
            overlay: FormOverlay::new(),
            events,
            debounce: Duration::from_millis(config.filter_debounce_ms),
            follower: None,
        }
    }

    /// Start following filter changes and perform the initial load with the
    /// current filter.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn start(&mut self) -> SyncOutcome {
        if self.follower.is_none() {
            let follow = Arc::clone(&self.sync).follow(self.filters.subscribe(), self.debounce);
            self.follower = Some(tokio::spawn(follow));
            info!(debounce = ?self.debounce, "dashboard started");
        }
        self.refresh().await
    }

    /// Re-run the list request for the current filter
    pub async fn refresh(&self) -> SyncOutcome {
        self.sync.refresh(self.filters.snapshot()).await
    }

    /// Current filter
    pub fn filter(&self) -> FilterState {
        self.filters.snapshot()
    }

    /// Set the name search. Returns whether the filter changed.
    pub fn set_name_pattern(&self, pattern: impl Into<String>) -> bool {
        self.filters.set_name_pattern(pattern)
    }

    /// Set the department selector. Returns whether the filter changed.
    pub fn set_department(&self, department: Option<Department>) -> bool {
        self.filters.set_department(department)
    }

    /// Set the active-only toggle. Returns whether the filter changed.
    pub fn set_active_only(&self, active_only: bool) -> bool {
        self.filters.set_active_only(active_only)
    }

    /// Open the overlay with a blank draft
    pub fn open_create(&mut self) -> bool {
        self.overlay.open_create()
    }

    /// Open the overlay on the record with this identifier. Returns `false`
    /// when the record is not in the collection or the overlay is already
    /// open.
    pub fn open_edit(&mut self, id: &RecordId) -> bool {
        let Some(record) = self.sync.with_collection(|c| c.get(id).cloned()) else {
            debug!(%id, "cannot edit, record not in collection");
            return false;
        };
        self.overlay.open_edit(&record)
    }

    /// Close the overlay, discarding the draft
    pub fn cancel(&mut self) {
        self.overlay.cancel();
    }

    /// Overlay state, draft and inline error
    pub const fn overlay(&self) -> &FormOverlay {
        &self.overlay
    }

    /// Edit the open draft. Returns `false` when the overlay is closed.
    pub fn edit_draft(&mut self, apply: impl FnOnce(&mut Draft)) -> bool {
        self.overlay.edit(apply)
    }

    /// Submit the open draft; see [`MutationDispatcher::submit`]
    ///
    /// # Errors
    ///
    /// Returns the validation or network error that kept the overlay open.
    pub async fn submit(&mut self) -> DashboardResult<Option<EmployeeRecord>> {
        self.dispatcher.submit(&mut self.overlay).await
    }

    /// Delete a record; see [`MutationDispatcher::delete_record`]
    ///
    /// # Errors
    ///
    /// Returns the network error of the failed delete.
    pub async fn delete(&self, id: &RecordId) -> DashboardResult<()> {
        self.dispatcher.delete_record(id).await
    }

    /// Snapshot of the record collection
    pub fn records(&self) -> RecordCollection {
        self.sync.collection()
    }

    /// Collection as a text table
    pub fn render(&self, show_ids: bool) -> String {
        self.sync
            .with_collection(|collection| Table::new(collection).with_ids(show_ids).to_string())
    }

    /// Subscribe to dashboard events
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Request counters
    pub fn sync_status(&self) -> SyncStatus {
        self.sync.status()
    }

    /// Receiver for request counter changes
    pub fn watch_sync_status(&self) -> watch::Receiver<SyncStatus> {
        self.sync.watch_status()
    }

    /// Wait until `issued` list requests have been issued and all completed
    pub async fn wait_settled(&self, issued: u64) {
        self.sync.wait_settled(issued).await;
    }
}

impl<G: EmployeeGateway + ?Sized + 'static> fmt::Debug for Dashboard<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dashboard")
            .field("filter", &self.filters.snapshot())
            .field("overlay", &self.overlay)
            .field("status", &self.sync.status())
            .field("following", &self.follower.is_some())
            .finish_non_exhaustive()
    }
}

impl<G: EmployeeGateway + ?Sized + 'static> Drop for Dashboard<G> {
    fn drop(&mut self) {
        if let Some(follower) = self.follower.take() {
            follower.abort();
        }
    }
}
