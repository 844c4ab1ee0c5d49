//! Mutation dispatch: overlay submission and row deletion

use crate::error::DashboardResult;
use crate::events::{DashboardEvent, EventBus};
use crate::gateway::EmployeeGateway;
use crate::overlay::{FormOverlay, Submission};
use crate::sync::{ListSynchronizer, SyncOutcome};
use recruitly_core::{EmployeeRecord, FilterState, RecordId};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Turns user intent into gateway mutations followed by a refresh
///
/// The refresh after a successful mutation always uses the filter current at
/// that moment, never an unfiltered reload.
#[derive(Debug)]
pub struct MutationDispatcher<G: EmployeeGateway + ?Sized> {
    gateway: Arc<G>,
    sync: Arc<ListSynchronizer<G>>,
    filters: watch::Receiver<FilterState>,
    events: EventBus,
}

impl<G: EmployeeGateway + ?Sized> MutationDispatcher<G> {
    /// Create a dispatcher sharing the synchronizer's gateway
    pub const fn new(
        gateway: Arc<G>,
        sync: Arc<ListSynchronizer<G>>,
        filters: watch::Receiver<FilterState>,
        events: EventBus,
    ) -> Self {
        Self {
            gateway,
            sync,
            filters,
            events,
        }
    }

    /// Submit the overlay's draft.
    ///
    /// Returns `Ok(None)` when the overlay is closed. On success the overlay
    /// is closed and the list refreshed; on any error it stays open with the
    /// draft untouched and the error in its inline slot.
    pub async fn submit(&self, overlay: &mut FormOverlay) -> DashboardResult<Option<EmployeeRecord>> {
        let Some(submission) = overlay.submission() else {
            return Ok(None);
        };

        let submission = match submission {
            Ok(submission) => submission,
            Err(error) => {
                warn!(%error, "draft rejected");
                overlay.set_error(error.clone());
                self.events.emit(DashboardEvent::ValidationFailed(error.clone()));
                return Err(error);
            }
        };

        let result = match &submission {
            Submission::Create(payload) => self.gateway.create(payload).await,
            Submission::Update(id, payload) => self.gateway.update(id, payload).await,
        };

        let record = match result {
            Ok(record) => record,
            Err(error) => {
                warn!(%error, "saving employee failed");
                overlay.set_error(error.clone());
                self.events.emit(DashboardEvent::MutationFailed(error.clone()));
                return Err(error);
            }
        };

        overlay.close();
        match submission {
            Submission::Create(_) => {
                info!(id = %record.id, name = %record.name, "employee created");
                self.events.emit(DashboardEvent::Created(record.clone()));
            }
            Submission::Update(..) => {
                info!(id = %record.id, name = %record.name, "employee updated");
                self.events.emit(DashboardEvent::Updated(record.clone()));
            }
        }

        self.refresh().await;
        Ok(Some(record))
    }

    /// Delete a record straight from its row, then refresh.
    ///
    /// On failure the collection is left exactly as it was.
    pub async fn delete_record(&self, id: &RecordId) -> DashboardResult<()> {
        if let Err(error) = self.gateway.delete(id).await {
            warn!(%id, %error, "deleting employee failed");
            self.events.emit(DashboardEvent::MutationFailed(error.clone()));
            return Err(error);
        }

        info!(%id, "employee deleted");
        self.events.emit(DashboardEvent::Deleted(id.clone()));
        self.refresh().await;
        Ok(())
    }

    async fn refresh(&self) -> SyncOutcome {
        let filter = self.filters.borrow().clone();
        self.sync.refresh(filter).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::error::Operation;
    use crate::filters::FilterCells;
    use crate::mock::{GatewayCall, MockGateway};
    use crate::overlay::OverlayState;
    use pretty_assertions::assert_eq;
    use recruitly_core::{Department, EmploymentStatus, Salary};

    struct Fixture {
        gateway: Arc<MockGateway>,
        sync: Arc<ListSynchronizer<MockGateway>>,
        cells: FilterCells,
        dispatcher: MutationDispatcher<MockGateway>,
        events: EventBus,
    }

    fn employee(id: &str, name: &str) -> EmployeeRecord {
        EmployeeRecord {
            id: RecordId::from(id),
            name: name.to_string(),
            department: Department::Engineering,
            role: "Engineer".to_string(),
            salary: Salary::new(90_000.0).unwrap(),
            status: EmploymentStatus::Active,
        }
    }

    async fn fixture() -> Fixture {
        let gateway = Arc::new(
            MockGateway::new().with_records(vec![employee("x", "Ada"), employee("y", "Grace")]),
        );
        let events = EventBus::new(16);
        let sync = Arc::new(ListSynchronizer::new(Arc::clone(&gateway), events.clone()));
        let cells = FilterCells::new();
        let dispatcher = MutationDispatcher::new(
            Arc::clone(&gateway),
            Arc::clone(&sync),
            cells.subscribe(),
            events.clone(),
        );
        sync.refresh(cells.snapshot()).await;

        Fixture {
            gateway,
            sync,
            cells,
            dispatcher,
            events,
        }
    }

    #[tokio::test]
    async fn test_create_closes_overlay_and_refreshes_with_current_filter() {
        let f = fixture().await;
        f.cells.set_department(Some(Department::Engineering));
        let mut rx = f.events.subscribe();

        let mut overlay = FormOverlay::new();
        overlay.open_create();
        overlay.edit(|draft| {
            draft.name = "Linus".to_string();
            draft.department = Some(Department::Engineering);
            draft.role = "Kernel".to_string();
            draft.salary = "100000".to_string();
        });

        let created = f.dispatcher.submit(&mut overlay).await.unwrap().unwrap();

        assert_eq!(created.id.as_str(), "emp-1");
        assert_eq!(overlay.state(), &OverlayState::Closed);
        assert_eq!(f.gateway.list_calls().last(), Some(&f.cells.snapshot()));
        assert_eq!(f.sync.collection().len(), 3);
        assert_eq!(rx.recv().await.unwrap(), DashboardEvent::Created(created));
    }

    #[tokio::test]
    async fn test_unchanged_edit_sends_original_fields() {
        let f = fixture().await;
        let original = employee("x", "Ada");

        let mut overlay = FormOverlay::new();
        overlay.open_edit(&original);
        f.dispatcher.submit(&mut overlay).await.unwrap();

        assert!(!overlay.is_open());
        assert_eq!(
            f.gateway.calls()[1],
            GatewayCall::Update(RecordId::from("x"), original.payload())
        );
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_gateway() {
        let f = fixture().await;
        let mut overlay = FormOverlay::new();
        overlay.open_create();
        overlay.edit(|draft| draft.name = "Only a name".to_string());

        let err = f.dispatcher.submit(&mut overlay).await.unwrap_err();

        assert!(err.is_validation());
        assert!(overlay.is_open());
        assert_eq!(overlay.error(), Some(&err));
        assert_eq!(overlay.draft().unwrap().name, "Only a name");
        assert_eq!(f.gateway.mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_draft_for_retry() {
        let f = fixture().await;
        f.gateway.fail(Operation::Update);

        let mut overlay = FormOverlay::new();
        overlay.open_edit(&employee("x", "Ada"));
        overlay.edit(|draft| draft.role = "Principal".to_string());
        let err = f.dispatcher.submit(&mut overlay).await.unwrap_err();

        assert!(err.is_network());
        assert!(overlay.is_editing());
        assert_eq!(overlay.draft().unwrap().role, "Principal");
        assert_eq!(f.gateway.list_calls().len(), 1);

        f.gateway.recover(Operation::Update);
        let saved = f.dispatcher.submit(&mut overlay).await.unwrap().unwrap();
        assert_eq!(saved.role, "Principal");
        assert!(!overlay.is_open());
    }

    #[tokio::test]
    async fn test_submit_when_closed_does_nothing() {
        let f = fixture().await;
        let mut overlay = FormOverlay::new();

        assert_eq!(f.dispatcher.submit(&mut overlay).await.unwrap(), None);
        assert_eq!(f.gateway.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_collection_untouched() {
        let f = fixture().await;
        f.gateway.fail(Operation::Delete);
        let mut rx = f.events.subscribe();

        let err = f.dispatcher.delete_record(&RecordId::from("x")).await.unwrap_err();

        assert_eq!(err.operation(), Some(Operation::Delete));
        assert!(f.sync.collection().contains(&RecordId::from("x")));
        assert_eq!(f.gateway.list_calls().len(), 1);
        assert_eq!(rx.recv().await.unwrap().notice(), Some("Delete failed"));
    }

    #[tokio::test]
    async fn test_delete_refreshes() {
        let f = fixture().await;

        f.dispatcher.delete_record(&RecordId::from("x")).await.unwrap();

        assert!(!f.sync.collection().contains(&RecordId::from("x")));
        assert_eq!(f.gateway.list_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_failure_after_save_still_closes_overlay() {
        let f = fixture().await;
        f.gateway.fail(Operation::List);
        let mut rx = f.events.subscribe();

        let mut overlay = FormOverlay::new();
        overlay.open_edit(&employee("y", "Grace"));
        let saved = f.dispatcher.submit(&mut overlay).await.unwrap();

        assert!(saved.is_some());
        assert!(!overlay.is_open());
        assert!(matches!(rx.recv().await.unwrap(), DashboardEvent::Updated(_)));
        assert!(matches!(rx.recv().await.unwrap(), DashboardEvent::FetchFailed { .. }));
    }
}
