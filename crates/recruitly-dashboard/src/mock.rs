//! In-memory gateway for testing

use crate::error::{DashboardError, DashboardResult, Operation};
use crate::gateway::EmployeeGateway;
use async_trait::async_trait;
use parking_lot::Mutex;
use recruitly_core::{EmployeePayload, EmployeeRecord, EmploymentStatus, FilterState, RecordId};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::oneshot;

/// A call observed by [`MockGateway`]
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    /// `list` with the filter snapshot it was given
    List(FilterState),
    /// `create` with its body
    Create(EmployeePayload),
    /// `update` with its target and body
    Update(RecordId, EmployeePayload),
    /// `delete` with its target
    Delete(RecordId),
}

/// Mock employee service backed by a vector
///
/// Filtering mirrors the remote service: case-insensitive name substring,
/// exact department, and `Active` status when requested.
#[derive(Debug, Default)]
pub struct MockGateway {
    /// Stored records, in insertion order
    store: Mutex<Vec<EmployeeRecord>>,

    /// Call log
    calls: Mutex<Vec<GatewayCall>>,

    /// Operations that currently fail
    failing: Mutex<HashSet<Operation>>,

    /// Whether list calls wait for an explicit release
    hold_lists: AtomicBool,

    /// Release handles for held list calls, indexed by arrival
    held: Mutex<Vec<Option<oneshot::Sender<()>>>>,

    /// Identifier counter
    next_id: AtomicU64,
}

impl MockGateway {
    /// Create an empty mock service
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store
    #[must_use]
    pub fn with_records(self, records: Vec<EmployeeRecord>) -> Self {
        *self.store.lock() = records;
        self
    }

    /// Make every subsequent call of `operation` fail
    pub fn fail(&self, operation: Operation) {
        self.failing.lock().insert(operation);
    }

    /// Stop failing `operation`
    pub fn recover(&self, operation: Operation) {
        self.failing.lock().remove(&operation);
    }

    /// Hold list responses until [`Self::release_list`] is called
    pub fn hold_lists(&self, hold: bool) {
        self.hold_lists.store(hold, Ordering::SeqCst);
    }

    /// Number of held list calls not yet released
    pub fn held_lists(&self) -> usize {
        self.held.lock().iter().filter(|slot| slot.is_some()).count()
    }

    /// Let the `index`-th held list call (in arrival order) complete.
    /// Returns `false` if there is no such pending call.
    pub fn release_list(&self, index: usize) -> bool {
        let sender = self.held.lock().get_mut(index).and_then(Option::take);
        sender.is_some_and(|tx| tx.send(()).is_ok())
    }

    /// Every call made so far
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().clone()
    }

    /// Filters passed to `list`, in call order
    pub fn list_calls(&self) -> Vec<FilterState> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                GatewayCall::List(filter) => Some(filter.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of non-list calls made so far
    pub fn mutation_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| !matches!(call, GatewayCall::List(_)))
            .count()
    }

    /// Snapshot of the stored records
    pub fn records(&self) -> Vec<EmployeeRecord> {
        self.store.lock().clone()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().push(call);
    }

    fn check(&self, operation: Operation) -> DashboardResult<()> {
        if self.failing.lock().contains(&operation) {
            Err(DashboardError::network(operation, "Mock failure"))
        } else {
            Ok(())
        }
    }

    fn matches(filter: &FilterState, record: &EmployeeRecord) -> bool {
        let pattern = filter.name_pattern.to_lowercase();
        (pattern.is_empty() || record.name.to_lowercase().contains(&pattern))
            && filter.department.is_none_or(|dept| record.department == dept)
            && (!filter.active_only || record.status == EmploymentStatus::Active)
    }
}

#[async_trait]
impl EmployeeGateway for MockGateway {
    async fn list(&self, filter: &FilterState) -> DashboardResult<Vec<EmployeeRecord>> {
        self.record(GatewayCall::List(filter.clone()));

        if self.hold_lists.load(Ordering::SeqCst) {
            let (tx, rx) = oneshot::channel();
            self.held.lock().push(Some(tx));
            // A dropped sender releases the call too
            let _ = rx.await;
        }

        self.check(Operation::List)?;
        Ok(self
            .store
            .lock()
            .iter()
            .filter(|record| Self::matches(filter, record))
            .cloned()
            .collect())
    }

    async fn create(&self, payload: &EmployeePayload) -> DashboardResult<EmployeeRecord> {
        self.record(GatewayCall::Create(payload.clone()));
        self.check(Operation::Create)?;

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = EmployeeRecord::from_payload(RecordId::new(format!("emp-{n}")), payload.clone());
        self.store.lock().push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: &RecordId,
        payload: &EmployeePayload,
    ) -> DashboardResult<EmployeeRecord> {
        self.record(GatewayCall::Update(id.clone(), payload.clone()));
        self.check(Operation::Update)?;

        let mut store = self.store.lock();
        let slot = store
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| DashboardError::http_status(Operation::Update, 404))?;
        *slot = EmployeeRecord::from_payload(id.clone(), payload.clone());
        Ok(slot.clone())
    }

    async fn delete(&self, id: &RecordId) -> DashboardResult<()> {
        self.record(GatewayCall::Delete(id.clone()));
        self.check(Operation::Delete)?;

        let mut store = self.store.lock();
        let before = store.len();
        store.retain(|record| &record.id != id);
        if store.len() == before {
            return Err(DashboardError::http_status(Operation::Delete, 404));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use recruitly_core::{Department, Salary};

    fn employee(id: &str, name: &str, department: Department, status: EmploymentStatus) -> EmployeeRecord {
        EmployeeRecord {
            id: RecordId::from(id),
            name: name.to_string(),
            department,
            role: "Staff".to_string(),
            salary: Salary::new(1000.0).unwrap(),
            status,
        }
    }

    fn seeded() -> MockGateway {
        MockGateway::new().with_records(vec![
            employee("1", "Ada Lovelace", Department::Engineering, EmploymentStatus::Active),
            employee("2", "Grace Hopper", Department::Engineering, EmploymentStatus::Inactive),
            employee("3", "Adam Smith", Department::Finance, EmploymentStatus::Active),
        ])
    }

    #[tokio::test]
    async fn test_list_filters_like_the_service() {
        let gateway = seeded();

        let by_name = gateway
            .list(&FilterState {
                name_pattern: "ada".to_string(),
                ..FilterState::default()
            })
            .await
            .unwrap();
        assert_eq!(by_name.len(), 2);

        let active_engineers = gateway
            .list(&FilterState {
                name_pattern: String::new(),
                department: Some(Department::Engineering),
                active_only: true,
            })
            .await
            .unwrap();
        assert_eq!(active_engineers.len(), 1);
        assert_eq!(active_engineers[0].id.as_str(), "1");
        assert_eq!(gateway.list_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_ids_fail() {
        let gateway = seeded();
        let payload = gateway.records()[0].payload();

        let err = gateway.update(&RecordId::from("zzz"), &payload).await.unwrap_err();
        assert_eq!(err, DashboardError::http_status(Operation::Update, 404));

        let err = gateway.delete(&RecordId::from("zzz")).await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(gateway.records().len(), 3);
    }

    #[tokio::test]
    async fn test_create_assigns_identifiers() {
        let gateway = MockGateway::new();
        let payload = employee("", "New", Department::Sales, EmploymentStatus::Active).payload();

        let created = gateway.create(&payload).await.unwrap();
        assert_eq!(created.id.as_str(), "emp-1");
        assert_eq!(gateway.records(), vec![created]);
    }

    #[tokio::test]
    async fn test_failure_injection_and_recovery() {
        let gateway = seeded();
        gateway.fail(Operation::Delete);
        assert!(gateway.delete(&RecordId::from("1")).await.is_err());

        gateway.recover(Operation::Delete);
        assert!(gateway.delete(&RecordId::from("1")).await.is_ok());
        assert_eq!(gateway.mutation_count(), 2);
    }

    #[tokio::test]
    async fn test_held_list_waits_for_release() {
        let gateway = seeded();
        gateway.hold_lists(true);

        let filter = FilterState::default();
        let list = gateway.list(&filter);
        let release = async {
            while gateway.held_lists() == 0 {
                tokio::task::yield_now().await;
            }
            assert!(gateway.release_list(0));
            assert!(!gateway.release_list(0));
        };

        let (records, ()) = tokio::join!(list, release);
        assert_eq!(records.unwrap().len(), 3);
    }
}
