//! Remote data gateway boundary

use crate::error::DashboardResult;
use async_trait::async_trait;
use recruitly_core::{EmployeePayload, EmployeeRecord, FilterState, RecordId};

/// Typed access to the remote employee service
///
/// Every method is a single round trip with no retry. Failures are returned
/// as [`crate::DashboardError::Network`] and are terminal for that call.
#[async_trait]
pub trait EmployeeGateway: Send + Sync {
    /// Fetch the records matching a filter snapshot
    async fn list(&self, filter: &FilterState) -> DashboardResult<Vec<EmployeeRecord>>;

    /// Create a record; the service assigns its identifier
    async fn create(&self, payload: &EmployeePayload) -> DashboardResult<EmployeeRecord>;

    /// Replace the fields of an existing record
    async fn update(
        &self,
        id: &RecordId,
        payload: &EmployeePayload,
    ) -> DashboardResult<EmployeeRecord>;

    /// Delete a record
    async fn delete(&self, id: &RecordId) -> DashboardResult<()>;

    /// Get gateway name
    fn name(&self) -> &str;
}
