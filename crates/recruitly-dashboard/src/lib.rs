//! View-state core of the Recruitly employee dashboard
//!
//! Filter inputs drive a list synchronizer that keeps a record collection in
//! step with the remote employee service; a form overlay and a mutation
//! dispatcher create, update and delete records and refresh the list
//! afterwards. Late list responses from superseded requests never overwrite a
//! newer result.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::significant_drop_tightening,
    clippy::return_self_not_must_use
)]

pub mod api_client;
pub mod collection;
pub mod dashboard;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod filters;
pub mod gateway;
pub mod mock;
pub mod overlay;
pub mod render;
pub mod sync;

pub use api_client::HttpGateway;
pub use collection::RecordCollection;
pub use dashboard::Dashboard;
pub use dispatcher::MutationDispatcher;
pub use error::{DashboardError, DashboardResult, DraftField, FieldIssue, Operation};
pub use events::{DashboardEvent, EventBus};
pub use filters::FilterCells;
pub use gateway::EmployeeGateway;
pub use overlay::{Draft, FormOverlay, OverlayState, Submission};
pub use recruitly_core::{
    Department, EmployeePayload, EmployeeRecord, EmploymentStatus, FilterState, RecordId, Salary,
};
pub use render::{Table, render_table};
pub use sync::{ListSynchronizer, SyncOutcome, SyncStatus};
