//! Error types for the dashboard view state

use std::fmt;
use thiserror::Error;

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Gateway operation that produced a network error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GET /api/employees`
    List,
    /// `POST /api/employees`
    Create,
    /// `PUT /api/employees/{id}`
    Update,
    /// `DELETE /api/employees/{id}`
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Draft field subject to submission validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    /// Employee name
    Name,
    /// Department selector
    Department,
    /// Free-text role
    Role,
    /// Salary text
    Salary,
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Department => "department",
            Self::Role => "role",
            Self::Salary => "salary",
        })
    }
}

/// Single reason a draft was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldIssue {
    /// Required field left empty
    Missing(DraftField),
    /// Field present but not a non-negative number
    InvalidNumber(DraftField),
}

impl FieldIssue {
    /// Field the issue refers to
    pub const fn field(self) -> DraftField {
        match self {
            Self::Missing(field) | Self::InvalidNumber(field) => field,
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(field) => write!(f, "{field} is required"),
            Self::InvalidNumber(field) => write!(f, "{field} must be a non-negative number"),
        }
    }
}

/// Errors surfaced by the dashboard view state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// Transport failure, non-success status or undecodable body
    #[error("{operation} request failed: {message}")]
    Network {
        /// Gateway operation that failed
        operation: Operation,
        /// HTTP status, when the service answered
        status: Option<u16>,
        /// Error message
        message: String,
    },

    /// Draft rejected before any request was made
    #[error("Please fill in all required fields ({})", join_issues(.issues))]
    Validation {
        /// Every offending field, in form order
        issues: Vec<FieldIssue>,
    },
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl DashboardError {
    /// Create a network error without a status code
    pub fn network(operation: Operation, message: impl Into<String>) -> Self {
        Self::Network {
            operation,
            status: None,
            message: message.into(),
        }
    }

    /// Create a network error for a non-success HTTP status
    pub fn http_status(operation: Operation, status: u16) -> Self {
        Self::Network {
            operation,
            status: Some(status),
            message: format!("service responded with status {status}"),
        }
    }

    /// Create a validation error
    pub const fn validation(issues: Vec<FieldIssue>) -> Self {
        Self::Validation { issues }
    }

    /// Whether this came from a gateway round trip
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Whether this was raised client-side before any request
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Operation of a network error
    pub const fn operation(&self) -> Option<Operation> {
        match self {
            Self::Network { operation, .. } => Some(*operation),
            Self::Validation { .. } => None,
        }
    }
}

impl From<DashboardError> for recruitly_core::Error {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Validation { ref issues } => match issues.first() {
                Some(issue) => Self::validation(issue.field().to_string(), err.to_string()),
                None => Self::Other(err.to_string()),
            },
            DashboardError::Network { .. } => Self::Other(err.to_string()),
        }
    }
}
