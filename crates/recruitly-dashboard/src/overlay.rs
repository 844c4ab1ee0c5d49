//! Create/edit form overlay

use crate::error::{DashboardError, DashboardResult, DraftField, FieldIssue};
use recruitly_core::{Department, EmployeePayload, EmployeeRecord, EmploymentStatus, RecordId, Salary};
use tracing::debug;

/// Unsaved employee field values
///
/// Salary stays text until submission so half-typed input is representable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    /// Employee name
    pub name: String,
    /// Department, `None` until one is picked
    pub department: Option<Department>,
    /// Free-text role
    pub role: String,
    /// Salary as typed
    pub salary: String,
    /// Employment status
    pub status: EmploymentStatus,
}

impl Draft {
    /// Check required fields and parse the salary.
    ///
    /// Every problem is reported at once, in form order.
    pub fn validate(&self) -> DashboardResult<EmployeePayload> {
        let mut issues = Vec::new();

        if self.name.trim().is_empty() {
            issues.push(FieldIssue::Missing(DraftField::Name));
        }
        if self.department.is_none() {
            issues.push(FieldIssue::Missing(DraftField::Department));
        }
        if self.role.trim().is_empty() {
            issues.push(FieldIssue::Missing(DraftField::Role));
        }

        let salary = if self.salary.trim().is_empty() {
            issues.push(FieldIssue::Missing(DraftField::Salary));
            None
        } else {
            match self.salary.parse::<Salary>() {
                Ok(salary) => Some(salary),
                Err(_) => {
                    issues.push(FieldIssue::InvalidNumber(DraftField::Salary));
                    None
                }
            }
        };

        match (self.department, salary) {
            (Some(department), Some(salary)) if issues.is_empty() => Ok(EmployeePayload {
                name: self.name.clone(),
                department,
                role: self.role.clone(),
                salary,
                status: self.status,
            }),
            _ => Err(DashboardError::validation(issues)),
        }
    }
}

impl From<&EmployeeRecord> for Draft {
    fn from(record: &EmployeeRecord) -> Self {
        Self {
            name: record.name.clone(),
            department: Some(record.department),
            role: record.role.clone(),
            salary: record.salary.to_string(),
            status: record.status,
        }
    }
}

/// Where the overlay is in its open/close cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OverlayState {
    /// Nothing shown
    #[default]
    Closed,
    /// Blank form for a new record
    Creating(Draft),
    /// Form pre-filled from an existing record
    Editing {
        /// Identifier of the record being edited
        id: RecordId,
        /// Working copy of its fields
        draft: Draft,
    },
}

/// Gateway call a valid draft turns into
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Create a new record
    Create(EmployeePayload),
    /// Replace the fields of an existing record
    Update(RecordId, EmployeePayload),
}

/// Modal form state machine with an inline error slot
#[derive(Debug, Clone, Default)]
pub struct FormOverlay {
    state: OverlayState,
    error: Option<DashboardError>,
}

impl FormOverlay {
    /// Closed overlay
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a blank form. Returns `false` if the overlay is already open.
    pub fn open_create(&mut self) -> bool {
        self.open(OverlayState::Creating(Draft::default()))
    }

    /// Open a form pre-filled from `record`. Returns `false` if the overlay is
    /// already open.
    pub fn open_edit(&mut self, record: &EmployeeRecord) -> bool {
        self.open(OverlayState::Editing {
            id: record.id.clone(),
            draft: Draft::from(record),
        })
    }

    fn open(&mut self, state: OverlayState) -> bool {
        if self.is_open() {
            debug!("overlay already open, ignoring");
            return false;
        }
        self.state = state;
        self.error = None;
        true
    }

    /// Discard the draft and close
    pub fn cancel(&mut self) {
        self.close();
    }

    pub(crate) fn close(&mut self) {
        self.state = OverlayState::Closed;
        self.error = None;
    }

    /// Current state
    pub const fn state(&self) -> &OverlayState {
        &self.state
    }

    /// Whether a form is shown
    pub const fn is_open(&self) -> bool {
        !matches!(self.state, OverlayState::Closed)
    }

    /// Whether the form edits an existing record
    pub const fn is_editing(&self) -> bool {
        matches!(self.state, OverlayState::Editing { .. })
    }

    /// The draft, when open
    pub const fn draft(&self) -> Option<&Draft> {
        match &self.state {
            OverlayState::Closed => None,
            OverlayState::Creating(draft) | OverlayState::Editing { draft, .. } => Some(draft),
        }
    }

    /// Apply a field edit to the draft and clear the inline error.
    /// Returns `false` when the overlay is closed.
    pub fn edit(&mut self, apply: impl FnOnce(&mut Draft)) -> bool {
        let draft = match &mut self.state {
            OverlayState::Closed => return false,
            OverlayState::Creating(draft) | OverlayState::Editing { draft, .. } => draft,
        };
        apply(draft);
        self.error = None;
        true
    }

    /// Form heading
    pub const fn title(&self) -> Option<&'static str> {
        match self.state {
            OverlayState::Closed => None,
            OverlayState::Creating(_) => Some("Add Employee"),
            OverlayState::Editing { .. } => Some("Edit Employee"),
        }
    }

    /// Submit button label
    pub const fn submit_label(&self) -> Option<&'static str> {
        match self.state {
            OverlayState::Closed => None,
            OverlayState::Creating(_) => Some("Create"),
            OverlayState::Editing { .. } => Some("Update"),
        }
    }

    /// Inline error from the last failed submission
    pub const fn error(&self) -> Option<&DashboardError> {
        self.error.as_ref()
    }

    pub(crate) fn set_error(&mut self, error: DashboardError) {
        self.error = Some(error);
    }

    /// Validate the draft and describe the gateway call it needs.
    /// `None` when the overlay is closed.
    pub fn submission(&self) -> Option<DashboardResult<Submission>> {
        match &self.state {
            OverlayState::Closed => None,
            OverlayState::Creating(draft) => Some(draft.validate().map(Submission::Create)),
            OverlayState::Editing { id, draft } => Some(
                draft
                    .validate()
                    .map(|payload| Submission::Update(id.clone(), payload)),
            ),
        }
    }
}
