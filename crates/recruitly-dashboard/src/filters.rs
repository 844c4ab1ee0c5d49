//! Observable filter inputs

use recruitly_core::{Department, FilterState};
use tokio::sync::watch;
use tracing::trace;

/// Three independent filter cells behind one change notification
///
/// Setting a cell to the value it already holds is not a change and wakes
/// nobody. Setters never trigger side effects themselves; dependents observe
/// through [`FilterCells::subscribe`].
#[derive(Debug)]
pub struct FilterCells {
    tx: watch::Sender<FilterState>,
}

impl FilterCells {
    /// Create cells holding the default filter
    pub fn new() -> Self {
        Self::with_state(FilterState::default())
    }

    /// Create cells holding an explicit filter
    pub fn with_state(state: FilterState) -> Self {
        let (tx, _) = watch::channel(state);
        Self { tx }
    }

    /// Current value of all three cells
    pub fn snapshot(&self) -> FilterState {
        self.tx.borrow().clone()
    }

    /// Receiver that observes every change to the filter tuple
    pub fn subscribe(&self) -> watch::Receiver<FilterState> {
        self.tx.subscribe()
    }

    /// Set the name substring. Returns whether the filter changed.
    pub fn set_name_pattern(&self, pattern: impl Into<String>) -> bool {
        let pattern = pattern.into();
        self.update(|state| replace(&mut state.name_pattern, pattern))
    }

    /// Set the department selector. Returns whether the filter changed.
    pub fn set_department(&self, department: Option<Department>) -> bool {
        self.update(|state| replace(&mut state.department, department))
    }

    /// Set the active-only toggle. Returns whether the filter changed.
    pub fn set_active_only(&self, active_only: bool) -> bool {
        self.update(|state| replace(&mut state.active_only, active_only))
    }

    fn update(&self, modify: impl FnOnce(&mut FilterState) -> bool) -> bool {
        let changed = self.tx.send_if_modified(modify);
        if changed {
            trace!(filter = ?*self.tx.borrow(), "filter changed");
        }
        changed
    }
}

impl Default for FilterCells {
    fn default() -> Self {
        Self::new()
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        assert_eq!(FilterCells::new().snapshot(), FilterState::default());
    }

    #[test]
    fn test_cells_are_independent() {
        let cells = FilterCells::new();
        assert!(cells.set_name_pattern("ada"));
        assert!(cells.set_department(Some(Department::Sales)));
        assert!(cells.set_active_only(true));

        assert_eq!(
            cells.snapshot(),
            FilterState {
                name_pattern: "ada".to_string(),
                department: Some(Department::Sales),
                active_only: true,
            }
        );

        assert!(cells.set_department(None));
        assert_eq!(cells.snapshot().name_pattern, "ada");
        assert!(cells.snapshot().active_only);
    }

    #[test]
    fn test_same_value_is_not_a_change() {
        let cells = FilterCells::new();
        let mut rx = cells.subscribe();

        assert!(!cells.set_name_pattern(""));
        assert!(!cells.set_active_only(false));
        assert!(!rx.has_changed().unwrap());

        assert!(cells.set_active_only(true));
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().active_only);
        assert!(!rx.has_changed().unwrap());
    }
}
