//! Sort state for a table view
//!
//! One transition function, [`next_sort`], drives both operating modes:
//!
//! - **controlled**: the sort state belongs to someone else. The controller
//!   reports the intended next state through a callback and only changes
//!   what it shows when the owner pushes a new state with
//!   [`TableSortController::sync`].
//! - **uncontrolled**: the controller owns the state and applies the
//!   transition itself.

use std::fmt;

use crate::sorts::{SortDirection, SortSpec};

/// Callback receiving the intended `(column, direction)` in controlled mode
pub type SortCallback = Box<dyn FnMut(&str, SortDirection)>;

/// Next sort state after a request on `column`.
///
/// An explicit direction is adopted as is; otherwise a new column starts
/// ascending and the active column flips.
pub fn next_sort(current: &SortSpec, column: &str, explicit: Option<SortDirection>) -> SortSpec {
    let direction = match explicit {
        Some(direction) => direction,
        None if current.sorts_by(column) => current.direction.reverse(),
        None => SortDirection::Asc,
    };
    SortSpec::new(column, direction)
}

/// How a header cell should present itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderState {
    /// The column is the active sort column
    pub active: bool,
    /// Direction to show; ascending for inactive columns
    pub direction: SortDirection,
    /// Inactive headers hide their sort icon
    pub show_icon: bool,
}

/// Direction a click on a header requests: the active column flips, any
/// other column asks for ascending
pub fn click_intent(current: &SortSpec, column: &str) -> SortDirection {
    if current.sorts_by(column) {
        current.direction.reverse()
    } else {
        SortDirection::Asc
    }
}

enum Mode {
    Controlled {
        external: SortSpec,
        on_sort: SortCallback,
    },
    Uncontrolled {
        state: SortSpec,
    },
}

/// Sort state machine behind a sortable table header
pub struct TableSortController {
    mode: Mode,
}

impl fmt::Debug for TableSortController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableSortController")
            .field("controlled", &self.is_controlled())
            .field("current", self.current())
            .finish()
    }
}

impl Default for TableSortController {
    fn default() -> Self {
        Self::uncontrolled(None)
    }
}

impl TableSortController {
    /// Self-managed state, starting from `initial` or no sort
    pub fn uncontrolled(initial: Option<SortSpec>) -> Self {
        Self {
            mode: Mode::Uncontrolled {
                state: initial.unwrap_or_default(),
            },
        }
    }

    /// Externally owned state; requests are forwarded to `on_sort`
    pub fn controlled(external: SortSpec, on_sort: impl FnMut(&str, SortDirection) + 'static) -> Self {
        Self {
            mode: Mode::Controlled {
                external,
                on_sort: Box::new(on_sort),
            },
        }
    }

    /// Pick the mode from whatever the view was given.
    ///
    /// Controlled mode needs both an external state and a callback; with
    /// either missing the controller manages its own state from `initial`.
    pub fn from_parts(
        external: Option<SortSpec>,
        on_sort: Option<SortCallback>,
        initial: Option<SortSpec>,
    ) -> Self {
        match (external, on_sort) {
            (Some(external), Some(on_sort)) => Self {
                mode: Mode::Controlled { external, on_sort },
            },
            _ => Self::uncontrolled(initial),
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self.mode, Mode::Controlled { .. })
    }

    /// The sort currently in effect
    pub fn current(&self) -> &SortSpec {
        match &self.mode {
            Mode::Controlled { external, .. } => external,
            Mode::Uncontrolled { state } => state,
        }
    }

    /// Handle a sort request and return the intended next state.
    ///
    /// Uncontrolled controllers apply it; controlled ones only forward it.
    pub fn request_sort(&mut self, column: &str, explicit: Option<SortDirection>) -> SortSpec {
        let next = next_sort(self.current(), column, explicit);
        match &mut self.mode {
            Mode::Controlled { on_sort, .. } => {
                tracing::debug!(column, direction = next.direction.as_str(), "Sort requested");
                on_sort(column, next.direction);
            }
            Mode::Uncontrolled { state } => {
                tracing::debug!(column, direction = next.direction.as_str(), "Sort applied");
                *state = next.clone();
            }
        }
        next
    }

    /// A click on a header cell
    pub fn click_header(&mut self, column: &str) -> SortSpec {
        let intent = click_intent(self.current(), column);
        self.request_sort(column, Some(intent))
    }

    /// Accept the owner's state in controlled mode; ignored otherwise
    pub fn sync(&mut self, spec: SortSpec) {
        if let Mode::Controlled { external, .. } = &mut self.mode {
            *external = spec;
        }
    }

    pub fn header_state(&self, column: &str) -> HeaderState {
        let current = self.current();
        let active = current.sorts_by(column);
        HeaderState {
            active,
            direction: if active { current.direction } else { SortDirection::Asc },
            show_icon: active,
        }
    }
}
