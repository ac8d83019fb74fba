//! Two-state widgets (checkbox, switch) and the value they share.

use std::cell::RefCell;
use std::rc::Rc;

use super::core::Widget;

/// Veto hook consulted before a guarded change. Receives the requested value
/// and returns false to refuse it.
pub type ChangeGuard = Box<dyn Fn(bool) -> bool>;

/// Shared handle to a toggle widget.
pub type ToggleHandle = Rc<RefCell<dyn Toggle>>;

/// A widget holding a checked/unchecked value.
pub trait Toggle: Widget {
    /// Returns the checked state.
    fn is_checked(&self) -> bool;

    /// Requests a new value, subject to the change guard.
    ///
    /// Emits `Changed` and returns true if the value changed.
    fn set_checked(&mut self, checked: bool) -> bool;

    /// Sets the value without consulting the guard. Emits `Changed` if the
    /// value changed.
    fn force_checked(&mut self, checked: bool);

    /// Installs or clears the change guard.
    fn set_change_guard(&mut self, guard: Option<ChangeGuard>);
}

/// Checked state plus optional guard.
#[derive(Default)]
pub struct ToggleValue {
    checked: bool,
    guard: Option<ChangeGuard>,
}

impl ToggleValue {
    /// Creates a value.
    #[must_use]
    pub fn new(checked: bool) -> Self {
        Self {
            checked,
            guard: None,
        }
    }

    /// Returns the checked state.
    #[must_use]
    pub fn get(&self) -> bool {
        self.checked
    }

    /// Applies a guarded change. Returns true if the value changed.
    pub fn request(&mut self, checked: bool) -> bool {
        if checked == self.checked {
            return false;
        }
        if let Some(guard) = &self.guard {
            if !guard(checked) {
                return false;
            }
        }
        self.checked = checked;
        true
    }

    /// Applies an unguarded change. Returns true if the value changed.
    pub fn force(&mut self, checked: bool) -> bool {
        let changed = checked != self.checked;
        self.checked = checked;
        changed
    }

    /// Installs or clears the guard.
    pub fn set_guard(&mut self, guard: Option<ChangeGuard>) {
        self.guard = guard;
    }
}

impl std::fmt::Debug for ToggleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToggleValue")
            .field("checked", &self.checked)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}
