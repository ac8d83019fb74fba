//! # Keyboard Focus Management
//!
//! One [`FocusManager`] per UI root. It is the single source of truth for
//! which widget owns keyboard input, and it moves that ownership through the
//! registered widgets in ascending tab-stop order.
//!
//! ## How focus moves
//!
//! 1. Application code registers focusable widgets. Each receives a
//!    [`FocusLink`], a weak back-reference to the manager's registry.
//! 2. A widget that focuses itself (pointer-down, or an explicit `focus()`
//!    call) goes through [`FocusLink::acquire`], which blurs the previous
//!    owner first.
//! 3. The host routes keys through [`FocusManager::handle_key`]: Tab and
//!    Shift+Tab navigate, every other key goes to the focused widget.
//!
//! The registry is never borrowed while a widget method runs, so widgets may
//! call back into their link from inside `focus()` / `lose_focus()`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::input::{Key, KeyEvent};

/// Tab-stop value that excludes a widget from Tab navigation.
pub const NO_TAB_STOP: i32 = -1;

/// Shared handle to a focusable widget.
pub type FocusHandle = Rc<RefCell<dyn Focusable>>;

/// Capability of widgets that can own keyboard focus.
pub trait Focusable {
    /// Position in Tab order; [`NO_TAB_STOP`] means not navigable.
    fn tab_stop_index(&self) -> i32;

    /// Returns true while this widget owns keyboard focus.
    fn is_focused(&self) -> bool;

    /// Returns true if the widget may receive focus at all.
    fn is_enabled(&self) -> bool;

    /// Gains focus. A registered widget reports the change through its link.
    fn focus(&mut self);

    /// Loses focus. A registered widget reports the change through its link.
    fn lose_focus(&mut self);

    /// Installs or clears the manager back-reference.
    fn set_focus_link(&mut self, link: Option<FocusLink>);

    /// Handles a key while focused. Returns true if consumed.
    fn handle_key(&mut self, _event: &KeyEvent) -> bool {
        false
    }

    /// Handles a key release while focused. Returns true if consumed.
    fn handle_key_up(&mut self, _event: &KeyEvent) -> bool {
        false
    }
}

/// Structured report of a registration problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDiagnostic {
    /// A different widget already used this tab stop. The new one replaced it.
    DuplicateTabStop {
        /// The contested tab stop.
        tab_stop_index: i32,
    },
    /// The widget has a negative tab stop and was not registered.
    NotNavigable {
        /// The widget's tab stop.
        tab_stop_index: i32,
    },
}

impl std::fmt::Display for FocusDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTabStop { tab_stop_index } => {
                write!(f, "tab stop {tab_stop_index} registered twice, last registration wins")
            }
            Self::NotNavigable { tab_stop_index } => {
                write!(f, "tab stop {tab_stop_index} is not navigable, widget not registered")
            }
        }
    }
}

struct Registry {
    /// Widgets by tab stop, ascending.
    entries: BTreeMap<i32, FocusHandle>,
    /// Focused tab stop, or [`NO_TAB_STOP`].
    current: i32,
}

impl Registry {
    fn current_handle(&self) -> Option<FocusHandle> {
        if self.current == NO_TAB_STOP {
            return None;
        }
        self.entries.get(&self.current).cloned()
    }
}

/// Weak back-reference from a widget to its focus manager.
#[derive(Clone)]
pub struct FocusLink {
    registry: Weak<RefCell<Registry>>,
}

impl FocusLink {
    /// Claims focus for the widget at `tab_stop_index`.
    ///
    /// Blurs the previous owner before recording the new index. Returns false
    /// if the manager is gone or the tab stop is not registered; the widget
    /// then focuses itself without coordination.
    pub fn acquire(&self, tab_stop_index: i32) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };

        let previous = {
            let reg = registry.borrow();
            if !reg.entries.contains_key(&tab_stop_index) {
                return false;
            }
            if reg.current == tab_stop_index {
                return true;
            }
            reg.current_handle()
        };

        if let Some(previous) = previous {
            blur_handle(&previous);
        }

        registry.borrow_mut().current = tab_stop_index;
        tracing::debug!("focus acquired by tab stop {}", tab_stop_index);
        true
    }

    /// Reports that the widget at `tab_stop_index` lost focus on its own.
    pub fn release(&self, tab_stop_index: i32) {
        if let Some(registry) = self.registry.upgrade() {
            let mut reg = registry.borrow_mut();
            if reg.current == tab_stop_index {
                reg.current = NO_TAB_STOP;
            }
        }
    }

    /// Removes the widget at `tab_stop_index` from the registry.
    ///
    /// Used from a widget's removal hook. The widget is responsible for
    /// clearing its own focus flag.
    pub fn withdraw(&self, tab_stop_index: i32) {
        if let Some(registry) = self.registry.upgrade() {
            let mut reg = registry.borrow_mut();
            if reg.current == tab_stop_index {
                reg.current = NO_TAB_STOP;
            }
            reg.entries.remove(&tab_stop_index);
        }
    }

    /// Returns the focused tab stop, or [`NO_TAB_STOP`].
    #[must_use]
    pub fn current_tab_index(&self) -> i32 {
        self.registry
            .upgrade()
            .map_or(NO_TAB_STOP, |registry| registry.borrow().current)
    }

    /// Returns true while the manager is alive.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.registry.strong_count() > 0
    }
}

impl std::fmt::Debug for FocusLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusLink")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Blurs a widget unless it is already mutably borrowed further up the stack.
fn blur_handle(handle: &FocusHandle) {
    match handle.try_borrow_mut() {
        Ok(mut widget) => widget.lose_focus(),
        Err(_) => tracing::warn!("focused widget busy, blur skipped"),
    }
}

/// Tab-order registry and keyboard focus owner for one UI root.
pub struct FocusManager {
    registry: Rc<RefCell<Registry>>,
}

impl FocusManager {
    /// Creates an empty manager with nothing focused.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                entries: BTreeMap::new(),
                current: NO_TAB_STOP,
            })),
        }
    }

    fn link(&self) -> FocusLink {
        FocusLink {
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Registers a widget under its tab stop.
    ///
    /// On a collision with a different widget, the new registration wins:
    /// the displaced widget is blurred if focused, loses its link, and a
    /// [`FocusDiagnostic::DuplicateTabStop`] is returned.
    pub fn register(&mut self, widget: FocusHandle) -> Option<FocusDiagnostic> {
        let tab_stop_index = widget.borrow().tab_stop_index();
        if tab_stop_index < 0 {
            let diagnostic = FocusDiagnostic::NotNavigable { tab_stop_index };
            tracing::warn!("{}", diagnostic);
            return Some(diagnostic);
        }

        let displaced = self.registry.borrow().entries.get(&tab_stop_index).cloned();
        let mut diagnostic = None;

        if let Some(displaced) = displaced {
            if Rc::ptr_eq(&displaced, &widget) {
                return None;
            }

            let report = FocusDiagnostic::DuplicateTabStop { tab_stop_index };
            tracing::warn!("{}", report);
            diagnostic = Some(report);

            if self.current_tab_index() == tab_stop_index {
                self.clear_focus();
            }
            displaced.borrow_mut().set_focus_link(None);
        }

        self.registry
            .borrow_mut()
            .entries
            .insert(tab_stop_index, Rc::clone(&widget));
        widget.borrow_mut().set_focus_link(Some(self.link()));

        // A widget that was already focused before registration becomes the owner.
        if widget.borrow().is_focused() {
            if let Some(previous) = self.focused() {
                if !Rc::ptr_eq(&previous, &widget) {
                    blur_handle(&previous);
                }
            }
            self.registry.borrow_mut().current = tab_stop_index;
        }

        diagnostic
    }

    /// Registers several widgets, collecting diagnostics.
    pub fn register_all(
        &mut self,
        widgets: impl IntoIterator<Item = FocusHandle>,
    ) -> Vec<FocusDiagnostic> {
        widgets
            .into_iter()
            .filter_map(|widget| self.register(widget))
            .collect()
    }

    /// Removes a widget. Clears focus first if it owns focus.
    ///
    /// Returns false if the widget was not registered.
    pub fn unregister(&mut self, widget: &FocusHandle) -> bool {
        let tab_stop_index = widget.borrow().tab_stop_index();
        let registered = self
            .registry
            .borrow()
            .entries
            .get(&tab_stop_index)
            .is_some_and(|entry| Rc::ptr_eq(entry, widget));
        if !registered {
            return false;
        }

        if self.current_tab_index() == tab_stop_index {
            self.clear_focus();
        }

        self.registry.borrow_mut().entries.remove(&tab_stop_index);
        widget.borrow_mut().set_focus_link(None);
        true
    }

    /// Removes several widgets. Returns how many were registered.
    pub fn unregister_all<'a>(&mut self, widgets: impl IntoIterator<Item = &'a FocusHandle>) -> usize {
        widgets
            .into_iter()
            .filter(|widget| self.unregister(widget))
            .count()
    }

    /// Moves focus to `widget`.
    ///
    /// The previous owner is blurred before the index switches, then the new
    /// widget gains focus. No-op (returns false) if the widget already owns
    /// focus, is not registered, or is disabled.
    pub fn set_focus(&mut self, widget: &FocusHandle) -> bool {
        let (tab_stop_index, enabled) = {
            let w = widget.borrow();
            (w.tab_stop_index(), w.is_enabled())
        };

        let (registered, previous) = {
            let reg = self.registry.borrow();
            let registered = reg
                .entries
                .get(&tab_stop_index)
                .is_some_and(|entry| Rc::ptr_eq(entry, widget));
            (registered, reg.current_handle())
        };

        if !registered || !enabled {
            return false;
        }
        if self.current_tab_index() == tab_stop_index {
            return false;
        }

        if let Some(previous) = previous {
            blur_handle(&previous);
        }
        self.registry.borrow_mut().current = tab_stop_index;
        widget.borrow_mut().focus();

        tracing::debug!("focus moved to tab stop {}", tab_stop_index);
        true
    }

    /// Blurs the focused widget (if any) and resets to nothing focused.
    pub fn clear_focus(&mut self) {
        let previous = self.registry.borrow().current_handle();
        if let Some(previous) = previous {
            blur_handle(&previous);
        }
        self.registry.borrow_mut().current = NO_TAB_STOP;
    }

    /// Moves focus to the next (`forward`) or previous registered widget,
    /// wrapping around at both ends. Disabled widgets are skipped.
    pub fn move_focus(&mut self, forward: bool) {
        let (order, current) = {
            let reg = self.registry.borrow();
            let order: Vec<(i32, FocusHandle)> = reg
                .entries
                .iter()
                .map(|(index, handle)| (*index, Rc::clone(handle)))
                .collect();
            (order, reg.current)
        };

        let count = order.len();
        if count == 0 {
            return;
        }

        let start = order.iter().position(|(index, _)| *index == current);
        let mut position = match start {
            None if forward => 0,
            None => count - 1,
            Some(position) => step(position, count, forward),
        };

        for _ in 0..count {
            let (_, handle) = &order[position];
            let enabled = handle.try_borrow().is_ok_and(|w| w.is_enabled());
            if enabled {
                self.set_focus(handle);
                return;
            }
            if Some(position) == start {
                break;
            }
            position = step(position, count, forward);
        }
    }

    /// Routes a key press: Tab / Shift+Tab navigate, anything else goes to the
    /// focused widget. Returns true if the key was consumed.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if event.key == Key::Tab {
            if self.is_empty() {
                return false;
            }
            self.move_focus(!event.modifiers.shift);
            return true;
        }

        match self.focused() {
            Some(widget) => widget.borrow_mut().handle_key(event),
            None => false,
        }
    }

    /// Routes a key release to the focused widget.
    pub fn handle_key_up(&mut self, event: &KeyEvent) -> bool {
        match self.focused() {
            Some(widget) => widget.borrow_mut().handle_key_up(event),
            None => false,
        }
    }

    /// Returns the focused tab stop, or [`NO_TAB_STOP`].
    #[must_use]
    pub fn current_tab_index(&self) -> i32 {
        self.registry.borrow().current
    }

    /// Returns the focused widget.
    #[must_use]
    pub fn focused(&self) -> Option<FocusHandle> {
        self.registry.borrow().current_handle()
    }

    /// Returns the widget registered at a tab stop.
    #[must_use]
    pub fn get(&self, tab_stop_index: i32) -> Option<FocusHandle> {
        self.registry.borrow().entries.get(&tab_stop_index).cloned()
    }

    /// Returns true if this exact widget is registered.
    #[must_use]
    pub fn contains(&self, widget: &FocusHandle) -> bool {
        let tab_stop_index = widget.borrow().tab_stop_index();
        self.registry
            .borrow()
            .entries
            .get(&tab_stop_index)
            .is_some_and(|entry| Rc::ptr_eq(entry, widget))
    }

    /// Returns the registered tab stops in ascending order.
    #[must_use]
    pub fn tab_order(&self) -> Vec<i32> {
        self.registry.borrow().entries.keys().copied().collect()
    }

    /// Returns the number of registered widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.borrow().entries.is_empty()
    }
}

impl Default for FocusManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FocusManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusManager")
            .field("tab_order", &self.tab_order())
            .field("current", &self.current_tab_index())
            .finish()
    }
}

const fn step(position: usize, count: usize, forward: bool) -> usize {
    if forward {
        (position + 1) % count
    } else {
        (position + count - 1) % count
    }
}
