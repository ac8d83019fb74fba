//! Mutual exclusion over a set of toggles.
//!
//! A [`RadioGroup`] keeps at most one member checked. It listens to each
//! member's `Changed` events and installs a change guard so a user cannot
//! uncheck the selected member unless deselection is allowed. Forced updates
//! the group makes itself are ignored when they echo back.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use lumen_core::{
    EventEmitter, EventKind, EventSender, SubscriptionId, Trigger, UiEvent, Value, WidgetId,
    WidgetKind,
};
use serde::Deserialize;

use crate::widget::{ChangeGuard, Toggle, ToggleHandle, Widget};

/// No member selected.
pub const NO_SELECTION: i32 = -1;

/// Radio group configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RadioGroupConfig {
    /// Member index selected when it is added; `-1` for none.
    pub selected_index: i32,
    /// Whether unchecking the selected member clears the selection.
    pub allow_deselect: bool,
}

impl Default for RadioGroupConfig {
    fn default() -> Self {
        Self {
            selected_index: NO_SELECTION,
            allow_deselect: false,
        }
    }
}

impl RadioGroupConfig {
    /// Sets the initially selected index.
    #[must_use]
    pub fn selected(mut self, index: i32) -> Self {
        self.selected_index = index;
        self
    }

    /// Allows the selected member to be unchecked.
    #[must_use]
    pub fn allow_deselect(mut self, allow: bool) -> Self {
        self.allow_deselect = allow;
        self
    }
}

struct Member {
    id: WidgetId,
    handle: ToggleHandle,
    subscription: SubscriptionId,
}

struct GroupCore {
    members: Vec<Member>,
    selected: i32,
}

struct GroupShared {
    id: WidgetId,
    config: RadioGroupConfig,
    core: RefCell<GroupCore>,
    events: RefCell<EventEmitter>,
    /// Set while the group forces member values.
    syncing: Cell<bool>,
}

impl GroupShared {
    fn emit(&self, previous: i32, current: i32, trigger: Trigger) {
        let event = UiEvent::new(
            EventKind::SelectionChanged { previous, current },
            WidgetKind::RadioGroup,
            self.id,
            trigger,
        );
        match self.events.try_borrow_mut() {
            Ok(mut events) => events.emit(&event),
            Err(_) => tracing::warn!("radio group {} busy, selection event dropped", self.id),
        }
    }

    /// Forces a member's value without reacting to the echo.
    fn force(&self, handle: &ToggleHandle, checked: bool) {
        self.syncing.set(true);
        match handle.try_borrow_mut() {
            Ok(mut member) => member.force_checked(checked),
            Err(_) => tracing::warn!("radio group {} could not update a busy member", self.id),
        }
        self.syncing.set(false);
    }

    fn handle_at(&self, index: i32) -> Option<ToggleHandle> {
        let core = self.core.borrow();
        let index = usize::try_from(index).ok()?;
        core.members.get(index).map(|m| Rc::clone(&m.handle))
    }

    /// Moves the selection and forces member values to match.
    fn apply(&self, current: i32, trigger: Trigger) -> bool {
        let previous = {
            let mut core = self.core.borrow_mut();
            if core.selected == current {
                return false;
            }
            std::mem::replace(&mut core.selected, current)
        };

        if let Some(old) = self.handle_at(previous) {
            self.force(&old, false);
        }
        if let Some(new) = self.handle_at(current) {
            self.force(&new, true);
        }
        self.emit(previous, current, trigger);
        true
    }

    /// A member reported a value change.
    fn on_member_changed(&self, event: &UiEvent) {
        if self.syncing.get() {
            return;
        }
        let EventKind::Changed { current: Value::Bool(checked), .. } = &event.kind else {
            return;
        };
        let checked = *checked;

        let (index, selected) = {
            let core = self.core.borrow();
            let Some(index) = core.members.iter().position(|m| m.id == event.target) else {
                return;
            };
            (index as i32, core.selected)
        };

        if checked {
            let previous = {
                let mut core = self.core.borrow_mut();
                std::mem::replace(&mut core.selected, index)
            };
            if previous == index {
                return;
            }
            if let Some(old) = self.handle_at(previous) {
                self.force(&old, false);
            }
            self.emit(previous, index, event.trigger.clone());
        } else if index == selected && self.config.allow_deselect {
            self.core.borrow_mut().selected = NO_SELECTION;
            self.emit(index, NO_SELECTION, event.trigger.clone());
        }
    }
}

/// Keeps at most one of its members checked. Emits
/// `RadioGroupSelectionChanged`.
pub struct RadioGroup {
    shared: Rc<GroupShared>,
}

impl RadioGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new(config: RadioGroupConfig) -> Self {
        Self {
            shared: Rc::new(GroupShared {
                id: WidgetId::next(),
                config,
                core: RefCell::new(GroupCore {
                    members: Vec::new(),
                    selected: NO_SELECTION,
                }),
                events: RefCell::new(EventEmitter::new()),
                syncing: Cell::new(false),
            }),
        }
    }

    /// Returns the group id used as the event target.
    #[must_use]
    pub fn id(&self) -> WidgetId {
        self.shared.id
    }

    /// Returns the selected index, `-1` for none.
    #[must_use]
    pub fn selected_index(&self) -> i32 {
        self.shared.core.borrow().selected
    }

    /// Returns the selected member.
    #[must_use]
    pub fn selected(&self) -> Option<ToggleHandle> {
        self.shared.handle_at(self.selected_index())
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.core.borrow().members.len()
    }

    /// Returns true if the group has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.core.borrow().members.is_empty()
    }

    /// Returns true if the handle is a member.
    #[must_use]
    pub fn contains(&self, member: &ToggleHandle) -> bool {
        self.index_of(member).is_some()
    }

    /// Adds a member. Adding the same handle twice is a no-op.
    ///
    /// The member at the configured index starts selected. A member that is
    /// already checked takes the selection from the previous holder. Any
    /// other member is forced unchecked.
    pub fn add(&self, member: &ToggleHandle) -> bool {
        if self.contains(member) {
            return false;
        }

        let index = self.len() as i32;
        let (id, checked) = {
            let widget = member.borrow();
            (widget.id(), widget.is_checked())
        };

        let shared = &self.shared;
        let becomes_selected = index == shared.config.selected_index || checked;
        if !becomes_selected {
            shared.force(member, false);
        }

        let subscription = {
            let mut widget = member.borrow_mut();
            let weak = Rc::downgrade(shared);
            let subscription = widget.events_mut().subscribe(move |event| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_member_changed(event);
                }
            });
            widget.set_change_guard(Some(deselect_guard(Rc::downgrade(shared))));
            subscription
        };

        shared.core.borrow_mut().members.push(Member {
            id,
            handle: Rc::clone(member),
            subscription,
        });

        if becomes_selected {
            shared.apply(index, Trigger::Programmatic);
        }
        true
    }

    /// Removes a member, clearing its guard and subscription.
    ///
    /// Removing the selected member clears the selection. Removing a member
    /// before it shifts the selected index down.
    pub fn remove(&self, member: &ToggleHandle) -> bool {
        let Some(index) = self.index_of(member) else {
            return false;
        };

        let (removed, previous) = {
            let mut core = self.shared.core.borrow_mut();
            let removed = core.members.remove(index);
            let previous = core.selected;
            let index = index as i32;
            if core.selected == index {
                core.selected = NO_SELECTION;
            } else if core.selected > index {
                core.selected -= 1;
            }
            (removed, previous)
        };

        if let Ok(mut widget) = removed.handle.try_borrow_mut() {
            widget.events_mut().unsubscribe(removed.subscription);
            widget.set_change_guard(None);
        }
        if previous == index as i32 {
            self.shared.emit(previous, NO_SELECTION, Trigger::Programmatic);
        }
        true
    }

    /// Selects a member by index. Out-of-range or already selected indices
    /// are no-ops.
    pub fn select(&self, index: i32) -> bool {
        if index < 0 || index as usize >= self.len() {
            return false;
        }
        self.shared.apply(index, Trigger::Programmatic)
    }

    /// Clears the selection, unchecking the selected member.
    pub fn deselect(&self) -> bool {
        self.shared.apply(NO_SELECTION, Trigger::Programmatic)
    }

    /// Registers a selection handler.
    pub fn subscribe(&self, handler: impl FnMut(&UiEvent) + 'static) -> SubscriptionId {
        self.shared.events.borrow_mut().subscribe(handler)
    }

    /// Removes a selection handler.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.events.borrow_mut().unsubscribe(id)
    }

    /// Forwards selection events into an event bus.
    pub fn forward_to(&self, sender: EventSender) -> SubscriptionId {
        self.shared.events.borrow_mut().forward_to(sender)
    }

    fn index_of(&self, member: &ToggleHandle) -> Option<usize> {
        self.shared
            .core
            .borrow()
            .members
            .iter()
            .position(|m| Rc::ptr_eq(&m.handle, member))
    }
}

impl Drop for RadioGroup {
    fn drop(&mut self) {
        let members = std::mem::take(&mut self.shared.core.borrow_mut().members);
        for member in members {
            if let Ok(mut widget) = member.handle.try_borrow_mut() {
                widget.events_mut().unsubscribe(member.subscription);
                widget.set_change_guard(None);
            }
        }
    }
}

impl std::fmt::Debug for RadioGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadioGroup")
            .field("id", &self.shared.id)
            .field("members", &self.len())
            .field("selected", &self.selected_index())
            .finish()
    }
}

/// Refuses unchecking while the group disallows deselection.
fn deselect_guard(group: Weak<GroupShared>) -> ChangeGuard {
    Box::new(move |checked| {
        checked
            || group
                .upgrade()
                .map_or(true, |shared| shared.config.allow_deselect)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{Checkbox, CheckboxConfig, Switch, SwitchConfig};
    use lumen_core::{PointerEvent, PointerEventKind};

    fn checkbox(checked: bool) -> Rc<RefCell<Checkbox>> {
        Rc::new(RefCell::new(Checkbox::new(CheckboxConfig {
            checked,
            ..CheckboxConfig::default()
        })))
    }

    fn click(widget: &Rc<RefCell<Checkbox>>) {
        let mut widget = widget.borrow_mut();
        for kind in [PointerEventKind::Enter, PointerEventKind::Down, PointerEventKind::Up] {
            widget.handle_pointer(&PointerEvent::new(kind, (0.0, 0.0)));
        }
    }

    fn group_of(config: RadioGroupConfig, members: &[Rc<RefCell<Checkbox>>]) -> RadioGroup {
        let group = RadioGroup::new(config);
        for member in members {
            let handle: ToggleHandle = member.clone();
            group.add(&handle);
        }
        group
    }

    #[test]
    fn test_configured_index_selected_on_add() {
        let boxes = [checkbox(false), checkbox(false), checkbox(false)];
        let group = group_of(RadioGroupConfig::default().selected(1), &boxes);

        assert_eq!(group.selected_index(), 1);
        assert!(!boxes[0].borrow().is_checked());
        assert!(boxes[1].borrow().is_checked());
    }

    #[test]
    fn test_checked_member_promoted() {
        let boxes = [checkbox(true), checkbox(true)];
        let group = group_of(RadioGroupConfig::default(), &boxes);

        assert_eq!(group.selected_index(), 1);
        assert!(!boxes[0].borrow().is_checked());
    }

    #[test]
    fn test_click_moves_selection() {
        let boxes = [checkbox(false), checkbox(false), checkbox(false)];
        let group = group_of(RadioGroupConfig::default().selected(0), &boxes);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        group.subscribe(move |event| {
            if let EventKind::SelectionChanged { previous, current } = event.kind {
                sink.borrow_mut().push((previous, current));
            }
        });

        click(&boxes[2]);
        assert_eq!(group.selected_index(), 2);
        assert!(!boxes[0].borrow().is_checked());
        assert!(boxes[2].borrow().is_checked());
        assert_eq!(*seen.borrow(), [(0, 2)]);
    }

    #[test]
    fn test_deselect_refused_by_default() {
        let boxes = [checkbox(false), checkbox(false)];
        let group = group_of(RadioGroupConfig::default().selected(0), &boxes);

        click(&boxes[0]);
        assert_eq!(group.selected_index(), 0);
        assert!(boxes[0].borrow().is_checked());
    }

    #[test]
    fn test_allow_deselect_clears() {
        let boxes = [checkbox(false), checkbox(false)];
        let group = group_of(
            RadioGroupConfig::default().selected(0).allow_deselect(true),
            &boxes,
        );

        click(&boxes[0]);
        assert_eq!(group.selected_index(), NO_SELECTION);
        assert!(!boxes[0].borrow().is_checked());
    }

    #[test]
    fn test_select_and_deselect() {
        let boxes = [checkbox(false), checkbox(false)];
        let group = group_of(RadioGroupConfig::default(), &boxes);

        assert!(!group.select(5));
        assert!(group.select(1));
        assert!(!group.select(1));
        assert!(boxes[1].borrow().is_checked());

        assert!(group.deselect());
        assert!(!boxes[1].borrow().is_checked());
        assert!(!group.deselect());
    }

    #[test]
    fn test_remove_shifts_selection() {
        let boxes = [checkbox(false), checkbox(false), checkbox(false)];
        let group = group_of(RadioGroupConfig::default().selected(2), &boxes);

        let first: ToggleHandle = boxes[0].clone();
        assert!(group.remove(&first));
        assert_eq!(group.selected_index(), 1);
        assert!(!group.remove(&first));

        let selected: ToggleHandle = boxes[2].clone();
        assert!(group.remove(&selected));
        assert_eq!(group.selected_index(), NO_SELECTION);

        // Released members are free again.
        boxes[2].borrow_mut().set_checked(false);
        assert!(!boxes[2].borrow().is_checked());
    }

    #[test]
    fn test_mixed_toggle_kinds() {
        let switch: ToggleHandle = Rc::new(RefCell::new(Switch::new(SwitchConfig::default())));
        let check: ToggleHandle = checkbox(false);
        let group = RadioGroup::new(RadioGroupConfig::default());
        group.add(&switch);
        group.add(&check);
        assert!(!group.add(&check));

        switch.borrow_mut().set_checked(true);
        check.borrow_mut().set_checked(true);
        assert_eq!(group.selected_index(), 1);
        assert!(!switch.borrow().is_checked());
    }
}
