//! Core widget types and traits.
//!
//! Every widget composes a [`WidgetCore`]: the family-independent
//! [`WidgetState`] plus an [`InteractionMachine`] for its state family. The
//! core turns machine transitions into events, so widgets only add their
//! domain behavior on top.

use std::cell::RefCell;
use std::rc::Rc;

use lumen_core::{
    EventEmitter, EventKind, FocusLink, Interaction, InteractionMachine, KeyEvent, Level,
    PointerEvent, PointerEventKind, Rect, StateTable, Trigger, UiEvent, Vec2, WidgetId,
    WidgetKind, NO_TAB_STOP,
};

use crate::config::InteractionSettings;
use crate::render::RenderCommand;
use crate::style::Theme;

/// Shared handle to any widget.
pub type WidgetHandle = Rc<RefCell<dyn Widget>>;

/// Family-independent widget state.
#[derive(Debug)]
pub struct WidgetState {
    /// Widget identifier.
    id: WidgetId,
    /// Widget family, used as the event name prefix.
    kind: WidgetKind,
    /// Bounding rectangle.
    bounds: Rect,
    /// Hidden widgets are neither drawn nor hit-tested.
    visible: bool,
    /// Position in Tab order.
    tab_stop_index: i32,
    /// Back-reference to the focus manager, set at registration.
    focus_link: Option<FocusLink>,
    /// Subscribers.
    events: EventEmitter,
}

impl WidgetState {
    /// Creates state for a new widget with a fresh id.
    #[must_use]
    pub fn new(kind: WidgetKind) -> Self {
        Self {
            id: WidgetId::next(),
            kind,
            bounds: Rect::ZERO,
            visible: true,
            tab_stop_index: NO_TAB_STOP,
            focus_link: None,
            events: EventEmitter::new(),
        }
    }

    /// Returns the widget id.
    #[must_use]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Returns the widget family.
    #[must_use]
    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// Returns the bounds.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Sets the bounds.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Returns true if visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the widget.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Returns the tab stop.
    #[must_use]
    pub fn tab_stop_index(&self) -> i32 {
        self.tab_stop_index
    }

    /// Sets the tab stop. Takes effect at the next registration.
    pub fn set_tab_stop_index(&mut self, tab_stop_index: i32) {
        self.tab_stop_index = tab_stop_index;
    }

    /// Returns the focus manager back-reference.
    #[must_use]
    pub fn focus_link(&self) -> Option<&FocusLink> {
        self.focus_link.as_ref()
    }

    /// Installs or clears the focus manager back-reference.
    pub fn set_focus_link(&mut self, link: Option<FocusLink>) {
        self.focus_link = link;
    }

    /// Returns the event emitter.
    pub fn events_mut(&mut self) -> &mut EventEmitter {
        &mut self.events
    }

    /// Emits an event from this widget.
    pub fn emit(&mut self, kind: EventKind, trigger: Trigger) {
        let event = UiEvent::new(kind, self.kind, self.id, trigger);
        self.events.emit(&event);
    }
}

/// [`WidgetState`] plus the interaction machine of one state family.
#[derive(Debug)]
pub struct WidgetCore<S: StateTable> {
    /// Family-independent state.
    pub state: WidgetState,
    /// Interaction machine.
    pub machine: InteractionMachine<S>,
}

impl<S: StateTable> WidgetCore<S> {
    /// Creates a core for a widget family.
    #[must_use]
    pub fn new(kind: WidgetKind, machine: InteractionMachine<S>) -> Self {
        Self {
            state: WidgetState::new(kind),
            machine,
        }
    }

    /// Returns the resolved family state.
    #[must_use]
    pub fn current(&self) -> S {
        self.machine.state()
    }

    /// Returns the resolved level.
    #[must_use]
    pub fn level(&self) -> Level {
        self.machine.level()
    }

    /// Returns true if enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.machine.is_enabled()
    }

    /// Returns true if focused.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.machine.is_focused()
    }

    /// Emits one event per interaction.
    pub fn emit_interactions(&mut self, interactions: &[Interaction], trigger: &Trigger) {
        for interaction in interactions {
            self.state.emit(interaction.event_kind(), trigger.clone());
        }
    }

    /// Feeds a pointer event through the machine and emits the results.
    ///
    /// Focus is not requested here. Widgets react to [`Interaction::Down`]
    /// with their own focus path so edit widgets can load their buffers.
    pub fn pointer(&mut self, event: &PointerEvent) -> Vec<Interaction> {
        let out = match event.kind {
            PointerEventKind::Enter => self.machine.pointer_enter(),
            PointerEventKind::Leave => self.machine.pointer_leave(),
            PointerEventKind::Down => self.machine.pointer_down(),
            PointerEventKind::Up => self.machine.pointer_up(),
            PointerEventKind::Move => Vec::new(),
        };
        self.emit_interactions(&out, &Trigger::Pointer(*event));
        out
    }

    /// Pointer handling for display widgets: only enter and leave count.
    pub fn hover(&mut self, event: &PointerEvent) -> bool {
        match event.kind {
            PointerEventKind::Enter | PointerEventKind::Leave => !self.pointer(event).is_empty(),
            _ => false,
        }
    }

    /// Feeds a key press through the machine and emits the results.
    pub fn key_down(&mut self, event: &KeyEvent) -> Vec<Interaction> {
        let out = self.machine.key_down(event.key);
        self.emit_interactions(&out, &Trigger::Key(*event));
        out
    }

    /// Feeds a key release through the machine and emits the results.
    pub fn key_up(&mut self, event: &KeyEvent) -> Vec<Interaction> {
        let out = self.machine.key_up(event.key);
        self.emit_interactions(&out, &Trigger::Key(*event));
        out
    }

    /// Gains focus, claiming it from the focus manager first.
    ///
    /// Returns false if the widget is disabled, not focusable or already
    /// focused.
    pub fn focus(&mut self, trigger: Trigger) -> bool {
        if !self.machine.is_enabled() || !self.machine.is_focusable() || self.machine.is_focused() {
            return false;
        }

        if let Some(link) = &self.state.focus_link {
            link.acquire(self.state.tab_stop_index);
        }

        let out = self.machine.focus();
        self.emit_interactions(&out, &trigger);
        !out.is_empty()
    }

    /// Loses focus and reports it to the focus manager.
    pub fn blur(&mut self, trigger: Trigger) -> bool {
        let out = self.machine.blur();
        if out.is_empty() {
            return false;
        }

        self.emit_interactions(&out, &trigger);
        if let Some(link) = &self.state.focus_link {
            link.release(self.state.tab_stop_index);
        }
        true
    }

    /// Enables or disables the widget. A focused widget is blurred first.
    ///
    /// Returns true if the enabled state changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if !enabled && self.machine.is_focused() {
            self.blur(Trigger::Programmatic);
        }

        let out = self.machine.set_enabled(enabled);
        self.emit_interactions(&out, &Trigger::Programmatic);
        !out.is_empty()
    }

    /// Advances the debounce timer.
    pub fn tick(&mut self, dt: f32) {
        let out = self.machine.tick(dt);
        self.emit_interactions(&out, &Trigger::Programmatic);
    }

    /// Applies root-wide interaction settings.
    pub fn apply_settings(&mut self, settings: &InteractionSettings) {
        self.machine.set_debounce(settings.unhover_debounce_secs());
    }

    /// Blurs the widget and removes it from its focus manager.
    pub fn detach(&mut self) {
        self.blur(Trigger::Programmatic);
        if let Some(link) = self.state.focus_link.take() {
            link.withdraw(self.state.tab_stop_index);
        }
    }
}

/// Base trait for all widgets.
pub trait Widget {
    /// Returns the widget's state.
    fn state(&self) -> &WidgetState;

    /// Returns mutable access to the widget's state.
    fn state_mut(&mut self) -> &mut WidgetState;

    /// Returns the resolved interaction level, used for theming.
    fn level(&self) -> Level;

    /// Returns true if the widget accepts interaction.
    fn is_enabled(&self) -> bool;

    /// Enables or disables the widget.
    fn set_enabled(&mut self, enabled: bool);

    /// Handles a pointer event. Returns true if the widget reacted.
    fn handle_pointer(&mut self, event: &PointerEvent) -> bool;

    /// Per-frame tick. `dt` is elapsed time in seconds.
    fn update(&mut self, dt: f32);

    /// Generates render commands for this widget.
    fn render(&self, theme: &Theme, commands: &mut Vec<RenderCommand>);

    /// Called when the widget is added to a UI root.
    fn on_add(&mut self, _settings: &InteractionSettings) {}

    /// Called when the widget is removed from a UI root.
    fn on_remove(&mut self) {}

    /// Returns the widget id.
    fn id(&self) -> WidgetId {
        self.state().id()
    }

    /// Returns the widget family.
    fn kind(&self) -> WidgetKind {
        self.state().kind()
    }

    /// Returns the bounds.
    fn bounds(&self) -> Rect {
        self.state().bounds()
    }

    /// Sets the bounds.
    fn set_bounds(&mut self, bounds: Rect) {
        self.state_mut().set_bounds(bounds);
    }

    /// Returns true if visible.
    fn is_visible(&self) -> bool {
        self.state().is_visible()
    }

    /// Shows or hides the widget.
    fn set_visible(&mut self, visible: bool) {
        self.state_mut().set_visible(visible);
    }

    /// Returns true if the point hits this widget.
    fn hit_test(&self, point: Vec2) -> bool {
        self.is_visible() && self.bounds().contains(point)
    }

    /// Returns the event emitter for subscriptions.
    fn events_mut(&mut self) -> &mut EventEmitter {
        self.state_mut().events_mut()
    }
}

/// Draws a widget background with border and focus ring.
pub(crate) fn draw_frame(
    theme: &Theme,
    bounds: Rect,
    level: Level,
    focused: bool,
    commands: &mut Vec<RenderCommand>,
) {
    let style = &theme.style;
    commands.push(RenderCommand::Rect {
        bounds,
        color: theme.fill(level),
        corner_radius: style.corner_radius,
    });
    commands.push(RenderCommand::RectOutline {
        bounds,
        color: theme.border,
        width: style.border_width,
        corner_radius: style.corner_radius,
    });
    if focused {
        commands.push(RenderCommand::RectOutline {
            bounds: bounds.expand(style.focus_ring_width),
            color: theme.focus_ring,
            width: style.focus_ring_width,
            corner_radius: style.corner_radius + style.focus_ring_width,
        });
    }
}

/// Draws a line of text vertically centered inside `bounds`.
pub(crate) fn draw_text(
    theme: &Theme,
    bounds: Rect,
    text: &str,
    color: crate::style::Color,
    commands: &mut Vec<RenderCommand>,
) {
    let font_size = theme.style.font_size;
    commands.push(RenderCommand::Text {
        text: text.to_owned(),
        x: bounds.x + theme.style.padding,
        y: bounds.y + (bounds.height - font_size) * 0.5,
        color,
        font_size,
    });
}
