//! On/off switch with an animated knob.

use lumen_core::{
    ButtonState, EventKind, FocusLink, Focusable, Interaction, InteractionMachine, KeyEvent,
    Level, PointerEvent, Rect, Trigger, Value, WidgetKind, NO_TAB_STOP,
};
use serde::Deserialize;

use super::core::{draw_frame, Widget, WidgetCore, WidgetState};
use super::toggle::{ChangeGuard, Toggle, ToggleValue};
use crate::animation::{Glide, KNOB_TRAVEL_SECS};
use crate::config::InteractionSettings;
use crate::render::RenderCommand;
use crate::style::Theme;

/// Switch configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SwitchConfig {
    /// Initial value.
    pub on: bool,
    /// Position in Tab order.
    pub tab_stop_index: i32,
    /// Initial enabled state.
    pub enabled: bool,
    /// Knob travel time in seconds.
    pub travel_secs: f32,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            on: false,
            tab_stop_index: NO_TAB_STOP,
            enabled: true,
            travel_secs: KNOB_TRAVEL_SECS,
        }
    }
}

impl SwitchConfig {
    /// Sets the initial value.
    #[must_use]
    pub fn on(mut self, on: bool) -> Self {
        self.on = on;
        self
    }

    /// Sets the tab stop.
    #[must_use]
    pub fn tab_stop(mut self, tab_stop_index: i32) -> Self {
        self.tab_stop_index = tab_stop_index;
        self
    }

    /// Sets the initial enabled state.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// On/off switch. Emits `SwitchChanged`.
#[derive(Debug)]
pub struct Switch {
    core: WidgetCore<ButtonState>,
    value: ToggleValue,
    /// Knob position, 0 = off, 1 = on.
    knob: Glide,
}

impl Switch {
    /// Creates a switch.
    #[must_use]
    pub fn new(config: SwitchConfig) -> Self {
        let mut core = WidgetCore::new(WidgetKind::Switch, InteractionMachine::new());
        core.state.set_tab_stop_index(config.tab_stop_index);
        core.machine.set_enabled(config.enabled);
        let rest = if config.on { 1.0 } else { 0.0 };
        Self {
            core,
            value: ToggleValue::new(config.on),
            knob: Glide::at_rest(rest, config.travel_secs),
        }
    }

    /// Sets the bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.core.state.set_bounds(bounds);
        self
    }

    /// Returns the current interaction state.
    #[must_use]
    pub fn current(&self) -> ButtonState {
        self.core.current()
    }

    /// Returns the displayed knob position (0 = off, 1 = on).
    #[must_use]
    pub fn knob_position(&self) -> f32 {
        self.knob.value()
    }

    /// Returns true if enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.core.is_enabled()
    }

    /// Enables or disables the switch.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.core.set_enabled(enabled);
    }

    /// Returns true while focused.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.core.is_focused()
    }

    /// Takes keyboard focus.
    pub fn focus(&mut self) {
        self.core.focus(Trigger::Programmatic);
    }

    /// Gives up keyboard focus.
    pub fn lose_focus(&mut self) {
        self.core.blur(Trigger::Programmatic);
    }

    fn toggle(&mut self, trigger: Trigger) {
        let previous = self.value.get();
        if self.value.request(!previous) {
            self.changed(previous, trigger);
        }
    }

    fn changed(&mut self, previous: bool, trigger: Trigger) {
        let on = self.value.get();
        self.knob.retarget(if on { 1.0 } else { 0.0 });
        self.core.state.emit(
            EventKind::Changed {
                previous: Value::Bool(previous),
                current: Value::Bool(on),
            },
            trigger,
        );
    }
}

impl Toggle for Switch {
    fn is_checked(&self) -> bool {
        self.value.get()
    }

    fn set_checked(&mut self, checked: bool) -> bool {
        let previous = self.value.get();
        let changed = self.value.request(checked);
        if changed {
            self.changed(previous, Trigger::Programmatic);
        }
        changed
    }

    fn force_checked(&mut self, checked: bool) {
        let previous = self.value.get();
        if self.value.force(checked) {
            self.changed(previous, Trigger::Programmatic);
        }
    }

    fn set_change_guard(&mut self, guard: Option<ChangeGuard>) {
        self.value.set_guard(guard);
    }
}

impl Widget for Switch {
    fn state(&self) -> &WidgetState {
        &self.core.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.core.state
    }

    fn level(&self) -> Level {
        self.core.level()
    }

    fn is_enabled(&self) -> bool {
        self.core.is_enabled()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.core.set_enabled(enabled);
    }

    fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let out = self.core.pointer(event);
        if out.contains(&Interaction::Down) {
            self.core.focus(Trigger::Pointer(*event));
        }
        if out.contains(&Interaction::Clicked) {
            self.toggle(Trigger::Pointer(*event));
        }
        !out.is_empty()
    }

    fn update(&mut self, dt: f32) {
        self.core.tick(dt);
        self.knob.advance(dt);
    }

    fn render(&self, theme: &Theme, commands: &mut Vec<RenderCommand>) {
        let bounds = self.core.state.bounds();
        let level = self.core.level();
        draw_frame(theme, bounds, level, self.core.is_focused(), commands);

        let t = self.knob.value();
        let inset = theme.style.padding * 0.5;
        let side = (bounds.height - inset * 2.0).max(0.0);
        let travel = (bounds.width - side - inset * 2.0).max(0.0);

        if t > 0.0 {
            commands.push(RenderCommand::Rect {
                bounds: Rect::new(bounds.x, bounds.y, side + inset * 2.0 + travel * t, bounds.height),
                color: theme.accent_for(level).with_alpha(t),
                corner_radius: bounds.height * 0.5,
            });
        }
        commands.push(RenderCommand::Rect {
            bounds: Rect::new(bounds.x + inset + travel * t, bounds.y + inset, side, side),
            color: theme.text_for(level),
            corner_radius: side * 0.5,
        });
    }

    fn on_add(&mut self, settings: &InteractionSettings) {
        self.core.apply_settings(settings);
    }

    fn on_remove(&mut self) {
        self.core.detach();
    }
}

impl Focusable for Switch {
    fn tab_stop_index(&self) -> i32 {
        self.core.state.tab_stop_index()
    }

    fn is_focused(&self) -> bool {
        self.core.is_focused()
    }

    fn is_enabled(&self) -> bool {
        self.core.is_enabled()
    }

    fn focus(&mut self) {
        self.core.focus(Trigger::Programmatic);
    }

    fn lose_focus(&mut self) {
        self.core.blur(Trigger::Programmatic);
    }

    fn set_focus_link(&mut self, link: Option<FocusLink>) {
        self.core.state.set_focus_link(link);
    }

    fn handle_key(&mut self, event: &KeyEvent) -> bool {
        !self.core.key_down(event).is_empty()
    }

    fn handle_key_up(&mut self, event: &KeyEvent) -> bool {
        let out = self.core.key_up(event);
        if out.contains(&Interaction::Clicked) {
            self.toggle(Trigger::Key(*event));
        }
        !out.is_empty()
    }
}
