//! Tab container.
//!
//! Each tab is a header [`Button`] paired with a content [`Panel`]. Exactly
//! one pane is visible at a time. Headers are laid out along one edge of the
//! container; the panes fill the rest.
//!
//! Header clicks are queued and applied once the click has been delivered,
//! so a header is never borrowed while the container switches tabs. Pointer
//! clicks apply before `handle_pointer` returns; keyboard activations of a
//! focused header apply on the next `update`.

use std::cell::RefCell;
use std::rc::Rc;

use lumen_core::{
    DisplayState, EventKind, InteractionMachine, Level, PointerEvent, Rect, SubscriptionId,
    Trigger, WidgetKind,
};
use serde::Deserialize;

use crate::config::{InteractionSettings, TabSettings};
use crate::layout::{Alignment, Layout};
use crate::render::RenderCommand;
use crate::style::Theme;
use crate::widget::{
    Button, ButtonConfig, Panel, PanelConfig, PointerRouter, Widget, WidgetCore, WidgetHandle,
    WidgetState,
};

/// Edge of the container the headers attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabEdge {
    /// Headers in a row above the panes.
    #[default]
    Top,
    /// Headers in a row below the panes.
    Bottom,
    /// Headers in a column left of the panes.
    Left,
    /// Headers in a column right of the panes.
    Right,
}

impl TabEdge {
    const fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// One tab.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TabConfig {
    /// Unique tab id.
    pub id: String,
    /// Header caption.
    #[serde(default)]
    pub title: String,
    /// Tab stop of the header button.
    #[serde(default = "no_tab_stop")]
    pub tab_stop_index: i32,
    /// Header width; the container's `header_width` when unset.
    #[serde(default)]
    pub width: Option<f32>,
    /// Header height; the container's `header_height` when unset.
    #[serde(default)]
    pub height: Option<f32>,
}

const fn no_tab_stop() -> i32 {
    lumen_core::NO_TAB_STOP
}

impl TabConfig {
    /// Creates a tab config.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tab_stop_index: lumen_core::NO_TAB_STOP,
            width: None,
            height: None,
        }
    }

    /// Gives this header its own extent instead of the container default.
    #[must_use]
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Sets the header tab stop.
    #[must_use]
    pub fn tab_stop(mut self, tab_stop_index: i32) -> Self {
        self.tab_stop_index = tab_stop_index;
        self
    }
}

/// Tab container configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TabbedPanelConfig {
    /// Header edge.
    pub edge: TabEdge,
    /// Gap between headers.
    pub spacing: f32,
    /// Header width.
    pub header_width: f32,
    /// Header height.
    pub header_height: f32,
}

impl Default for TabbedPanelConfig {
    fn default() -> Self {
        TabSettings::default().into()
    }
}

impl From<TabSettings> for TabbedPanelConfig {
    fn from(settings: TabSettings) -> Self {
        Self {
            edge: settings.edge,
            spacing: settings.spacing,
            header_width: settings.header_width,
            header_height: settings.header_height,
        }
    }
}

impl TabbedPanelConfig {
    /// Sets the header edge.
    #[must_use]
    pub fn edge(mut self, edge: TabEdge) -> Self {
        self.edge = edge;
        self
    }

    /// Sets the header gap.
    #[must_use]
    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }
}

struct Tab {
    id: String,
    width: Option<f32>,
    height: Option<f32>,
    header: Rc<RefCell<Button>>,
    content: Rc<RefCell<Panel>>,
    subscription: SubscriptionId,
}

/// Tab container. Emits `TabbedPanelTabChanged`.
pub struct TabbedPanel {
    core: WidgetCore<DisplayState>,
    config: TabbedPanelConfig,
    tabs: Vec<Tab>,
    active: Option<String>,
    /// Tab ids whose header was clicked, oldest first.
    requests: Rc<RefCell<Vec<String>>>,
    router: PointerRouter,
    settings: InteractionSettings,
}

impl TabbedPanel {
    /// Creates an empty container.
    #[must_use]
    pub fn new(config: TabbedPanelConfig) -> Self {
        let machine = InteractionMachine::new()
            .with_focusable(false)
            .with_hover_visual(false);
        Self {
            core: WidgetCore::new(WidgetKind::TabbedPanel, machine),
            config,
            tabs: Vec::new(),
            active: None,
            requests: Rc::new(RefCell::new(Vec::new())),
            router: PointerRouter::new(),
            settings: InteractionSettings::default(),
        }
    }

    /// Sets the bounds and lays out the tabs.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.core.state.set_bounds(bounds);
        self.layout();
        self
    }

    /// Returns the active tab id.
    #[must_use]
    pub fn active_tab(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Returns the tab ids in header order.
    #[must_use]
    pub fn tab_ids(&self) -> Vec<&str> {
        self.tabs.iter().map(|t| t.id.as_str()).collect()
    }

    /// Returns the number of tabs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Returns true if there are no tabs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Returns a tab's content pane.
    #[must_use]
    pub fn content(&self, id: &str) -> Option<Rc<RefCell<Panel>>> {
        self.find(id).map(|t| Rc::clone(&t.content))
    }

    /// Returns a tab's header button, e.g. to register it for focus.
    #[must_use]
    pub fn header(&self, id: &str) -> Option<Rc<RefCell<Button>>> {
        self.find(id).map(|t| Rc::clone(&t.header))
    }

    /// Adds a tab at the end of the header strip.
    ///
    /// A duplicate id is refused and the existing tab kept. The first tab,
    /// or any tab added with `make_active`, becomes active.
    pub fn add_tab(&mut self, config: TabConfig, make_active: bool) -> bool {
        if self.find(&config.id).is_some() {
            tracing::warn!("tab '{}' already exists, keeping the first", config.id);
            return false;
        }

        let header = Rc::new(RefCell::new(Button::new(
            ButtonConfig::new(config.title).tab_stop(config.tab_stop_index),
        )));
        let content = Rc::new(RefCell::new(Panel::new(PanelConfig::default())));
        content.borrow_mut().set_visible(false);

        let subscription = {
            let mut button = header.borrow_mut();
            button.on_add(&self.settings);
            let requests = Rc::clone(&self.requests);
            let id = config.id.clone();
            button.events_mut().subscribe(move |event| {
                if event.kind == EventKind::Clicked {
                    requests.borrow_mut().push(id.clone());
                }
            })
        };
        content.borrow_mut().on_add(&self.settings);

        let first = self.tabs.is_empty();
        self.tabs.push(Tab {
            id: config.id.clone(),
            width: config.width,
            height: config.height,
            header,
            content,
            subscription,
        });
        self.layout();

        if first || make_active {
            self.activate(&config.id, Trigger::Programmatic);
        }
        true
    }

    /// Removes a tab. If it was active, the first remaining tab becomes
    /// active.
    pub fn remove_tab(&mut self, id: &str) -> bool {
        let Some(index) = self.tabs.iter().position(|t| t.id == id) else {
            return false;
        };

        let tab = self.tabs.remove(index);
        {
            let mut header = tab.header.borrow_mut();
            header.events_mut().unsubscribe(tab.subscription);
            header.on_remove();
            self.router.forget(header.id());
        }
        {
            let mut content = tab.content.borrow_mut();
            content.on_remove();
            self.router.forget(content.id());
        }
        self.requests.borrow_mut().retain(|r| r != id);
        self.layout();

        if self.active.as_deref() == Some(id) {
            match self.tabs.first().map(|t| t.id.clone()) {
                Some(next) => {
                    self.activate(&next, Trigger::Programmatic);
                }
                None => {
                    self.active = None;
                    self.emit_changed(Some(id.to_owned()), None, Trigger::Programmatic);
                }
            }
        }
        true
    }

    /// Activates a tab. Unknown or already active ids are no-ops.
    pub fn set_active_tab(&mut self, id: &str) -> bool {
        self.activate(id, Trigger::Programmatic)
    }

    fn find(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    fn activate(&mut self, id: &str, trigger: Trigger) -> bool {
        if self.active.as_deref() == Some(id) {
            return false;
        }
        let Some(next) = self.find(id) else {
            return false;
        };
        next.header.borrow_mut().set_selected(true);
        next.content.borrow_mut().set_visible(true);

        // The previous tab may already be gone when it was just removed.
        let previous = self.active.take();
        if let Some(old) = previous.as_deref().and_then(|old| self.find(old)) {
            old.header.borrow_mut().set_selected(false);
            old.content.borrow_mut().set_visible(false);
        }

        self.active = Some(id.to_owned());
        tracing::debug!("tab {:?} -> {}", previous, id);
        self.emit_changed(previous, Some(id.to_owned()), trigger);
        true
    }

    fn emit_changed(&mut self, previous: Option<String>, current: Option<String>, trigger: Trigger) {
        self.core
            .state
            .emit(EventKind::TabChanged { previous, current }, trigger);
    }

    /// Applies queued header clicks.
    fn apply_requests(&mut self, trigger: &Trigger) {
        let requests = std::mem::take(&mut *self.requests.borrow_mut());
        for id in requests {
            self.activate(&id, trigger.clone());
        }
    }

    /// Returns the header strip and the content area.
    fn regions(&self) -> (Rect, Rect) {
        let b = self.core.state.bounds();
        let hw = self.config.header_width.min(b.width);
        let hh = self.config.header_height.min(b.height);
        match self.config.edge {
            TabEdge::Top => (
                Rect::new(b.x, b.y, b.width, hh),
                Rect::new(b.x, b.y + hh, b.width, b.height - hh),
            ),
            TabEdge::Bottom => (
                Rect::new(b.x, b.bottom() - hh, b.width, hh),
                Rect::new(b.x, b.y, b.width, b.height - hh),
            ),
            TabEdge::Left => (
                Rect::new(b.x, b.y, hw, b.height),
                Rect::new(b.x + hw, b.y, b.width - hw, b.height),
            ),
            TabEdge::Right => (
                Rect::new(b.right() - hw, b.y, hw, b.height),
                Rect::new(b.x, b.y, b.width - hw, b.height),
            ),
        }
    }

    /// Positions every header and pane.
    fn layout(&mut self) {
        let (strip, area) = self.regions();
        let layout = if self.config.edge.is_horizontal() {
            Layout::horizontal()
        } else {
            Layout::vertical()
        }
        .with_gap(self.config.spacing)
        .align_main(Alignment::Start)
        .align_cross(Alignment::Start);

        let sizes: Vec<(f32, f32)> = self
            .tabs
            .iter()
            .map(|tab| {
                (
                    tab.width.unwrap_or(self.config.header_width),
                    tab.height.unwrap_or(self.config.header_height),
                )
            })
            .collect();
        let rects = layout.arrange(strip, &sizes);
        for (tab, rect) in self.tabs.iter().zip(rects) {
            tab.header.borrow_mut().set_bounds(rect);
            tab.content.borrow_mut().set_bounds(area);
        }
    }

    fn targets(&self) -> Vec<WidgetHandle> {
        let headers = self.tabs.iter().map(|t| Rc::clone(&t.header) as WidgetHandle);
        let panes = self.tabs.iter().map(|t| Rc::clone(&t.content) as WidgetHandle);
        headers.chain(panes).collect()
    }
}

impl std::fmt::Debug for TabbedPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabbedPanel")
            .field("id", &self.core.state.id())
            .field("tabs", &self.tab_ids())
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Widget for TabbedPanel {
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
        for tab in &self.tabs {
            tab.header.borrow_mut().set_enabled(enabled);
        }
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.core.state.set_bounds(bounds);
        self.layout();
    }

    fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        let hovered = self.core.hover(event);
        if !self.core.is_enabled() {
            return hovered;
        }
        let routed = self.router.route(event, &self.targets());
        self.apply_requests(&Trigger::Pointer(*event));
        hovered || routed
    }

    fn update(&mut self, dt: f32) {
        self.core.tick(dt);
        for tab in &self.tabs {
            tab.header.borrow_mut().update(dt);
            tab.content.borrow_mut().update(dt);
        }
        self.apply_requests(&Trigger::Programmatic);
    }

    fn render(&self, theme: &Theme, commands: &mut Vec<RenderCommand>) {
        for tab in &self.tabs {
            tab.header.borrow().render(theme, commands);
        }
        if let Some(tab) = self.active.as_deref().and_then(|id| self.find(id)) {
            let content = tab.content.borrow();
            if content.is_visible() {
                content.render(theme, commands);
            }
        }
    }

    fn on_add(&mut self, settings: &InteractionSettings) {
        self.settings = *settings;
        self.core.apply_settings(settings);
        for tab in &self.tabs {
            tab.header.borrow_mut().on_add(settings);
            tab.content.borrow_mut().on_add(settings);
        }
    }

    fn on_remove(&mut self) {
        for tab in &self.tabs {
            tab.header.borrow_mut().on_remove();
            tab.content.borrow_mut().on_remove();
        }
        self.router = PointerRouter::new();
        self.core.detach();
    }
}
