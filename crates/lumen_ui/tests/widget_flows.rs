//! # Widget Flow Tests
//!
//! End-to-end flows through a `UiRoot`: raw pointer positions and key events
//! in, widget state and bus events out.
//!
//! Run with: cargo test -p lumen_ui --test widget_flows

use std::cell::RefCell;
use std::rc::Rc;

use lumen_ui::lumen_core::{
    ButtonState, EventKind, FocusHandle, Key, KeyEvent, Modifiers, Rect, UiEvent, Value,
};
use lumen_ui::{
    Button, ButtonConfig, Checkbox, CheckboxConfig, NumericConfig, NumericInput, RadioGroup,
    RadioGroupConfig, TabConfig, TabbedPanel, TabbedPanelConfig, TextInput, TextInputConfig,
    Toggle, ToggleHandle, UiConfig, UiRoot, Widget,
};

fn button_at(tab: i32, x: f32) -> Rc<RefCell<Button>> {
    Rc::new(RefCell::new(
        Button::new(ButtonConfig::new("ok").tab_stop(tab)).with_bounds(Rect::new(x, 0.0, 50.0, 20.0)),
    ))
}

fn names(events: &[UiEvent]) -> Vec<String> {
    events.iter().map(UiEvent::name).collect()
}

fn tab() -> KeyEvent {
    KeyEvent::new(Key::Tab)
}

fn shift_tab() -> KeyEvent {
    KeyEvent::new(Key::Tab).with_modifiers(Modifiers::SHIFT)
}

fn focused_count(widgets: &[&Rc<RefCell<Button>>]) -> usize {
    widgets.iter().filter(|w| w.borrow().is_focused()).count()
}

// ============================================================================
// FOCUS
// ============================================================================

#[test]
fn test_tab_order_is_cyclic_over_sparse_stops() {
    let mut root = UiRoot::default();
    let buttons = [button_at(5, 0.0), button_at(0, 60.0), button_at(2, 120.0)];
    for button in &buttons {
        assert!(root.add_focusable(button).is_none());
    }

    let mut visited = Vec::new();
    for _ in 0..4 {
        root.key_down(&tab());
        visited.push(root.focus_manager().current_tab_index());
    }
    assert_eq!(visited, [0, 2, 5, 0]);
}

#[test]
fn test_shift_tab_from_nothing_lands_on_last_stop() {
    let mut root = UiRoot::default();
    for (tab, x) in [(0, 0.0), (2, 60.0), (5, 120.0)] {
        root.add_focusable(&button_at(tab, x));
    }

    root.key_down(&shift_tab());
    assert_eq!(root.focus_manager().current_tab_index(), 5);
}

#[test]
fn test_at_most_one_widget_focused_through_any_sequence() {
    let mut root = UiRoot::default();
    let a = button_at(0, 0.0);
    let b = button_at(1, 60.0);
    let c = button_at(2, 120.0);
    for button in [&a, &b, &c] {
        root.add_focusable(button);
    }
    let all = [&a, &b, &c];

    let handle_b: FocusHandle = b.clone();
    assert!(root.focus_manager_mut().set_focus(&handle_b));
    assert_eq!(focused_count(&all), 1);

    // Pointer press on another widget takes focus from the manager's choice.
    root.pointer_down((130.0, 10.0));
    root.pointer_up((130.0, 10.0));
    assert!(c.borrow().is_focused());
    assert_eq!(focused_count(&all), 1);

    a.borrow_mut().focus();
    assert_eq!(focused_count(&all), 1);
    assert_eq!(root.focus_manager().current_tab_index(), 0);

    let id = a.borrow().id();
    root.remove(id);
    assert_eq!(focused_count(&all), 0);

    root.key_down(&tab());
    assert_eq!(focused_count(&all), 1);
    assert!(b.borrow().is_focused());
}

#[test]
fn test_duplicate_tab_stop_reported_and_overwritten() {
    let mut root = UiRoot::default();
    let first = button_at(1, 0.0);
    let second = button_at(1, 60.0);
    assert!(root.add_focusable(&first).is_none());
    assert!(root.add_focusable(&second).is_some());

    root.key_down(&tab());
    assert!(second.borrow().is_focused());
    assert!(!first.borrow().is_focused());
}

// ============================================================================
// INTERACTION
// ============================================================================

#[test]
fn test_disabled_overrides_hover_and_press() {
    let mut root = UiRoot::default();
    let button = button_at(0, 0.0);
    root.add_focusable(&button);

    root.pointer_moved((10.0, 10.0));
    root.pointer_down((10.0, 10.0));
    assert_eq!(button.borrow().current(), ButtonState::Pressed);

    button.borrow_mut().set_enabled(false);
    assert_eq!(button.borrow().current(), ButtonState::Disabled);
    assert!(!button.borrow().is_focused());
    root.drain_events();

    root.pointer_up((10.0, 10.0));
    root.pointer_down((10.0, 10.0));
    root.pointer_up((10.0, 10.0));
    assert!(root.drain_events().is_empty());
    assert_eq!(button.borrow().current(), ButtonState::Disabled);
}

#[test]
fn test_click_requires_hover_at_release() {
    let mut root = UiRoot::default();
    let button = button_at(0, 0.0);
    root.add_focusable(&button);

    root.pointer_moved((10.0, 10.0));
    root.pointer_down((10.0, 10.0));
    root.pointer_moved((300.0, 10.0));
    root.pointer_up((300.0, 10.0));
    assert!(!names(&root.drain_events()).contains(&"ButtonClicked".to_owned()));

    root.pointer_moved((10.0, 10.0));
    root.pointer_down((10.0, 10.0));
    root.pointer_up((10.0, 10.0));
    let clicks = names(&root.drain_events())
        .into_iter()
        .filter(|n| n == "ButtonClicked")
        .count();
    assert_eq!(clicks, 1);
}

#[test]
fn test_unhover_deferred_after_release() {
    let config = UiConfig::from_toml_str("[interaction]\nunhover_debounce_ms = 100").expect("config");
    let mut root = UiRoot::new(&config);
    let button = button_at(0, 0.0);
    root.add_focusable(&button);

    root.pointer_moved((10.0, 10.0));
    root.pointer_down((10.0, 10.0));
    root.pointer_up((10.0, 10.0));
    root.drain_events();

    root.pointer_moved((300.0, 10.0));
    root.update(0.05);
    assert!(root.drain_events().is_empty());

    root.update(0.06);
    assert_eq!(names(&root.drain_events()), ["ButtonUnhovered"]);
}

// ============================================================================
// RADIO GROUP
// ============================================================================

#[test]
fn test_radio_group_keeps_single_selection_under_clicks() {
    let mut root = UiRoot::default();
    let boxes: Vec<Rc<RefCell<Checkbox>>> = (0..3)
        .map(|i| {
            Rc::new(RefCell::new(
                Checkbox::new(CheckboxConfig::new(format!("opt{i}")).tab_stop(i))
                    .with_bounds(Rect::new(0.0, i as f32 * 30.0, 100.0, 20.0)),
            ))
        })
        .collect();
    let group = RadioGroup::new(RadioGroupConfig::default().selected(0));
    for checkbox in &boxes {
        root.add_focusable(checkbox);
        let handle: ToggleHandle = checkbox.clone();
        group.add(&handle);
    }

    for y in [40.0, 70.0, 70.0, 10.0] {
        root.pointer_moved((10.0, y));
        root.pointer_down((10.0, y));
        root.pointer_up((10.0, y));
        let checked = boxes.iter().filter(|b| b.borrow().is_checked()).count();
        assert_eq!(checked, 1);
    }
    assert_eq!(group.selected_index(), 0);
}

#[test]
fn test_radio_group_keyboard_toggle_respects_deselect_rule() {
    let mut root = UiRoot::default();
    let only = Rc::new(RefCell::new(Checkbox::new(CheckboxConfig::new("solo").tab_stop(0))));
    root.add_focusable(&only);
    let group = RadioGroup::new(RadioGroupConfig::default().selected(0));
    let handle: ToggleHandle = only.clone();
    group.add(&handle);

    root.key_down(&tab());
    root.key_down(&KeyEvent::new(Key::Space));
    root.key_up(&KeyEvent::new(Key::Space));

    assert!(only.borrow().is_checked());
    assert_eq!(group.selected_index(), 0);
}

// ============================================================================
// TABBED PANEL
// ============================================================================

#[test]
fn test_tabbed_panel_shows_one_pane_and_falls_back_on_removal() {
    let mut root = UiRoot::default();
    let tabs = Rc::new(RefCell::new(
        TabbedPanel::new(TabbedPanelConfig::default()).with_bounds(Rect::new(0.0, 0.0, 400.0, 300.0)),
    ));
    {
        let mut tabs = tabs.borrow_mut();
        for (i, id) in ["a", "b", "c"].into_iter().enumerate() {
            tabs.add_tab(TabConfig::new(id, id.to_uppercase()).tab_stop(i as i32), false);
        }
    }
    root.add(tabs.clone());

    let visible = |tabs: &TabbedPanel| -> Vec<String> {
        tabs.tab_ids()
            .into_iter()
            .filter(|id| tabs.content(id).is_some_and(|c| c.borrow().is_visible()))
            .map(str::to_owned)
            .collect()
    };

    // Header "c" sits at x = 2 * (96 + 2).
    root.pointer_moved((200.0, 10.0));
    root.pointer_down((200.0, 10.0));
    root.pointer_up((200.0, 10.0));
    assert_eq!(tabs.borrow().active_tab(), Some("c"));
    assert_eq!(visible(&tabs.borrow()), ["c"]);

    let changes: Vec<EventKind> = root
        .drain_events()
        .into_iter()
        .filter(|e| e.name() == "TabbedPanelTabChanged")
        .map(|e| e.kind)
        .collect();
    assert_eq!(
        changes,
        [EventKind::TabChanged {
            previous: Some("a".into()),
            current: Some("c".into()),
        }]
    );

    assert!(tabs.borrow_mut().remove_tab("c"));
    assert_eq!(tabs.borrow().active_tab(), Some("a"));
    assert_eq!(visible(&tabs.borrow()), ["a"]);
}

#[test]
fn test_tab_headers_reachable_by_keyboard() {
    let mut root = UiRoot::default();
    let tabs = Rc::new(RefCell::new(TabbedPanel::new(TabbedPanelConfig::default())));
    tabs.borrow_mut().add_tab(TabConfig::new("a", "A").tab_stop(0), false);
    tabs.borrow_mut().add_tab(TabConfig::new("b", "B").tab_stop(1), false);
    root.add(tabs.clone());
    for id in ["a", "b"] {
        let header = tabs.borrow().header(id).expect("header");
        root.register_focus(&header);
    }

    root.key_down(&tab());
    root.key_down(&tab());
    root.key_down(&KeyEvent::new(Key::Enter));
    root.key_up(&KeyEvent::new(Key::Enter));
    root.update(0.016);

    assert_eq!(tabs.borrow().active_tab(), Some("b"));
}

// ============================================================================
// EDIT FIELDS
// ============================================================================

#[test]
fn test_numeric_escape_restores_and_enter_commits() {
    let mut root = UiRoot::default();
    let field = Rc::new(RefCell::new(NumericInput::new(
        NumericConfig::default().range(0.0, 9999.0).value(42.0).tab_stop(0),
    )));
    root.add_focusable(&field);

    let type_99 = |root: &mut UiRoot| {
        root.key_down(&tab());
        for c in ['9', '9'] {
            root.key_down(&KeyEvent::character(c));
        }
    };

    type_99(&mut root);
    assert_eq!(field.borrow().edit_text(), "4299");
    root.key_down(&KeyEvent::new(Key::Escape));
    assert!((field.borrow().value() - 42.0).abs() < f64::EPSILON);
    assert!(!names(&root.drain_events()).contains(&"NumericChanged".to_owned()));

    type_99(&mut root);
    root.key_down(&KeyEvent::new(Key::Enter));
    assert!((field.borrow().value() - 4299.0).abs() < f64::EPSILON);

    let events = root.drain_events();
    let changed: Vec<&UiEvent> = events.iter().filter(|e| e.name() == "NumericChanged").collect();
    let submitted = events.iter().filter(|e| e.name() == "NumericSubmitted").count();
    assert_eq!(changed.len(), 1);
    assert_eq!(submitted, 1);
    assert_eq!(
        changed[0].kind,
        EventKind::Changed {
            previous: Value::Number(42.0),
            current: Value::Number(4299.0),
        }
    );
}

#[test]
fn test_numeric_keeps_value_finer_than_its_display() {
    let mut root = UiRoot::default();
    let field = Rc::new(RefCell::new(NumericInput::new(
        NumericConfig::default().value(0.125).decimals(1).tab_stop(0),
    )));
    let next = button_at(1, 200.0);
    root.add_focusable(&field);
    root.add_focusable(&next);

    root.key_down(&tab());
    root.key_down(&KeyEvent::character('9'));
    assert_eq!(field.borrow().edit_text(), "0.19");
    root.key_down(&KeyEvent::new(Key::Escape));
    assert!((field.borrow().value() - 0.125).abs() < f64::EPSILON);

    root.key_down(&tab());
    root.key_down(&tab());
    assert!(next.borrow().is_focused());
    assert!((field.borrow().value() - 0.125).abs() < f64::EPSILON);
    assert!(!names(&root.drain_events()).contains(&"NumericChanged".to_owned()));
}

#[test]
fn test_text_input_commits_when_tab_moves_on() {
    let mut root = UiRoot::default();
    let name = Rc::new(RefCell::new(TextInput::new(TextInputConfig::default().tab_stop(0))));
    let next = button_at(1, 200.0);
    root.add_focusable(&name);
    root.add_focusable(&next);

    root.key_down(&tab());
    for c in "Ada".chars() {
        root.key_down(&KeyEvent::character(c));
    }
    assert_eq!(name.borrow().text(), "");

    root.key_down(&tab());
    assert_eq!(name.borrow().text(), "Ada");
    assert!(next.borrow().is_focused());
    assert!(names(&root.drain_events()).contains(&"TextInputChanged".to_owned()));
}
