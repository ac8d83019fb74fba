//! # Widget Event System
//!
//! Every widget owns an [`EventEmitter`]. Application code subscribes with a
//! closure and receives [`UiEvent`]s synchronously, in emission order.
//!
//! ```text
//! ┌──────────┐  emit   ┌──────────────┐  subscribe   ┌─────────────┐
//! │  Widget  │───────> │ EventEmitter │─────────────>│ App handler │
//! └──────────┘         └──────┬───────┘              └─────────────┘
//!                             │ forward_to
//!                             ▼
//!                      ┌──────────────┐   drain      ┌─────────────┐
//!                      │   EventBus   │─────────────>│  Game loop  │
//!                      └──────────────┘              └─────────────┘
//! ```
//!
//! The bus is a bounded crossbeam channel so a game loop that stops draining
//! cannot grow memory without limit.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::id::WidgetId;
use crate::input::{KeyEvent, PointerEvent};

/// Widget family that produced an event. Used as the event name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Push button.
    Button,
    /// Checkbox.
    Checkbox,
    /// On/off switch.
    Switch,
    /// Horizontal value slider.
    Slider,
    /// Single-line text field.
    TextInput,
    /// Numeric entry field.
    Numeric,
    /// Static text.
    Label,
    /// Static image.
    Image,
    /// Background container.
    Panel,
    /// Progress indicator.
    ProgressBar,
    /// Mutual-exclusion coordinator.
    RadioGroup,
    /// Tab container.
    TabbedPanel,
}

impl WidgetKind {
    /// Returns the event name prefix for this family.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Button => "Button",
            Self::Checkbox => "Checkbox",
            Self::Switch => "Switch",
            Self::Slider => "Slider",
            Self::TextInput => "TextInput",
            Self::Numeric => "Numeric",
            Self::Label => "Label",
            Self::Image => "Image",
            Self::Panel => "Panel",
            Self::ProgressBar => "ProgressBar",
            Self::RadioGroup => "RadioGroup",
            Self::TabbedPanel => "TabbedPanel",
        }
    }
}

/// A widget's domain value, carried by change events.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Checked state of a checkbox or switch.
    Bool(bool),
    /// Slider, progress or numeric value.
    Number(f64),
    /// Text content.
    Text(String),
    /// Selection index (`-1` = none).
    Index(i32),
}

/// What happened.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Widget was enabled.
    Enabled,
    /// Widget was disabled.
    Disabled,
    /// Pointer entered.
    Hovered,
    /// Pointer left.
    Unhovered,
    /// Pointer or activation key went down.
    Down,
    /// Pointer or activation key went up.
    Up,
    /// Full press-and-release activation.
    Clicked,
    /// Keyboard focus gained.
    Focused,
    /// Keyboard focus lost.
    Blurred,
    /// Domain value changed.
    Changed {
        /// Value before the change.
        previous: Value,
        /// Value after the change.
        current: Value,
    },
    /// Enter pressed in an edit field; carries the committed value.
    Submitted {
        /// Committed value.
        value: Value,
    },
    /// Edit discarded with Escape.
    Canceled,
    /// Progress reached its maximum.
    Completed,
    /// Active tab switched.
    TabChanged {
        /// Previously active tab id.
        previous: Option<String>,
        /// Newly active tab id.
        current: Option<String>,
    },
    /// Group selection moved.
    SelectionChanged {
        /// Previous selected index (`-1` = none).
        previous: i32,
        /// New selected index (`-1` = none).
        current: i32,
    },
}

impl EventKind {
    /// Returns the event name suffix.
    #[must_use]
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Enabled => "Enabled",
            Self::Disabled => "Disabled",
            Self::Hovered => "Hovered",
            Self::Unhovered => "Unhovered",
            Self::Down => "Down",
            Self::Up => "Up",
            Self::Clicked => "Clicked",
            Self::Focused => "Focused",
            Self::Blurred => "Blurred",
            Self::Changed { .. } => "Changed",
            Self::Submitted { .. } => "Submitted",
            Self::Canceled => "Canceled",
            Self::Completed => "Completed",
            Self::TabChanged { .. } => "TabChanged",
            Self::SelectionChanged { .. } => "SelectionChanged",
        }
    }
}

/// The input that caused an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// A pointer event.
    Pointer(PointerEvent),
    /// A keyboard event.
    Key(KeyEvent),
    /// An API call from application code (or a coordinator).
    Programmatic,
}

/// An event emitted by a widget.
#[derive(Debug, Clone, PartialEq)]
pub struct UiEvent {
    /// What happened.
    pub kind: EventKind,
    /// Widget family of the emitter.
    pub source: WidgetKind,
    /// Emitting widget.
    pub target: WidgetId,
    /// Originating input.
    pub trigger: Trigger,
}

impl UiEvent {
    /// Creates a new event.
    #[must_use]
    pub fn new(kind: EventKind, source: WidgetKind, target: WidgetId, trigger: Trigger) -> Self {
        Self {
            kind,
            source,
            target,
            trigger,
        }
    }

    /// Returns the event name, e.g. `ButtonClicked` or `NumericChanged`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}{}", self.source.prefix(), self.kind.suffix())
    }
}

/// Handle returned by [`EventEmitter::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&UiEvent)>;

/// Synchronous publish/subscribe channel owned by a widget.
pub struct EventEmitter {
    handlers: Vec<(SubscriptionId, Handler)>,
    next_id: u64,
}

impl EventEmitter {
    /// Creates an emitter with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 1,
        }
    }

    /// Registers a handler. Handlers run in subscription order.
    pub fn subscribe(&mut self, handler: impl FnMut(&UiEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Removes a handler. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sid, _)| *sid != id);
        self.handlers.len() != before
    }

    /// Forwards every event into an [`EventBus`].
    pub fn forward_to(&mut self, sender: EventSender) -> SubscriptionId {
        self.subscribe(move |event| {
            sender.send(event.clone());
        })
    }

    /// Delivers an event to every handler.
    pub fn emit(&mut self, event: &UiEvent) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }

    /// Returns the number of subscribed handlers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}

/// Bounded event bus between widgets and the game loop.
pub struct EventBus {
    /// Sender end - cloned into widget emitters.
    sender: Sender<UiEvent>,
    /// Receiver end - drained by the game loop.
    receiver: Receiver<UiEvent>,
    /// Events dropped because the channel was full.
    dropped: Arc<AtomicU64>,
}

impl EventBus {
    /// Default channel capacity.
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Creates a new event bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum events in flight before new ones are dropped.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Creates a sender handle.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
            dropped: Arc::clone(&self.dropped),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Returns how many events were dropped because the bus was full.
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

/// Handle for sending events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<UiEvent>,
    dropped: Arc<AtomicU64>,
}

impl EventSender {
    /// Sends an event (non-blocking).
    ///
    /// Returns `false` if the channel is full or disconnected; the event is dropped.
    #[inline]
    pub fn send(&self, event: UiEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("event bus full, dropping {}", event.name());
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for receiving events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<UiEvent>,
}

impl EventReceiver {
    /// Receives all pending events (non-blocking), in emission order.
    #[inline]
    pub fn drain(&self) -> Vec<UiEvent> {
        self.receiver.try_iter().collect()
    }

    /// Receives one event (non-blocking).
    #[inline]
    pub fn try_recv(&self) -> Option<UiEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending events.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn clicked(target: WidgetId) -> UiEvent {
        UiEvent::new(EventKind::Clicked, WidgetKind::Button, target, Trigger::Programmatic)
    }

    #[test]
    fn test_event_name() {
        let event = UiEvent::new(
            EventKind::Changed {
                previous: Value::Number(1.0),
                current: Value::Number(2.0),
            },
            WidgetKind::Numeric,
            WidgetId(7),
            Trigger::Programmatic,
        );
        assert_eq!(event.name(), "NumericChanged");
        assert_eq!(clicked(WidgetId(1)).name(), "ButtonClicked");
    }

    #[test]
    fn test_subscribe_unsubscribe() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = EventEmitter::new();

        let sink = Rc::clone(&seen);
        let id = emitter.subscribe(move |e| sink.borrow_mut().push(e.name()));

        emitter.emit(&clicked(WidgetId(1)));
        assert!(emitter.unsubscribe(id));
        assert!(!emitter.unsubscribe(id));
        emitter.emit(&clicked(WidgetId(1)));

        assert_eq!(seen.borrow().as_slice(), ["ButtonClicked"]);
        assert_eq!(emitter.subscriber_count(), 0);
    }

    #[test]
    fn test_bus_forwarding_and_drain() {
        let bus = EventBus::new(16);
        let receiver = bus.receiver();
        let mut emitter = EventEmitter::new();
        emitter.forward_to(bus.sender());

        for i in 0..5 {
            emitter.emit(&clicked(WidgetId(i)));
        }

        let events = receiver.drain();
        assert_eq!(events.len(), 5);
        assert_eq!(events[4].target, WidgetId(4));
        assert!(!receiver.has_events());
    }

    #[test]
    fn test_bus_full_drops_and_counts() {
        let bus = EventBus::new(2);
        let sender = bus.sender();

        assert!(sender.send(clicked(WidgetId(1))));
        assert!(sender.send(clicked(WidgetId(2))));
        assert!(!sender.send(clicked(WidgetId(3))));

        assert_eq!(bus.dropped_count(), 1);
        assert_eq!(bus.receiver().pending_count(), 2);
    }
}
