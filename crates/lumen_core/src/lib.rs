//! # LUMEN Core
//!
//! The parts of the widget toolkit that carry real invariants:
//! - Keyboard focus ownership and Tab navigation
//! - Interaction state machines (idle / hover / press / focus / disabled)
//! - Event emission from widgets to application code
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     INTERACTION PIPELINE                    │
//! ├────────────────────────────────────────────────────────────┤
//! │  Host Input → Widget Handler → Machine → Events → EventBus  │
//! │                     ↓                                       │
//! │               FocusManager (one keyboard owner per root)    │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is single-threaded and runs inside the host engine's
//! input callbacks or its once-per-frame update tick.

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod events;
pub mod focus;
pub mod geometry;
pub mod id;
pub mod input;
pub mod interaction;

pub use events::{
    EventBus, EventEmitter, EventKind, EventReceiver, EventSender, SubscriptionId, Trigger,
    UiEvent, Value, WidgetKind,
};
pub use focus::{FocusDiagnostic, FocusHandle, FocusLink, FocusManager, Focusable, NO_TAB_STOP};
pub use geometry::{Rect, Vec2};
pub use id::WidgetId;
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent, PointerEventKind};
pub use interaction::{
    ButtonState, DisplayState, EditState, Interaction, InteractionMachine, Level, PressSource,
    StateTable, WidgetFlags, UNHOVER_DEBOUNCE_SECS,
};
