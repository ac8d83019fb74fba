//! # LUMEN UI
//!
//! Widgets for a 2D game engine, built on the focus manager and interaction
//! machines of `lumen_core`:
//! - Buttons, checkboxes, switches, sliders, text and numeric inputs
//! - Labels, images, panels and progress bars
//! - Radio groups and tabbed panels
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                     UI PIPELINE                         │
//! ├────────────────────────────────────────────────────────┤
//! │  Host Input → UiRoot → Widgets → Events → EventBus     │
//! │       ↓          ↓         ↓                            │
//! │  Hit Testing  Focus    Render Commands → Host Renderer  │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is single-threaded. Widgets are shared as `Rc<RefCell<_>>`
//! handles; coordinators hold weak back-references only.

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod animation;
pub mod config;
pub mod error;
pub mod group;
pub mod layout;
pub mod render;
pub mod root;
pub mod style;
pub mod tabs;
pub mod widget;

pub use animation::{ease_out, Glide, KNOB_TRAVEL_SECS};
pub use config::{InteractionSettings, TabSettings, ThemePreset, UiConfig};
pub use error::{UiError, UiResult};
pub use group::{RadioGroup, RadioGroupConfig, NO_SELECTION};
pub use layout::{Alignment, Direction, Layout};
pub use render::{RenderCommand, UIBatch, UIRenderer};
pub use root::UiRoot;
pub use style::{Color, Style, Theme};
pub use tabs::{TabConfig, TabEdge, TabbedPanel, TabbedPanelConfig};
pub use widget::{
    Button, ButtonConfig, Checkbox, CheckboxConfig, Image, ImageConfig, Label, LabelConfig,
    NumericConfig, NumericInput, Panel, PanelConfig, ProgressBar, ProgressBarConfig, Slider,
    SliderConfig, Switch, SwitchConfig, TextInput, TextInputConfig, Toggle, ToggleHandle, Widget,
    WidgetHandle,
};

pub use lumen_core;
