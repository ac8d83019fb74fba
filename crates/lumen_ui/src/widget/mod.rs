//! Widget system for UI components.
//!
//! Interactive widgets (button, checkbox, switch, slider, text and numeric
//! inputs) implement both [`Widget`] and [`lumen_core::Focusable`]. Display
//! widgets (label, image, panel, progress bar) only implement [`Widget`].

mod button;
mod checkbox;
mod core;
mod edit;
mod image;
mod label;
mod numeric;
mod panel;
mod progress;
mod router;
mod slider;
mod switch;
mod text_input;
mod toggle;

pub use button::{Button, ButtonConfig};
pub use checkbox::{Checkbox, CheckboxConfig};
pub use core::{Widget, WidgetCore, WidgetHandle, WidgetState};
pub use edit::EditBuffer;
pub use image::{Image, ImageConfig, FULL_UV};
pub use label::{Label, LabelConfig};
pub use numeric::{parse_number, NumericConfig, NumericInput};
pub use panel::{Panel, PanelConfig};
pub use progress::{ProgressBar, ProgressBarConfig};
pub use router::PointerRouter;
pub use slider::{Slider, SliderConfig};
pub use switch::{Switch, SwitchConfig};
pub use text_input::{TextInput, TextInputConfig, CURSOR_BLINK_SECS};
pub use toggle::{ChangeGuard, Toggle, ToggleHandle, ToggleValue};
