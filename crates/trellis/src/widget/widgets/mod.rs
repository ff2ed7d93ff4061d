//! Standard widgets.
//!
//! - [`Window`]: movable, optionally modal container with a title bar
//! - [`Popup`]: overlay panel anchored beside a window
//! - [`Button`]: push, toggle, radio and popup buttons
//! - [`PopupButton`]: a toggle button owning a [`Popup`]
//! - [`Label`]: static, optionally wrapped text
//! - [`TextBox`]: single-line text entry
//! - [`Spinner`]: busy overlay that blocks input to the widget it covers
//! - [`VScrollPanel`]: clips and vertically scrolls its first child

mod button;
mod label;
mod popup;
mod popup_button;
pub mod spinner;
mod text_box;
mod vscroll_panel;
mod window;

pub use button::{Button, ButtonFlags};
pub use label::Label;
pub use popup::{DEFAULT_ANCHOR_HEIGHT, Popup};
pub(crate) use popup::refresh_relative_placement;
pub use popup_button::{DEFAULT_POPUP_SIZE, PopupButton};
pub use spinner::{Spinner, SpinnerFilter, SpinnerState};
pub use text_box::TextBox;
pub use vscroll_panel::{SCROLLBAR_WIDTH, VScrollPanel};
pub use window::Window;
