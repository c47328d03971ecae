//! Application modes and the state each one owns.
//!
//! Provides:
//! - `AppMode`: Touchpad / Keyboard / Drawing, exactly one active
//! - `keyboard`: the typed text buffer
//! - `drawing`: the stroke canvas
//! - `confirm`: the YES/NO confirmation sub-machine
//! - `regions`: declarative hover tables (keys, buttons, dialog)
//! - `touchpad`: fingertip to screen pointer mapping

pub mod confirm;
pub mod drawing;
pub mod keyboard;
pub mod regions;
pub mod touchpad;

pub use confirm::{ConfirmAction, ConfirmationDialog, Decision};
pub use drawing::Canvas;
pub use keyboard::TypedText;
pub use regions::{Key, Layout, Rect, Region, RegionId};
pub use touchpad::PointerSmoother;

/// Top-level application mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Pointer follow, pinch-click, zoom and swipe.  Home state.
    #[default]
    Touchpad,
    /// Hover-to-type virtual keyboard.
    Keyboard,
    /// Freehand drawing canvas.
    Drawing,
}

impl AppMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Touchpad => "touchpad",
            Self::Keyboard => "keyboard",
            Self::Drawing => "drawing",
        }
    }

    /// Banner shown while the mode is active.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Touchpad => "TOUCHPAD MODE",
            Self::Keyboard => "KEYBOARD MODE",
            Self::Drawing => "DRAWING MODE",
        }
    }
}
