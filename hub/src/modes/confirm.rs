//! YES/NO confirmation sub-machine.
//!
//! While a request is pending the dialog owns the pointer: it hover-tests
//! only its two regions and the caller suppresses every mode-specific
//! branch.  It never times out; hand loss only drops the hover record.

use tracing::{debug, info};

use super::regions::{hit_test, Region, RegionId};
use super::AppMode;
use crate::gesture::HoverTimer;

/// Pending action tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    EnterKeyboard,
    ExitKeyboard,
    EnterDrawing,
    ExitDrawing,
}

impl ConfirmAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnterKeyboard => "enter-keyboard",
            Self::ExitKeyboard => "exit-keyboard",
            Self::EnterDrawing => "enter-drawing",
            Self::ExitDrawing => "exit-drawing",
        }
    }

    /// Mode the hub lands in when the action is accepted.
    pub fn target_mode(&self) -> AppMode {
        match self {
            Self::EnterKeyboard => AppMode::Keyboard,
            Self::EnterDrawing => AppMode::Drawing,
            Self::ExitKeyboard | Self::ExitDrawing => AppMode::Touchpad,
        }
    }

    /// Question shown in the dialog.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::EnterKeyboard => "Switch to keyboard mode?",
            Self::ExitKeyboard => "Save text and exit keyboard mode?",
            Self::EnterDrawing => "Switch to drawing mode?",
            Self::ExitDrawing => "Save drawing and exit drawing mode?",
        }
    }
}

/// How a request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accepted(ConfirmAction),
    Rejected(ConfirmAction),
}

/// Confirmation request plus its private hover record.
#[derive(Debug, Clone)]
pub struct ConfirmationDialog {
    pending: Option<ConfirmAction>,
    hover: HoverTimer<RegionId>,
}

impl ConfirmationDialog {
    pub fn new(hover_ms: f64) -> Self {
        Self {
            pending: None,
            hover: HoverTimer::new(hover_ms),
        }
    }

    /// Raise a request.  Ignored while another one is pending.
    pub fn open(&mut self, action: ConfirmAction) -> bool {
        if let Some(current) = self.pending {
            debug!(
                "confirmation {} ignored, {} already pending",
                action.as_str(),
                current.as_str()
            );
            return false;
        }
        info!("confirmation requested: {}", action.as_str());
        self.pending = Some(action);
        self.hover.reset();
        true
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<ConfirmAction> {
        self.pending
    }

    /// Feed the pointer (or `None` when no hand).  Returns the decision on
    /// the frame YES or NO fires, and closes the dialog.
    pub fn update(
        &mut self,
        regions: &[Region],
        pointer: Option<(f32, f32)>,
        now_ms: f64,
    ) -> Option<Decision> {
        let action = self.pending?;
        let over = pointer.and_then(|p| hit_test(regions, p));
        let decision = match self.hover.update(over, now_ms)? {
            RegionId::Yes => Decision::Accepted(action),
            RegionId::No => Decision::Rejected(action),
            other => {
                debug!("ignoring non-dialog region {:?}", other);
                return None;
            }
        };
        self.pending = None;
        self.hover.reset();
        Some(decision)
    }

    /// Region being hovered and its progress, for rendering.
    pub fn hovered(&self) -> Option<RegionId> {
        self.hover.active()
    }

    pub fn hover_progress(&self, now_ms: f64) -> f32 {
        self.hover.progress(now_ms)
    }
}

// ── Tests ──────────────────────────────────────────────────
