//! Action dispatch: state-machine events out to the desktop and disk.
//!
//! Every event maps to at most one external call plus one status line.
//! Failures from either collaborator are caught here, logged, and shown
//! as a red status; they never propagate into the state machine.

pub mod automation;
pub mod persistence;

use tracing::{debug, info, warn};

pub use automation::ScreenAutomation;
pub use persistence::{DiskPersistence, Persistence};

use crate::gesture::Trend;
use crate::modes::{AppMode, Canvas, ConfirmAction, Key};

/// Everything the state machine can ask the outside world to do.
#[derive(Debug, Clone, Copy)]
pub enum HubEvent<'a> {
    PointerMoved { x: i32, y: i32 },
    Click,
    Zoom(Trend),
    Swipe(Trend),
    KeyTyped(Key),
    SaveText(&'a str),
    SaveDrawing(&'a Canvas),
    CanvasCleared,
    ConfirmRequested(ConfirmAction),
    ModeChanged(AppMode),
    Denied(ConfirmAction),
}

impl HubEvent<'_> {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PointerMoved { .. } => "pointer-moved",
            Self::Click => "click",
            Self::Zoom(_) => "zoom",
            Self::Swipe(_) => "swipe",
            Self::KeyTyped(_) => "key-typed",
            Self::SaveText(_) => "save-text",
            Self::SaveDrawing(_) => "save-drawing",
            Self::CanvasCleared => "canvas-cleared",
            Self::ConfirmRequested(_) => "confirm-requested",
            Self::ModeChanged(_) => "mode-changed",
            Self::Denied(_) => "denied",
        }
    }
}

/// Zoom hotkey for a pinch trend: spreading zooms in.
pub fn zoom_hotkey(trend: Trend) -> (&'static str, &'static str) {
    match trend {
        Trend::Increasing => ("ctrl", "+"),
        Trend::Decreasing => ("ctrl", "-"),
    }
}

/// Swipe hotkey for a horizontal trend: moving right swipes right.
pub fn swipe_hotkey(trend: Trend) -> (&'static str, &'static str) {
    match trend {
        Trend::Increasing => ("alt", "right"),
        Trend::Decreasing => ("alt", "left"),
    }
}

// ── Status line ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    Green,
    Yellow,
    Cyan,
    Red,
}

impl StatusColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Cyan => "cyan",
            Self::Red => "red",
        }
    }
}

/// User-visible annotation with an expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub text: String,
    pub color: StatusColor,
    pub expires_at_ms: f64,
}

// ── Session statistics ─────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub clicks: u64,
    pub zoom_steps: u64,
    pub swipe_steps: u64,
    pub keys: u64,
    pub saves: u64,
    pub save_failures: u64,
    pub mode_changes: u64,
    pub automation_errors: u64,
}

impl SessionStats {
    pub fn stats_sexp(&self) -> String {
        format!(
            "(:clicks {} :zoom-steps {} :swipe-steps {} :keys {} :saves {} :save-failures {} :mode-changes {} :automation-errors {})",
            self.clicks,
            self.zoom_steps,
            self.swipe_steps,
            self.keys,
            self.saves,
            self.save_failures,
            self.mode_changes,
            self.automation_errors,
        )
    }
}

// ── Dispatcher ─────────────────────────────────────────────

pub struct Dispatcher {
    automation: Box<dyn ScreenAutomation>,
    persistence: Box<dyn Persistence>,
    status: Option<StatusLine>,
    status_ttl_ms: f64,
    stats: SessionStats,
}

impl Dispatcher {
    pub fn new(
        automation: Box<dyn ScreenAutomation>,
        persistence: Box<dyn Persistence>,
        status_ttl_ms: f64,
    ) -> Self {
        info!("dispatcher using {} automation", automation.name());
        Self {
            automation,
            persistence,
            status: None,
            status_ttl_ms,
            stats: SessionStats::default(),
        }
    }

    /// Execute one event.  Returns false when the external call failed;
    /// callers only act on that for saves.
    pub fn dispatch(&mut self, event: HubEvent<'_>, now_ms: f64) -> bool {
        if !matches!(event, HubEvent::PointerMoved { .. }) {
            debug!("dispatch {}", event.as_str());
        }
        match event {
            HubEvent::PointerMoved { x, y } => {
                let result = self.automation.move_pointer(x, y);
                self.automation_result(result, "move pointer", None, now_ms)
            }
            HubEvent::Click => {
                self.stats.clicks += 1;
                let result = self.automation.click();
                self.automation_result(result, "click", Some("Click"), now_ms)
            }
            HubEvent::Zoom(trend) => {
                self.stats.zoom_steps += 1;
                let (modifier, key) = zoom_hotkey(trend);
                let result = self.automation.send_hotkey(modifier, key);
                let label = match trend {
                    Trend::Increasing => "Zoom in",
                    Trend::Decreasing => "Zoom out",
                };
                self.automation_result(result, "zoom hotkey", Some(label), now_ms)
            }
            HubEvent::Swipe(trend) => {
                self.stats.swipe_steps += 1;
                let (modifier, key) = swipe_hotkey(trend);
                let result = self.automation.send_hotkey(modifier, key);
                let label = match trend {
                    Trend::Increasing => "Swipe right",
                    Trend::Decreasing => "Swipe left",
                };
                self.automation_result(result, "swipe hotkey", Some(label), now_ms)
            }
            HubEvent::KeyTyped(key) => {
                self.stats.keys += 1;
                let result = self.automation.press_key(&key.os_name());
                let label = format!("Typed {}", key.label());
                self.automation_result(result, "key press", Some(&label), now_ms)
            }
            HubEvent::SaveText(text) => {
                let result = self.persistence.save_text(text);
                self.save_result(result, "text", now_ms)
            }
            HubEvent::SaveDrawing(canvas) => {
                let result = self.persistence.save_image(canvas);
                self.save_result(result, "drawing", now_ms)
            }
            HubEvent::CanvasCleared => {
                self.set_status("Canvas cleared", StatusColor::Yellow, now_ms);
                true
            }
            HubEvent::ConfirmRequested(action) => {
                self.set_status(action.prompt(), StatusColor::Cyan, now_ms);
                true
            }
            HubEvent::ModeChanged(mode) => {
                self.stats.mode_changes += 1;
                // Mode is shown by the banner, not the status line.
                info!("mode -> {}", mode.as_str());
                true
            }
            HubEvent::Denied(action) => {
                info!("confirmation denied: {}", action.as_str());
                self.set_status("Cancelled", StatusColor::Yellow, now_ms);
                true
            }
        }
    }

    fn automation_result(
        &mut self,
        result: anyhow::Result<()>,
        what: &str,
        label: Option<&str>,
        now_ms: f64,
    ) -> bool {
        match result {
            Ok(()) => {
                if let Some(label) = label {
                    self.set_status(label, StatusColor::Green, now_ms);
                }
                true
            }
            Err(e) => {
                self.stats.automation_errors += 1;
                warn!("{} failed: {:#}", what, e);
                if label.is_some() {
                    self.set_status(&format!("{} failed", what), StatusColor::Red, now_ms);
                }
                false
            }
        }
    }

    fn save_result(&mut self, result: anyhow::Result<String>, what: &str, now_ms: f64) -> bool {
        match result {
            Ok(id) => {
                self.stats.saves += 1;
                self.set_status(&format!("Saved {}", id), StatusColor::Green, now_ms);
                true
            }
            Err(e) => {
                self.stats.save_failures += 1;
                warn!("saving {} failed: {:#}", what, e);
                self.set_status(&format!("Could not save {}", what), StatusColor::Red, now_ms);
                false
            }
        }
    }

    pub fn set_status(&mut self, text: &str, color: StatusColor, now_ms: f64) {
        self.status = Some(StatusLine {
            text: text.to_string(),
            color,
            expires_at_ms: now_ms + self.status_ttl_ms,
        });
    }

    /// Current status line, if it has not expired.
    pub fn status(&self, now_ms: f64) -> Option<&StatusLine> {
        self.status.as_ref().filter(|s| now_ms < s.expires_at_ms)
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}

// ── Test doubles ───────────────────────────────────────────

#[cfg(test)]
pub mod testing {
    //! Recording fakes shared by the dispatcher and state-machine tests.

    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::bail;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Move(i32, i32),
        Click,
        Key(String),
        Hotkey(String, String),
        SaveText(String),
        SaveImage(usize),
    }

    /// Shared call log; clone it before boxing the fakes.
    #[derive(Debug, Clone, Default)]
    pub struct Recorder {
        pub calls: Rc<RefCell<Vec<Call>>>,
        pub fail_saves: Rc<RefCell<bool>>,
    }

    impl Recorder {
        pub fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        /// Calls other than pointer moves.
        pub fn actions(&self) -> Vec<Call> {
            self.calls()
                .into_iter()
                .filter(|c| !matches!(c, Call::Move(..)))
                .collect()
        }

        pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.borrow().iter().filter(|c| pred(c)).count()
        }

        pub fn set_fail_saves(&self, fail: bool) {
            *self.fail_saves.borrow_mut() = fail;
        }

        pub fn dispatcher(&self) -> Dispatcher {
            Dispatcher::new(
                Box::new(FakeAutomation(self.clone())),
                Box::new(FakePersistence(self.clone())),
                1500.0,
            )
        }
    }

    pub struct FakeAutomation(pub Recorder);

    impl ScreenAutomation for FakeAutomation {
        fn move_pointer(&mut self, x: i32, y: i32) -> anyhow::Result<()> {
            self.0.calls.borrow_mut().push(Call::Move(x, y));
            Ok(())
        }
        fn click(&mut self) -> anyhow::Result<()> {
            self.0.calls.borrow_mut().push(Call::Click);
            Ok(())
        }
        fn press_key(&mut self, name: &str) -> anyhow::Result<()> {
            self.0.calls.borrow_mut().push(Call::Key(name.to_string()));
            Ok(())
        }
        fn send_hotkey(&mut self, modifier: &str, key: &str) -> anyhow::Result<()> {
            self.0
                .calls
                .borrow_mut()
                .push(Call::Hotkey(modifier.to_string(), key.to_string()));
            Ok(())
        }
        fn name(&self) -> &'static str {
            "fake"
        }
    }

    pub struct FakePersistence(pub Recorder);

    impl Persistence for FakePersistence {
        fn save_text(&mut self, text: &str) -> anyhow::Result<String> {
            if *self.0.fail_saves.borrow() {
                bail!("disk full");
            }
            self.0.calls.borrow_mut().push(Call::SaveText(text.to_string()));
            Ok("typed_text_test.txt".to_string())
        }
        fn save_image(&mut self, canvas: &Canvas) -> anyhow::Result<String> {
            if *self.0.fail_saves.borrow() {
                bail!("disk full");
            }
            self.0
                .calls
                .borrow_mut()
                .push(Call::SaveImage(canvas.point_count()));
            Ok("drawing_test.png".to_string())
        }
    }
}

// ── Tests ──────────────────────────────────────────────────
