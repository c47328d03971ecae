//! Hub state: the central struct holding the whole session.
//!
//! A single `HubState` owns every piece of mutable state (mode, dialog,
//! buffers, debouncers, hover timers, cooldowns) and is advanced one
//! landmark frame at a time by `tick`.  Each tick runs one branch
//! selected by the dialog and the mode:
//!
//! ```text
//! no hand      -> drop held-pose state, keep mode/text/canvas
//! dialog open  -> YES/NO hover only
//! Touchpad     -> pointer, click > zoom > swipe, mode-switch buttons
//! Keyboard     -> thumbs-up exit, key hover
//! Drawing      -> thumbs-up exit, two-finger buttons, pen strokes
//! ```

use tracing::{debug, info};

use crate::actions::{Dispatcher, HubEvent};
use crate::config::HubConfig;
use crate::gesture::{Cooldown, HandReading, HoverTimer, LandmarkFrame, PersistenceDebouncer};
use crate::modes::regions::hit_test;
use crate::modes::{
    AppMode, Canvas, ConfirmAction, ConfirmationDialog, Decision, Layout, PointerSmoother,
    RegionId, TypedText,
};
use crate::sexp::{bool_sexp, escape_string};

/// Canvas size until the first frame reports its own.
const DEFAULT_FRAME: (u32, u32) = (1280, 720);

pub struct HubState {
    config: HubConfig,
    layout: Layout,
    mode: AppMode,
    dialog: ConfirmationDialog,
    text: TypedText,
    canvas: Canvas,

    // Touchpad
    pointer: PointerSmoother,
    zoom: PersistenceDebouncer,
    swipe: PersistenceDebouncer,
    switch_hover: HoverTimer<RegionId>,

    // Keyboard / Drawing
    key_hover: HoverTimer<RegionId>,
    drawing_hover: HoverTimer<RegionId>,

    click_cooldown: Cooldown,
    gesture_cooldown: Cooldown,
    mode_cooldown: Cooldown,

    dispatcher: Dispatcher,

    /// Primary hand of the latest frame, if any.
    reading: Option<HandReading>,
    frames: u64,
    no_hand_frames: u64,
    last_tick_ms: f64,
}

impl HubState {
    pub fn new(config: HubConfig, dispatcher: Dispatcher) -> Self {
        let hover_ms = config.hover_ms;
        info!("hub state initialized: {}", config.config_sexp());
        Self {
            layout: Layout::new(),
            mode: AppMode::Touchpad,
            dialog: ConfirmationDialog::new(hover_ms),
            text: TypedText::new(),
            canvas: Canvas::new(DEFAULT_FRAME.0, DEFAULT_FRAME.1),
            pointer: PointerSmoother::new(
                config.smoothing,
                config.frame_margin_px,
                config.screen_width,
                config.screen_height,
            ),
            zoom: PersistenceDebouncer::new(
                "zoom",
                config.zoom_threshold_px,
                config.persistence_frames,
            ),
            swipe: PersistenceDebouncer::new(
                "swipe",
                config.swipe_threshold_px,
                config.persistence_frames,
            ),
            switch_hover: HoverTimer::new(hover_ms),
            key_hover: HoverTimer::new(hover_ms),
            drawing_hover: HoverTimer::new(hover_ms),
            click_cooldown: Cooldown::new(config.click_cooldown_ms),
            gesture_cooldown: Cooldown::new(config.gesture_cooldown_ms),
            mode_cooldown: Cooldown::new(config.mode_cooldown_ms),
            dispatcher,
            reading: None,
            frames: 0,
            no_hand_frames: 0,
            last_tick_ms: 0.0,
            config,
        }
    }

    // ── Per-frame pipeline ─────────────────────────────────

    /// Advance the session by one frame.  `None` means the source had no
    /// frame this tick.
    pub fn tick(&mut self, frame: Option<&LandmarkFrame>, now_ms: f64) {
        self.frames += 1;
        self.last_tick_ms = now_ms;

        if let Some(frame) = frame {
            if (frame.width, frame.height) != (self.canvas.width, self.canvas.height) {
                self.canvas.resize(frame.width, frame.height);
            }
        }

        let reading = frame.and_then(|f| HandReading::from_frame(f).map(|r| (r, f)));
        let Some((reading, frame)) = reading else {
            self.reading = None;
            self.no_hand_frames += 1;
            self.on_hand_lost(now_ms);
            return;
        };
        if self.reading.map(|r| r.pose) != Some(reading.pose) {
            let names: Vec<&str> = reading.pose.poses().iter().map(|p| p.as_str()).collect();
            debug!("pose -> ({})", names.join(" "));
        }
        self.reading = Some(reading);

        self.pointer
            .update(reading.pointer, (frame.width, frame.height));

        if self.dialog.is_open() {
            self.tick_dialog(&reading, now_ms);
            return;
        }

        match self.mode {
            AppMode::Touchpad => self.tick_touchpad(&reading, now_ms),
            AppMode::Keyboard => self.tick_keyboard(&reading, now_ms),
            AppMode::Drawing => self.tick_drawing(&reading, now_ms),
        }
    }

    fn on_hand_lost(&mut self, now_ms: f64) {
        self.reset_held_state();
        // Keeps the dialog open; only its hover record goes.
        self.dialog.update(&self.layout.dialog, None, now_ms);
    }

    /// Forget everything tied to a continuously held pose or hover.
    fn reset_held_state(&mut self) {
        self.zoom.reset();
        self.swipe.reset();
        self.switch_hover.reset();
        self.key_hover.reset();
        self.drawing_hover.reset();
        self.canvas.lift_pen();
    }

    fn tick_dialog(&mut self, reading: &HandReading, now_ms: f64) {
        self.reset_held_state();
        if let Some(decision) = self
            .dialog
            .update(&self.layout.dialog, Some(reading.pointer), now_ms)
        {
            self.resolve(decision, now_ms);
        }
    }

    fn tick_touchpad(&mut self, reading: &HandReading, now_ms: f64) {
        let (x, y) = self.pointer.screen_position();
        self.dispatcher
            .dispatch(HubEvent::PointerMoved { x, y }, now_ms);

        let pose = reading.pose;
        if pose.is_pinch_click() && reading.pinch_distance < self.config.click_threshold_px {
            self.zoom.reset();
            self.swipe.reset();
            if self.click_cooldown.ready(now_ms) {
                debug!("pinch click at distance {:.1}", reading.pinch_distance);
                self.dispatcher.dispatch(HubEvent::Click, now_ms);
                self.click_cooldown.start(now_ms);
            }
        } else if pose.is_zoom() {
            self.swipe.reset();
            if self.gesture_cooldown.ready(now_ms) {
                if let Some(trend) = self.zoom.update(reading.pinch_distance) {
                    self.dispatcher.dispatch(HubEvent::Zoom(trend), now_ms);
                    self.gesture_cooldown.start(now_ms);
                }
            } else {
                self.zoom.reset();
            }
        } else if pose.is_swipe() {
            self.zoom.reset();
            if self.gesture_cooldown.ready(now_ms) {
                if let Some(trend) = self.swipe.update(reading.swipe_x) {
                    self.dispatcher.dispatch(HubEvent::Swipe(trend), now_ms);
                    self.gesture_cooldown.start(now_ms);
                }
            } else {
                self.swipe.reset();
            }
        } else {
            self.zoom.reset();
            self.swipe.reset();
        }

        let over = if self.mode_cooldown.ready(now_ms) {
            hit_test(&self.layout.mode_switch, reading.pointer)
        } else {
            None
        };
        match self.switch_hover.update(over, now_ms) {
            Some(RegionId::SwitchKeyboard) => self.request(ConfirmAction::EnterKeyboard, now_ms),
            Some(RegionId::SwitchDrawing) => self.request(ConfirmAction::EnterDrawing, now_ms),
            Some(other) => debug!("unexpected mode-switch region {:?}", other),
            None => {}
        }
    }

    fn tick_keyboard(&mut self, reading: &HandReading, now_ms: f64) {
        if reading.pose.is_thumbs_up() {
            self.key_hover.reset();
            if self.mode_cooldown.ready(now_ms) {
                self.request(ConfirmAction::ExitKeyboard, now_ms);
            }
            return;
        }

        let over = self.layout.key_at(reading.pointer).map(RegionId::Key);
        if let Some(RegionId::Key(key)) = self.key_hover.update(over, now_ms) {
            self.text.apply(key);
            self.dispatcher.dispatch(HubEvent::KeyTyped(key), now_ms);
        }
    }

    fn tick_drawing(&mut self, reading: &HandReading, now_ms: f64) {
        let pose = reading.pose;
        if pose.is_thumbs_up() {
            self.canvas.lift_pen();
            self.drawing_hover.reset();
            if self.mode_cooldown.ready(now_ms) {
                self.request(ConfirmAction::ExitDrawing, now_ms);
            }
            return;
        }

        if pose.is_swipe() {
            self.canvas.lift_pen();
            let over = hit_test(&self.layout.drawing, reading.pointer);
            match self.drawing_hover.update(over, now_ms) {
                Some(RegionId::Save) => {
                    if self
                        .dispatcher
                        .dispatch(HubEvent::SaveDrawing(&self.canvas), now_ms)
                    {
                        self.canvas.clear();
                    }
                }
                Some(RegionId::Clear) => {
                    self.canvas.clear();
                    self.dispatcher.dispatch(HubEvent::CanvasCleared, now_ms);
                }
                Some(other) => debug!("unexpected drawing region {:?}", other),
                None => {}
            }
            return;
        }

        self.drawing_hover.reset();
        if pose.is_drawing_pen() {
            self.canvas.draw_to(reading.pointer);
        } else {
            self.canvas.lift_pen();
        }
    }

    // ── Transitions ────────────────────────────────────────

    fn request(&mut self, action: ConfirmAction, now_ms: f64) {
        if self.dialog.open(action) {
            self.reset_held_state();
            self.mode_cooldown.start(now_ms);
            self.dispatcher
                .dispatch(HubEvent::ConfirmRequested(action), now_ms);
        }
    }

    fn resolve(&mut self, decision: Decision, now_ms: f64) {
        match decision {
            Decision::Accepted(action) => {
                info!("confirmation accepted: {}", action.as_str());
                match action {
                    ConfirmAction::EnterKeyboard => {
                        self.text.clear();
                        self.set_mode(action.target_mode(), now_ms);
                    }
                    ConfirmAction::EnterDrawing => {
                        self.canvas.clear();
                        self.set_mode(action.target_mode(), now_ms);
                    }
                    ConfirmAction::ExitKeyboard => {
                        if self
                            .dispatcher
                            .dispatch(HubEvent::SaveText(self.text.as_str()), now_ms)
                        {
                            self.text.clear();
                            self.set_mode(action.target_mode(), now_ms);
                        }
                    }
                    ConfirmAction::ExitDrawing => {
                        if self
                            .dispatcher
                            .dispatch(HubEvent::SaveDrawing(&self.canvas), now_ms)
                        {
                            self.canvas.clear();
                            self.set_mode(action.target_mode(), now_ms);
                        }
                    }
                }
            }
            Decision::Rejected(action) => {
                if action == ConfirmAction::ExitDrawing {
                    self.canvas.clear();
                }
                self.dispatcher.dispatch(HubEvent::Denied(action), now_ms);
            }
        }
        self.reset_held_state();
        self.mode_cooldown.start(now_ms);
    }

    fn set_mode(&mut self, mode: AppMode, now_ms: f64) {
        if self.mode == mode {
            return;
        }
        debug!("mode {} -> {}", self.mode.as_str(), mode.as_str());
        self.mode = mode;
        self.dispatcher.dispatch(HubEvent::ModeChanged(mode), now_ms);
    }

    // ── Accessors ──────────────────────────────────────────

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn dialog(&self) -> &ConfirmationDialog {
        &self.dialog
    }

    pub fn text(&self) -> &TypedText {
        &self.text
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn reading(&self) -> Option<&HandReading> {
        self.reading.as_ref()
    }

    pub fn pointer(&self) -> &PointerSmoother {
        &self.pointer
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Region currently being hovered in the table the active branch
    /// consults, with its fill progress.
    pub fn hover_state(&self, now_ms: f64) -> Option<(RegionId, f32)> {
        if self.dialog.is_open() {
            return self
                .dialog
                .hovered()
                .map(|r| (r, self.dialog.hover_progress(now_ms)));
        }
        let timer = match self.mode {
            AppMode::Touchpad => &self.switch_hover,
            AppMode::Keyboard => &self.key_hover,
            AppMode::Drawing => &self.drawing_hover,
        };
        timer.active().map(|r| (r, timer.progress(now_ms)))
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    // ── Status ─────────────────────────────────────────────

    /// Generate s-expression for periodic status logs.
    pub fn status_sexp(&self) -> String {
        let pointer = self.pointer.current();
        let dialog = self
            .dialog
            .pending()
            .map(|a| a.as_str())
            .unwrap_or("nil");
        format!(
            "(:mode {} :dialog {} :hand {} :pointer ({:.0} {:.0}) :text \"{}\" :strokes {} :pen-down {} :zoom {} :swipe {} :mode-cooldown-ms {:.0})",
            self.mode.as_str(),
            dialog,
            bool_sexp(self.reading.is_some()),
            pointer.0,
            pointer.1,
            escape_string(self.text.as_str()),
            self.canvas.strokes().len(),
            bool_sexp(self.canvas.is_pen_down()),
            self.zoom.status_sexp(),
            self.swipe.status_sexp(),
            self.mode_cooldown.remaining_ms(self.last_tick_ms),
        )
    }

    /// Generate s-expression for the session summary.
    pub fn stats_sexp(&self) -> String {
        format!(
            "(:frames {} :no-hand-frames {} :actions {})",
            self.frames,
            self.no_hand_frames,
            self.dispatcher.stats().stats_sexp(),
        )
    }
}

// ── Tests ──────────────────────────────────────────────────
