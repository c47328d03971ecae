//! Startup configuration: thresholds, timings and output locations.
//!
//! Defaults can be overridden by an s-expression plist file and then by
//! command-line flags.  The result is fixed for the lifetime of the process.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use tracing::info;

use crate::sexp::{self, escape_string};

/// All tunable constants of the hub.
#[derive(Debug, Clone, PartialEq)]
pub struct HubConfig {
    /// Thumb–index distance (frame px) under which a pinch clicks.
    pub click_threshold_px: f32,
    /// Per-frame pinch distance change (px) that counts toward a zoom step.
    pub zoom_threshold_px: f32,
    /// Per-frame horizontal drift (px) that counts toward a swipe step.
    pub swipe_threshold_px: f32,
    /// Consecutive agreeing frames before zoom/swipe fires.
    pub persistence_frames: u32,
    /// Hover time before a region fires.
    pub hover_ms: f64,
    /// Click-repeat spacing while a pinch is held.
    pub click_cooldown_ms: f64,
    /// Spacing between zoom/swipe steps.
    pub gesture_cooldown_ms: f64,
    /// Spacing between mode/confirmation triggers.
    pub mode_cooldown_ms: f64,
    /// Pointer smoothing divisor (1 = no smoothing).
    pub smoothing: f32,
    /// Border band (frame px) excluded from the pointer mapping.
    pub frame_margin_px: f32,
    /// Target screen size for pointer mapping.
    pub screen_width: u32,
    pub screen_height: u32,
    /// How long a status annotation stays on screen.
    pub status_ttl_ms: f64,
    /// Where saved text and drawings go.
    pub output_dir: PathBuf,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            click_threshold_px: 40.0,
            zoom_threshold_px: 30.0,
            swipe_threshold_px: 30.0,
            persistence_frames: 5,
            hover_ms: 500.0,
            click_cooldown_ms: 200.0,
            gesture_cooldown_ms: 500.0,
            mode_cooldown_ms: 500.0,
            smoothing: 7.0,
            frame_margin_px: 100.0,
            screen_width: 1920,
            screen_height: 1080,
            status_ttl_ms: 1500.0,
            output_dir: PathBuf::from("."),
        }
    }
}

impl HubConfig {
    /// Parse a "WxH" resolution string. Returns (width, height) or None.
    pub fn parse_resolution(s: &str) -> Option<(u32, u32)> {
        let (w, h) = s.split_once('x')?;
        let w = w.trim().parse::<u32>().ok()?;
        let h = h.trim().parse::<u32>().ok()?;
        if w > 0 && h > 0 {
            Some((w, h))
        } else {
            None
        }
    }

    /// Load overrides from an s-expression plist file on top of defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config = Self::default();
        config
            .apply_sexp(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply every recognized key of a plist such as
    /// `(:hover-ms 600 :screen "2560x1440")`.  Unknown keys are ignored.
    pub fn apply_sexp(&mut self, raw: &str) -> anyhow::Result<()> {
        let value = lexpr::from_str(raw)?;

        let float = |key: &str| sexp::get_float(&value, key);
        if let Some(v) = float("click-threshold-px") {
            self.click_threshold_px = v as f32;
        }
        if let Some(v) = float("zoom-threshold-px") {
            self.zoom_threshold_px = v as f32;
        }
        if let Some(v) = float("swipe-threshold-px") {
            self.swipe_threshold_px = v as f32;
        }
        if let Some(v) = sexp::get_uint(&value, "persistence-frames") {
            self.persistence_frames = u32::try_from(v).context("persistence-frames out of range")?;
        }
        if let Some(v) = float("hover-ms") {
            self.hover_ms = v;
        }
        if let Some(v) = float("click-cooldown-ms") {
            self.click_cooldown_ms = v;
        }
        if let Some(v) = float("gesture-cooldown-ms") {
            self.gesture_cooldown_ms = v;
        }
        if let Some(v) = float("mode-cooldown-ms") {
            self.mode_cooldown_ms = v;
        }
        if let Some(v) = float("smoothing") {
            self.smoothing = v as f32;
        }
        if let Some(v) = float("frame-margin-px") {
            self.frame_margin_px = v as f32;
        }
        if let Some(v) = float("status-ttl-ms") {
            self.status_ttl_ms = v;
        }
        if let Some(s) = sexp::get_string(&value, "screen") {
            let Some((w, h)) = Self::parse_resolution(&s) else {
                bail!("invalid screen resolution {:?}, expected WxH", s);
            };
            self.screen_width = w;
            self.screen_height = h;
        }
        if let Some(s) = sexp::get_string(&value, "output-dir") {
            self.output_dir = PathBuf::from(s);
        }
        Ok(())
    }

    /// Reject values the state machine cannot work with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.persistence_frames == 0 {
            bail!("persistence-frames must be at least 1");
        }
        if self.smoothing < 1.0 {
            bail!("smoothing must be >= 1 (got {})", self.smoothing);
        }
        for (name, v) in [
            ("click-threshold-px", self.click_threshold_px),
            ("zoom-threshold-px", self.zoom_threshold_px),
            ("swipe-threshold-px", self.swipe_threshold_px),
        ] {
            if v <= 0.0 {
                bail!("{} must be positive (got {})", name, v);
            }
        }
        for (name, v) in [
            ("hover-ms", self.hover_ms),
            ("click-cooldown-ms", self.click_cooldown_ms),
            ("gesture-cooldown-ms", self.gesture_cooldown_ms),
            ("mode-cooldown-ms", self.mode_cooldown_ms),
            ("status-ttl-ms", self.status_ttl_ms),
        ] {
            if v < 0.0 {
                bail!("{} must not be negative (got {})", name, v);
            }
        }
        if self.frame_margin_px < 0.0 {
            bail!("frame-margin-px must not be negative");
        }
        Ok(())
    }

    /// Generate s-expression for the startup log.
    pub fn config_sexp(&self) -> String {
        format!(
            "(:click-threshold-px {:.0} :zoom-threshold-px {:.0} :swipe-threshold-px {:.0} :persistence-frames {} :hover-ms {:.0} :click-cooldown-ms {:.0} :gesture-cooldown-ms {:.0} :mode-cooldown-ms {:.0} :smoothing {:.1} :frame-margin-px {:.0} :screen \"{}x{}\" :status-ttl-ms {:.0} :output-dir \"{}\")",
            self.click_threshold_px,
            self.zoom_threshold_px,
            self.swipe_threshold_px,
            self.persistence_frames,
            self.hover_ms,
            self.click_cooldown_ms,
            self.gesture_cooldown_ms,
            self.mode_cooldown_ms,
            self.smoothing,
            self.frame_margin_px,
            self.screen_width,
            self.screen_height,
            self.status_ttl_ms,
            escape_string(&self.output_dir.display().to_string()),
        )
    }
}
