//! Persistence debouncing for continuous gestures (zoom, swipe).
//!
//! A measurement only becomes an event after it has moved past the
//! displacement threshold in the same direction for `persistence`
//! consecutive frames.

use tracing::debug;

/// Direction of an accepted run of deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Increasing,
    Decreasing,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
        }
    }
}

/// Signed frame counter over a scalar measurement.
#[derive(Debug, Clone)]
pub struct PersistenceDebouncer {
    name: &'static str,
    /// Minimum per-frame displacement that counts as movement.
    threshold: f32,
    /// Consecutive agreeing frames required to fire.
    persistence: u32,
    /// Positive while increasing, negative while decreasing.
    counter: i32,
    /// Previous frame's measurement; `None` until the gesture (re)starts.
    previous: Option<f32>,
}

impl PersistenceDebouncer {
    pub fn new(name: &'static str, threshold: f32, persistence: u32) -> Self {
        Self {
            name,
            threshold,
            persistence: persistence.max(1),
            counter: 0,
            previous: None,
        }
    }

    /// Feed this frame's measurement.  Returns the trend when the counter
    /// reaches the persistence count.
    pub fn update(&mut self, measurement: f32) -> Option<Trend> {
        let Some(previous) = self.previous.replace(measurement) else {
            return None;
        };

        let delta = measurement - previous;
        if delta.abs() > self.threshold {
            let step = if delta > 0.0 { 1 } else { -1 };
            if self.counter != 0 && self.counter.signum() != step {
                // Direction flipped: start over.
                self.counter = 0;
            } else {
                self.counter += step;
            }
        } else {
            self.counter = 0;
        }

        if self.counter.unsigned_abs() >= self.persistence {
            let trend = if self.counter > 0 {
                Trend::Increasing
            } else {
                Trend::Decreasing
            };
            debug!("{} debouncer fired: {}", self.name, trend.as_str());
            self.counter = 0;
            return Some(trend);
        }
        None
    }

    /// Forget counter and anchor; the next update only re-anchors.
    pub fn reset(&mut self) {
        self.counter = 0;
        self.previous = None;
    }

    pub fn counter(&self) -> i32 {
        self.counter
    }

    pub fn is_anchored(&self) -> bool {
        self.previous.is_some()
    }

    pub fn status_sexp(&self) -> String {
        format!(
            "(:name {} :counter {} :anchored {})",
            self.name,
            self.counter,
            if self.is_anchored() { "t" } else { "nil" },
        )
    }
}

// ── Tests ──────────────────────────────────────────────────
