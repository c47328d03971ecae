//! Hover-to-fire timing over a table of regions.
//!
//! One `HoverTimer` instance per usage (keys, mode-switch buttons, drawing
//! buttons, the confirmation dialog) so their state never interferes.

use std::fmt::Debug;

use tracing::debug;

/// Hover record state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum HoverRecord<R> {
    /// Pointer is outside every region.
    Idle,
    /// Pointer entered `region` at `since_ms` and has stayed there.
    Hovering { region: R, since_ms: f64 },
    /// `region` already fired; it stays latched until the pointer leaves.
    Fired { region: R },
}

/// Generic "rested in region R for longer than D" detector.
#[derive(Debug, Clone)]
pub struct HoverTimer<R> {
    duration_ms: f64,
    record: HoverRecord<R>,
}

impl<R: Copy + PartialEq + Debug> HoverTimer<R> {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            record: HoverRecord::Idle,
        }
    }

    /// Report the region under the pointer this frame.  Returns the region
    /// on the single frame it fires.
    pub fn update(&mut self, region: Option<R>, now_ms: f64) -> Option<R> {
        let Some(region) = region else {
            self.record = HoverRecord::Idle;
            return None;
        };

        match self.record {
            HoverRecord::Hovering { region: r, since_ms } if r == region => {
                if now_ms - since_ms > self.duration_ms {
                    debug!("hover fired on {:?} after {:.0}ms", region, now_ms - since_ms);
                    self.record = HoverRecord::Fired { region };
                    Some(region)
                } else {
                    None
                }
            }
            HoverRecord::Fired { region: r } if r == region => None,
            _ => {
                self.record = HoverRecord::Hovering {
                    region,
                    since_ms: now_ms,
                };
                None
            }
        }
    }

    /// Drop any record, latched or not.
    pub fn reset(&mut self) {
        self.record = HoverRecord::Idle;
    }

    /// Region currently being timed (not yet fired).
    pub fn active(&self) -> Option<R> {
        match self.record {
            HoverRecord::Hovering { region, .. } => Some(region),
            _ => None,
        }
    }

    /// Fraction of the hover duration elapsed for the active region (0..1).
    pub fn progress(&self, now_ms: f64) -> f32 {
        match self.record {
            HoverRecord::Hovering { since_ms, .. } if self.duration_ms > 0.0 => {
                ((now_ms - since_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
            }
            HoverRecord::Fired { .. } => 1.0,
            _ => 0.0,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Spot {
        A,
        B,
    }

    #[test]
    fn test_entering_does_not_fire() {
        let mut t = HoverTimer::new(500.0);
        assert!(t.update(Some(Spot::A), 0.0).is_none());
        assert_eq!(t.active(), Some(Spot::A));
    }

    #[test]
    fn test_fires_after_duration() {
        let mut t = HoverTimer::new(500.0);
        t.update(Some(Spot::A), 0.0);
        assert!(t.update(Some(Spot::A), 400.0).is_none());
        assert!(t.update(Some(Spot::A), 500.0).is_none(), "must strictly exceed");
        assert_eq!(t.update(Some(Spot::A), 501.0), Some(Spot::A));
        assert!(t.active().is_none());
    }

    #[test]
    fn test_exactly_once_while_held() {
        let mut t = HoverTimer::new(500.0);
        let fires = (0..200)
            .filter_map(|i| t.update(Some(Spot::A), i as f64 * 33.0))
            .count();
        assert_eq!(fires, 1);
    }

    #[test]
    fn test_refire_requires_reentry() {
        let mut t = HoverTimer::new(100.0);
        t.update(Some(Spot::A), 0.0);
        assert!(t.update(Some(Spot::A), 150.0).is_some());
        assert!(t.update(Some(Spot::A), 400.0).is_none());

        t.update(None, 450.0);
        t.update(Some(Spot::A), 500.0);
        assert_eq!(t.update(Some(Spot::A), 650.0), Some(Spot::A));
    }

    #[test]
    fn test_switching_region_restarts() {
        let mut t = HoverTimer::new(100.0);
        t.update(Some(Spot::A), 0.0);
        assert!(t.update(Some(Spot::B), 90.0).is_none());
        assert!(t.update(Some(Spot::B), 150.0).is_none());
        assert_eq!(t.update(Some(Spot::B), 191.0), Some(Spot::B));
    }

    #[test]
    fn test_leaving_clears() {
        let mut t = HoverTimer::new(100.0);
        t.update(Some(Spot::A), 0.0);
        t.update(None, 50.0);
        assert!(t.active().is_none());
        assert_eq!(t.progress(50.0), 0.0);
        t.update(Some(Spot::A), 60.0);
        assert!(t.update(Some(Spot::A), 120.0).is_none());
    }

    #[test]
    fn test_progress() {
        let mut t = HoverTimer::new(200.0);
        assert_eq!(t.progress(0.0), 0.0);
        t.update(Some(Spot::A), 0.0);
        assert!((t.progress(100.0) - 0.5).abs() < 0.001);
        assert_eq!(t.progress(1000.0), 1.0);
    }

    #[test]
    fn test_independent_instances() {
        let mut keys = HoverTimer::new(100.0);
        let mut dialog = HoverTimer::new(100.0);
        keys.update(Some(Spot::A), 0.0);
        dialog.update(Some(Spot::A), 80.0);
        assert!(keys.update(Some(Spot::A), 150.0).is_some());
        assert!(dialog.update(Some(Spot::A), 150.0).is_none());
    }
}
