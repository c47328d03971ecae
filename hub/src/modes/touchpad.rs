//! Fingertip to screen pointer mapping.

/// Maps the index fingertip from the camera frame onto the screen and
/// low-pass filters it.
///
/// The usable camera area is the frame inset by `margin` on every side, so
/// the pointer can reach the screen edges without the hand leaving view.
#[derive(Debug, Clone)]
pub struct PointerSmoother {
    smoothing: f32,
    margin: f32,
    screen: (f32, f32),
    current: (f32, f32),
}

impl PointerSmoother {
    pub fn new(smoothing: f32, margin: f32, screen_width: u32, screen_height: u32) -> Self {
        Self {
            smoothing: smoothing.max(1.0),
            margin,
            screen: (screen_width as f32, screen_height as f32),
            current: (0.0, 0.0),
        }
    }

    /// Screen position the fingertip points at, before smoothing.
    pub fn target(&self, fingertip: (f32, f32), frame: (u32, u32)) -> (f32, f32) {
        (
            remap(fingertip.0, frame.0 as f32, self.margin, self.screen.0),
            remap(fingertip.1, frame.1 as f32, self.margin, self.screen.1),
        )
    }

    /// Step the filter toward the fingertip's target and return the new
    /// pointer position.
    pub fn update(&mut self, fingertip: (f32, f32), frame: (u32, u32)) -> (f32, f32) {
        let target = self.target(fingertip, frame);
        self.current.0 += (target.0 - self.current.0) / self.smoothing;
        self.current.1 += (target.1 - self.current.1) / self.smoothing;
        self.current
    }

    pub fn current(&self) -> (f32, f32) {
        self.current
    }

    /// Rounded pointer position for the OS.
    pub fn screen_position(&self) -> (i32, i32) {
        (self.current.0.round() as i32, self.current.1.round() as i32)
    }
}

/// Linear map of `[margin, extent - margin]` onto `[0, out]`, clamped.
fn remap(v: f32, extent: f32, margin: f32, out: f32) -> f32 {
    let (lo, hi) = if extent > 2.0 * margin {
        (margin, extent - margin)
    } else {
        (0.0, extent)
    };
    if hi <= lo {
        return 0.0;
    }
    ((v - lo) / (hi - lo)).clamp(0.0, 1.0) * out
}
