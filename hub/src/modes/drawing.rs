//! Stroke canvas owned by Drawing mode.
//!
//! Strokes are polylines in frame pixels.  A stroke is open while the pen
//! pose is held and closes as soon as it is lost for a frame.

/// One continuous pen stroke.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stroke {
    pub points: Vec<(f32, f32)>,
}

/// Persistent 2D canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    strokes: Vec<Stroke>,
    pen_down: bool,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            strokes: Vec::new(),
            pen_down: false,
        }
    }

    /// Extend the open stroke, opening one if the pen was up.
    pub fn draw_to(&mut self, point: (f32, f32)) {
        if !self.pen_down {
            self.strokes.push(Stroke::default());
            self.pen_down = true;
        }
        if let Some(stroke) = self.strokes.last_mut() {
            if stroke.points.last() != Some(&point) {
                stroke.points.push(point);
            }
        }
    }

    /// Close the open stroke, if any.
    pub fn lift_pen(&mut self) {
        self.pen_down = false;
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.pen_down = false;
    }

    /// Follow the camera frame size; strokes keep their coordinates.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.width = width;
            self.height = height;
        }
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.iter().all(|s| s.points.is_empty())
    }

    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(|s| s.points.len()).sum()
    }

    pub fn is_pen_down(&self) -> bool {
        self.pen_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canvas_is_empty() {
        let c = Canvas::new(1280, 720);
        assert!(c.is_empty());
        assert!(!c.is_pen_down());
    }

    #[test]
    fn test_strokes_split_on_lift() {
        let mut c = Canvas::new(1280, 720);
        c.draw_to((10.0, 10.0));
        c.draw_to((20.0, 20.0));
        c.lift_pen();
        c.draw_to((30.0, 30.0));
        assert_eq!(c.strokes().len(), 2);
        assert_eq!(c.point_count(), 3);
    }

    #[test]
    fn test_duplicate_points_skipped() {
        let mut c = Canvas::new(1280, 720);
        c.draw_to((10.0, 10.0));
        c.draw_to((10.0, 10.0));
        assert_eq!(c.point_count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut c = Canvas::new(1280, 720);
        c.draw_to((10.0, 10.0));
        c.clear();
        assert!(c.is_empty());
        assert!(c.strokes().is_empty());
        assert!(!c.is_pen_down());
    }

    #[test]
    fn test_resize_ignores_zero() {
        let mut c = Canvas::new(1280, 720);
        c.resize(0, 480);
        assert_eq!((c.width, c.height), (1280, 720));
        c.resize(640, 480);
        assert_eq!((c.width, c.height), (640, 480));
    }
}
