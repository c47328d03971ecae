//! Hand landmark frames as handed over by the external pose estimator.
//!
//! Models the 21 points per hand produced by a MediaPipe-style estimator,
//! normalized to the camera frame (0..1, top-left origin).  A frame carries
//! zero, one or two hands; only the first one drives control logic.

use tracing::debug;

// ── Landmark definitions ───────────────────────────────────

/// The 21 hand landmarks, in estimator order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

impl HandLandmark {
    /// Array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Bone connections used when rendering a hand skeleton.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (9, 10), (10, 11), (11, 12),
    (13, 14), (14, 15), (15, 16),
    (17, 18), (18, 19), (19, 20),
    // Palm
    (5, 9), (9, 13), (13, 17), (0, 17),
];

// ── Points and hands ───────────────────────────────────────

/// A single landmark position, normalized to the camera frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Landmarks for one detected hand.
#[derive(Debug, Clone, Default)]
pub struct HandPoints {
    /// Points indexed by `HandLandmark`. May be short if the estimator
    /// returned a partial set.
    pub points: Vec<Landmark>,
}

impl HandPoints {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Whether every landmark is present.
    pub fn is_complete(&self) -> bool {
        self.points.len() >= LANDMARK_COUNT
    }
}

// ── Frame ──────────────────────────────────────────────────

/// One captured video frame's worth of hand landmarks.
#[derive(Debug, Clone, Default)]
pub struct LandmarkFrame {
    /// Detected hands, primary first.
    pub hands: Vec<HandPoints>,
    /// Raw frame width in pixels.
    pub width: u32,
    /// Raw frame height in pixels.
    pub height: u32,
}

impl LandmarkFrame {
    pub fn new(hands: Vec<HandPoints>, width: u32, height: u32) -> Self {
        Self {
            hands,
            width,
            height,
        }
    }

    /// The hand that drives control logic, if it carries a full landmark set.
    pub fn primary_hand(&self) -> Option<&HandPoints> {
        let hand = self.hands.first()?;
        if !hand.is_complete() {
            debug!(
                "primary hand has {} of {} landmarks, ignoring",
                hand.points.len(),
                LANDMARK_COUNT
            );
            return None;
        }
        Some(hand)
    }

    /// Convert a normalized landmark to frame pixel coordinates.
    pub fn to_pixels(&self, point: &Landmark) -> (f32, f32) {
        (point.x * self.width as f32, point.y * self.height as f32)
    }

    /// All hands in pixel coordinates, for rendering.
    pub fn hands_in_pixels(&self) -> Vec<Vec<(f32, f32)>> {
        self.hands
            .iter()
            .map(|h| h.points.iter().map(|p| self.to_pixels(p)).collect())
            .collect()
    }
}

// ── Test helpers ───────────────────────────────────────────

/// A relaxed open hand with every finger pointing up, centered in the frame.
#[cfg(test)]
pub fn open_hand() -> Vec<Landmark> {
    let mut points = vec![Landmark::default(); LANDMARK_COUNT];
    points[HandLandmark::Wrist.index()] = Landmark::new(0.50, 0.90, 0.0);
    // Thumb: CMC, MCP, IP, tip climbing to the left
    points[1] = Landmark::new(0.45, 0.85, 0.0);
    points[2] = Landmark::new(0.42, 0.80, 0.0);
    points[3] = Landmark::new(0.40, 0.75, 0.0);
    points[4] = Landmark::new(0.38, 0.70, 0.0);
    // Fingers: MCP, PIP, DIP, tip climbing upward
    for (finger, x) in [(5, 0.46), (9, 0.50), (13, 0.54), (17, 0.58)] {
        points[finger] = Landmark::new(x, 0.70, 0.0);
        points[finger + 1] = Landmark::new(x, 0.60, 0.0);
        points[finger + 2] = Landmark::new(x, 0.55, 0.0);
        points[finger + 3] = Landmark::new(x, 0.50, 0.0);
    }
    points
}

/// Fold a finger (base landmark index of its MCP) so the tip sits below the knuckle.
#[cfg(test)]
pub fn curl_finger(points: &mut [Landmark], mcp: usize) {
    let base = points[mcp];
    points[mcp + 1] = Landmark::new(base.x, base.y - 0.03, 0.0);
    points[mcp + 2] = Landmark::new(base.x, base.y + 0.02, 0.0);
    points[mcp + 3] = Landmark::new(base.x, base.y + 0.04, 0.0);
}

/// Tuck the thumb so its tip sits below the IP joint.
#[cfg(test)]
pub fn tuck_thumb(points: &mut [Landmark]) {
    let ip = points[HandLandmark::ThumbIp.index()];
    points[HandLandmark::ThumbTip.index()] = Landmark::new(ip.x + 0.03, ip.y + 0.05, 0.0);
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_count() {
        assert_eq!(HandLandmark::Wrist.index(), 0);
        assert_eq!(HandLandmark::IndexTip.index(), 8);
        assert_eq!(HandLandmark::PinkyTip.index(), 20);
        assert_eq!(LANDMARK_COUNT, 21);
    }

    #[test]
    fn test_connections_form_a_hand() {
        // Palm runs index, middle, ring, pinky knuckles and back to the wrist.
        for edge in [(5, 9), (9, 13), (13, 17), (0, 17)] {
            assert!(HAND_CONNECTIONS.contains(&edge), "missing {:?}", edge);
        }
        assert!(!HAND_CONNECTIONS.contains(&(0, 9)));
        assert!(!HAND_CONNECTIONS.contains(&(0, 13)));
        // Every landmark is attached to the skeleton.
        for i in 0..LANDMARK_COUNT {
            assert!(HAND_CONNECTIONS.iter().any(|&(a, b)| a == i || b == i));
        }
    }

    #[test]
    fn test_primary_hand_requires_full_set() {
        let short = HandPoints::new(vec![Landmark::default(); 10]);
        let frame = LandmarkFrame::new(vec![short], 1280, 720);
        assert!(frame.primary_hand().is_none());

        let full = HandPoints::new(open_hand());
        let frame = LandmarkFrame::new(vec![full], 1280, 720);
        assert!(frame.primary_hand().is_some());
    }

    #[test]
    fn test_primary_hand_is_first() {
        let mut second = open_hand();
        second[0] = Landmark::new(0.1, 0.1, 0.0);
        let frame = LandmarkFrame::new(
            vec![HandPoints::new(open_hand()), HandPoints::new(second)],
            1280,
            720,
        );
        let primary = frame.primary_hand().unwrap();
        assert_eq!(primary.points[HandLandmark::Wrist.index()].x, 0.5);
    }

    #[test]
    fn test_no_hands() {
        let frame = LandmarkFrame::new(Vec::new(), 1280, 720);
        assert!(frame.primary_hand().is_none());
        assert!(frame.hands_in_pixels().is_empty());
    }

    #[test]
    fn test_to_pixels() {
        let frame = LandmarkFrame::new(Vec::new(), 1280, 720);
        let (x, y) = frame.to_pixels(&Landmark::new(0.5, 0.25, 0.0));
        assert!((x - 640.0).abs() < 0.001);
        assert!((y - 180.0).abs() < 0.001);
    }
}
