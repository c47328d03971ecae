//! Pose classification from one frame's landmark geometry.
//!
//! Derives per-finger extended/curled predicates and the named composite
//! poses the hub reacts to.  Pure: no state survives between frames.

use super::landmarks::{HandLandmark, HandPoints, LandmarkFrame};

// ── Pose types ─────────────────────────────────────────────

/// Named composite poses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pose {
    /// Thumb and index out, middle folded: ready to pinch-click.
    PinchClick,
    /// Thumb and index out, ring and pinky curled.
    Zoom,
    /// Index and middle out, ring and pinky curled.
    Swipe,
    /// Index out alone.
    DrawingPen,
    /// Thumb out, every other finger curled.
    ThumbsUp,
}

impl Pose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PinchClick => "pinch-click",
            Self::Zoom => "zoom",
            Self::Swipe => "swipe",
            Self::DrawingPen => "drawing-pen",
            Self::ThumbsUp => "thumbs-up",
        }
    }
}

// ── Snapshot ───────────────────────────────────────────────

/// Finger-state predicates for one frame.  `Default` is the neutral snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoseSnapshot {
    pub thumb_extended: bool,
    pub index_extended: bool,
    pub middle_extended: bool,
    pub index_curled: bool,
    pub middle_curled: bool,
    pub ring_curled: bool,
    pub pinky_curled: bool,
}

impl PoseSnapshot {
    /// All predicates false; no pose matches.
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Classify a hand.  Partial landmark sets yield the neutral snapshot.
    pub fn classify(hand: &HandPoints) -> Self {
        if !hand.is_complete() {
            return Self::neutral();
        }
        let y = |l: HandLandmark| hand.points[l.index()].y;

        // Top-left origin: "above" is numerically smaller.
        Self {
            thumb_extended: y(HandLandmark::ThumbTip) < y(HandLandmark::ThumbIp),
            index_extended: y(HandLandmark::IndexTip) < y(HandLandmark::IndexPip),
            middle_extended: y(HandLandmark::MiddleTip) < y(HandLandmark::MiddlePip),
            index_curled: y(HandLandmark::IndexTip) > y(HandLandmark::IndexMcp),
            middle_curled: y(HandLandmark::MiddleTip) > y(HandLandmark::MiddleMcp),
            ring_curled: y(HandLandmark::RingTip) > y(HandLandmark::RingMcp),
            pinky_curled: y(HandLandmark::PinkyTip) > y(HandLandmark::PinkyMcp),
        }
    }

    fn outer_curled(&self) -> bool {
        self.ring_curled && self.pinky_curled
    }

    pub fn is_pinch_click(&self) -> bool {
        self.thumb_extended && self.index_extended && !self.middle_extended && self.outer_curled()
    }

    /// Middle finger state is irrelevant here.
    pub fn is_zoom(&self) -> bool {
        self.thumb_extended && self.index_extended && self.outer_curled()
    }

    pub fn is_swipe(&self) -> bool {
        self.index_extended && self.middle_extended && self.outer_curled()
    }

    pub fn is_drawing_pen(&self) -> bool {
        self.index_extended && !self.middle_extended && self.outer_curled()
    }

    pub fn is_thumbs_up(&self) -> bool {
        self.thumb_extended
            && self.index_curled
            && self.middle_curled
            && self.ring_curled
            && self.pinky_curled
    }

    pub fn matches(&self, pose: Pose) -> bool {
        match pose {
            Pose::PinchClick => self.is_pinch_click(),
            Pose::Zoom => self.is_zoom(),
            Pose::Swipe => self.is_swipe(),
            Pose::DrawingPen => self.is_drawing_pen(),
            Pose::ThumbsUp => self.is_thumbs_up(),
        }
    }

    /// Every composite pose currently held, in declaration order.
    pub fn poses(&self) -> Vec<Pose> {
        [
            Pose::PinchClick,
            Pose::Zoom,
            Pose::Swipe,
            Pose::DrawingPen,
            Pose::ThumbsUp,
        ]
        .into_iter()
        .filter(|p| self.matches(*p))
        .collect()
    }
}

// ── Reading ────────────────────────────────────────────────

/// Everything the state machine needs from the primary hand this frame:
/// the pose snapshot plus pixel-space measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandReading {
    pub pose: PoseSnapshot,
    /// Index fingertip in frame pixels; this is the pointer.
    pub pointer: (f32, f32),
    /// Thumb tip to index tip distance in frame pixels.
    pub pinch_distance: f32,
    /// Horizontal midpoint of the index and middle fingertips, frame pixels.
    pub swipe_x: f32,
}

impl HandReading {
    /// Read the primary hand of a frame.  `None` when no hand carries a
    /// full landmark set.
    pub fn from_frame(frame: &LandmarkFrame) -> Option<Self> {
        let hand = frame.primary_hand()?;
        let px = |l: HandLandmark| frame.to_pixels(&hand.points[l.index()]);

        let index = px(HandLandmark::IndexTip);
        let thumb = px(HandLandmark::ThumbTip);
        let middle = px(HandLandmark::MiddleTip);

        Some(Self {
            pose: PoseSnapshot::classify(hand),
            pointer: index,
            pinch_distance: (thumb.0 - index.0).hypot(thumb.1 - index.1),
            swipe_x: (index.0 + middle.0) / 2.0,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────
