//! Geometry queries over a single hand frame.
//!
//! All tests are in image space (y grows downward), so "above" means a
//! smaller `y`.

use super::landmarks::{HandFrame, HandLandmark, Landmark};

/// Horizontal order of the index and pinky knuckles (landmarks 5 and 17).
///
/// This is the only orientation signal available.  Gestures disagree about
/// which order means "back of hand towards the camera", so each gesture
/// states the order it needs instead of sharing one flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnuckleOrder {
    /// `index_mcp.x < pinky_mcp.x`
    IndexLeftOfPinky,
    /// `index_mcp.x > pinky_mcp.x`
    IndexRightOfPinky,
}

impl KnuckleOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IndexLeftOfPinky => "index-left",
            Self::IndexRightOfPinky => "index-right",
        }
    }
}

/// Knuckle order of a frame, or `None` when both knuckles share an `x`.
pub fn knuckle_order(frame: &HandFrame) -> Option<KnuckleOrder> {
    let index = frame.point(HandLandmark::IndexMcp).x;
    let pinky = frame.point(HandLandmark::PinkyMcp).x;
    if index < pinky {
        Some(KnuckleOrder::IndexLeftOfPinky)
    } else if index > pinky {
        Some(KnuckleOrder::IndexRightOfPinky)
    } else {
        None
    }
}

/// Strict comparison of the knuckle order against what a gesture requires.
pub fn has_knuckle_order(frame: &HandFrame, required: KnuckleOrder) -> bool {
    knuckle_order(frame) == Some(required)
}

/// Back of the hand towards the camera, by the finger-counting convention
/// (index knuckle right of the pinky knuckle in the mirrored image).
pub fn is_back_of_hand_facing_camera(frame: &HandFrame) -> bool {
    has_knuckle_order(frame, KnuckleOrder::IndexRightOfPinky)
}

// ── Fingers ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub fn tip(&self) -> HandLandmark {
        match self {
            Self::Thumb => HandLandmark::ThumbTip,
            Self::Index => HandLandmark::IndexTip,
            Self::Middle => HandLandmark::MiddleTip,
            Self::Ring => HandLandmark::RingTip,
            Self::Pinky => HandLandmark::PinkyTip,
        }
    }

    /// The joint two below the tip (thumb IP, finger PIP).
    pub fn second_joint(&self) -> HandLandmark {
        match self {
            Self::Thumb => HandLandmark::ThumbIp,
            Self::Index => HandLandmark::IndexPip,
            Self::Middle => HandLandmark::MiddlePip,
            Self::Ring => HandLandmark::RingPip,
            Self::Pinky => HandLandmark::PinkyPip,
        }
    }
}

/// Whether a finger is extended.
///
/// Fingers count as extended when the tip is above the second joint.  The
/// thumb extends sideways, so it is extended when its tip is right of its
/// IP joint.
pub fn finger_extended(frame: &HandFrame, finger: Finger) -> bool {
    let tip = frame.point(finger.tip());
    let base = frame.point(finger.second_joint());
    match finger {
        Finger::Thumb => tip.x > base.x,
        _ => tip.y < base.y,
    }
}

/// Whether a (non-thumb) finger is folded: tip strictly below the second
/// joint.  Not the same as `!finger_extended` when the two are level.
pub fn finger_folded(frame: &HandFrame, finger: Finger) -> bool {
    frame.point(finger.tip()).y > frame.point(finger.second_joint()).y
}

/// Whether `a` lies above `b` in image space.
pub fn is_above(frame: &HandFrame, a: HandLandmark, b: HandLandmark) -> bool {
    frame.point(a).y < frame.point(b).y
}

/// Euclidean distance in normalized (x, y) space.
pub fn distance_2d(a: Landmark, b: Landmark) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

// ── Finger states ──────────────────────────────────────────

/// Extension state of all five fingers in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerStates {
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
    pub thumb: bool,
}

impl FingerStates {
    pub fn of(frame: &HandFrame) -> Self {
        Self {
            index: finger_extended(frame, Finger::Index),
            middle: finger_extended(frame, Finger::Middle),
            ring: finger_extended(frame, Finger::Ring),
            pinky: finger_extended(frame, Finger::Pinky),
            thumb: finger_extended(frame, Finger::Thumb),
        }
    }

    /// Number of extended fingers, thumb included.
    pub fn count(&self) -> usize {
        [self.index, self.middle, self.ring, self.pinky, self.thumb]
            .iter()
            .filter(|&&up| up)
            .count()
    }

    /// Extension pattern of the four fingers (index, middle, ring, pinky).
    pub fn fingers(&self) -> [bool; 4] {
        [self.index, self.middle, self.ring, self.pinky]
    }
}
