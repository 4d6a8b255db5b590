//! Hand landmark data structures.
//!
//! Models the 21 landmarks per hand reported by the external hand tracker
//! (MediaPipe Hands numbering).  Coordinates are normalized to the camera
//! frame: `x` grows to the right, `y` grows downward.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Landmark definitions ───────────────────────────────────

/// The 21 hand landmarks, in tracker index order.
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

/// Total number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

impl HandLandmark {
    /// Middle knuckle, used as the palm center.
    pub const PALM_CENTER: HandLandmark = HandLandmark::MiddleMcp;

    /// Convert landmark enum to array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Fingertip landmarks, thumb first.
    pub fn fingertips() -> [HandLandmark; 5] {
        [
            Self::ThumbTip,
            Self::IndexTip,
            Self::MiddleTip,
            Self::RingTip,
            Self::PinkyTip,
        ]
    }
}

// ── Landmark ───────────────────────────────────────────────

/// A single tracked point in normalized frame coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Relative depth; unused by the 2D predicates.
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }
}

// ── Hand frame ─────────────────────────────────────────────

/// Reasons a tracker sample is rejected before any predicate sees it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("expected {LANDMARK_COUNT} landmarks, got {0}")]
    WrongLandmarkCount(usize),

    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// One detected hand in one camera frame: exactly 21 landmarks.
#[derive(Debug, Clone, PartialEq)]
pub struct HandFrame {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandFrame {
    /// Validate a tracker sample.  Anything other than 21 finite points is
    /// rejected so predicates can index landmarks unconditionally.
    pub fn new(landmarks: Vec<Landmark>) -> Result<Self, FrameError> {
        if let Some(index) = landmarks
            .iter()
            .position(|l| !l.x.is_finite() || !l.y.is_finite())
        {
            return Err(FrameError::NonFinite { index });
        }
        let landmarks: [Landmark; LANDMARK_COUNT] = landmarks
            .try_into()
            .map_err(|v: Vec<Landmark>| FrameError::WrongLandmarkCount(v.len()))?;
        Ok(Self { landmarks })
    }

    /// Position of a landmark.
    pub fn point(&self, landmark: HandLandmark) -> Landmark {
        self.landmarks[landmark.index()]
    }

    /// All landmarks in tracker index order.
    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }
}

impl TryFrom<Vec<Landmark>> for HandFrame {
    type Error = FrameError;

    fn try_from(landmarks: Vec<Landmark>) -> Result<Self, Self::Error> {
        Self::new(landmarks)
    }
}

// ── Test helpers ───────────────────────────────────────────

/// A frame with every landmark at the center of the image.
#[cfg(test)]
pub(crate) fn make_frame() -> HandFrame {
    HandFrame {
        landmarks: [Landmark::new(0.5, 0.5); LANDMARK_COUNT],
    }
}

#[cfg(test)]
pub(crate) fn set_landmark(frame: &mut HandFrame, landmark: HandLandmark, x: f32, y: f32) {
    frame.landmarks[landmark.index()] = Landmark::new(x, y);
}

#[cfg(test)]
pub(crate) fn set_y(frame: &mut HandFrame, landmark: HandLandmark, y: f32) {
    frame.landmarks[landmark.index()].y = y;
}

#[cfg(test)]
pub(crate) fn set_x(frame: &mut HandFrame, landmark: HandLandmark, x: f32) {
    frame.landmarks[landmark.index()].x = x;
}

// ── Tests ──────────────────────────────────────────────────
