//! Gesture predicates over hand landmark frames.
//!
//! Each predicate answers "is this pose present in this frame".  All of
//! them are stateless except the horizontal swipes, which remember the
//! previous middle-fingertip position in a `SwipeTracker`.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use super::geometry::{
    distance_2d, finger_extended, finger_folded, has_knuckle_order, is_above, Finger,
    FingerStates, KnuckleOrder,
};
use super::landmarks::{HandFrame, HandLandmark};

// ── Gesture kinds ──────────────────────────────────────────

/// Recognized gestures, in evaluation priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// Exactly one finger raised.
    OneFinger,
    TwoFingers,
    ThreeFingers,
    FourFingers,
    /// All five fingers raised.
    FiveFingers,
    /// Thumb and index tips pinched, other fingers raised.
    OkSign,
    /// Thumb raised above a closed fist.
    ThumbsUp,
    /// Index finger up, the rest down.
    ScrollUp,
    /// Index finger drooping below the wrist.
    ScrollDown,
    /// Index and middle fingers up, moving right.
    SwipeRight,
    /// Index and middle fingers up, moving left.
    SwipeLeft,
    /// Fist with the thumb splayed left.
    GoBack,
}

impl GestureKind {
    /// Every gesture in the order the engine evaluates them.
    pub const ALL: [GestureKind; 12] = [
        Self::OneFinger,
        Self::TwoFingers,
        Self::ThreeFingers,
        Self::FourFingers,
        Self::FiveFingers,
        Self::OkSign,
        Self::ThumbsUp,
        Self::ScrollUp,
        Self::ScrollDown,
        Self::SwipeRight,
        Self::SwipeLeft,
        Self::GoBack,
    ];

    /// Canonical name, used in logs and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneFinger => "fingers-1",
            Self::TwoFingers => "fingers-2",
            Self::ThreeFingers => "fingers-3",
            Self::FourFingers => "fingers-4",
            Self::FiveFingers => "fingers-5",
            Self::OkSign => "ok-sign",
            Self::ThumbsUp => "thumbs-up",
            Self::ScrollUp => "scroll-up",
            Self::ScrollDown => "scroll-down",
            Self::SwipeRight => "swipe-right",
            Self::SwipeLeft => "swipe-left",
            Self::GoBack => "go-back",
        }
    }

    /// Target finger count for the counting gestures.
    pub fn finger_count(&self) -> Option<usize> {
        match self {
            Self::OneFinger => Some(1),
            Self::TwoFingers => Some(2),
            Self::ThreeFingers => Some(3),
            Self::FourFingers => Some(4),
            Self::FiveFingers => Some(5),
            _ => None,
        }
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown gesture: {0}")]
pub struct ParseGestureError(pub String);

impl FromStr for GestureKind {
    type Err = ParseGestureError;

    /// Accepts canonical names and the alternate names of the LinkedIn
    /// mapping (`single-tap`, `like`, `point-down`, `scroll-left`,
    /// `fingers-up-N`).  `_` and `-` are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches(':').to_ascii_lowercase().replace('_', "-");
        let kind = match name.as_str() {
            "fingers-1" | "fingers-up-1" => Self::OneFinger,
            "fingers-2" | "fingers-up-2" => Self::TwoFingers,
            "fingers-3" | "fingers-up-3" => Self::ThreeFingers,
            "fingers-4" | "fingers-up-4" => Self::FourFingers,
            "fingers-5" | "fingers-up-5" => Self::FiveFingers,
            "ok-sign" | "single-tap" => Self::OkSign,
            "thumbs-up" | "like" => Self::ThumbsUp,
            "scroll-up" => Self::ScrollUp,
            "scroll-down" | "point-down" => Self::ScrollDown,
            "swipe-right" => Self::SwipeRight,
            "swipe-left" | "scroll-left" => Self::SwipeLeft,
            "go-back" => Self::GoBack,
            _ => return Err(ParseGestureError(s.to_string())),
        };
        Ok(kind)
    }
}

// ── Config ─────────────────────────────────────────────────

/// Knuckle order each gesture family requires.
///
/// The families disagree on purpose: the counting and two-finger poses are
/// made with one side of the hand towards the camera, the pinch and fist
/// poses with the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientations {
    pub fingers: KnuckleOrder,
    pub ok_sign: KnuckleOrder,
    pub scroll_up: KnuckleOrder,
    pub scroll_down: KnuckleOrder,
    pub swipe: KnuckleOrder,
    pub go_back: KnuckleOrder,
}

impl Default for Orientations {
    fn default() -> Self {
        Self {
            fingers: KnuckleOrder::IndexRightOfPinky,
            ok_sign: KnuckleOrder::IndexLeftOfPinky,
            scroll_up: KnuckleOrder::IndexRightOfPinky,
            scroll_down: KnuckleOrder::IndexLeftOfPinky,
            swipe: KnuckleOrder::IndexRightOfPinky,
            go_back: KnuckleOrder::IndexLeftOfPinky,
        }
    }
}

/// Calibration for gesture recognition.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Enable gesture recognition.
    pub enabled: bool,
    /// Maximum thumb-tip to index-tip distance (normalized) for the OK sign.
    pub pinch_threshold: f32,
    /// Minimum horizontal travel (screen pixels) between two frames for a swipe.
    pub swipe_threshold_px: f32,
    /// Screen width in pixels; scales normalized x for swipe travel.
    pub screen_width: u32,
    /// Screen height in pixels.
    pub screen_height: u32,
    /// Required knuckle order per gesture family.
    pub orientation: Orientations,
    /// Gestures that are evaluated but never fire.
    pub disabled: HashSet<GestureKind>,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pinch_threshold: 0.05,
            swipe_threshold_px: 75.0,
            screen_width: 1920,
            screen_height: 1080,
            orientation: Orientations::default(),
            disabled: HashSet::new(),
        }
    }
}

impl GestureConfig {
    pub fn is_disabled(&self, kind: GestureKind) -> bool {
        self.disabled.contains(&kind)
    }
}

// ── Stateless predicates ───────────────────────────────────

/// Exactly `expected` of the five fingers extended.  A closed hand never
/// matches, not even for `expected == 0`.
pub fn fingers_up(frame: &HandFrame, expected: usize, order: KnuckleOrder) -> bool {
    if !has_knuckle_order(frame, order) {
        return false;
    }
    let count = FingerStates::of(frame).count();
    count > 0 && count == expected
}

/// Thumb and index tips pinched together, the other three fingers raised,
/// every fingertip above the wrist.
pub fn ok_sign(frame: &HandFrame, order: KnuckleOrder, pinch_threshold: f32) -> bool {
    if !has_knuckle_order(frame, order) {
        return false;
    }

    let pinch = distance_2d(
        frame.point(HandLandmark::ThumbTip),
        frame.point(HandLandmark::IndexTip),
    );
    let others_extended = [Finger::Middle, Finger::Ring, Finger::Pinky]
        .iter()
        .all(|&f| finger_extended(frame, f));
    let tips_above_wrist = HandLandmark::fingertips()
        .iter()
        .all(|&tip| is_above(frame, tip, HandLandmark::Wrist));

    pinch < pinch_threshold && others_extended && tips_above_wrist
}

/// Thumb raised, everything else below the thumb's MCP joint.
///
/// Single pass in landmark order: bail out as soon as any landmark past the
/// thumb rises above the thumb MCP, or if the thumb MCP sits below the
/// wrist.  Only the pinky tip can accept.
pub fn thumbs_up(frame: &HandFrame) -> bool {
    let wrist = frame.point(HandLandmark::Wrist);
    let thumb_joint = frame.point(HandLandmark::ThumbMcp);
    let last_thumb = HandLandmark::ThumbTip.index();
    let pinky_tip = HandLandmark::PinkyTip.index();

    for (i, landmark) in frame.landmarks().iter().enumerate() {
        if i > last_thumb && landmark.y < thumb_joint.y {
            return false;
        }
        if thumb_joint.y > wrist.y {
            return false;
        }
        if i == pinky_tip && landmark.y > thumb_joint.y {
            return true;
        }
    }
    false
}

/// Index finger up, middle, ring and pinky down.
pub fn scroll_up(frame: &HandFrame, order: KnuckleOrder) -> bool {
    has_knuckle_order(frame, order)
        && FingerStates::of(frame).fingers() == [true, false, false, false]
}

/// Index finger folded and its tip below the wrist.
pub fn scroll_down(frame: &HandFrame, order: KnuckleOrder) -> bool {
    if !has_knuckle_order(frame, order) {
        return false;
    }
    let index_tip = frame.point(HandLandmark::IndexTip);
    let wrist = frame.point(HandLandmark::Wrist);
    finger_folded(frame, Finger::Index) && index_tip.y > wrist.y
}

/// Four fingers folded, thumb tip left of both its IP joint and the palm.
pub fn go_back(frame: &HandFrame, order: KnuckleOrder) -> bool {
    if !has_knuckle_order(frame, order) {
        return false;
    }
    let fingers_closed = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky]
        .iter()
        .all(|&f| finger_folded(frame, f));

    let thumb_tip = frame.point(HandLandmark::ThumbTip);
    let thumb_open_left = thumb_tip.x < frame.point(HandLandmark::ThumbIp).x
        && thumb_tip.x < frame.point(HandLandmark::PALM_CENTER).x;

    fingers_closed && thumb_open_left
}

/// Evaluate a stateless gesture.  Swipes are stateful and always report
/// `false` here; use a `SwipeTracker`.
pub fn pose_present(kind: GestureKind, frame: &HandFrame, config: &GestureConfig) -> bool {
    let orientation = &config.orientation;
    match kind {
        GestureKind::OneFinger
        | GestureKind::TwoFingers
        | GestureKind::ThreeFingers
        | GestureKind::FourFingers
        | GestureKind::FiveFingers => kind
            .finger_count()
            .is_some_and(|n| fingers_up(frame, n, orientation.fingers)),
        GestureKind::OkSign => ok_sign(frame, orientation.ok_sign, config.pinch_threshold),
        GestureKind::ThumbsUp => thumbs_up(frame),
        GestureKind::ScrollUp => scroll_up(frame, orientation.scroll_up),
        GestureKind::ScrollDown => scroll_down(frame, orientation.scroll_down),
        GestureKind::GoBack => go_back(frame, orientation.go_back),
        GestureKind::SwipeRight | GestureKind::SwipeLeft => false,
    }
}

// ── Swipe tracking ─────────────────────────────────────────

/// Horizontal direction of a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn gesture(&self) -> GestureKind {
        match self {
            Self::Left => GestureKind::SwipeLeft,
            Self::Right => GestureKind::SwipeRight,
        }
    }
}

/// Frame-to-frame state for one swipe direction.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    direction: SwipeDirection,
    /// Middle fingertip x (screen pixels) in the previous valid frame.
    previous_x: Option<f32>,
}

impl SwipeTracker {
    pub fn new(direction: SwipeDirection) -> Self {
        Self {
            direction,
            previous_x: None,
        }
    }

    pub fn direction(&self) -> SwipeDirection {
        self.direction
    }

    pub fn previous_x(&self) -> Option<f32> {
        self.previous_x
    }

    pub fn reset(&mut self) {
        self.previous_x = None;
    }

    /// Feed one frame.  Returns true when the middle fingertip travelled
    /// more than the threshold in this tracker's direction since the last
    /// valid frame.
    ///
    /// The baseline is dropped whenever the two-finger pose is not held, so
    /// travel is only measured between consecutive valid frames.  The first
    /// valid frame after a reset only records the baseline.
    pub fn update(&mut self, frame: &HandFrame, config: &GestureConfig) -> bool {
        let pose_held = has_knuckle_order(frame, config.orientation.swipe)
            && FingerStates::of(frame).fingers() == [true, true, false, false];
        if !pose_held {
            if self.previous_x.take().is_some() {
                debug!("{} baseline reset", self.direction.gesture());
            }
            return false;
        }

        let current_x = frame.point(HandLandmark::MiddleTip).x * config.screen_width as f32;
        let Some(previous_x) = self.previous_x.replace(current_x) else {
            return false;
        };

        let travel = match self.direction {
            SwipeDirection::Right => current_x - previous_x,
            SwipeDirection::Left => previous_x - current_x,
        };
        travel > config.swipe_threshold_px
    }
}

// ── Test poses ─────────────────────────────────────────────


// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::landmarks::{make_frame, set_landmark, set_x, set_y};

    const RIGHT: KnuckleOrder = KnuckleOrder::IndexRightOfPinky;
    const LEFT: KnuckleOrder = KnuckleOrder::IndexLeftOfPinky;

    fn swipe_config() -> GestureConfig {
        GestureConfig {
            screen_width: 1000,
            ..GestureConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = GestureConfig::default();
        assert!(config.enabled);
        assert_eq!(config.pinch_threshold, 0.05);
        assert_eq!(config.swipe_threshold_px, 75.0);
        assert!(config.disabled.is_empty());
    }

    #[test]
    fn test_default_orientations_are_asymmetric() {
        let o = Orientations::default();
        assert_eq!(o.fingers, RIGHT);
        assert_eq!(o.scroll_up, RIGHT);
        assert_eq!(o.swipe, RIGHT);
        assert_eq!(o.ok_sign, LEFT);
        assert_eq!(o.scroll_down, LEFT);
        assert_eq!(o.go_back, LEFT);
    }

    // ── Finger counting ─────────────────────────────────────

    #[test]
    fn test_three_fingers_matches_only_three() {
        let frame = poses::fingers([true, true, false, false, true]);
        for expected in 0..=5 {
            assert_eq!(
                fingers_up(&frame, expected, RIGHT),
                expected == 3,
                "three raised fingers vs target {}",
                expected,
            );
        }
    }

    #[test]
    fn test_fingers_each_count() {
        let patterns = [
            [true, false, false, false, false],
            [true, true, false, false, false],
            [true, true, true, false, false],
            [true, true, true, true, false],
            [true, true, true, true, true],
        ];
        for (i, up) in patterns.iter().enumerate() {
            let frame = poses::fingers(*up);
            assert!(fingers_up(&frame, i + 1, RIGHT), "pattern {:?}", up);
        }
    }

    #[test]
    fn test_closed_hand_matches_nothing() {
        let frame = poses::fingers([false; 5]);
        for expected in 0..=5 {
            assert!(!fingers_up(&frame, expected, RIGHT), "target {}", expected);
        }
    }

    #[test]
    fn test_fingers_wrong_orientation() {
        let mut frame = poses::fingers([true, false, false, false, false]);
        poses::index_left(&mut frame);
        assert!(!fingers_up(&frame, 1, RIGHT));
    }

    #[test]
    fn test_thumb_counts_toward_fingers() {
        let frame = poses::fingers([false, false, false, false, true]);
        assert!(fingers_up(&frame, 1, RIGHT));
    }

    // ── OK sign ─────────────────────────────────────────────

    #[test]
    fn test_ok_sign_detected() {
        assert!(ok_sign(&poses::ok_sign(), LEFT, 0.05));
    }

    #[test]
    fn test_ok_sign_rejects_open_pinch() {
        let mut frame = poses::ok_sign();
        set_landmark(&mut frame, HandLandmark::IndexTip, 0.55, 0.41);
        assert!(!ok_sign(&frame, LEFT, 0.05));
        // A looser threshold accepts the same frame
        assert!(ok_sign(&frame, LEFT, 0.2));
    }

    #[test]
    fn test_ok_sign_requires_raised_fingers() {
        let mut frame = poses::ok_sign();
        set_y(&mut frame, HandLandmark::RingTip, 0.7);
        assert!(!ok_sign(&frame, LEFT, 0.05));
    }

    #[test]
    fn test_ok_sign_requires_tips_above_wrist() {
        let mut frame = poses::ok_sign();
        set_y(&mut frame, HandLandmark::Wrist, 0.35);
        assert!(!ok_sign(&frame, LEFT, 0.05));
    }

    #[test]
    fn test_ok_sign_wrong_orientation() {
        let mut frame = poses::ok_sign();
        poses::index_right(&mut frame);
        assert!(!ok_sign(&frame, LEFT, 0.05));
    }

    // ── Thumbs up ───────────────────────────────────────────

    #[test]
    fn test_thumbs_up_detected() {
        assert!(thumbs_up(&poses::thumbs_up()));
    }

    #[test]
    fn test_thumbs_up_rejects_raised_finger() {
        let mut frame = poses::thumbs_up();
        set_y(&mut frame, HandLandmark::IndexTip, 0.35);
        assert!(!thumbs_up(&frame));
    }

    #[test]
    fn test_thumbs_up_rejects_thumb_below_wrist() {
        let mut frame = poses::thumbs_up();
        set_y(&mut frame, HandLandmark::Wrist, 0.3);
        assert!(!thumbs_up(&frame));
    }

    #[test]
    fn test_thumbs_up_ignores_thumb_landmarks() {
        // Landmarks 1-4 may sit anywhere; only fingers past the thumb disqualify
        let mut frame = poses::thumbs_up();
        set_y(&mut frame, HandLandmark::ThumbCmc, 0.1);
        assert!(thumbs_up(&frame));
    }

    #[test]
    fn test_thumbs_up_not_matched_by_other_poses() {
        assert!(!thumbs_up(&poses::go_back()));
        assert!(!thumbs_up(&poses::ok_sign()));
        assert!(!thumbs_up(&poses::scroll_down()));
        assert!(!thumbs_up(&poses::swipe(0.5)));
    }

    #[test]
    fn test_thumbs_up_measures_from_thumb_mcp() {
        // Index tip between the MCP (2) and IP (3) joints: above the MCP, so out
        let mut frame = poses::thumbs_up();
        set_y(&mut frame, HandLandmark::IndexTip, 0.35);
        assert!(!thumbs_up(&frame));

        // Moving the IP joint below every finger changes nothing
        let mut frame = poses::thumbs_up();
        set_y(&mut frame, HandLandmark::ThumbIp, 0.9);
        assert!(thumbs_up(&frame));
    }

    #[test]
    fn test_thumbs_up_pinky_level_with_thumb_rejects() {
        let mut frame = poses::thumbs_up();
        set_y(&mut frame, HandLandmark::PinkyTip, 0.4);
        assert!(!thumbs_up(&frame), "acceptance needs the pinky strictly below");
    }

    // ── Scroll ──────────────────────────────────────────────

    #[test]
    fn test_scroll_up_detected() {
        assert!(scroll_up(&poses::scroll_up(), RIGHT));
    }

    #[test]
    fn test_scroll_up_rejects_two_fingers() {
        let frame = poses::fingers([true, true, false, false, false]);
        assert!(!scroll_up(&frame, RIGHT));
    }

    #[test]
    fn test_scroll_up_wrong_orientation() {
        assert!(!scroll_up(&poses::scroll_up(), LEFT));
    }

    #[test]
    fn test_scroll_down_detected() {
        assert!(scroll_down(&poses::scroll_down(), LEFT));
    }

    #[test]
    fn test_scroll_down_needs_tip_below_wrist() {
        let mut frame = poses::scroll_down();
        set_y(&mut frame, HandLandmark::Wrist, 0.9);
        assert!(!scroll_down(&frame, LEFT));
    }

    #[test]
    fn test_scroll_down_needs_folded_index() {
        let mut frame = poses::scroll_down();
        set_y(&mut frame, HandLandmark::IndexPip, 0.85);
        assert!(!scroll_down(&frame, LEFT));
    }

    // ── Go back ─────────────────────────────────────────────

    #[test]
    fn test_go_back_detected() {
        assert!(go_back(&poses::go_back(), LEFT));
    }

    #[test]
    fn test_go_back_each_condition() {
        let mut frame = poses::go_back();
        poses::index_right(&mut frame);
        assert!(!go_back(&frame, LEFT), "orientation");

        let mut frame = poses::go_back();
        set_y(&mut frame, HandLandmark::RingTip, 0.3);
        assert!(!go_back(&frame, LEFT), "ring finger raised");

        let mut frame = poses::go_back();
        set_x(&mut frame, HandLandmark::ThumbTip, 0.45);
        assert!(!go_back(&frame, LEFT), "thumb tip right of its IP joint");

        let mut frame = poses::go_back();
        set_x(&mut frame, HandLandmark::PALM_CENTER, 0.25);
        assert!(!go_back(&frame, LEFT), "thumb tip right of the palm center");
    }

    // ── pose_present ────────────────────────────────────────

    #[test]
    fn test_pose_present_routes_by_kind() {
        let config = GestureConfig::default();
        assert!(pose_present(GestureKind::TwoFingers, &poses::fingers([true, true, false, false, false]), &config));
        assert!(pose_present(GestureKind::OkSign, &poses::ok_sign(), &config));
        assert!(pose_present(GestureKind::ThumbsUp, &poses::thumbs_up(), &config));
        assert!(pose_present(GestureKind::ScrollUp, &poses::scroll_up(), &config));
        assert!(pose_present(GestureKind::ScrollDown, &poses::scroll_down(), &config));
        assert!(pose_present(GestureKind::GoBack, &poses::go_back(), &config));
        assert!(!pose_present(GestureKind::SwipeRight, &poses::swipe(0.9), &config));
    }

    #[test]
    fn test_pose_present_respects_orientation_override() {
        let mut config = GestureConfig::default();
        let mut frame = poses::scroll_up();
        poses::index_left(&mut frame);
        assert!(!pose_present(GestureKind::ScrollUp, &frame, &config));

        config.orientation.scroll_up = LEFT;
        assert!(pose_present(GestureKind::ScrollUp, &frame, &config));
    }

    #[test]
    fn test_neutral_frame_matches_nothing() {
        let config = GestureConfig::default();
        let frame = make_frame();
        for kind in GestureKind::ALL {
            assert!(!pose_present(kind, &frame, &config), "{} on neutral frame", kind);
        }
    }

    // ── Swipes ──────────────────────────────────────────────

    #[test]
    fn test_swipe_right_fires_on_second_frame() {
        let config = swipe_config();
        let mut tracker = SwipeTracker::new(SwipeDirection::Right);
        assert!(!tracker.update(&poses::swipe(0.1), &config), "first frame is a baseline");
        assert!(tracker.update(&poses::swipe(0.2), &config));
    }

    #[test]
    fn test_swipe_left_fires_on_second_frame() {
        let config = swipe_config();
        let mut tracker = SwipeTracker::new(SwipeDirection::Left);
        assert!(!tracker.update(&poses::swipe(0.2), &config));
        assert!(tracker.update(&poses::swipe(0.1), &config));
    }

    #[test]
    fn test_swipe_below_threshold() {
        let config = swipe_config();
        let mut tracker = SwipeTracker::new(SwipeDirection::Right);
        tracker.update(&poses::swipe(0.10), &config);
        assert!(!tracker.update(&poses::swipe(0.16), &config), "60px is not enough");
        // Baseline advanced to 160px, so 240px is 80px of travel
        assert!(tracker.update(&poses::swipe(0.24), &config));
    }

    #[test]
    fn test_swipe_wrong_direction() {
        let config = swipe_config();
        let mut tracker = SwipeTracker::new(SwipeDirection::Right);
        tracker.update(&poses::swipe(0.5), &config);
        assert!(!tracker.update(&poses::swipe(0.1), &config));
        assert!((tracker.previous_x().unwrap() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_swipe_invalid_frame_resets_baseline() {
        let config = swipe_config();
        let mut tracker = SwipeTracker::new(SwipeDirection::Right);
        tracker.update(&poses::swipe(0.1), &config);
        assert!(tracker.previous_x().is_some());

        let mut turned = poses::swipe(0.15);
        poses::index_left(&mut turned);
        assert!(!tracker.update(&turned, &config));
        assert!(tracker.previous_x().is_none(), "orientation change clears baseline");

        assert!(!tracker.update(&poses::swipe(0.2), &config), "new baseline only");
    }

    #[test]
    fn test_swipe_wrong_fingers_resets_baseline() {
        let config = swipe_config();
        let mut tracker = SwipeTracker::new(SwipeDirection::Left);
        tracker.update(&poses::swipe(0.5), &config);
        tracker.update(&poses::fingers([true, true, true, false, false]), &config);
        assert!(tracker.previous_x().is_none());
        assert!(!tracker.update(&poses::swipe(0.1), &config));
    }

    #[test]
    fn test_swipe_threshold_configurable() {
        let config = GestureConfig {
            swipe_threshold_px: 150.0,
            ..swipe_config()
        };
        let mut tracker = SwipeTracker::new(SwipeDirection::Right);
        tracker.update(&poses::swipe(0.1), &config);
        assert!(!tracker.update(&poses::swipe(0.2), &config));
    }

    // ── Names ───────────────────────────────────────────────

    #[test]
    fn test_gesture_kind_round_trip_names() {
        for kind in GestureKind::ALL {
            assert_eq!(kind.as_str().parse::<GestureKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_gesture_kind_aliases() {
        assert_eq!("single_tap".parse(), Ok(GestureKind::OkSign));
        assert_eq!("like".parse(), Ok(GestureKind::ThumbsUp));
        assert_eq!("point_down".parse(), Ok(GestureKind::ScrollDown));
        assert_eq!("scroll_left".parse(), Ok(GestureKind::SwipeLeft));
        assert_eq!("fingers_up_3".parse(), Ok(GestureKind::ThreeFingers));
        assert_eq!(":go-back".parse(), Ok(GestureKind::GoBack));
        assert_eq!(
            "wave".parse::<GestureKind>(),
            Err(ParseGestureError("wave".to_string()))
        );
    }

    #[test]
    fn test_finger_count() {
        assert_eq!(GestureKind::OneFinger.finger_count(), Some(1));
        assert_eq!(GestureKind::FiveFingers.finger_count(), Some(5));
        assert_eq!(GestureKind::GoBack.finger_count(), None);
    }

    #[test]
    fn test_swipe_direction_gesture() {
        assert_eq!(SwipeDirection::Left.gesture(), GestureKind::SwipeLeft);
        assert_eq!(SwipeDirection::Right.gesture(), GestureKind::SwipeRight);
    }
}
