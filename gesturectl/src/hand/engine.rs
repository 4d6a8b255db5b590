//! Gesture engine: predicates -> cooldown gate -> events.
//!
//! Every predicate is evaluated on every hand, in `GestureKind::ALL` order.
//! Predicates are not mutually exclusive, so one frame can fire several
//! gestures.  Cooldown and swipe state are keyed by gesture, not by hand.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::cooldown::{CooldownConfig, CooldownRegistry};
use super::gesture::{pose_present, GestureConfig, GestureKind, SwipeDirection, SwipeTracker};
use super::landmarks::{HandFrame, Landmark};

/// A gesture that passed its cooldown gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    /// When the frame that fired it was processed.
    pub timestamp: Instant,
}

/// Running counters for status reporting.
#[derive(Debug, Clone, Default)]
pub struct EngineStats {
    /// Tracker frames seen (each may hold several hands).
    pub frames: u64,
    /// Hands evaluated.
    pub hands: u64,
    /// Hands rejected as malformed.
    pub rejected_hands: u64,
    /// Predicate hits swallowed by a cooldown.
    pub suppressed: u64,
    /// Fired events per gesture.
    pub fired: HashMap<GestureKind, u64>,
}

impl EngineStats {
    pub fn total_fired(&self) -> u64 {
        self.fired.values().sum()
    }

    pub fn fired_count(&self, kind: GestureKind) -> u64 {
        self.fired.get(&kind).copied().unwrap_or(0)
    }
}

/// Central gesture recognition state.
pub struct GestureEngine {
    /// Configuration.
    pub config: GestureConfig,
    cooldowns: CooldownRegistry,
    swipe_right: SwipeTracker,
    swipe_left: SwipeTracker,
    stats: EngineStats,
}

impl GestureEngine {
    pub fn new(config: GestureConfig, cooldowns: &CooldownConfig) -> Self {
        info!(
            "Gesture engine initialized ({}x{} screen, pinch < {:.3}, swipe > {:.0}px)",
            config.screen_width, config.screen_height, config.pinch_threshold, config.swipe_threshold_px,
        );
        let o = &config.orientation;
        debug!(
            "Knuckle order: fingers {}, ok-sign {}, scroll-up {}, scroll-down {}, swipe {}, go-back {}",
            o.fingers.as_str(),
            o.ok_sign.as_str(),
            o.scroll_up.as_str(),
            o.scroll_down.as_str(),
            o.swipe.as_str(),
            o.go_back.as_str(),
        );
        Self {
            config,
            cooldowns: CooldownRegistry::new(cooldowns),
            swipe_right: SwipeTracker::new(SwipeDirection::Right),
            swipe_left: SwipeTracker::new(SwipeDirection::Left),
            stats: EngineStats::default(),
        }
    }

    /// Process every hand of one tracker frame, in order.
    ///
    /// Hands with a bad landmark count are rejected and skipped; the rest of
    /// the frame is still processed.
    pub fn process_frame(&mut self, hands: Vec<Vec<Landmark>>, now: Instant) -> Vec<GestureEvent> {
        self.stats.frames += 1;

        let mut events = Vec::new();
        for (i, landmarks) in hands.into_iter().enumerate() {
            match HandFrame::new(landmarks) {
                Ok(frame) => events.extend(self.process(&frame, now)),
                Err(e) => {
                    self.stats.rejected_hands += 1;
                    warn!("Rejected hand {} in frame {}: {}", i, self.stats.frames, e);
                }
            }
        }
        events
    }

    /// Evaluate all predicates on one hand and return the gestures that fire.
    pub fn process(&mut self, frame: &HandFrame, now: Instant) -> Vec<GestureEvent> {
        self.stats.hands += 1;

        let mut events = Vec::new();
        for kind in GestureKind::ALL {
            // Swipe trackers must see every frame, so evaluate before filtering
            if !self.detect(kind, frame) || !self.config.enabled || self.config.is_disabled(kind) {
                continue;
            }

            if self.cooldowns.can_fire(kind, now) {
                *self.stats.fired.entry(kind).or_insert(0) += 1;
                info!("Gesture detected: {}", kind);
                events.push(GestureEvent {
                    kind,
                    timestamp: now,
                });
            } else {
                self.stats.suppressed += 1;
                debug!(
                    "Gesture {} held, cooling down ({}ms left)",
                    kind,
                    self.cooldowns.remaining(kind, now).as_millis()
                );
            }
        }
        events
    }

    fn detect(&mut self, kind: GestureKind, frame: &HandFrame) -> bool {
        match kind {
            GestureKind::SwipeRight => self.swipe_right.update(frame, &self.config),
            GestureKind::SwipeLeft => self.swipe_left.update(frame, &self.config),
            _ => pose_present(kind, frame, &self.config),
        }
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn swipe_tracker(&self, direction: SwipeDirection) -> &SwipeTracker {
        match direction {
            SwipeDirection::Right => &self.swipe_right,
            SwipeDirection::Left => &self.swipe_left,
        }
    }

    /// Forget all cooldown and swipe history, as if freshly started.
    pub fn reset(&mut self) {
        self.cooldowns.reset();
        self.swipe_right.reset();
        self.swipe_left.reset();
    }

    /// Generate s-expression for the status log.
    pub fn status_sexp(&self) -> String {
        let mut fired: Vec<String> = GestureKind::ALL
            .iter()
            .filter_map(|kind| {
                self.stats
                    .fired
                    .get(kind)
                    .map(|n| format!(":{} {}", kind.as_str(), n))
            })
            .collect();
        if fired.is_empty() {
            fired.push("nil".to_string());
        }
        format!(
            "(:enabled {} :frames {} :hands {} :rejected {} :suppressed {} :fired ({}))",
            if self.config.enabled { "t" } else { "nil" },
            self.stats.frames,
            self.stats.hands,
            self.stats.rejected_hands,
            self.stats.suppressed,
            fired.join(" "),
        )
    }
}

// ── Tests ──────────────────────────────────────────────────
