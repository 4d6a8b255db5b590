//! Per-gesture firing cooldowns.
//!
//! Predicates are level-triggered: a held pose is true on every frame.  The
//! registry turns that into a rate-limited event stream.  The first
//! observation of a gesture always fires; after that a gesture fires again
//! only once its interval has elapsed.  A held pose keeps re-firing once per
//! interval.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::gesture::GestureKind;

/// Default minimum interval between two firings of a gesture.
pub fn default_interval(kind: GestureKind) -> Duration {
    let millis = match kind {
        GestureKind::OneFinger
        | GestureKind::TwoFingers
        | GestureKind::ThreeFingers
        | GestureKind::FourFingers
        | GestureKind::FiveFingers => 1000,
        GestureKind::OkSign => 300,
        GestureKind::ThumbsUp => 2000,
        GestureKind::ScrollUp => 1000,
        GestureKind::ScrollDown => 200,
        GestureKind::SwipeRight | GestureKind::SwipeLeft => 1300,
        GestureKind::GoBack => 2000,
    };
    Duration::from_millis(millis)
}

// ── Config ─────────────────────────────────────────────────

/// Minimum firing interval for every gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct CooldownConfig {
    intervals: HashMap<GestureKind, Duration>,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            intervals: GestureKind::ALL
                .iter()
                .map(|&kind| (kind, default_interval(kind)))
                .collect(),
        }
    }
}

impl CooldownConfig {
    pub fn interval(&self, kind: GestureKind) -> Duration {
        self.intervals
            .get(&kind)
            .copied()
            .unwrap_or_else(|| default_interval(kind))
    }

    pub fn set_interval(&mut self, kind: GestureKind, interval: Duration) {
        self.intervals.insert(kind, interval);
    }
}

// ── Cooldown state ─────────────────────────────────────────

/// Firing history of one gesture.
#[derive(Debug, Clone)]
pub struct CooldownState {
    /// When the gesture last fired.
    pub last_fire: Option<Instant>,
    /// Minimum time between firings.
    pub min_interval: Duration,
    /// Whether the gesture has fired at least once.
    pub has_fired_once: bool,
}

impl CooldownState {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_fire: None,
            min_interval,
            has_fired_once: false,
        }
    }

    /// Fire if allowed at `now`, recording the firing.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        if !self.has_fired_once {
            self.has_fired_once = true;
            self.last_fire = Some(now);
            return true;
        }

        let ready = match self.last_fire {
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
            None => true,
        };
        if ready {
            self.last_fire = Some(now);
        }
        ready
    }

    /// Time left before the gesture may fire again.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last_fire {
            Some(last) if self.has_fired_once => self
                .min_interval
                .saturating_sub(now.saturating_duration_since(last)),
            _ => Duration::ZERO,
        }
    }

    pub fn reset(&mut self) {
        self.last_fire = None;
        self.has_fired_once = false;
    }
}

// ── Registry ───────────────────────────────────────────────

/// One `CooldownState` per gesture, shared by every hand.
#[derive(Debug, Clone)]
pub struct CooldownRegistry {
    states: HashMap<GestureKind, CooldownState>,
}

impl Default for CooldownRegistry {
    fn default() -> Self {
        Self::new(&CooldownConfig::default())
    }
}

impl CooldownRegistry {
    pub fn new(config: &CooldownConfig) -> Self {
        Self {
            states: GestureKind::ALL
                .iter()
                .map(|&kind| (kind, CooldownState::new(config.interval(kind))))
                .collect(),
        }
    }

    /// Gate a positive predicate result.  Returns true (and records the
    /// firing) when the gesture has never fired or its interval has passed.
    pub fn can_fire(&mut self, kind: GestureKind, now: Instant) -> bool {
        self.states
            .entry(kind)
            .or_insert_with(|| CooldownState::new(default_interval(kind)))
            .try_fire(now)
    }

    pub fn state(&self, kind: GestureKind) -> Option<&CooldownState> {
        self.states.get(&kind)
    }

    /// Time left before `kind` may fire again.
    pub fn remaining(&self, kind: GestureKind, now: Instant) -> Duration {
        self.states
            .get(&kind)
            .map_or(Duration::ZERO, |state| state.remaining(now))
    }

    /// Forget all firing history.  Intervals are kept.
    pub fn reset(&mut self) {
        for state in self.states.values_mut() {
            state.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_default_intervals() {
        assert_eq!(default_interval(GestureKind::OneFinger), ms(1000));
        assert_eq!(default_interval(GestureKind::FiveFingers), ms(1000));
        assert_eq!(default_interval(GestureKind::OkSign), ms(300));
        assert_eq!(default_interval(GestureKind::ThumbsUp), ms(2000));
        assert_eq!(default_interval(GestureKind::ScrollUp), ms(1000));
        assert_eq!(default_interval(GestureKind::ScrollDown), ms(200));
        assert_eq!(default_interval(GestureKind::SwipeRight), ms(1300));
        assert_eq!(default_interval(GestureKind::SwipeLeft), ms(1300));
        assert_eq!(default_interval(GestureKind::GoBack), ms(2000));
    }

    #[test]
    fn test_first_fire_is_immediate() {
        let mut registry = CooldownRegistry::default();
        let now = Instant::now();
        for kind in GestureKind::ALL {
            assert!(registry.can_fire(kind, now), "{} should fire first time", kind);
        }
    }

    #[test]
    fn test_interval_blocks_until_elapsed() {
        let mut registry = CooldownRegistry::default();
        let t0 = Instant::now();

        assert!(registry.can_fire(GestureKind::OkSign, t0));
        assert!(!registry.can_fire(GestureKind::OkSign, t0 + ms(100)));
        assert!(!registry.can_fire(GestureKind::OkSign, t0 + ms(299)));
        assert!(registry.can_fire(GestureKind::OkSign, t0 + ms(300)), "exactly the interval fires");
        assert!(!registry.can_fire(GestureKind::OkSign, t0 + ms(400)));
        assert!(registry.can_fire(GestureKind::OkSign, t0 + ms(600)));
    }

    #[test]
    fn test_blocked_attempt_does_not_restart_interval() {
        let mut registry = CooldownRegistry::default();
        let t0 = Instant::now();
        assert!(registry.can_fire(GestureKind::ScrollUp, t0));
        assert!(!registry.can_fire(GestureKind::ScrollUp, t0 + ms(900)));
        assert!(registry.can_fire(GestureKind::ScrollUp, t0 + ms(1000)));
    }

    #[test]
    fn test_gestures_are_independent() {
        let mut registry = CooldownRegistry::default();
        let t0 = Instant::now();
        assert!(registry.can_fire(GestureKind::GoBack, t0));
        assert!(registry.can_fire(GestureKind::ScrollDown, t0 + ms(10)));
        assert!(!registry.can_fire(GestureKind::GoBack, t0 + ms(10)));
    }

    #[test]
    fn test_clock_going_backwards_blocks() {
        let mut registry = CooldownRegistry::default();
        let t0 = Instant::now() + ms(5000);
        assert!(registry.can_fire(GestureKind::ScrollDown, t0));
        assert!(!registry.can_fire(GestureKind::ScrollDown, t0 - ms(1000)));
    }

    #[test]
    fn test_remaining() {
        let mut state = CooldownState::new(ms(500));
        let t0 = Instant::now();
        assert_eq!(state.remaining(t0), Duration::ZERO);
        state.try_fire(t0);
        assert_eq!(state.remaining(t0 + ms(200)), ms(300));
        assert_eq!(state.remaining(t0 + ms(800)), Duration::ZERO);
    }

    #[test]
    fn test_custom_interval() {
        let mut config = CooldownConfig::default();
        config.set_interval(GestureKind::ThumbsUp, ms(50));
        let mut registry = CooldownRegistry::new(&config);
        let t0 = Instant::now();
        assert!(registry.can_fire(GestureKind::ThumbsUp, t0));
        assert!(registry.can_fire(GestureKind::ThumbsUp, t0 + ms(50)));
    }

    #[test]
    fn test_zero_interval_always_fires() {
        let mut config = CooldownConfig::default();
        config.set_interval(GestureKind::GoBack, Duration::ZERO);
        let mut registry = CooldownRegistry::new(&config);
        let t0 = Instant::now();
        assert!(registry.can_fire(GestureKind::GoBack, t0));
        assert!(registry.can_fire(GestureKind::GoBack, t0));
    }

    #[test]
    fn test_registry_remaining() {
        let mut registry = CooldownRegistry::default();
        let t0 = Instant::now();
        assert_eq!(registry.remaining(GestureKind::GoBack, t0), Duration::ZERO);
        registry.can_fire(GestureKind::GoBack, t0);
        assert_eq!(registry.remaining(GestureKind::GoBack, t0 + ms(500)), ms(1500));
    }

    #[test]
    fn test_reset_restores_first_fire() {
        let mut registry = CooldownRegistry::default();
        let t0 = Instant::now();
        assert!(registry.can_fire(GestureKind::GoBack, t0));
        assert!(!registry.can_fire(GestureKind::GoBack, t0 + ms(1)));

        registry.reset();
        let state = registry.state(GestureKind::GoBack).unwrap();
        assert!(!state.has_fired_once);
        assert_eq!(state.min_interval, ms(2000));
        assert!(registry.can_fire(GestureKind::GoBack, t0 + ms(2)));
    }
}
