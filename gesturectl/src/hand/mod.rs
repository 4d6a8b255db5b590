//! Hand subsystem: landmark frames in, debounced gesture events out.
//!
//! Provides:
//! - `landmarks`: 21-point hand frames and validation
//! - `geometry`: finger extension, knuckle order, distances
//! - `gesture`: per-gesture predicates and swipe tracking
//! - `cooldown`: per-gesture firing intervals
//! - `engine`: ties predicates and cooldowns into an event stream

pub mod cooldown;
pub mod engine;
pub mod geometry;
pub mod gesture;
pub mod landmarks;

pub use engine::{GestureEngine, GestureEvent};
pub use gesture::GestureKind;
