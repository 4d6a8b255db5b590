//! Runtime configuration.
//!
//! Defaults are the calibrated values the engine ships with.  An optional
//! s-expression plist file overrides any subset of them:
//!
//! ```lisp
//! (:screen-width 1920 :screen-height 1080
//!  :pinch-threshold 0.05 :swipe-threshold-px 75
//!  :cooldowns (:fingers-1 1.0 :ok-sign 0.3)
//!  :actions (:go-back (:tap (90 150))
//!            :thumbs-up (:tap (540 1200) :delay-ms 500 :then (:tap (108 2183))))
//!  :disabled (go-back)
//!  :orientation (:swipe index-left)
//!  :adb-path "adb" :adb-serial "emulator-5554")
//! ```

pub mod sexp;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lexpr::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::action::{Action, ActionCommand, ActionTable};
use crate::hand::cooldown::CooldownConfig;
use crate::hand::geometry::KnuckleOrder;
use crate::hand::gesture::{GestureConfig, GestureKind, ParseGestureError};
use sexp::{as_number, get_bool, get_string, get_value, list_items, plist_entries, symbol_name};

const KNOWN_KEYS: &[&str] = &[
    "enabled",
    "screen-width",
    "screen-height",
    "pinch-threshold",
    "swipe-threshold-px",
    "cooldowns",
    "actions",
    "disabled",
    "orientation",
    "adb-path",
    "adb-serial",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(String),

    #[error(transparent)]
    UnknownGesture(#[from] ParseGestureError),

    #[error("invalid :{key}: {reason}")]
    Invalid { key: String, reason: String },
}

fn invalid(key: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// How to reach the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdbConfig {
    /// adb executable.
    pub program: String,
    /// Target device serial (`adb -s`); `None` lets adb pick.
    pub serial: Option<String>,
}

impl Default for AdbConfig {
    fn default() -> Self {
        Self {
            program: "adb".to_string(),
            serial: None,
        }
    }
}

/// Everything the process needs besides the frame stream.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub gesture: GestureConfig,
    pub cooldowns: CooldownConfig,
    pub actions: ActionTable,
    pub adb: AdbConfig,
}

impl Config {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_sexp(&text)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse a config plist on top of the defaults.
    pub fn from_sexp(text: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if text.trim().is_empty() {
            return Ok(config);
        }
        let value = lexpr::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if !matches!(value, Value::Cons(_)) {
            return Err(ConfigError::Parse(format!("expected a plist, found {}", value)));
        }
        for (key, _) in plist_entries(&value).map_err(ConfigError::Parse)? {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                warn!("Ignoring unknown config key :{}", key);
            }
        }

        if let Some(enabled) = get_bool(&value, "enabled") {
            config.gesture.enabled = enabled;
        }
        if let Some(v) = get_value(&value, "screen-width") {
            config.gesture.screen_width = positive_u32("screen-width", v)?;
        }
        if let Some(v) = get_value(&value, "screen-height") {
            config.gesture.screen_height = positive_u32("screen-height", v)?;
        }
        if let Some(v) = get_value(&value, "pinch-threshold") {
            config.gesture.pinch_threshold = non_negative("pinch-threshold", v)? as f32;
        }
        if let Some(v) = get_value(&value, "swipe-threshold-px") {
            config.gesture.swipe_threshold_px = non_negative("swipe-threshold-px", v)? as f32;
        }
        if let Some(v) = get_value(&value, "cooldowns") {
            parse_cooldowns(v, &mut config.cooldowns)?;
        }
        if let Some(v) = get_value(&value, "actions") {
            parse_actions(v, &mut config.actions)?;
        }
        if let Some(v) = get_value(&value, "disabled") {
            for item in list_value("disabled", v)? {
                let name = symbol_name(item).ok_or_else(|| {
                    invalid("disabled", format!("expected a gesture name, found {}", item))
                })?;
                config.gesture.disabled.insert(name.parse()?);
            }
        }
        if let Some(v) = get_value(&value, "orientation") {
            parse_orientation(v, &mut config.gesture)?;
        }
        if let Some(program) = get_string(&value, "adb-path") {
            config.adb.program = program;
        }
        if let Some(v) = get_value(&value, "adb-serial") {
            config.adb.serial = if is_nil(v) {
                None
            } else {
                get_string(&value, "adb-serial")
            };
        }
        config.validate()?;
        Ok(config)
    }

    /// Check values that command-line overrides may also have touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gesture.screen_width == 0 {
            return Err(invalid("screen-width", "must be positive"));
        }
        if self.gesture.screen_height == 0 {
            return Err(invalid("screen-height", "must be positive"));
        }
        let pinch = self.gesture.pinch_threshold;
        if !pinch.is_finite() || pinch < 0.0 {
            return Err(invalid("pinch-threshold", "must be a non-negative number"));
        }
        let swipe = self.gesture.swipe_threshold_px;
        if !swipe.is_finite() || swipe < 0.0 {
            return Err(invalid("swipe-threshold-px", "must be a non-negative number"));
        }
        Ok(())
    }

    /// Effective configuration as an s-expression, for the startup log.
    pub fn config_sexp(&self) -> String {
        let cooldowns: Vec<String> = GestureKind::ALL
            .iter()
            .map(|&kind| {
                format!(":{} {:.1}", kind.as_str(), self.cooldowns.interval(kind).as_secs_f64())
            })
            .collect();
        let mut disabled: Vec<&str> = GestureKind::ALL
            .iter()
            .filter(|kind| self.gesture.is_disabled(**kind))
            .map(|kind| kind.as_str())
            .collect();
        if disabled.is_empty() {
            disabled.push("nil");
        }
        format!(
            "(:enabled {} :screen-width {} :screen-height {} :pinch-threshold {:.3} \
             :swipe-threshold-px {:.0} :cooldowns ({}) :disabled ({}) :actions {} \
             :adb-path \"{}\" :adb-serial {})",
            if self.gesture.enabled { "t" } else { "nil" },
            self.gesture.screen_width,
            self.gesture.screen_height,
            self.gesture.pinch_threshold,
            self.gesture.swipe_threshold_px,
            cooldowns.join(" "),
            disabled.join(" "),
            self.actions.len(),
            self.adb.program,
            self.adb
                .serial
                .as_ref()
                .map(|s| format!("\"{}\"", s))
                .unwrap_or_else(|| "nil".to_string()),
        )
    }
}

// ── Value parsing ──────────────────────────────────────────

fn is_nil(value: &Value) -> bool {
    matches!(value, Value::Nil | Value::Null | Value::Bool(false))
        || symbol_name(value).as_deref() == Some("nil")
}

/// Elements of a list-valued key; `nil` is the empty list.
fn list_value<'a>(key: &str, value: &'a Value) -> Result<Vec<&'a Value>, ConfigError> {
    match value {
        Value::Cons(_) => Ok(list_items(value)),
        _ if is_nil(value) => Ok(Vec::new()),
        _ => Err(invalid(key, format!("expected a list, found {}", value))),
    }
}

/// Entries of a plist-valued key; `nil` is the empty plist.
fn plist_value<'a>(key: &str, value: &'a Value) -> Result<Vec<(String, &'a Value)>, ConfigError> {
    list_value(key, value)?;
    plist_entries(value).map_err(ConfigError::Parse)
}

fn non_negative(key: &str, value: &Value) -> Result<f64, ConfigError> {
    match as_number(value) {
        Some(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(invalid(key, format!("expected a non-negative number, found {}", value))),
    }
}

fn positive_u32(key: &str, value: &Value) -> Result<u32, ConfigError> {
    match as_number(value) {
        Some(n) if n.fract() == 0.0 && n >= 1.0 && n <= u32::MAX as f64 => Ok(n as u32),
        _ => Err(invalid(key, format!("expected a positive integer, found {}", value))),
    }
}

fn coordinates<const N: usize>(key: &str, value: &Value) -> Result<[i32; N], ConfigError> {
    let items = list_items(value);
    if items.len() != N {
        return Err(invalid(key, format!("expected {} coordinates, found {}", N, value)));
    }
    let mut out = [0i32; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = match as_number(item) {
            Some(n) if n.fract() == 0.0 && n >= i32::MIN as f64 && n <= i32::MAX as f64 => n as i32,
            _ => return Err(invalid(key, format!("bad coordinate {}", item))),
        };
    }
    Ok(out)
}

fn parse_cooldowns(value: &Value, cooldowns: &mut CooldownConfig) -> Result<(), ConfigError> {
    for (name, secs) in plist_value("cooldowns", value)? {
        let kind: GestureKind = name.parse()?;
        let secs = non_negative(&format!("cooldowns :{}", name), secs)?;
        cooldowns.set_interval(kind, Duration::from_millis((secs * 1000.0).round() as u64));
    }
    Ok(())
}

fn parse_actions(value: &Value, actions: &mut ActionTable) -> Result<(), ConfigError> {
    for (name, binding) in plist_value("actions", value)? {
        let kind: GestureKind = name.parse()?;
        if is_nil(binding) {
            actions.unbind(kind);
            continue;
        }
        actions.bind(kind, parse_action(&format!("actions :{}", name), binding)?);
    }
    Ok(())
}

/// `(:tap (X Y))` or `(:swipe (X1 Y1 X2 Y2) :duration-ms N)`, optionally
/// followed by `:delay-ms N :then (...)`.
fn parse_action(key: &str, value: &Value) -> Result<ActionCommand, ConfigError> {
    let action = if let Some(coords) = get_value(value, "tap") {
        let [x, y] = coordinates::<2>(key, coords)?;
        Action::Tap { x, y }
    } else if let Some(coords) = get_value(value, "swipe") {
        let [x1, y1, x2, y2] = coordinates::<4>(key, coords)?;
        let duration_ms = get_value(value, "duration-ms")
            .map(|v| non_negative(key, v).map(|ms| ms.round() as u32))
            .transpose()?;
        Action::Swipe {
            x1,
            y1,
            x2,
            y2,
            duration_ms,
        }
    } else {
        return Err(invalid(key, "expected :tap or :swipe"));
    };

    let mut command = ActionCommand::new(action);
    if let Some(next) = get_value(value, "then") {
        let delay_ms = get_value(value, "delay-ms")
            .map(|v| non_negative(key, v))
            .transpose()?
            .unwrap_or(0.0);
        command = command.followed_by(
            Duration::from_millis(delay_ms.round() as u64),
            parse_action(key, next)?,
        );
    }
    Ok(command)
}

fn parse_orientation(value: &Value, gesture: &mut GestureConfig) -> Result<(), ConfigError> {
    for (family, order) in plist_value("orientation", value)? {
        let key = format!("orientation :{}", family);
        let order = match symbol_name(order).as_deref() {
            Some("index-left") => KnuckleOrder::IndexLeftOfPinky,
            Some("index-right") => KnuckleOrder::IndexRightOfPinky,
            _ => return Err(invalid(&key, "expected index-left or index-right")),
        };
        let slot = match family.as_str() {
            "fingers" => &mut gesture.orientation.fingers,
            "ok-sign" => &mut gesture.orientation.ok_sign,
            "scroll-up" => &mut gesture.orientation.scroll_up,
            "scroll-down" => &mut gesture.orientation.scroll_down,
            "swipe" => &mut gesture.orientation.swipe,
            "go-back" => &mut gesture.orientation.go_back,
            _ => return Err(invalid(&key, "unknown gesture family")),
        };
        *slot = order;
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────
