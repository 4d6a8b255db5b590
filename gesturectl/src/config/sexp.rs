//! Plist helpers over `lexpr::Value`.
//!
//! Keys may be written as keywords (`#:key`) or as symbols with a leading
//! colon (`:key`); the default `lexpr` parser produces the latter.

use lexpr::Value;

/// Name of a plist key, without the leading colon.
pub fn key_name(value: &Value) -> Option<&str> {
    match value {
        Value::Keyword(k) => Some(&**k),
        Value::Symbol(s) => s.strip_prefix(':'),
        _ => None,
    }
}

/// Look up the value stored under `key` in a plist.
pub fn get_value<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = value;
    while let Value::Cons(pair) = current {
        if key_name(pair.car()) == Some(key) {
            // Value is the car of the next cons cell
            return match pair.cdr() {
                Value::Cons(next) => Some(next.car()),
                _ => None,
            };
        }
        current = pair.cdr();
    }
    None
}

/// Extract a value from a plist as a string.
pub fn get_keyword(value: &Value, key: &str) -> Option<String> {
    let val = get_value(value, key)?;
    Some(match val {
        Value::Keyword(v) => v.to_string(),
        Value::Symbol(v) => v.strip_prefix(':').unwrap_or(v).to_string(),
        Value::String(v) => v.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => (if *b { "t" } else { "nil" }).to_string(),
        Value::Null | Value::Nil => "nil".to_string(),
        _ => val.to_string(),
    })
}

/// Extract a string value from an s-expression plist.
pub fn get_string(value: &Value, key: &str) -> Option<String> {
    get_keyword(value, key)
}

/// Extract a boolean value from an s-expression plist.
/// Treats "t" as true, "nil" as false.
pub fn get_bool(value: &Value, key: &str) -> Option<bool> {
    get_keyword(value, key).map(|s| s != "nil" && s != "#f" && s != "false")
}

/// Split a plist into (key, value) pairs, in order.
pub fn plist_entries(value: &Value) -> Result<Vec<(String, &Value)>, String> {
    let items = list_items(value);
    if items.len() % 2 != 0 {
        return Err(format!("odd number of plist elements in {}", value));
    }
    items
        .chunks(2)
        .map(|pair| match key_name(pair[0]) {
            Some(k) => Ok((k.to_string(), pair[1])),
            None => Err(format!("expected a :key, found {}", pair[0])),
        })
        .collect()
}

/// Elements of a proper list.  Anything that is not a list yields nothing.
pub fn list_items(value: &Value) -> Vec<&Value> {
    let mut items = Vec::new();
    let mut current = value;
    while let Value::Cons(pair) = current {
        items.push(pair.car());
        current = pair.cdr();
    }
    items
}

/// Numeric value of an integer or float atom.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Name of a symbol, keyword or string atom, without a leading colon.
pub fn symbol_name(value: &Value) -> Option<String> {
    match value {
        Value::Symbol(s) => Some(s.strip_prefix(':').unwrap_or(s).to_string()),
        Value::Keyword(k) => Some(k.to_string()),
        Value::String(s) => Some(s.to_string()),
        _ => None,
    }
}
