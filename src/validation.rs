use crate::constants::{MIN_DELAY_MINUTES, PREFS_PREFIX, PREF_DELAY_MINUTES, PREF_ENABLED};
use crate::error::AppError;
use crate::prefs::PrefValue;
use serde_json::Value;

/// Map a preference name from the host to its full key. Both the short form
/// (`delayMinutes`) and the full `extensions.memflow.*` form are accepted.
pub fn resolve_preference(name: &str) -> Result<&'static str, AppError> {
    let short = name
        .strip_prefix(PREFS_PREFIX)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(name);
    match short {
        "enabled" => Ok(PREF_ENABLED),
        "delayMinutes" => Ok(PREF_DELAY_MINUTES),
        _ => Err(AppError::UnknownPreference { name: name.to_string() }),
    }
}

/// Validate the enabled flag. Only real booleans are accepted.
pub fn validate_enabled(value: &Value) -> Result<bool, AppError> {
    value.as_bool().ok_or_else(|| AppError::InvalidInput {
        field: "enabled",
        reason: format!("expected true or false, got {value}"),
    })
}

/// Normalize a delay typed into the preferences pane. Like the pane, only the
/// leading integer counts (`"12abc"` is 12, `2.5` is 2); anything without one,
/// or below one minute, becomes one minute.
pub fn normalize_delay_minutes(value: &Value) -> PrefValue {
    let text = match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    };

    match text.as_deref().and_then(leading_integer) {
        Some(minutes) if minutes >= MIN_DELAY_MINUTES => PrefValue::Int(minutes),
        Some(_) | None => PrefValue::Int(MIN_DELAY_MINUTES),
    }
}

/// Parse an optionally signed run of decimal digits at the start of `text`.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let sign_len = text.len() - unsigned.len();
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    text.get(..sign_len + digits)?.parse().ok()
}

/// Turn a `set_preference` request into the key and value to store.
pub fn preference_value(name: &str, value: &Value) -> Result<(&'static str, PrefValue), AppError> {
    let key = resolve_preference(name)?;
    if key == PREF_ENABLED {
        Ok((key, PrefValue::Bool(validate_enabled(value)?)))
    } else {
        Ok((key, normalize_delay_minutes(value)))
    }
}
