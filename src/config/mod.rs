//! Defensive reads of the two settings that gate idle-tab release.
//!
//! Nothing here is cached: the gate asks the store every time, so a change
//! made in the host's preferences pane applies to the very next decision.

use crate::constants::{DEFAULT_DELAY_MINUTES, MS_PER_MINUTE, PREF_DELAY_MINUTES, PREF_ENABLED};
use crate::prefs::{PrefValue, PreferenceStore};
use log::{debug, error, warn};
use std::time::Duration;

/// Delay applied when the stored one is missing or unusable (1 minute).
pub const DEFAULT_DELAY_MS: u64 = DEFAULT_DELAY_MINUTES * MS_PER_MINUTE;

/// 2^64, the first float that no longer fits in a u64.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

pub struct ConfigGate<P> {
    store: P,
}

impl<P: PreferenceStore> ConfigGate<P> {
    pub fn new(store: P) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut P {
        &mut self.store
    }

    /// Enabled unless the store explicitly holds `false`.
    pub fn is_enabled(&self) -> bool {
        self.read_or(PREF_ENABLED, true, PrefValue::as_bool)
    }

    /// Idle delay in milliseconds, never below one minute.
    pub fn delay_ms(&self) -> u64 {
        self.read_or(PREF_DELAY_MINUTES, DEFAULT_DELAY_MS, minutes_to_ms)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms())
    }

    /// Read `name` and convert it with `parse`, falling back to `default`
    /// when the value is absent, rejected by `parse`, or the read fails.
    pub fn read_or<T, F>(&self, name: &str, default: T, parse: F) -> T
    where
        T: std::fmt::Debug,
        F: FnOnce(&PrefValue) -> Option<T>,
    {
        match self.store.get(name) {
            Ok(Some(value)) => match parse(&value) {
                Some(parsed) => parsed,
                None => {
                    warn!("Unusable value {value} for {name}, using default {default:?}");
                    default
                }
            },
            Ok(None) => {
                debug!("{name} is not set, using default {default:?}");
                default
            }
            Err(e) => {
                error!("Error reading {name}: {e}; using default {default:?}");
                default
            }
        }
    }
}

/// Convert a stored minute count to milliseconds. Values below one minute,
/// non-finite numbers, and anything that overflows are rejected.
pub fn minutes_to_ms(value: &PrefValue) -> Option<u64> {
    match value {
        PrefValue::Int(minutes) => {
            let minutes = u64::try_from(*minutes).ok().filter(|m| *m >= 1)?;
            minutes.checked_mul(MS_PER_MINUTE)
        }
        PrefValue::Float(minutes) => {
            if !minutes.is_finite() || *minutes < 1.0 {
                return None;
            }
            let ms = (minutes * 60_000.0).round();
            if ms >= U64_LIMIT {
                return None;
            }
            #[allow(
                clippy::as_conversions,
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "ms is finite, positive and below 2^64"
            )]
            let ms = ms as u64;
            Some(ms)
        }
        PrefValue::Bool(_) | PrefValue::Text(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPreferences;
    use crate::test_utils::FailingPreferences;

    fn gate_with(name: &str, value: PrefValue) -> ConfigGate<MemoryPreferences> {
        ConfigGate::new(MemoryPreferences::new().with(name, value))
    }

    #[test]
    fn test_enabled_defaults_to_true_when_absent() {
        let gate = ConfigGate::new(MemoryPreferences::new());
        assert!(gate.is_enabled());
    }

    #[test]
    fn test_enabled_reads_stored_bool() {
        assert!(!gate_with(PREF_ENABLED, PrefValue::Bool(false)).is_enabled());
        assert!(gate_with(PREF_ENABLED, PrefValue::Bool(true)).is_enabled());
    }

    #[test]
    fn test_enabled_ignores_non_bool_values() {
        assert!(gate_with(PREF_ENABLED, PrefValue::Int(0)).is_enabled());
        assert!(gate_with(PREF_ENABLED, PrefValue::Text("false".into())).is_enabled());
    }

    #[test]
    fn test_read_failure_fails_open() {
        let gate = ConfigGate::new(FailingPreferences);
        assert!(gate.is_enabled());
        assert_eq!(gate.delay_ms(), 60_000);
    }

    #[test]
    fn test_delay_converts_minutes() {
        assert_eq!(gate_with(PREF_DELAY_MINUTES, PrefValue::Int(2)).delay_ms(), 120_000);
        assert_eq!(gate_with(PREF_DELAY_MINUTES, PrefValue::Int(1)).delay_ms(), 60_000);
        assert_eq!(
            gate_with(PREF_DELAY_MINUTES, PrefValue::Int(5)).delay(),
            Duration::from_secs(300)
        );
    }

    #[test]
    fn test_delay_clamps_unusable_values_to_one_minute() {
        let unusable = [
            PrefValue::Int(0),
            PrefValue::Int(-3),
            PrefValue::Float(0.5),
            PrefValue::Float(f64::NAN),
            PrefValue::Text("ten".into()),
            PrefValue::Bool(true),
        ];
        for value in unusable {
            let gate = gate_with(PREF_DELAY_MINUTES, value.clone());
            assert_eq!(gate.delay_ms(), 60_000, "{value:?} should fall back to the default");
        }
    }

    #[test]
    fn test_delay_defaults_when_absent() {
        let gate = ConfigGate::new(MemoryPreferences::new());
        assert_eq!(gate.delay_ms(), DEFAULT_DELAY_MS);
    }

    #[test]
    fn test_fractional_minutes_round_to_milliseconds() {
        assert_eq!(gate_with(PREF_DELAY_MINUTES, PrefValue::Float(1.5)).delay_ms(), 90_000);
        assert_eq!(gate_with(PREF_DELAY_MINUTES, PrefValue::Float(2.0)).delay_ms(), 120_000);
    }

    #[test]
    fn test_overflowing_delay_falls_back() {
        let gate = gate_with(PREF_DELAY_MINUTES, PrefValue::Int(i64::MAX));
        assert_eq!(gate.delay_ms(), 60_000);
    }

    #[test]
    fn test_changes_apply_without_restart() {
        let mut gate = ConfigGate::new(MemoryPreferences::new());
        assert!(gate.is_enabled());

        gate.store_mut().set(PREF_ENABLED, PrefValue::Bool(false)).unwrap();
        assert!(!gate.is_enabled());

        gate.store_mut().set(PREF_DELAY_MINUTES, PrefValue::Int(3)).unwrap();
        assert_eq!(gate.delay_ms(), 180_000);
    }
}
