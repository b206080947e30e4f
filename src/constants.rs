// src/constants.rs

/// Preference branch shared with the host plugin.
pub const PREFS_PREFIX: &str = "extensions.memflow";

/// Whether idle tabs are released at all.
pub const PREF_ENABLED: &str = "extensions.memflow.enabled";

/// Idle delay before release, in minutes.
pub const PREF_DELAY_MINUTES: &str = "extensions.memflow.delayMinutes";

/// Milliseconds in one minute (60 * 1000)
pub const MS_PER_MINUTE: u64 = 60_000;

/// Delay used when the stored value is missing or unusable.
pub const DEFAULT_DELAY_MINUTES: u64 = 1;

/// Delay seeded into a fresh preference database.
pub const SEEDED_DELAY_MINUTES: i64 = 5;

/// Smallest delay the host may store, in minutes.
pub const MIN_DELAY_MINUTES: i64 = 1;

/// Only readers of this type are released.
pub const ELIGIBLE_READER_TYPE: &str = "pdf";

/// Native messaging caps a single message at 1MB (1024 * 1024 bytes)
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;
