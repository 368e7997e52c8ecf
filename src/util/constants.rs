// SocLookup - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.
// Config values are validated against these bounds at load time.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "SocLookup";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "SocLookup";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Search history
// =============================================================================

/// Default number of search records kept in history.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Minimum sensible history bound (a zero-length history is meaningless).
pub const MIN_MAX_HISTORY: usize = 1;

/// Hard upper bound on the history size (prevents configuration mistakes).
pub const ABSOLUTE_MAX_HISTORY: usize = 1_000;

/// Number of most-recent records checked for a duplicate `(value, type)`
/// before a repeat search is moved to the top instead of appended.
pub const HISTORY_DEDUP_WINDOW: usize = 5;

/// Default number of records returned by `HistoryStore::recent`.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

// =============================================================================
// Batch mode
// =============================================================================

/// Default maximum number of lines processed per batch.
pub const DEFAULT_MAX_BATCH_ITEMS: usize = 20;

/// Minimum value for the batch item limit.
pub const MIN_MAX_BATCH_ITEMS: usize = 1;

/// Hard upper bound on batch size. Every item launches several browser tabs.
pub const ABSOLUTE_MAX_BATCH_ITEMS: usize = 500;

/// Default pause between batch items, in milliseconds.
pub const DEFAULT_BATCH_DELAY_MS: u64 = 500;

/// Hard upper bound on the inter-item pause, in milliseconds.
pub const MAX_BATCH_DELAY_MS: u64 = 10_000;

/// Granularity of the throttle sleep. The cancel flag is re-checked after
/// each slice so a cancel request never waits for the full delay.
pub const BATCH_SLEEP_SLICE_MS: u64 = 50;

// =============================================================================
// Classification
// =============================================================================

/// Reason attached to `ClassificationOutcome::Invalid` when no rule matches.
pub const UNRECOGNIZED_FORMAT: &str = "unrecognized format";

/// Exact length of a hex-encoded SHA-256 digest.
pub const SHA256_HEX_LEN: usize = 64;

/// Placeholder token substituted into service URL templates.
pub const URL_PLACEHOLDER: &str = "{value}";

// =============================================================================
// Persistence keys
// =============================================================================

/// Store key for the `service id -> enabled` override map.
pub const STORE_KEY_SERVICES: &str = "enabledServices";

/// Store key for the persisted search history.
pub const STORE_KEY_HISTORY: &str = "searchHistory";

/// File extension used by the file-backed key/value store.
pub const STORE_FILE_EXTENSION: &str = "json";

// =============================================================================
// Export
// =============================================================================

/// Timestamp format used in CSV history exports (local time).
pub const CSV_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header row of the CSV history export.
pub const HISTORY_CSV_HEADER: [&str; 3] = ["Timestamp", "Type", "Value"];

/// Header row of the CSV batch validation report.
pub const VALIDATION_CSV_HEADER: [&str; 4] = ["Index", "Value", "Status", "Error"];

// =============================================================================
// Configuration
// =============================================================================

/// Config file name, looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default log level when neither RUST_LOG, --debug nor config set one.
pub const DEFAULT_LOG_LEVEL: &str = "info";
