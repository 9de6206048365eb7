// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "siftql";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "siftql.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "SIFTQL_CONFIG";

// =============================================================================
// Environment Variables - Logging
// =============================================================================

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "SIFTQL_LOG";

/// Log filter used when neither `SIFTQL_LOG` nor `RUST_LOG` is set
pub const DEFAULT_LOG_FILTER: &str = "info,siftql=info";

// =============================================================================
// Environment Variables - Translation
// =============================================================================

/// Environment variable for the translation target
///
/// Values: `postgres`, `sqlite`, `document`
pub const ENV_TARGET: &str = "SIFTQL_TARGET";

/// Environment variable for the unknown enumeration literal policy
///
/// Values: `null` (the literal matches nothing), `reject` (fail the translation)
pub const ENV_UNKNOWN_ENUM: &str = "SIFTQL_UNKNOWN_ENUM";
