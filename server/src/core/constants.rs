// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "Rowgate";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "rowgate";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".rowgate";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "rowgate.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "ROWGATE_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "ROWGATE_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "ROWGATE_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "ROWGATE_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 4000;

/// Default request body limit (the API takes no bodies, keep it small)
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "ROWGATE_DATA_DIR";

/// Environment variable for the SQLite database file
pub const ENV_DATABASE: &str = "ROWGATE_DATABASE";

/// Environment variable for the dataset table name
pub const ENV_TABLE: &str = "ROWGATE_TABLE";

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename (inside the data directory)
pub const SQLITE_DB_FILENAME: &str = "rowgate.db";

/// Default connection pool size
pub const SQLITE_DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default time a request waits for a pooled connection
pub const SQLITE_DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Default SQLite busy timeout
pub const SQLITE_DEFAULT_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -16000 = 16MB)
pub const SQLITE_CACHE_SIZE: &str = "-16000";

/// Pages between automatic WAL checkpoints
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// Interval between background WAL checkpoints
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Dataset
// =============================================================================

/// Default dataset table
pub const DEFAULT_TABLE: &str = "electric_cars";

/// Primary key column every row exposes
pub const PRIMARY_KEY_COLUMN: &str = "id";

/// Columns the free-text search term is matched against
pub const SEARCHABLE_COLUMNS: &[&str] = &["Brand", "Model"];

// =============================================================================
// Filters
// =============================================================================

/// Maximum size of filter JSON in bytes (64KB)
pub const MAX_FILTER_JSON_SIZE: usize = 64 * 1024;

/// Maximum number of filters per request
pub const MAX_FILTERS: usize = 50;

/// Maximum length of a row id path segment
pub const MAX_ID_LENGTH: usize = 256;
