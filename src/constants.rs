//! Constants used throughout the crate
//!
//! Column length limits mirror the schema so the fake data generators never
//! produce values the database would reject.

use log::LevelFilter;

// Column limits
pub const USERNAME_MAX_LEN: usize = 20;
pub const NAME_MAX_LEN: usize = 255;
pub const EMAIL_MAX_LEN: usize = 255;
pub const TASK_TITLE_MAX_LEN: usize = 50;
pub const TASK_DESCRIPTION_MAX_LEN: usize = 255;

// Fixtures
pub const FIXTURE_PASSWORD_LEN: usize = 16;
pub const DEFAULT_BATCH_SIZE: usize = 3;
pub const MIN_PERMISSIONS: usize = 1;
pub const MAX_PERMISSIONS: usize = 4;

// Database
pub const SQLITE_MEMORY_URL: &str = "sqlite::memory:";
pub const SQL_LOG_LEVEL: LevelFilter = LevelFilter::Debug;
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

// Logging
pub const DEFAULT_LOGGER_NAME: &str = "database_tests";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Configuration
pub const CONFIG_FILE_NAME: &str = "taskdb.toml";
pub const CONFIG_DIR_NAME: &str = "taskdb";
pub const CONFIG_GENERATED: &str = "Configuration file generated";
