//! Shared setup for the integration tests.
//!
//! Every test gets its own in-memory database through [`Harness`], so tests
//! never see each other's rows.

#![allow(dead_code)]

use std::sync::Once;

use taskdb::config::LoggingConfig;
use taskdb::fixtures::Harness;
use taskdb::logger;

static LOGGING: Once = Once::new();

/// Install the logger once per test binary, at `LOG_LEVEL` or warn.
pub fn init_logging() {
    LOGGING.call_once(|| {
        let config = LoggingConfig {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
            ..LoggingConfig::default()
        };
        let _ = logger::init(&config);
    });
}

/// Fresh harness with every table created and no rows.
pub async fn harness() -> Harness {
    init_logging();
    Harness::new().await.expect("failed to create test harness")
}

/// Harness holding a superuser plus one batch of every entity.
pub async fn seeded_harness() -> Harness {
    let harness = harness().await;
    harness.superuser().await.expect("superuser fixture");
    harness.roles().await.expect("roles fixture");
    harness.users().await.expect("users fixture");
    harness.priorities().await.expect("priorities fixture");
    harness.statuses().await.expect("statuses fixture");
    harness.tasks().await.expect("tasks fixture");
    harness
}
