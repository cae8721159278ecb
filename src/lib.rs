//! taskdb - generic repositories and random fixtures over a task schema
//!
//! The crate models users, roles, priorities, statuses and tasks as SeaORM
//! entities and exposes one generic repository that every per-entity
//! repository wraps. A fixture factory fills the schema with random but
//! referentially consistent rows, and a harness gives each test its own
//! database with guaranteed teardown.
//!
//! # Modules
//!
//! * [`config`] - Settings from TOML and the environment
//! * [`entities`] - SeaORM entity models and named relationship links
//! * [`storage`] - Database session and schema setup
//! * [`repositories`] - Generic and per-entity data access
//! * [`fixtures`] - Random row generation and the per-test harness

/// Configuration module for connection and logging settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// SeaORM entity models for database tables
pub mod entities;

/// Fixture factory and test harness
pub mod fixtures;

/// Logging setup on top of `log` and `fern`
pub mod logger;

/// Repository layer for database operations
pub mod repositories;

/// Database session handling and schema setup
pub mod storage;

pub use entities::{priority, role, status, task, user};
