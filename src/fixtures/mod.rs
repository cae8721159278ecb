//! Randomized, referentially consistent test data.
//!
//! [`FixtureFactory`] fabricates rows whose foreign keys point at rows that
//! already exist, and [`Harness`] wraps a throwaway database with on-demand
//! fixtures and guaranteed teardown.

pub mod factory;
pub mod fake;
pub mod harness;

pub use factory::FixtureFactory;
pub use harness::{Harness, TEARDOWN_ORDER};

use crate::repositories::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("Cannot reference a random {entity}: no {entity} rows exist yet")]
    MissingParent { entity: &'static str },

    #[error("Failed to hash fixture password: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type FixtureResult<T> = Result<T, FixtureError>;
