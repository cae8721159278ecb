//! Database session handling and schema setup.
//!
//! A [`Session`] is the explicit handle every repository and the fixture
//! factory borrow. It owns the SeaORM connection and can be closed, after
//! which every repository call fails with a configuration error.

pub mod db;
pub mod schema;

pub use db::Session;
