//! Repository layer for database operations.
//!
//! [`BaseRepository`] holds every persistence operation once, generically over
//! the entity type. The per-entity repositories wrap it with named methods,
//! natural-key lookups and typed relationship getters, and add no behaviour of
//! their own.

pub mod base;
pub mod error;
pub mod priority;
pub mod role;
pub mod status;
pub mod task;
pub mod user;

pub use base::{BaseRepository, Changes, Record, Relationship};
pub use error::{RepositoryError, RepositoryResult};
pub use priority::PriorityRepository;
pub use role::RoleRepository;
pub use status::StatusRepository;
pub use task::TaskRepository;
pub use user::UserRepository;
