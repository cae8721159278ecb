//! SeaORM entity models for the five tables, plus the fixed value sets and
//! the named relationship links between them.

pub mod enums;
pub mod links;
pub mod priority;
pub mod role;
pub mod status;
pub mod task;
pub mod user;

pub use priority::Entity as Priority;
pub use role::Entity as Role;
pub use status::Entity as Status;
pub use task::Entity as Task;
pub use user::Entity as User;
