//! Named relationship paths between entities.
//!
//! Tasks point at users twice (creator and assignee), so a plain `Related`
//! impl cannot tell the two apart. Every association is therefore spelled out
//! as a [`Linked`] path with a name and a cardinality, and the generic
//! repository resolves them uniformly.

use sea_orm::{Linked, RelationDef, RelationTrait};

use super::{priority, role, status, task, user};

/// Whether an association resolves to at most one row or to a list of rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

/// A named [`Linked`] path with a known cardinality.
pub trait Association: Linked {
    const NAME: &'static str;
    const CARDINALITY: Cardinality;
}

macro_rules! association {
    ($(#[$meta:meta])* $link:ident: $from:ident -> $to:ident, $name:literal, $cardinality:ident, $def:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $link;

        impl Linked for $link {
            type FromEntity = $from::Entity;
            type ToEntity = $to::Entity;

            fn link(&self) -> Vec<RelationDef> {
                vec![$def]
            }
        }

        impl Association for $link {
            const NAME: &'static str = $name;
            const CARDINALITY: Cardinality = Cardinality::$cardinality;
        }
    };
}

association!(
    /// Users holding a role.
    RoleUsers: role -> user, "users", Many, user::Relation::Role.def().rev()
);
association!(
    /// The role a user holds, if any.
    UserRole: user -> role, "role", One, user::Relation::Role.def()
);
association!(
    /// Tasks a user created.
    UserCreatedTasks: user -> task, "created_tasks", Many, task::Relation::Creator.def().rev()
);
association!(
    /// Tasks assigned to a user.
    UserAssignedTasks: user -> task, "assigned_tasks", Many, task::Relation::Assignee.def().rev()
);
association!(PriorityTasks: priority -> task, "tasks", Many, task::Relation::Priority.def().rev());
association!(StatusTasks: status -> task, "tasks", Many, task::Relation::Status.def().rev());
association!(TaskPriority: task -> priority, "priority", One, task::Relation::Priority.def());
association!(TaskStatus: task -> status, "status", One, task::Relation::Status.def());
association!(TaskCreator: task -> user, "creator", One, task::Relation::Creator.def());
association!(TaskAssignee: task -> user, "assignee", One, task::Relation::Assignee.def());
