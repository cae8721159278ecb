//! Whole-schema setup and teardown.

use std::fmt;

use log::info;

use super::Session;
use crate::repositories::{
    PriorityRepository, RepositoryResult, RoleRepository, StatusRepository, TaskRepository, UserRepository,
};

/// One of the five tables, dispatched to its repository.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Table {
    Roles,
    Users,
    Priorities,
    Statuses,
    Tasks,
}

impl Table {
    /// Parents before the tables referencing them.
    pub const CREATION_ORDER: [Table; 5] = [
        Table::Roles,
        Table::Users,
        Table::Priorities,
        Table::Statuses,
        Table::Tasks,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Roles => "roles",
            Table::Users => "users",
            Table::Priorities => "priorities",
            Table::Statuses => "statuses",
            Table::Tasks => "tasks",
        }
    }

    pub async fn create(self, session: &Session) -> RepositoryResult<String> {
        match self {
            Table::Roles => RoleRepository::new(session).create_roles_table().await,
            Table::Users => UserRepository::new(session).create_users_table().await,
            Table::Priorities => PriorityRepository::new(session).create_priorities_table().await,
            Table::Statuses => StatusRepository::new(session).create_statuses_table().await,
            Table::Tasks => TaskRepository::new(session).create_tasks_table().await,
        }
    }

    pub async fn drop(self, session: &Session) -> RepositoryResult<String> {
        match self {
            Table::Roles => RoleRepository::new(session).drop_roles_table().await,
            Table::Users => UserRepository::new(session).drop_users_table().await,
            Table::Priorities => PriorityRepository::new(session).drop_priorities_table().await,
            Table::Statuses => StatusRepository::new(session).drop_statuses_table().await,
            Table::Tasks => TaskRepository::new(session).drop_tasks_table().await,
        }
    }

    /// Delete every row, returning how many were removed.
    pub async fn clear(self, session: &Session) -> RepositoryResult<u64> {
        match self {
            Table::Roles => RoleRepository::new(session).delete_all_roles().await,
            Table::Users => UserRepository::new(session).delete_all_users().await,
            Table::Priorities => PriorityRepository::new(session).delete_all_priorities().await,
            Table::Statuses => StatusRepository::new(session).delete_all_statuses().await,
            Table::Tasks => TaskRepository::new(session).delete_all_tasks().await,
        }
    }

    /// Whether the table currently holds no rows.
    pub async fn is_empty(self, session: &Session) -> RepositoryResult<bool> {
        let empty = match self {
            Table::Roles => RoleRepository::new(session).get_all_roles().await?.is_none(),
            Table::Users => UserRepository::new(session).get_all_users().await?.is_none(),
            Table::Priorities => PriorityRepository::new(session).get_all_priorities().await?.is_none(),
            Table::Statuses => StatusRepository::new(session).get_all_statuses().await?.is_none(),
            Table::Tasks => TaskRepository::new(session).get_all_tasks().await?.is_none(),
        };
        Ok(empty)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub async fn create_all_tables(session: &Session) -> RepositoryResult<()> {
    for table in Table::CREATION_ORDER {
        table.create(session).await?;
    }
    info!("Database schema initialized");
    Ok(())
}

/// Drop every table in reverse creation order.
pub async fn drop_all_tables(session: &Session) -> RepositoryResult<()> {
    for table in Table::CREATION_ORDER.iter().rev() {
        table.drop(session).await?;
    }
    info!("Database schema dropped");
    Ok(())
}
