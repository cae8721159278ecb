//! Task repository for database operations.

use std::fmt::Display;

use sea_orm::{EntityTrait, Value};

use super::base::{BaseRepository, Changes, Record, Relationship};
use super::error::RepositoryResult;
use crate::entities::links::{Association, TaskAssignee, TaskCreator, TaskPriority, TaskStatus};
use crate::entities::{priority, status, task, user};
use crate::storage::Session;

impl Record for task::Entity {
    const NAME: &'static str = "Task";
    const ID: task::Column = task::Column::Id;

    type Active = task::ActiveModel;

    fn id_of(model: &task::Model) -> i32 {
        model.id
    }
}

/// Repository for task-related database operations.
pub struct TaskRepository<'s> {
    base: BaseRepository<'s, task::Entity>,
}

impl<'s> TaskRepository<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self {
            base: BaseRepository::new(session),
        }
    }

    pub fn base(&self) -> &BaseRepository<'s, task::Entity> {
        &self.base
    }

    pub async fn create_tasks_table(&self) -> RepositoryResult<String> {
        self.base.create_table().await
    }

    pub async fn drop_tasks_table(&self) -> RepositoryResult<String> {
        self.base.drop_table().await
    }

    pub async fn create_task(&self, task: task::ActiveModel) -> RepositoryResult<task::Model> {
        self.base.create(task).await
    }

    pub async fn get_task_by_id(&self, id: i32) -> RepositoryResult<Option<task::Model>> {
        self.get_task_by_filter(task::Column::Id, id).await
    }

    pub async fn get_task_by_title(&self, title: &str) -> RepositoryResult<Option<task::Model>> {
        self.get_task_by_filter(task::Column::Title, title).await
    }

    pub async fn get_task_by_filter<V>(&self, column: task::Column, value: V) -> RepositoryResult<Option<task::Model>>
    where
        V: Into<Value> + Display,
    {
        self.base.filter_by(column, value).await
    }

    pub async fn get_random_task(&self) -> RepositoryResult<Option<task::Model>> {
        self.base.get_random().await
    }

    pub async fn get_task_field<V>(
        &self,
        column: task::Column,
        value: V,
        field: task::Column,
    ) -> RepositoryResult<Option<serde_json::Value>>
    where
        V: Into<Value> + Display,
    {
        self.base.get_field_value(column, value, field).await
    }

    pub async fn get_all_tasks(&self) -> RepositoryResult<Option<Vec<task::Model>>> {
        self.base.get_all().await
    }

    pub async fn get_all_tasks_by_filter<V>(
        &self,
        column: task::Column,
        value: V,
    ) -> RepositoryResult<Option<Vec<task::Model>>>
    where
        V: Into<Value> + Display,
    {
        self.base.get_all_by_filter(column, value).await
    }

    pub async fn get_task_priority<V>(&self, column: task::Column, value: V) -> RepositoryResult<Option<priority::Model>>
    where
        V: Into<Value> + Display,
    {
        self.get_task_relationship(column, value, TaskPriority)
            .await
            .map(Relationship::into_one)
    }

    pub async fn get_task_status<V>(&self, column: task::Column, value: V) -> RepositoryResult<Option<status::Model>>
    where
        V: Into<Value> + Display,
    {
        self.get_task_relationship(column, value, TaskStatus)
            .await
            .map(Relationship::into_one)
    }

    pub async fn get_task_creator<V>(&self, column: task::Column, value: V) -> RepositoryResult<Option<user::Model>>
    where
        V: Into<Value> + Display,
    {
        self.get_task_relationship(column, value, TaskCreator)
            .await
            .map(Relationship::into_one)
    }

    /// The assigned user, if the task has one.
    pub async fn get_task_assignee<V>(&self, column: task::Column, value: V) -> RepositoryResult<Option<user::Model>>
    where
        V: Into<Value> + Display,
    {
        self.get_task_relationship(column, value, TaskAssignee)
            .await
            .map(Relationship::into_one)
    }

    pub async fn get_task_relationship<V, L>(
        &self,
        column: task::Column,
        value: V,
        link: L,
    ) -> RepositoryResult<Relationship<<L::ToEntity as EntityTrait>::Model>>
    where
        V: Into<Value> + Display,
        L: Association<FromEntity = task::Entity>,
        L::ToEntity: Record,
    {
        self.base.get_relationship(column, value, link).await
    }

    pub async fn update_task_field<V>(
        &self,
        column: task::Column,
        value: V,
        field: task::Column,
        new_value: impl Into<Value>,
    ) -> RepositoryResult<task::Model>
    where
        V: Into<Value> + Display,
    {
        self.base.update_field(column, value, field, new_value).await
    }

    pub async fn update_task_fields<V>(
        &self,
        column: task::Column,
        value: V,
        changes: Changes<task::Entity>,
    ) -> RepositoryResult<task::Model>
    where
        V: Into<Value> + Display,
    {
        self.base.update_fields(column, value, changes).await
    }

    pub async fn delete_task<V>(&self, column: task::Column, value: V) -> RepositoryResult<()>
    where
        V: Into<Value> + Display,
    {
        self.base.delete(column, value).await
    }

    pub async fn delete_all_tasks(&self) -> RepositoryResult<u64> {
        self.base.delete_all().await
    }
}
