//! Priority repository for database operations.

use std::fmt::Display;

use sea_orm::{EntityTrait, Value};

use super::base::{BaseRepository, Changes, Record, Relationship};
use super::error::RepositoryResult;
use crate::entities::enums::PriorityName;
use crate::entities::links::{Association, PriorityTasks};
use crate::entities::{priority, task};
use crate::storage::Session;

impl Record for priority::Entity {
    const NAME: &'static str = "Priority";
    const ID: priority::Column = priority::Column::Id;

    type Active = priority::ActiveModel;

    fn id_of(model: &priority::Model) -> i32 {
        model.id
    }
}

/// Repository for priority-related database operations.
pub struct PriorityRepository<'s> {
    base: BaseRepository<'s, priority::Entity>,
}

impl<'s> PriorityRepository<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self {
            base: BaseRepository::new(session),
        }
    }

    pub fn base(&self) -> &BaseRepository<'s, priority::Entity> {
        &self.base
    }

    pub async fn create_priorities_table(&self) -> RepositoryResult<String> {
        self.base.create_table().await
    }

    pub async fn drop_priorities_table(&self) -> RepositoryResult<String> {
        self.base.drop_table().await
    }

    pub async fn create_priority(&self, priority: priority::ActiveModel) -> RepositoryResult<priority::Model> {
        self.base.create(priority).await
    }

    pub async fn get_priority_by_id(&self, id: i32) -> RepositoryResult<Option<priority::Model>> {
        self.get_priority_by_filter(priority::Column::Id, id).await
    }

    pub async fn get_priority_by_name(&self, name: PriorityName) -> RepositoryResult<Option<priority::Model>> {
        self.get_priority_by_filter(priority::Column::PriorityName, name.as_str()).await
    }

    pub async fn get_priority_by_filter<V>(&self, column: priority::Column, value: V) -> RepositoryResult<Option<priority::Model>>
    where
        V: Into<Value> + Display,
    {
        self.base.filter_by(column, value).await
    }

    pub async fn get_random_priority(&self) -> RepositoryResult<Option<priority::Model>> {
        self.base.get_random().await
    }

    pub async fn get_priority_field<V>(
        &self,
        column: priority::Column,
        value: V,
        field: priority::Column,
    ) -> RepositoryResult<Option<serde_json::Value>>
    where
        V: Into<Value> + Display,
    {
        self.base.get_field_value(column, value, field).await
    }

    pub async fn get_all_priorities(&self) -> RepositoryResult<Option<Vec<priority::Model>>> {
        self.base.get_all().await
    }

    pub async fn get_all_priorities_by_filter<V>(
        &self,
        column: priority::Column,
        value: V,
    ) -> RepositoryResult<Option<Vec<priority::Model>>>
    where
        V: Into<Value> + Display,
    {
        self.base.get_all_by_filter(column, value).await
    }

    pub async fn get_priority_tasks<V>(&self, column: priority::Column, value: V) -> RepositoryResult<Vec<task::Model>>
    where
        V: Into<Value> + Display,
    {
        self.get_priority_relationship(column, value, PriorityTasks)
            .await
            .map(Relationship::into_many)
    }

    pub async fn get_priority_relationship<V, L>(
        &self,
        column: priority::Column,
        value: V,
        link: L,
    ) -> RepositoryResult<Relationship<<L::ToEntity as EntityTrait>::Model>>
    where
        V: Into<Value> + Display,
        L: Association<FromEntity = priority::Entity>,
        L::ToEntity: Record,
    {
        self.base.get_relationship(column, value, link).await
    }

    pub async fn update_priority_field<V>(
        &self,
        column: priority::Column,
        value: V,
        field: priority::Column,
        new_value: impl Into<Value>,
    ) -> RepositoryResult<priority::Model>
    where
        V: Into<Value> + Display,
    {
        self.base.update_field(column, value, field, new_value).await
    }

    pub async fn update_priority_fields<V>(
        &self,
        column: priority::Column,
        value: V,
        changes: Changes<priority::Entity>,
    ) -> RepositoryResult<priority::Model>
    where
        V: Into<Value> + Display,
    {
        self.base.update_fields(column, value, changes).await
    }

    pub async fn delete_priority<V>(&self, column: priority::Column, value: V) -> RepositoryResult<()>
    where
        V: Into<Value> + Display,
    {
        self.base.delete(column, value).await
    }

    pub async fn delete_all_priorities(&self) -> RepositoryResult<u64> {
        self.base.delete_all().await
    }
}
