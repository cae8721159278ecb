//! Status repository for database operations.

use std::fmt::Display;

use sea_orm::{EntityTrait, Value};

use super::base::{BaseRepository, Changes, Record, Relationship};
use super::error::RepositoryResult;
use crate::entities::enums::StatusName;
use crate::entities::links::{Association, StatusTasks};
use crate::entities::{status, task};
use crate::storage::Session;

impl Record for status::Entity {
    const NAME: &'static str = "Status";
    const ID: status::Column = status::Column::Id;

    type Active = status::ActiveModel;

    fn id_of(model: &status::Model) -> i32 {
        model.id
    }
}

/// Repository for status-related database operations.
pub struct StatusRepository<'s> {
    base: BaseRepository<'s, status::Entity>,
}

impl<'s> StatusRepository<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self {
            base: BaseRepository::new(session),
        }
    }

    pub fn base(&self) -> &BaseRepository<'s, status::Entity> {
        &self.base
    }

    pub async fn create_statuses_table(&self) -> RepositoryResult<String> {
        self.base.create_table().await
    }

    pub async fn drop_statuses_table(&self) -> RepositoryResult<String> {
        self.base.drop_table().await
    }

    pub async fn create_status(&self, status: status::ActiveModel) -> RepositoryResult<status::Model> {
        self.base.create(status).await
    }

    pub async fn get_status_by_id(&self, id: i32) -> RepositoryResult<Option<status::Model>> {
        self.get_status_by_filter(status::Column::Id, id).await
    }

    pub async fn get_status_by_name(&self, name: StatusName) -> RepositoryResult<Option<status::Model>> {
        self.get_status_by_filter(status::Column::StatusName, name.as_str()).await
    }

    pub async fn get_status_by_filter<V>(&self, column: status::Column, value: V) -> RepositoryResult<Option<status::Model>>
    where
        V: Into<Value> + Display,
    {
        self.base.filter_by(column, value).await
    }

    pub async fn get_random_status(&self) -> RepositoryResult<Option<status::Model>> {
        self.base.get_random().await
    }

    pub async fn get_status_field<V>(
        &self,
        column: status::Column,
        value: V,
        field: status::Column,
    ) -> RepositoryResult<Option<serde_json::Value>>
    where
        V: Into<Value> + Display,
    {
        self.base.get_field_value(column, value, field).await
    }

    pub async fn get_all_statuses(&self) -> RepositoryResult<Option<Vec<status::Model>>> {
        self.base.get_all().await
    }

    pub async fn get_all_statuses_by_filter<V>(
        &self,
        column: status::Column,
        value: V,
    ) -> RepositoryResult<Option<Vec<status::Model>>>
    where
        V: Into<Value> + Display,
    {
        self.base.get_all_by_filter(column, value).await
    }

    pub async fn get_status_tasks<V>(&self, column: status::Column, value: V) -> RepositoryResult<Vec<task::Model>>
    where
        V: Into<Value> + Display,
    {
        self.get_status_relationship(column, value, StatusTasks)
            .await
            .map(Relationship::into_many)
    }

    pub async fn get_status_relationship<V, L>(
        &self,
        column: status::Column,
        value: V,
        link: L,
    ) -> RepositoryResult<Relationship<<L::ToEntity as EntityTrait>::Model>>
    where
        V: Into<Value> + Display,
        L: Association<FromEntity = status::Entity>,
        L::ToEntity: Record,
    {
        self.base.get_relationship(column, value, link).await
    }

    pub async fn update_status_field<V>(
        &self,
        column: status::Column,
        value: V,
        field: status::Column,
        new_value: impl Into<Value>,
    ) -> RepositoryResult<status::Model>
    where
        V: Into<Value> + Display,
    {
        self.base.update_field(column, value, field, new_value).await
    }

    pub async fn update_status_fields<V>(
        &self,
        column: status::Column,
        value: V,
        changes: Changes<status::Entity>,
    ) -> RepositoryResult<status::Model>
    where
        V: Into<Value> + Display,
    {
        self.base.update_fields(column, value, changes).await
    }

    pub async fn delete_status<V>(&self, column: status::Column, value: V) -> RepositoryResult<()>
    where
        V: Into<Value> + Display,
    {
        self.base.delete(column, value).await
    }

    pub async fn delete_all_statuses(&self) -> RepositoryResult<u64> {
        self.base.delete_all().await
    }
}
