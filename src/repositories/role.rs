//! Role repository for database operations.

use std::fmt::Display;

use sea_orm::{EntityTrait, Value};

use super::base::{BaseRepository, Changes, Record, Relationship};
use super::error::RepositoryResult;
use crate::entities::enums::RoleName;
use crate::entities::links::{Association, RoleUsers};
use crate::entities::{role, user};
use crate::storage::Session;

impl Record for role::Entity {
    const NAME: &'static str = "Role";
    const ID: role::Column = role::Column::Id;

    type Active = role::ActiveModel;

    fn id_of(model: &role::Model) -> i32 {
        model.id
    }
}

/// Repository for role-related database operations.
pub struct RoleRepository<'s> {
    base: BaseRepository<'s, role::Entity>,
}

impl<'s> RoleRepository<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self {
            base: BaseRepository::new(session),
        }
    }

    pub fn base(&self) -> &BaseRepository<'s, role::Entity> {
        &self.base
    }

    pub async fn create_roles_table(&self) -> RepositoryResult<String> {
        self.base.create_table().await
    }

    pub async fn drop_roles_table(&self) -> RepositoryResult<String> {
        self.base.drop_table().await
    }

    pub async fn create_role(&self, role: role::ActiveModel) -> RepositoryResult<role::Model> {
        self.base.create(role).await
    }

    pub async fn get_role_by_id(&self, id: i32) -> RepositoryResult<Option<role::Model>> {
        self.get_role_by_filter(role::Column::Id, id).await
    }

    pub async fn get_role_by_name(&self, name: RoleName) -> RepositoryResult<Option<role::Model>> {
        self.get_role_by_filter(role::Column::RoleName, name.as_str()).await
    }

    pub async fn get_role_by_filter<V>(&self, column: role::Column, value: V) -> RepositoryResult<Option<role::Model>>
    where
        V: Into<Value> + Display,
    {
        self.base.filter_by(column, value).await
    }

    pub async fn get_random_role(&self) -> RepositoryResult<Option<role::Model>> {
        self.base.get_random().await
    }

    pub async fn get_role_field<V>(
        &self,
        column: role::Column,
        value: V,
        field: role::Column,
    ) -> RepositoryResult<Option<serde_json::Value>>
    where
        V: Into<Value> + Display,
    {
        self.base.get_field_value(column, value, field).await
    }

    pub async fn get_all_roles(&self) -> RepositoryResult<Option<Vec<role::Model>>> {
        self.base.get_all().await
    }

    pub async fn get_all_roles_by_filter<V>(
        &self,
        column: role::Column,
        value: V,
    ) -> RepositoryResult<Option<Vec<role::Model>>>
    where
        V: Into<Value> + Display,
    {
        self.base.get_all_by_filter(column, value).await
    }

    /// Users holding the matching role.
    pub async fn get_role_users<V>(&self, column: role::Column, value: V) -> RepositoryResult<Vec<user::Model>>
    where
        V: Into<Value> + Display,
    {
        self.get_role_relationship(column, value, RoleUsers)
            .await
            .map(Relationship::into_many)
    }

    pub async fn get_role_relationship<V, L>(
        &self,
        column: role::Column,
        value: V,
        link: L,
    ) -> RepositoryResult<Relationship<<L::ToEntity as EntityTrait>::Model>>
    where
        V: Into<Value> + Display,
        L: Association<FromEntity = role::Entity>,
        L::ToEntity: Record,
    {
        self.base.get_relationship(column, value, link).await
    }

    pub async fn update_role_field<V>(
        &self,
        column: role::Column,
        value: V,
        field: role::Column,
        new_value: impl Into<Value>,
    ) -> RepositoryResult<role::Model>
    where
        V: Into<Value> + Display,
    {
        self.base.update_field(column, value, field, new_value).await
    }

    pub async fn update_role_fields<V>(
        &self,
        column: role::Column,
        value: V,
        changes: Changes<role::Entity>,
    ) -> RepositoryResult<role::Model>
    where
        V: Into<Value> + Display,
    {
        self.base.update_fields(column, value, changes).await
    }

    pub async fn delete_role<V>(&self, column: role::Column, value: V) -> RepositoryResult<()>
    where
        V: Into<Value> + Display,
    {
        self.base.delete(column, value).await
    }

    pub async fn delete_all_roles(&self) -> RepositoryResult<u64> {
        self.base.delete_all().await
    }
}
