//! User repository for database operations.

use std::fmt::Display;

use sea_orm::{EntityTrait, Value};

use super::base::{BaseRepository, Changes, Record, Relationship};
use super::error::RepositoryResult;
use crate::entities::links::{Association, UserAssignedTasks, UserCreatedTasks, UserRole};
use crate::entities::{role, task, user};
use crate::storage::Session;

impl Record for user::Entity {
    const NAME: &'static str = "User";
    const ID: user::Column = user::Column::Id;

    type Active = user::ActiveModel;

    fn id_of(model: &user::Model) -> i32 {
        model.id
    }
}

/// Repository for user-related database operations.
pub struct UserRepository<'s> {
    base: BaseRepository<'s, user::Entity>,
}

impl<'s> UserRepository<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self {
            base: BaseRepository::new(session),
        }
    }

    pub fn base(&self) -> &BaseRepository<'s, user::Entity> {
        &self.base
    }

    pub async fn create_users_table(&self) -> RepositoryResult<String> {
        self.base.create_table().await
    }

    pub async fn drop_users_table(&self) -> RepositoryResult<String> {
        self.base.drop_table().await
    }

    pub async fn create_user(&self, user: user::ActiveModel) -> RepositoryResult<user::Model> {
        self.base.create(user).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<user::Model>> {
        self.get_user_by_filter(user::Column::Id, id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<user::Model>> {
        self.get_user_by_filter(user::Column::Username, username).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<user::Model>> {
        self.get_user_by_filter(user::Column::Email, email).await
    }

    pub async fn get_user_by_filter<V>(&self, column: user::Column, value: V) -> RepositoryResult<Option<user::Model>>
    where
        V: Into<Value> + Display,
    {
        self.base.filter_by(column, value).await
    }

    pub async fn get_random_user(&self) -> RepositoryResult<Option<user::Model>> {
        self.base.get_random().await
    }

    pub async fn get_user_field<V>(
        &self,
        column: user::Column,
        value: V,
        field: user::Column,
    ) -> RepositoryResult<Option<serde_json::Value>>
    where
        V: Into<Value> + Display,
    {
        self.base.get_field_value(column, value, field).await
    }

    pub async fn get_all_users(&self) -> RepositoryResult<Option<Vec<user::Model>>> {
        self.base.get_all().await
    }

    pub async fn get_all_users_by_filter<V>(
        &self,
        column: user::Column,
        value: V,
    ) -> RepositoryResult<Option<Vec<user::Model>>>
    where
        V: Into<Value> + Display,
    {
        self.base.get_all_by_filter(column, value).await
    }

    /// The role the matching user holds, if any.
    pub async fn get_user_role<V>(&self, column: user::Column, value: V) -> RepositoryResult<Option<role::Model>>
    where
        V: Into<Value> + Display,
    {
        self.get_user_relationship(column, value, UserRole)
            .await
            .map(Relationship::into_one)
    }

    /// Tasks the matching user created.
    pub async fn get_user_created_tasks<V>(&self, column: user::Column, value: V) -> RepositoryResult<Vec<task::Model>>
    where
        V: Into<Value> + Display,
    {
        self.get_user_relationship(column, value, UserCreatedTasks)
            .await
            .map(Relationship::into_many)
    }

    /// Tasks assigned to the matching user.
    pub async fn get_user_assigned_tasks<V>(&self, column: user::Column, value: V) -> RepositoryResult<Vec<task::Model>>
    where
        V: Into<Value> + Display,
    {
        self.get_user_relationship(column, value, UserAssignedTasks)
            .await
            .map(Relationship::into_many)
    }

    pub async fn get_user_relationship<V, L>(
        &self,
        column: user::Column,
        value: V,
        link: L,
    ) -> RepositoryResult<Relationship<<L::ToEntity as EntityTrait>::Model>>
    where
        V: Into<Value> + Display,
        L: Association<FromEntity = user::Entity>,
        L::ToEntity: Record,
    {
        self.base.get_relationship(column, value, link).await
    }

    pub async fn update_user_field<V>(
        &self,
        column: user::Column,
        value: V,
        field: user::Column,
        new_value: impl Into<Value>,
    ) -> RepositoryResult<user::Model>
    where
        V: Into<Value> + Display,
    {
        self.base.update_field(column, value, field, new_value).await
    }

    pub async fn update_user_fields<V>(
        &self,
        column: user::Column,
        value: V,
        changes: Changes<user::Entity>,
    ) -> RepositoryResult<user::Model>
    where
        V: Into<Value> + Display,
    {
        self.base.update_fields(column, value, changes).await
    }

    pub async fn delete_user<V>(&self, column: user::Column, value: V) -> RepositoryResult<()>
    where
        V: Into<Value> + Display,
    {
        self.base.delete(column, value).await
    }

    pub async fn delete_all_users(&self) -> RepositoryResult<u64> {
        self.base.delete_all().await
    }
}
