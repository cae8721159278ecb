//! Role entity: a named permission set assigned to users.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

use super::enums::{PermissionSet, RoleName};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(255))", indexed)]
    pub role_name: String,
    /// JSON text of the form `{"permissions": [...]}`.
    #[sea_orm(column_type = "Text")]
    pub permissions: String,
    pub creator_id: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            created_at: ActiveValue::Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }
}

impl Model {
    /// Parsed role name, if the stored value is one of the known names.
    pub fn name(&self) -> Option<RoleName> {
        self.role_name.parse().ok()
    }

    /// Parsed permission set, if the stored JSON is well formed.
    pub fn permission_set(&self) -> Option<PermissionSet> {
        PermissionSet::from_json(&self.permissions).ok()
    }
}
