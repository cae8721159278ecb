//! User entity.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(20))", unique, indexed)]
    pub username: String,
    #[sea_orm(column_type = "String(StringLen::N(255))", indexed)]
    pub full_name: String,
    #[sea_orm(column_type = "String(StringLen::N(255))", unique, indexed)]
    pub email: String,
    #[sea_orm(column_type = "String(StringLen::N(1024))")]
    pub hashed_password: String,
    pub role_id: Option<i32>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub ipaddress: Option<String>,
    pub last_login_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
    pub registered_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::role::Entity",
        from = "Column::RoleId",
        to = "super::role::Column::Id",
        on_delete = "Cascade"
    )]
    Role,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            is_active: ActiveValue::Set(false),
            is_superuser: ActiveValue::Set(false),
            registered_at: ActiveValue::Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }
}
