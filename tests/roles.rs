mod common;

use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use taskdb::entities::enums::{Permission, RoleName};
use taskdb::entities::links::UserRole;
use taskdb::entities::{role, user};
use taskdb::fixtures::FixtureError;
use taskdb::repositories::{Changes, Relationship};

#[tokio::test]
async fn test_role_requires_an_existing_creator() {
    let h = common::harness().await;

    let err = h.role().await.unwrap_err();
    assert!(matches!(err, FixtureError::MissingParent { entity: "User" }));
}

#[tokio::test]
async fn test_get_role_by_name() {
    let h = common::harness().await;
    let superuser = h.superuser().await.unwrap();
    let role = h
        .factory()
        .create_role(role::ActiveModel {
            role_name: Set(RoleName::Admin.to_string()),
            ..ActiveModelTrait::default()
        })
        .await
        .unwrap();

    assert_eq!(role.creator_id, superuser.id);
    let repo = h.role_repository();
    let found = repo.get_role_by_name(RoleName::Admin).await.unwrap();
    assert_eq!(found.as_ref(), Some(&role));
    assert_eq!(found.unwrap().name(), Some(RoleName::Admin));
    assert!(repo.get_role_by_name(RoleName::Guest).await.unwrap().is_none());
}

#[tokio::test]
async fn test_role_permissions_are_structured() {
    let h = common::harness().await;
    h.superuser().await.unwrap();
    let role = h.role().await.unwrap();

    let permissions = role.permission_set().expect("permissions should parse");
    assert!((1..=4).contains(&permissions.permissions.len()));

    let field = h
        .role_repository()
        .get_role_field(role::Column::Id, role.id, role::Column::Permissions)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(field.as_str(), Some(role.permissions.as_str()));
}

#[tokio::test]
async fn test_get_all_roles_and_filter() {
    let h = common::harness().await;
    h.superuser().await.unwrap();
    let roles = h.roles().await.unwrap();
    let repo = h.role_repository();

    let all = repo.get_all_roles().await.unwrap().unwrap();
    assert_eq!(all.len(), 3);

    let name = roles[0].role_name.clone();
    let matching = repo
        .get_all_roles_by_filter(role::Column::RoleName, name.as_str())
        .await
        .unwrap()
        .unwrap();
    assert!(matching.iter().all(|r| r.role_name == name));
    assert_eq!(matching.len(), roles.iter().filter(|r| r.role_name == name).count());
}

#[tokio::test]
async fn test_get_role_users() {
    let h = common::harness().await;
    h.superuser().await.unwrap();
    let role = h.role().await.unwrap();
    let users = h.users().await.unwrap();

    let holders = h
        .role_repository()
        .get_role_users(role::Column::Id, role.id)
        .await
        .unwrap();
    assert_eq!(holders, users);
}

#[tokio::test]
async fn test_update_role_fields() {
    let h = common::harness().await;
    h.superuser().await.unwrap();
    let role = h.role().await.unwrap();
    let repo = h.role_repository();

    let permissions = taskdb::entities::enums::PermissionSet::new(vec![Permission::Read]).to_json();
    let updated = repo
        .update_role_fields(
            role::Column::Id,
            role.id,
            Changes::new()
                .set(role::Column::RoleName, RoleName::Guest.as_str())
                .set(role::Column::Permissions, permissions.clone()),
        )
        .await
        .unwrap();

    assert_eq!(updated.name(), Some(RoleName::Guest));
    assert_eq!(updated.permissions, permissions);
    assert_eq!(updated.created_at, role.created_at);
}

#[tokio::test]
async fn test_delete_role_cascades_to_users() {
    let h = common::harness().await;
    let superuser = h.superuser().await.unwrap();
    let role = h.role().await.unwrap();
    let users = h.users().await.unwrap();

    h.role_repository().delete_role(role::Column::Id, role.id).await.unwrap();

    let user_repo = h.user_repository();
    for user in &users {
        assert!(user_repo.get_user_by_id(user.id).await.unwrap().is_none());
    }
    // Users without a role are untouched.
    assert!(user_repo.get_user_by_id(superuser.id).await.unwrap().is_some());

    let remaining = h
        .user_repository()
        .get_user_relationship(user::Column::Id, superuser.id, UserRole)
        .await
        .unwrap();
    assert_eq!(remaining, Relationship::Absent);
}

#[tokio::test]
async fn test_delete_all_roles() {
    let h = common::harness().await;
    h.superuser().await.unwrap();
    h.roles().await.unwrap();
    let repo = h.role_repository();

    assert_eq!(repo.delete_all_roles().await.unwrap(), 3);
    assert!(repo.get_all_roles().await.unwrap().is_none());
    assert!(repo.get_random_role().await.unwrap().is_none());
}
