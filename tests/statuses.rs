mod common;

use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use taskdb::entities::enums::StatusName;
use taskdb::entities::status;
use taskdb::fixtures::fake;

#[tokio::test]
async fn test_get_status_by_name_with_spaces() {
    let h = common::harness().await;
    h.superuser().await.unwrap();
    let status = h
        .factory()
        .create_status(status::ActiveModel {
            status_name: Set(StatusName::InProgress.to_string()),
            ..ActiveModelTrait::default()
        })
        .await
        .unwrap();

    assert_eq!(status.status_name, "In Progress");
    let found = h
        .status_repository()
        .get_status_by_name(StatusName::InProgress)
        .await
        .unwrap();
    assert_eq!(found, Some(status));
}

#[tokio::test]
async fn test_statuses_share_one_permission_set() {
    let h = common::harness().await;
    h.superuser().await.unwrap();
    let statuses = h.statuses().await.unwrap();

    let expected = fake::status_permissions();
    for status in &statuses {
        assert_eq!(status.permission_set().as_ref(), Some(expected));
    }
}

#[tokio::test]
async fn test_get_status_tasks_and_random() {
    let h = common::harness().await;
    h.superuser().await.unwrap();
    h.role().await.unwrap();
    h.user().await.unwrap();
    h.priority().await.unwrap();
    let status = h.status().await.unwrap();
    let tasks = h.tasks().await.unwrap();
    let repo = h.status_repository();

    let linked = repo.get_status_tasks(status::Column::Id, status.id).await.unwrap();
    assert_eq!(linked, tasks);
    assert_eq!(repo.get_random_status().await.unwrap(), Some(status));
}

#[tokio::test]
async fn test_missing_status_field_is_not_found() {
    let h = common::harness().await;

    let err = h
        .status_repository()
        .get_status_field(status::Column::StatusName, "Archived", status::Column::Permissions)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "No instance found for Status model with status_name=Archived"
    );
}

#[tokio::test]
async fn test_delete_all_statuses() {
    let h = common::harness().await;
    h.superuser().await.unwrap();
    h.statuses().await.unwrap();
    let repo = h.status_repository();

    assert_eq!(repo.delete_all_statuses().await.unwrap(), 3);
    assert!(repo.get_all_statuses().await.unwrap().is_none());
}
