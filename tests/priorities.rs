mod common;

use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use taskdb::entities::enums::PriorityName;
use taskdb::entities::{priority, task};

#[tokio::test]
async fn test_get_priority_by_name() {
    let h = common::harness().await;
    h.superuser().await.unwrap();
    let high = h
        .factory()
        .create_priority(priority::ActiveModel {
            priority_name: Set(PriorityName::High.to_string()),
            ..ActiveModelTrait::default()
        })
        .await
        .unwrap();
    let repo = h.priority_repository();

    let found = repo.get_priority_by_name(PriorityName::High).await.unwrap();
    assert_eq!(found, Some(high));
    assert!(repo.get_priority_by_name(PriorityName::Low).await.unwrap().is_none());
}

#[tokio::test]
async fn test_generated_priorities_use_known_names() {
    let h = common::harness().await;
    let superuser = h.superuser().await.unwrap();
    let priorities = h.priorities().await.unwrap();

    assert_eq!(priorities.len(), 3);
    for priority in &priorities {
        assert!(priority.name().is_some(), "{}", priority.priority_name);
        assert_eq!(priority.creator_id, superuser.id);
    }
}

#[tokio::test]
async fn test_get_priority_tasks() {
    let h = common::harness().await;
    h.superuser().await.unwrap();
    h.role().await.unwrap();
    h.users().await.unwrap();
    let priority = h.priority().await.unwrap();
    h.status().await.unwrap();
    let tasks = h.tasks().await.unwrap();

    let linked = h
        .priority_repository()
        .get_priority_tasks(priority::Column::Id, priority.id)
        .await
        .unwrap();
    assert_eq!(linked, tasks);
}

#[tokio::test]
async fn test_update_priority_field() {
    let h = common::harness().await;
    h.superuser().await.unwrap();
    let priority = h.priority().await.unwrap();

    let updated = h
        .priority_repository()
        .update_priority_field(
            priority::Column::Id,
            priority.id,
            priority::Column::PriorityName,
            PriorityName::Medium.as_str(),
        )
        .await
        .unwrap();
    assert_eq!(updated.name(), Some(PriorityName::Medium));
}

#[tokio::test]
async fn test_delete_priority_cascades_to_tasks() {
    let h = common::harness().await;
    h.superuser().await.unwrap();
    h.role().await.unwrap();
    h.user().await.unwrap();
    let priority = h.priority().await.unwrap();
    h.status().await.unwrap();
    let task = h.task().await.unwrap();

    h.priority_repository()
        .delete_priority(priority::Column::Id, priority.id)
        .await
        .unwrap();

    let repo = h.task_repository();
    assert!(repo.get_task_by_id(task.id).await.unwrap().is_none());
    assert!(repo.get_all_tasks_by_filter(task::Column::PriorityId, priority.id).await.unwrap().is_none());
}
