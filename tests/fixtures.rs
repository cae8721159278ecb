mod common;

use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use taskdb::config::FixturesConfig;
use taskdb::entities::enums::RoleName;
use taskdb::entities::{role, user};
use taskdb::fixtures::{FixtureFactory, Harness, TEARDOWN_ORDER};
use taskdb::storage::schema::{self, Table};
use taskdb::storage::Session;

#[tokio::test]
async fn test_batches_are_returned_in_creation_order() {
    let h = common::harness().await.batch_size(5);
    h.superuser().await.unwrap();
    let roles = h.roles().await.unwrap();

    assert_eq!(roles.len(), 5);
    assert!(roles.windows(2).all(|pair| pair[0].id < pair[1].id));
}

#[tokio::test]
async fn test_overrides_are_kept() {
    let h = common::harness().await;
    let superuser = h.superuser().await.unwrap();
    let role = h
        .factory()
        .create_role(role::ActiveModel {
            role_name: Set(RoleName::User.to_string()),
            creator_id: Set(superuser.id),
            permissions: Set(r#"{"permissions":[]}"#.to_string()),
            ..ActiveModelTrait::default()
        })
        .await
        .unwrap();

    assert_eq!(role.role_name, "User");
    assert_eq!(role.creator_id, superuser.id);
    assert!(role.permission_set().unwrap().permissions.is_empty());

    let user = h
        .factory()
        .create_user(user::ActiveModel {
            username: Set("fixed_name".to_string()),
            full_name: Set("Fixed Name".to_string()),
            is_superuser: Set(false),
            ..ActiveModelTrait::default()
        })
        .await
        .unwrap();
    assert_eq!(user.username, "fixed_name");
    assert!(user.email.starts_with("fixed_name@"));
    assert_eq!(user.full_name, "Fixed Name");
    assert!(!user.is_superuser);
    assert_eq!(user.role_id, Some(role.id));
}

#[tokio::test]
async fn test_seeded_factories_generate_the_same_values() {
    let first = Session::in_memory().await.unwrap();
    let second = Session::in_memory().await.unwrap();
    taskdb::storage::schema::create_all_tables(&first).await.unwrap();
    taskdb::storage::schema::create_all_tables(&second).await.unwrap();

    let a = FixtureFactory::with_seed(&first, 99).create_superuser().await.unwrap();
    let b = FixtureFactory::with_seed(&second, 99).create_superuser().await.unwrap();

    assert_eq!(a.username, b.username);
    assert_eq!(a.full_name, b.full_name);
    assert_eq!(a.email, b.email);
    assert_eq!(a.ipaddress, b.ipaddress);
    // Salts come from the OS, so hashes always differ.
    assert_ne!(a.hashed_password, b.hashed_password);
}

#[tokio::test]
async fn test_teardown_empties_every_table() {
    let h = common::seeded_harness().await;
    for table in Table::CREATION_ORDER {
        assert!(!table.is_empty(h.session()).await.unwrap(), "{table} should have rows");
    }

    h.teardown().await.unwrap();

    for table in Table::CREATION_ORDER {
        assert!(table.is_empty(h.session()).await.unwrap(), "{table} should be empty");
    }
}

#[tokio::test]
async fn test_teardown_order_clears_children_first() {
    assert_eq!(TEARDOWN_ORDER.len(), Table::CREATION_ORDER.len());
    assert_eq!(TEARDOWN_ORDER[0], Table::Tasks);
    for table in Table::CREATION_ORDER {
        assert!(TEARDOWN_ORDER.contains(&table));
    }
}

#[tokio::test]
async fn test_clearing_parents_first_also_empties_every_table() {
    let h = common::seeded_harness().await;

    // Roles, users, priorities, statuses, tasks: children go with their
    // parents through the cascading foreign keys.
    for table in Table::CREATION_ORDER {
        table.clear(h.session()).await.unwrap();
    }

    for table in Table::CREATION_ORDER {
        assert!(table.is_empty(h.session()).await.unwrap(), "{table} should be empty");
    }
}

#[tokio::test]
async fn test_seeded_harnesses_generate_the_same_rows() {
    common::init_logging();
    let first = Harness::new().await.unwrap().seed(21);
    let second = Harness::new().await.unwrap().seed(21);

    let mut names = Vec::new();
    for h in [&first, &second] {
        let superuser = h.superuser().await.unwrap();
        h.roles().await.unwrap();
        let users = h.users().await.unwrap();
        let mut usernames = vec![superuser.username];
        usernames.extend(users.into_iter().map(|u| u.username));
        names.push(usernames);
    }

    assert_eq!(names[0], names[1]);
    // Successive fixture calls continue one stream rather than restarting it.
    assert_ne!(names[0][0], names[0][1]);
}

#[tokio::test]
async fn test_configure_applies_batch_size_and_seed() {
    common::init_logging();
    let config = FixturesConfig {
        batch_size: 2,
        seed: Some(5),
    };
    let first = Harness::new().await.unwrap().configure(&config);
    let second = Harness::new().await.unwrap().configure(&config);

    let a = first.superuser().await.unwrap();
    let b = second.superuser().await.unwrap();
    assert_eq!(a.username, b.username);

    first.superuser().await.unwrap();
    assert_eq!(first.roles().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_run_tears_down_after_success() {
    common::init_logging();
    let url = "sqlite:file:run_teardown?mode=memory&cache=shared";
    // Holds the shared in-memory database open after the harness is gone.
    let observer = Session::connect(url).await.unwrap();
    let h = Harness::connect(url).await.unwrap();

    h.run(|h| async move {
        h.superuser().await?;
        h.roles().await?;
        let roles = h.role_repository().get_all_roles().await?;
        assert_eq!(roles.map(|r| r.len()), Some(3));
        Ok::<(), anyhow::Error>(())
    })
    .await
    .unwrap();

    for table in Table::CREATION_ORDER {
        assert!(table.is_empty(&observer).await.unwrap(), "{table} should be empty");
    }
}

#[tokio::test]
async fn test_run_returns_the_body_error_after_teardown() {
    common::init_logging();
    let h = Harness::new().await.unwrap();

    let result = h
        .run(|h| async move {
            // No superuser yet, so the role has no creator to reference.
            h.role().await?;
            Ok::<(), anyhow::Error>(())
        })
        .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("no User rows exist yet"), "{err}");
}

#[tokio::test]
#[should_panic(expected = "body panicked")]
async fn test_run_reraises_panics() {
    common::init_logging();
    let h = Harness::new().await.unwrap();

    let _ = h
        .run(|h| async move {
            h.superuser().await?;
            if h.session().is_open() {
                panic!("body panicked");
            }
            Ok::<(), anyhow::Error>(())
        })
        .await;
}

#[tokio::test]
#[should_panic(expected = "panicked with tables gone")]
async fn test_run_reraises_panics_when_teardown_fails() {
    common::init_logging();
    let h = Harness::new().await.unwrap();

    let _ = h
        .run(|h| async move {
            schema::drop_all_tables(h.session()).await?;
            if h.session().is_open() {
                panic!("panicked with tables gone");
            }
            Ok::<(), anyhow::Error>(())
        })
        .await;
}

#[tokio::test]
async fn test_run_reports_teardown_failure_after_success() {
    common::init_logging();
    let h = Harness::new().await.unwrap();

    let result = h
        .run(|h| async move {
            schema::drop_all_tables(h.session()).await?;
            Ok::<(), anyhow::Error>(())
        })
        .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("Failed to clear tasks"), "{err}");
}
