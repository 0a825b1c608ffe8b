//! PostgreSQL store tests. Run with `TEST_DATABASE_URL` set and `--ignored`.

use inventory_admin::models::{CategoryInput, NewUser, Role};
use inventory_admin::services::{CategoryStore, Database, Store, UserStore};
use service_core::error::AppError;
use uuid::Uuid;

async fn database() -> Database {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let db = Database::new(&url, 2, 1)
        .await
        .expect("Failed to connect to test database");
    db.run_migrations().await.expect("Failed to run migrations");
    db
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn migrations_seed_the_sentinel() {
    let db = database().await;

    db.health_check().await.unwrap();
    let categories = db.list_categories().await.unwrap();
    assert!(categories.iter().any(|c| c.is_sentinel()));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn category_lifecycle() {
    let db = database().await;
    let name = format!("Tools-{}", Uuid::new_v4());

    let created = db
        .create_category(&CategoryInput {
            name: name.clone(),
            description: None,
        })
        .await
        .unwrap();
    assert_eq!(created.name, name);
    assert_eq!(created.description, None);

    let updated = db
        .update_category(
            created.id,
            &CategoryInput {
                name: name.clone(),
                description: Some("Hand tools".to_string()),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("Hand tools"));

    assert!(db.delete_category(created.id).await.unwrap());
    assert!(!db.delete_category(created.id).await.unwrap());
    assert!(db.get_category(created.id).await.unwrap().is_none());
    assert!(db
        .update_category(created.id, &CategoryInput { name, description: None })
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn duplicate_email_conflicts() {
    let db = database().await;
    let input = NewUser {
        email: format!("{}@sekolah.id", Uuid::new_v4()),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        full_name: "Budi".to_string(),
        role: Role::Teacher,
    };

    let user = db.create_user(&input).await.unwrap();
    assert_eq!(user.parsed_role(), Some(Role::Teacher));

    assert!(matches!(
        db.create_user(&input).await,
        Err(AppError::Conflict(_))
    ));

    let found = db.find_user_by_email(&input.email).await.unwrap().unwrap();
    assert_eq!(found.user_id, user.user_id);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn check_violation_is_a_database_error_not_a_conflict() {
    let db = database().await;
    let input = NewUser {
        email: format!("{}@sekolah.id", Uuid::new_v4()),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        full_name: String::new(),
        role: Role::Staff,
    };

    assert!(matches!(
        db.create_user(&input).await,
        Err(AppError::DatabaseError(_))
    ));
}
