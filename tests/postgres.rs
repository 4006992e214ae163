//! Round trip through the PostgreSQL stores. Needs `DATABASE_URL`:
//! `cargo test --test postgres -- --ignored`

use dotenv::dotenv;
use pretty_assertions::assert_eq;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use taskhub::error::AppError;
use taskhub::models::{NewUser, Task, TaskFilter, TaskInput, TaskUpdate};
use taskhub::store::{PgTaskStore, PgUserStore, TaskStore, UserStore};

#[ignore]
#[actix_rt::test]
async fn test_postgres_stores_round_trip() {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    sqlx::migrate!().run(&pool).await.expect("migrations failed");

    let users = PgUserStore::new(pool.clone());
    let tasks = PgTaskStore::new(pool.clone());

    let email = format!("pg-{}@example.com", Uuid::new_v4());
    let new_user = || NewUser {
        email: email.clone(),
        password_hash: "$2b$04$placeholder".to_string(),
        name: Some("Pg".to_string()),
        last_name: None,
        avatar: None,
    };

    let user = users.create(new_user()).await.unwrap();
    assert_eq!(user.email, email);
    assert!(matches!(
        users.create(new_user()).await,
        Err(AppError::BadRequest(msg)) if msg == "email already in use"
    ));

    let found = users.find_by_email(&email).await.unwrap().unwrap();
    assert_eq!(found.id, user.id);

    let mut task = Task::new(
        TaskInput {
            title: "Escape 100% of_wildcards".to_string(),
            description: None,
        },
        user.id,
    );
    task = tasks.create(&task).await.unwrap();
    tasks
        .create(&Task::new(
            TaskInput {
                title: "Plain".to_string(),
                description: None,
            },
            user.id,
        ))
        .await
        .unwrap();

    let filter = TaskFilter {
        search: Some("100%".to_string()),
        ..Default::default()
    };
    let (matching, total) = tasks.find_for_user(user.id, &filter).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(matching[0].id, task.id);

    task.apply(TaskUpdate {
        is_completed: Some(true),
        ..Default::default()
    });
    let updated = tasks.update(&task).await.unwrap();
    assert!(updated.is_completed);

    // Deleting the user cascades to its tasks.
    assert!(users.delete(user.id).await.unwrap());
    assert!(tasks.find_by_id(task.id).await.unwrap().is_none());
}
