mod common;

use playpicker::{
    domain::{ActiveStatus, AuthProvider, CreateUserRequest, Role, UpdateUserRequest},
    error::AppError,
    repository::{SqliteUserRepository, UserRepository},
    service::user_service::{verify_password, UserService},
};
use std::sync::Arc;

fn new_user(email: &str) -> CreateUserRequest {
    CreateUserRequest {
        name: "Test Player".to_string(),
        email: email.to_string(),
        password: "secure_password123".to_string(),
        phone: Some("+15550100".to_string()),
        picture: None,
        address: None,
        role: None,
        is_active: None,
        is_verified: None,
        auths: None,
    }
}

#[tokio::test]
async fn test_user_crud() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let repo = SqliteUserRepository::new(pool.clone());

    // Create
    let user = repo.create(new_user("test@example.com"), "hash".to_string()).await?;
    assert_eq!(user.email, "test@example.com");
    assert_eq!(user.role, Role::User);
    assert_eq!(user.is_active, ActiveStatus::Active);
    assert!(!user.is_verified);
    assert_eq!(user.auths, vec![AuthProvider::credentials("test@example.com")]);

    // Find by ID
    let found = repo.find_by_id(user.id).await?;
    assert_eq!(found.map(|u| u.id), Some(user.id));

    // Find by email
    let found_by_email = repo.find_by_email("test@example.com").await?;
    assert!(found_by_email.is_some());

    // List and count
    repo.create(new_user("second@example.com"), "hash".to_string()).await?;
    assert_eq!(repo.list(10, 0).await?.len(), 2);
    assert_eq!(repo.list(1, 1).await?.len(), 1);
    assert_eq!(repo.count().await?, 2);

    // Update only touches the given fields
    let update = UpdateUserRequest {
        role: Some(Role::Admin),
        is_active: Some(ActiveStatus::Blocked),
        ..Default::default()
    };
    let updated = repo.update(user.id, update, None).await?;
    assert_eq!(updated.role, Role::Admin);
    assert_eq!(updated.is_active, ActiveStatus::Blocked);
    assert_eq!(updated.name, "Test Player");
    assert_eq!(updated.phone.as_deref(), Some("+15550100"));

    // Delete
    repo.delete(user.id).await?;
    assert!(repo.find_by_id(user.id).await?.is_none());
    assert_eq!(repo.count().await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let repo = SqliteUserRepository::new(pool);

    let result = repo
        .update(uuid::Uuid::new_v4(), UpdateUserRequest::default(), None)
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_service_hashes_password_and_rejects_duplicates() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let repo = Arc::new(SqliteUserRepository::new(pool.clone()));
    let service = UserService::new(repo, std::env::temp_dir().to_string_lossy());

    let user = service.create(new_user("player@example.com")).await?;

    let (stored,): (String,) = sqlx::query_as("SELECT password_hash FROM users WHERE id = ?")
        .bind(user.id.to_string())
        .fetch_one(&pool)
        .await?;
    assert_ne!(stored, "secure_password123");
    assert!(verify_password("secure_password123", &stored)?);

    let duplicate = service.create(new_user("player@example.com")).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let mut invalid = new_user("not-an-email");
    invalid.password = "123".to_string();
    assert!(matches!(service.create(invalid).await, Err(AppError::Validation(_))));

    Ok(())
}

#[tokio::test]
async fn test_service_update_rehashes_and_checks_email() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let repo = Arc::new(SqliteUserRepository::new(pool.clone()));
    let service = UserService::new(repo, std::env::temp_dir().to_string_lossy());

    let first = service.create(new_user("first@example.com")).await?;
    service.create(new_user("taken@example.com")).await?;

    let clash = service
        .update(
            first.id,
            UpdateUserRequest {
                email: Some("taken@example.com".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(clash, Err(AppError::Conflict(_))));

    service
        .update(
            first.id,
            UpdateUserRequest {
                password: Some("another_secret".to_string()),
                ..Default::default()
            },
        )
        .await?;

    let (stored,): (String,) = sqlx::query_as("SELECT password_hash FROM users WHERE id = ?")
        .bind(first.id.to_string())
        .fetch_one(&pool)
        .await?;
    assert!(verify_password("another_secret", &stored)?);

    service.delete(first.id).await?;
    assert!(matches!(service.get(first.id).await, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_duplicate_email_insert_is_conflict() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let repo = SqliteUserRepository::new(pool);

    repo.create(new_user("dup@example.com"), "hash".to_string()).await?;

    // Straight to the repository, skipping the service's pre-check
    let second = repo.create(new_user("dup@example.com"), "hash".to_string()).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    Ok(())
}

#[tokio::test]
async fn test_concurrent_signups_with_same_email() -> anyhow::Result<()> {
    let pool = common::setup_file_pool().await?;
    let repo = Arc::new(SqliteUserRepository::new(pool));
    let service = Arc::new(UserService::new(repo.clone(), std::env::temp_dir().to_string_lossy()));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.create(new_user("race@example.com")).await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => created += 1,
            Err(AppError::Conflict(_)) => {}
            Err(other) => panic!("expected a conflict, got {:?}", other),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(repo.count().await?, 1);

    Ok(())
}

fn upload_service(pool: sqlx::SqlitePool) -> (UserService, std::path::PathBuf) {
    let dir = std::env::temp_dir().join(format!("playpicker-avatars-{}", uuid::Uuid::new_v4()));
    let service = UserService::new(
        Arc::new(SqliteUserRepository::new(pool)),
        dir.to_string_lossy(),
    );
    (service, dir)
}

fn stored_file(dir: &std::path::Path, public_path: &str) -> std::path::PathBuf {
    dir.join(public_path.trim_start_matches(playpicker::uploads::PUBLIC_PREFIX))
}

#[tokio::test]
async fn test_upload_picture_replaces_previous_file() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let (service, dir) = upload_service(pool);
    let user = service.create(new_user("avatar@example.com")).await?;

    let first = service.upload_picture(user.id, "first.JPG", b"jpeg bytes").await?;
    let first_path = first.picture.clone().unwrap_or_default();
    assert!(first_path.starts_with("/uploads/"));
    assert!(first_path.ends_with(".jpg"));
    assert!(stored_file(&dir, &first_path).exists());

    let second = service.upload_picture(user.id, "second.webp", b"webp bytes").await?;
    let second_path = second.picture.clone().unwrap_or_default();
    assert_ne!(first_path, second_path);
    assert!(stored_file(&dir, &second_path).exists());
    assert!(!stored_file(&dir, &first_path).exists());

    // Deleting the user takes the avatar with it
    service.delete(user.id).await?;
    assert!(!stored_file(&dir, &second_path).exists());

    Ok(())
}

#[tokio::test]
async fn test_upload_picture_rejects_bad_files() -> anyhow::Result<()> {
    let pool = common::setup_pool().await?;
    let (service, _dir) = upload_service(pool);
    let user = service.create(new_user("files@example.com")).await?;

    for (name, data) in [
        ("notes.txt", b"text".to_vec()),
        ("noextension", b"data".to_vec()),
        ("empty.png", Vec::new()),
        ("huge.png", vec![0u8; playpicker::uploads::MAX_FILE_SIZE + 1]),
    ] {
        let result = service.upload_picture(user.id, name, &data).await;
        assert!(matches!(result, Err(AppError::Validation(_))), "{}", name);
    }

    for name in ["a.jpg", "a.jpeg", "a.png", "a.gif", "a.webp"] {
        service.upload_picture(user.id, name, b"image").await?;
    }

    assert!(matches!(
        service.upload_picture(uuid::Uuid::new_v4(), "a.png", b"image").await,
        Err(AppError::NotFound(_))
    ));

    Ok(())
}
