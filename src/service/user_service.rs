use std::sync::Arc;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::*,
    error::{AppError, Result},
    repository::UserRepository,
    uploads,
};

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

    Ok(password_hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
}

pub struct UserService {
    repo: Arc<dyn UserRepository>,
    uploads_dir: String,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, uploads_dir: impl Into<String>) -> Self {
        Self {
            repo,
            uploads_dir: uploads_dir.into(),
        }
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<User> {
        request.validate()?;

        if self.repo.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self.repo.create(request, password_hash).await?;

        tracing::info!("Created user {}", user.id);
        Ok(user)
    }

    /// Page of users, newest first, with the total count.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<User>, i64)> {
        let users = self.repo.list(limit, offset).await?;
        let total = self.repo.count().await?;
        Ok((users, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn update(&self, id: Uuid, request: UpdateUserRequest) -> Result<User> {
        request.validate()?;

        let existing = self.get(id).await?;

        if let Some(ref email) = request.email {
            if *email != existing.email {
                if let Some(other) = self.repo.find_by_email(email).await? {
                    if other.id != id {
                        return Err(AppError::Conflict("Email already exists".to_string()));
                    }
                }
            }
        }

        let password_hash = request
            .password
            .as_deref()
            .map(hash_password)
            .transpose()?;

        self.repo.update(id, request, password_hash).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let user = self.get(id).await?;

        self.repo.delete(id).await?;

        if let Some(picture) = user.picture {
            if let Err(e) = uploads::delete_uploaded_file(&self.uploads_dir, &picture).await {
                tracing::warn!("Failed to remove picture for deleted user {}: {}", id, e);
            }
        }

        tracing::info!("Deleted user {}", id);
        Ok(())
    }

    /// Store a new profile picture and point the user at it.
    pub async fn upload_picture(&self, id: Uuid, filename: &str, data: &[u8]) -> Result<User> {
        let existing = self.get(id).await?;

        let path = uploads::save_uploaded_file(&self.uploads_dir, filename, data).await?;

        let update = UpdateUserRequest {
            picture: Some(path.clone()),
            ..Default::default()
        };
        let user = match self.repo.update(id, update, None).await {
            Ok(user) => user,
            Err(e) => {
                if let Err(cleanup) = uploads::delete_uploaded_file(&self.uploads_dir, &path).await {
                    tracing::warn!("Failed to remove orphaned upload {}: {}", path, cleanup);
                }
                return Err(e);
            }
        };

        if let Some(old) = existing.picture {
            if let Err(e) = uploads::delete_uploaded_file(&self.uploads_dir, &old).await {
                tracing::warn!("Failed to remove previous picture {}: {}", old, e);
            }
        }

        Ok(user)
    }
}
