use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{ActiveStatus, AuthProvider, CreateUserRequest, Role, UpdateUserRequest, User},
    error::{AppError, Result},
    repository::UserRepository,
};

// Database row struct that matches SQLite schema
#[derive(FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    phone: Option<String>,
    picture: Option<String>,
    address: Option<String>,
    role: String,
    is_active: String,
    is_verified: i32,
    auths: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

const USER_COLUMNS: &str = r#"
    id, name, email, phone, picture, address, role, is_active,
    is_verified, auths, created_at, updated_at
"#;

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: UserRow) -> Result<User> {
        Ok(User {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            email: row.email,
            phone: row.phone,
            picture: row.picture,
            address: row.address,
            role: Role::from_str(&row.role)
                .ok_or_else(|| AppError::Database(format!("Invalid role: {}", row.role)))?,
            is_active: ActiveStatus::from_str(&row.is_active)
                .ok_or_else(|| AppError::Database(format!("Invalid active status: {}", row.is_active)))?,
            is_verified: row.is_verified != 0,
            auths: serde_json::from_str(&row.auths).map_err(|e| AppError::Database(e.to_string()))?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    async fn fetch_one_where(&self, clause: &str, value: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE {} = ?", USER_COLUMNS, clause);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, request: CreateUserRequest, password_hash: String) -> Result<User> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        let auths = request
            .auths
            .unwrap_or_else(|| vec![AuthProvider::credentials(&request.email)]);
        let auths_json = serde_json::to_string(&auths).map_err(|e| AppError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO users (
                id, name, email, password_hash, phone, picture, address,
                role, is_active, is_verified, auths, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(&request.name)
        .bind(&request.email)
        .bind(&password_hash)
        .bind(&request.phone)
        .bind(&request.picture)
        .bind(&request.address)
        .bind(request.role.unwrap_or_default().as_str())
        .bind(request.is_active.unwrap_or_default().as_str())
        .bind(request.is_verified.unwrap_or(false) as i32)
        .bind(&auths_json)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created user".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.fetch_one_where("id", &id.to_string()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.fetch_one_where("email", email).await
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users ORDER BY created_at DESC LIMIT ? OFFSET ?",
            USER_COLUMNS
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(Self::row_to_user)
            .collect()
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn update(&self, id: Uuid, update: UpdateUserRequest, password_hash: Option<String>) -> Result<User> {
        if self.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE(?, name),
                email = COALESCE(?, email),
                password_hash = COALESCE(?, password_hash),
                phone = COALESCE(?, phone),
                picture = COALESCE(?, picture),
                address = COALESCE(?, address),
                role = COALESCE(?, role),
                is_active = COALESCE(?, is_active),
                is_verified = COALESCE(?, is_verified),
                updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&update.name)
        .bind(&update.email)
        .bind(&password_hash)
        .bind(&update.phone)
        .bind(&update.picture)
        .bind(&update.address)
        .bind(update.role.map(|r| r.as_str()))
        .bind(update.is_active.map(|s| s.as_str()))
        .bind(update.is_verified.map(|v| v as i32))
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated user".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
