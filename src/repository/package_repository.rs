use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreatePackageRequest, Package, UpdatePackageRequest},
    error::{AppError, Result},
    repository::PackageRepository,
};

#[derive(FromRow)]
struct PackageRow {
    id: String,
    name: String,
    description: String,
    price: f64,
    currency: String,
    duration_days: i32,
    features: String,
    is_active: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqlitePackageRepository {
    pool: SqlitePool,
}

impl SqlitePackageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_package(row: PackageRow) -> Result<Package> {
        Ok(Package {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            description: row.description,
            price: row.price,
            currency: row.currency,
            duration_days: row.duration_days,
            features: serde_json::from_str(&row.features)
                .map_err(|e| AppError::Database(e.to_string()))?,
            is_active: row.is_active != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn encode_features(features: &[String]) -> Result<String> {
        serde_json::to_string(features).map_err(|e| AppError::Internal(e.to_string()))
    }
}

#[async_trait]
impl PackageRepository for SqlitePackageRepository {
    async fn create(&self, request: CreatePackageRequest) -> Result<Package> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();
        let currency = request.currency.unwrap_or_else(|| "USD".to_string());
        let features = Self::encode_features(&request.features)?;

        sqlx::query(
            r#"
            INSERT INTO packages (
                id, name, description, price, currency, duration_days,
                features, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price)
        .bind(&currency)
        .bind(request.duration_days)
        .bind(&features)
        .bind(request.is_active.unwrap_or(true) as i32)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created package".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Package>> {
        let row = sqlx::query_as::<_, PackageRow>(
            r#"
            SELECT id, name, description, price, currency, duration_days,
                   features, is_active, created_at, updated_at
            FROM packages
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_package).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Package>> {
        let row = sqlx::query_as::<_, PackageRow>(
            r#"
            SELECT id, name, description, price, currency, duration_days,
                   features, is_active, created_at, updated_at
            FROM packages
            WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_package).transpose()
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Package>> {
        let query = if active_only {
            r#"
            SELECT id, name, description, price, currency, duration_days,
                   features, is_active, created_at, updated_at
            FROM packages
            WHERE is_active = 1
            ORDER BY price ASC, name ASC
            "#
        } else {
            r#"
            SELECT id, name, description, price, currency, duration_days,
                   features, is_active, created_at, updated_at
            FROM packages
            ORDER BY price ASC, name ASC
            "#
        };

        let rows = sqlx::query_as::<_, PackageRow>(query)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_package).collect()
    }

    async fn update(&self, id: Uuid, request: UpdatePackageRequest) -> Result<Package> {
        let existing = self.find_by_id(id).await?.ok_or_else(|| {
            AppError::NotFound("Package not found".to_string())
        })?;

        let now = Utc::now().naive_utc();

        let name = request.name.unwrap_or(existing.name);
        let description = request.description.unwrap_or(existing.description);
        let price = request.price.unwrap_or(existing.price);
        let currency = request.currency.unwrap_or(existing.currency);
        let duration_days = request.duration_days.unwrap_or(existing.duration_days);
        let features = Self::encode_features(&request.features.unwrap_or(existing.features))?;
        let is_active = request.is_active.unwrap_or(existing.is_active);

        sqlx::query(
            r#"
            UPDATE packages
            SET name = ?, description = ?, price = ?, currency = ?,
                duration_days = ?, features = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&name)
        .bind(&description)
        .bind(price)
        .bind(&currency)
        .bind(duration_days)
        .bind(&features)
        .bind(if is_active { 1i32 } else { 0i32 })
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated package".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM packages WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
