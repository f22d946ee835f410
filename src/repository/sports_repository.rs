use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{NewSports, ReorderItem, Sports, SportsType, UpdateSportsRequest},
    error::{AppError, Result},
    repository::SportsRepository,
};

#[derive(FromRow)]
struct SportsRow {
    id: String,
    title: String,
    description: String,
    thumbnail: Option<String>,
    sports_type: String,
    src: String,
    sort_order: i64,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteSportsRepository {
    pool: SqlitePool,
}

impl SqliteSportsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_sports(row: SportsRow) -> Result<Sports> {
        Ok(Sports {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            description: row.description,
            thumbnail: row.thumbnail,
            sports_type: SportsType::from_str(&row.sports_type).ok_or_else(|| {
                AppError::Database(format!("Invalid sports type: {}", row.sports_type))
            })?,
            src: row.src,
            order: row.sort_order,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl SportsRepository for SqliteSportsRepository {
    async fn create(&self, sports: NewSports) -> Result<Sports> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        // Position is computed inside the write so concurrent creates
        // serialize on the database write lock.
        sqlx::query(
            r#"
            INSERT INTO sports (
                id, title, description, thumbnail, sports_type, src,
                sort_order, created_at, updated_at
            )
            SELECT ?, ?, ?, ?, ?, ?, COALESCE(MAX(sort_order), 0) + 1, ?, ?
            FROM sports
            "#,
        )
        .bind(id.to_string())
        .bind(&sports.title)
        .bind(&sports.description)
        .bind(&sports.thumbnail)
        .bind(sports.sports_type.as_str())
        .bind(&sports.src)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created sports entry".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Sports>> {
        let row = sqlx::query_as::<_, SportsRow>(
            r#"
            SELECT id, title, description, thumbnail, sports_type, src,
                   sort_order, created_at, updated_at
            FROM sports
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_sports).transpose()
    }

    async fn list(&self) -> Result<Vec<Sports>> {
        let rows = sqlx::query_as::<_, SportsRow>(
            r#"
            SELECT id, title, description, thumbnail, sports_type, src,
                   sort_order, created_at, updated_at
            FROM sports
            ORDER BY sort_order ASC, created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_sports).collect()
    }

    async fn update(&self, id: Uuid, request: UpdateSportsRequest) -> Result<Sports> {
        let existing = self.find_by_id(id).await?.ok_or_else(|| {
            AppError::NotFound("Sports not found".to_string())
        })?;

        let now = Utc::now().naive_utc();

        let title = request.title.unwrap_or(existing.title);
        let description = request.description.unwrap_or(existing.description);
        let thumbnail = request.thumbnail.or(existing.thumbnail);
        let sports_type = request.sports_type.unwrap_or(existing.sports_type);
        let src = request.src.unwrap_or(existing.src);
        let order = request.order.unwrap_or(existing.order);

        sqlx::query(
            r#"
            UPDATE sports
            SET title = ?, description = ?, thumbnail = ?, sports_type = ?,
                src = ?, sort_order = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&title)
        .bind(&description)
        .bind(&thumbnail)
        .bind(sports_type.as_str())
        .bind(&src)
        .bind(order)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated sports entry".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM sports WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn reorder(&self, items: &[ReorderItem]) -> Result<u64> {
        let now = Utc::now().naive_utc();
        let mut tx = self.pool.begin().await?;
        let mut updated = 0;

        for item in items {
            let result = sqlx::query("UPDATE sports SET sort_order = ?, updated_at = ? WHERE id = ?")
                .bind(item.order)
                .bind(now)
                .bind(item.id.to_string())
                .execute(&mut *tx)
                .await?;
            updated += result.rows_affected();
        }

        tx.commit().await?;
        Ok(updated)
    }
}
