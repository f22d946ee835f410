use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        extract_video_src, CreateSportsRequest, NewSports, ReorderItem, Sports,
        UpdateSportsRequest,
    },
    error::{AppError, Result},
    repository::SportsRepository,
};

pub struct SportsService {
    repo: Arc<dyn SportsRepository>,
}

impl SportsService {
    pub fn new(repo: Arc<dyn SportsRepository>) -> Self {
        Self { repo }
    }

    /// Create an entry at the end of the list
    pub async fn create(&self, request: CreateSportsRequest) -> Result<Sports> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::BadRequest("Title is required".to_string()));
        }
        if request.description.trim().is_empty() {
            return Err(AppError::BadRequest("Description is required".to_string()));
        }

        let src = extract_video_src(&request.src);
        if src.is_empty() {
            return Err(AppError::BadRequest("Invalid video source".to_string()));
        }

        let sports = self
            .repo
            .create(NewSports {
                title,
                description: request.description,
                thumbnail: request.thumbnail,
                sports_type: request.sports_type,
                src,
            })
            .await?;

        tracing::info!("Created sports entry {} at position {}", sports.id, sports.order);
        Ok(sports)
    }

    /// All entries in display order
    pub async fn list(&self) -> Result<Vec<Sports>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Sports> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sports not found".to_string()))
    }

    pub async fn update(&self, id: Uuid, mut request: UpdateSportsRequest) -> Result<Sports> {
        if let Some(title) = request.title.take() {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(AppError::BadRequest("Title is required".to_string()));
            }
            request.title = Some(title);
        }

        if let Some(ref description) = request.description {
            if description.trim().is_empty() {
                return Err(AppError::BadRequest("Description is required".to_string()));
            }
        }

        if let Some(src) = request.src.take() {
            let src = extract_video_src(&src);
            if src.is_empty() {
                return Err(AppError::BadRequest("Invalid video source".to_string()));
            }
            request.src = Some(src);
        }

        self.repo.update(id, request).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.get(id).await?;
        self.repo.delete(id).await
    }

    /// Apply new positions; unknown ids are skipped. Returns how many moved.
    pub async fn reorder(&self, items: &[ReorderItem]) -> Result<u64> {
        if items.is_empty() {
            return Err(AppError::BadRequest("Reorder list must not be empty".to_string()));
        }

        let updated = self.repo.reorder(items).await?;
        if updated < items.len() as u64 {
            tracing::warn!(
                "Reorder skipped {} unknown sports entries",
                items.len() as u64 - updated
            );
        }
        Ok(updated)
    }
}
