use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{CreatePackageRequest, Package, UpdatePackageRequest},
    error::{AppError, Result},
    repository::PackageRepository,
};

pub struct PackageService {
    repo: Arc<dyn PackageRepository>,
}

impl PackageService {
    pub fn new(repo: Arc<dyn PackageRepository>) -> Self {
        Self { repo }
    }

    /// Create a new package
    pub async fn create(&self, mut request: CreatePackageRequest) -> Result<Package> {
        request.name = request.name.trim().to_string();
        request.validate()?;

        if self.repo.find_by_name(&request.name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Package '{}' already exists",
                request.name
            )));
        }

        self.repo.create(request).await
    }

    /// List packages, cheapest first
    pub async fn list(&self, active_only: bool) -> Result<Vec<Package>> {
        self.repo.list(active_only).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Package> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Package not found".to_string()))
    }

    /// Update an existing package
    pub async fn update(&self, id: Uuid, mut request: UpdatePackageRequest) -> Result<Package> {
        request.name = request.name.map(|n| n.trim().to_string());
        request.validate()?;

        if let Some(ref name) = request.name {
            if let Some(other) = self.repo.find_by_name(name).await? {
                if other.id != id {
                    return Err(AppError::Conflict(format!(
                        "Package '{}' already exists",
                        name
                    )));
                }
            }
        }

        self.repo.update(id, request).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.get(id).await?;
        self.repo.delete(id).await
    }
}
