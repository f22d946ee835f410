use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;

pub mod user_repository;
pub mod package_repository;
pub mod sports_repository;
pub mod payment_repository;

pub use user_repository::SqliteUserRepository;
pub use package_repository::SqlitePackageRepository;
pub use sports_repository::SqliteSportsRepository;
pub use payment_repository::SqlitePaymentRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: CreateUserRequest, password_hash: String) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>>;
    async fn count(&self) -> Result<i64>;
    async fn update(&self, id: Uuid, update: UpdateUserRequest, password_hash: Option<String>) -> Result<User>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait PackageRepository: Send + Sync {
    async fn create(&self, package: CreatePackageRequest) -> Result<Package>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Package>>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Package>>;
    async fn list(&self, active_only: bool) -> Result<Vec<Package>>;
    async fn update(&self, id: Uuid, update: UpdatePackageRequest) -> Result<Package>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait SportsRepository: Send + Sync {
    /// Insert at the end of the list: `order` becomes max(order) + 1, or 1.
    async fn create(&self, sports: NewSports) -> Result<Sports>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Sports>>;
    async fn list(&self) -> Result<Vec<Sports>>;
    async fn update(&self, id: Uuid, update: UpdateSportsRequest) -> Result<Sports>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    /// Returns the number of entries that were found and updated.
    async fn reorder(&self, items: &[ReorderItem]) -> Result<u64>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: Payment) -> Result<Payment>;
    async fn find_by_transaction_id(&self, transaction_id: &str) -> Result<Option<Payment>>;
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Payment>>;
    async fn update_status(
        &self,
        transaction_id: &str,
        status: PaymentStatus,
        validation_id: Option<String>,
    ) -> Result<Option<Payment>>;
    async fn count(&self) -> Result<i64>;
    async fn status_breakdown(&self) -> Result<Vec<StatusBreakdown>>;
}
