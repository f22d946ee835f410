pub mod user_service;
pub mod package_service;
pub mod sports_service;
pub mod payment_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::config::Settings;
use crate::payments::PaymentGateway;
use crate::repository::*;
use user_service::UserService;
use package_service::PackageService;
use sports_service::SportsService;
use payment_service::PaymentService;

pub use payment_service::CheckoutOptions;

pub struct ServiceContext {
    pub user_service: Arc<UserService>,
    pub package_service: Arc<PackageService>,
    pub sports_service: Arc<SportsService>,
    pub payment_service: Arc<PaymentService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        db_pool: SqlitePool,
        gateway: Arc<dyn PaymentGateway>,
        settings: &Settings,
    ) -> Self {
        let user_repo = Arc::new(SqliteUserRepository::new(db_pool.clone()));
        let package_repo = Arc::new(SqlitePackageRepository::new(db_pool.clone()));
        let sports_repo = Arc::new(SqliteSportsRepository::new(db_pool.clone()));
        let payment_repo = Arc::new(SqlitePaymentRepository::new(db_pool.clone()));

        let user_service = Arc::new(UserService::new(
            user_repo,
            settings.server.uploads_dir.clone(),
        ));
        let package_service = Arc::new(PackageService::new(package_repo));
        let sports_service = Arc::new(SportsService::new(sports_repo));
        let payment_service = Arc::new(PaymentService::new(
            payment_repo,
            gateway,
            CheckoutOptions::from_settings(settings),
        ));

        Self {
            user_service,
            package_service,
            sports_service,
            payment_service,
            db_pool,
        }
    }
}
