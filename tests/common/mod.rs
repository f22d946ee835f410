#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use playpicker::{
    config::Settings,
    error::{AppError, Result},
    payments::{PaymentGateway, SessionRequest, SessionResponse, ValidationResponse},
    service::ServiceContext,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

/// Single-connection in-memory database with the real migrations applied.
pub async fn setup_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// File-backed database shared by several connections, like production.
pub async fn setup_file_pool() -> anyhow::Result<SqlitePool> {
    let path = std::env::temp_dir().join(format!("playpicker-test-{}.db", uuid::Uuid::new_v4()));
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.server.base_url = "http://api.test".to_string();
    settings.server.frontend_url = "http://app.test".to_string();
    settings.server.uploads_dir = std::env::temp_dir()
        .join(format!("playpicker-test-{}", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();
    settings.gateway.store_id = "teststore".to_string();
    settings.gateway.store_password = "testpass".to_string();
    settings
}

pub async fn setup_context(gateway: Arc<FakeGateway>) -> anyhow::Result<(Arc<ServiceContext>, Settings)> {
    let pool = setup_pool().await?;
    let settings = test_settings();
    let context = Arc::new(ServiceContext::new(pool, gateway, &settings));
    Ok((context, settings))
}

/// Scripted stand-in for the hosted checkout.
pub struct FakeGateway {
    session: Mutex<SessionResponse>,
    validations: Mutex<HashMap<String, ValidationResponse>>,
    pub session_requests: Mutex<Vec<SessionRequest>>,
}

impl FakeGateway {
    /// A gateway that accepts every session.
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            session: Mutex::new(SessionResponse {
                status: Some("SUCCESS".to_string()),
                sessionkey: Some("SESSION-KEY".to_string()),
                gateway_page_url: Some("https://gateway.test/pay/SESSION-KEY".to_string()),
                ..Default::default()
            }),
            validations: Mutex::new(HashMap::new()),
            session_requests: Mutex::new(Vec::new()),
        })
    }

    /// A gateway that refuses every session with the given reason.
    pub fn refusing(reason: &str) -> Arc<Self> {
        let gateway = Self::accepting();
        *gateway.session.lock().unwrap() = SessionResponse {
            status: Some("FAILED".to_string()),
            failedreason: Some(reason.to_string()),
            ..Default::default()
        };
        gateway
    }

    /// Make `val_id` validate with `status` for `tran_id`.
    pub fn script_validation(&self, val_id: &str, tran_id: &str, status: &str) {
        self.validations.lock().unwrap().insert(
            val_id.to_string(),
            ValidationResponse {
                status: status.to_string(),
                tran_id: Some(tran_id.to_string()),
                val_id: Some(val_id.to_string()),
                ..Default::default()
            },
        );
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_session(&self, request: &SessionRequest) -> Result<SessionResponse> {
        self.session_requests.lock().unwrap().push(request.clone());
        Ok(self.session.lock().unwrap().clone())
    }

    async fn validate(&self, val_id: &str) -> Result<ValidationResponse> {
        self.validations
            .lock()
            .unwrap()
            .get(val_id)
            .cloned()
            .ok_or_else(|| AppError::Gateway(format!("unknown val_id {}", val_id)))
    }
}
