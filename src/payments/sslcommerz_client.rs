use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Serialize;

use crate::{
    config::GatewayConfig,
    error::{AppError, Result},
    payments::{PaymentGateway, SessionRequest, SessionResponse, ValidationResponse},
};

/// HTTP client for an SSLCommerz-compatible hosted checkout.
pub struct SslCommerzGateway {
    client: Client,
    store_id: String,
    store_password: String,
    session_api: String,
    validation_api: String,
}

#[derive(Serialize)]
struct SessionForm<'a> {
    store_id: &'a str,
    store_passwd: &'a str,
    #[serde(flatten)]
    request: &'a SessionRequest,
}

#[derive(Serialize)]
struct ValidationQuery<'a> {
    val_id: &'a str,
    store_id: &'a str,
    store_passwd: &'a str,
    format: &'a str,
}

impl SslCommerzGateway {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            client: Client::new(),
            store_id: config.store_id.clone(),
            store_password: config.store_password.clone(),
            session_api: config.session_api.clone(),
            validation_api: config.validation_api.clone(),
        }
    }
}

#[async_trait]
impl PaymentGateway for SslCommerzGateway {
    async fn create_session(&self, request: &SessionRequest) -> Result<SessionResponse> {
        let body = serde_urlencoded::to_string(SessionForm {
            store_id: &self.store_id,
            store_passwd: &self.store_password,
            request,
        })
        .map_err(|e| AppError::Internal(format!("Failed to encode session request: {}", e)))?;

        tracing::debug!("Requesting gateway session for {}", request.tran_id);

        let response = self
            .client
            .post(&self.session_api)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?
            .error_for_status()?
            .json::<SessionResponse>()
            .await?;

        Ok(response)
    }

    async fn validate(&self, val_id: &str) -> Result<ValidationResponse> {
        tracing::debug!("Validating gateway payment {}", val_id);

        let response = self
            .client
            .get(&self.validation_api)
            .query(&ValidationQuery {
                val_id,
                store_id: &self.store_id,
                store_passwd: &self.store_password,
                format: "json",
            })
            .send()
            .await?
            .error_for_status()?
            .json::<ValidationResponse>()
            .await?;

        Ok(response)
    }
}
