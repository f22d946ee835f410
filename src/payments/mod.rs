use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod sslcommerz_client;

pub use sslcommerz_client::SslCommerzGateway;

/// Checkout session parameters. Store credentials are added by the gateway client.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionRequest {
    pub total_amount: f64,
    pub currency: String,
    pub tran_id: String,
    pub success_url: String,
    pub fail_url: String,
    pub cancel_url: String,
    pub ipn_url: String,
    pub cus_name: String,
    pub cus_email: String,
    pub cus_phone: String,
    pub shipping_method: String,
    pub product_name: String,
    pub product_category: String,
    pub product_profile: String,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct SessionResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sessionkey: Option<String>,
    #[serde(default, rename = "GatewayPageURL")]
    pub gateway_page_url: Option<String>,
    #[serde(default, rename = "redirectGatewayURL")]
    pub redirect_gateway_url: Option<String>,
    #[serde(default)]
    pub failedreason: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
}

impl SessionResponse {
    pub fn is_failed(&self) -> bool {
        self.status.as_deref() == Some("FAILED")
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.status_message
            .as_deref()
            .or(self.failedreason.as_deref())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ValidationResponse {
    pub status: String,
    #[serde(default)]
    pub tran_id: Option<String>,
    #[serde(default)]
    pub val_id: Option<String>,
    #[serde(default)]
    pub tran_date: Option<String>,
    #[serde(default, alias = "tran_amount")]
    pub amount: Option<String>,
    #[serde(default)]
    pub store_amount: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub bank_tran_id: Option<String>,
    #[serde(default)]
    pub card_type: Option<String>,
    #[serde(default)]
    pub card_no: Option<String>,
    #[serde(default)]
    pub card_issuer: Option<String>,
    #[serde(default)]
    pub card_brand: Option<String>,
    #[serde(default)]
    pub card_issuer_country: Option<String>,
    #[serde(default)]
    pub card_issuer_country_code: Option<String>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a hosted checkout session.
    async fn create_session(&self, request: &SessionRequest) -> Result<SessionResponse>;
    /// Look up a completed checkout by the gateway's validation id.
    async fn validate(&self, val_id: &str) -> Result<ValidationResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_response_parsing() {
        let ok: SessionResponse = serde_json::from_str(
            r#"{"status":"SUCCESS","sessionkey":"abc","GatewayPageURL":"https://pay.example/abc"}"#,
        )
        .unwrap();
        assert!(!ok.is_failed());
        assert_eq!(ok.gateway_page_url.as_deref(), Some("https://pay.example/abc"));

        let failed: SessionResponse =
            serde_json::from_str(r#"{"status":"FAILED","failedreason":"Store Credential Error"}"#)
                .unwrap();
        assert!(failed.is_failed());
        assert_eq!(failed.failure_reason(), Some("Store Credential Error"));
    }

    #[test]
    fn test_validation_response_parsing() {
        let resp: ValidationResponse = serde_json::from_str(
            r#"{"status":"VALID","tran_id":"TXN-1","tran_amount":"49.99","card_type":"VISA-Dutch Bangla"}"#,
        )
        .unwrap();
        assert_eq!(resp.status, "VALID");
        assert_eq!(resp.amount.as_deref(), Some("49.99"));
        assert_eq!(resp.bank_tran_id, None);
    }
}
