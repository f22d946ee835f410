use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub transaction_id: String,
    pub user_id: String,
    pub package_id: String,
    pub amount: f64,
    pub currency: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub status: PaymentStatus,
    pub payment_method: String,
    pub validation_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 4] = [
        PaymentStatus::Pending,
        PaymentStatus::Completed,
        PaymentStatus::Failed,
        PaymentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "completed" => Some(PaymentStatus::Completed),
            "failed" => Some(PaymentStatus::Failed),
            "cancelled" => Some(PaymentStatus::Cancelled),
            _ => None,
        }
    }
}

pub const DEFAULT_PAYMENT_METHOD: &str = "SSLCommerz";

/// Status string the gateway's validation endpoint returns for a good payment.
pub const VALID_STATUS: &str = "VALID";

/// Generate a gateway transaction id: `TXN-<unix millis>-<9 uppercase alphanumerics>`.
pub fn generate_transaction_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect();
    format!("TXN-{}-{}", Utc::now().timestamp_millis(), suffix)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatePaymentRequest {
    pub user_id: String,
    pub package_id: String,
    pub amount: f64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentSession {
    pub url: String,
    pub transaction_id: String,
    pub session_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfirmationResult {
    pub success: bool,
    pub transaction_id: String,
    pub status: PaymentStatus,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusBreakdown {
    pub status: PaymentStatus,
    pub count: i64,
    pub total_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentStats {
    pub total_payments: i64,
    pub total_revenue: f64,
    pub breakdown: Vec<StatusBreakdown>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_id_format() {
        let id = generate_transaction_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "TXN");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        assert_ne!(generate_transaction_id(), generate_transaction_id());
    }

    #[test]
    fn test_status_round_trip() {
        for status in PaymentStatus::ALL {
            assert_eq!(PaymentStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(PaymentStatus::from_str("refunded"), None);
    }
}
