use std::sync::Arc;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::Settings,
    domain::*,
    error::{AppError, Result},
    payments::{PaymentGateway, SessionRequest, ValidationResponse},
    repository::PaymentRepository,
};

/// Fixed checkout parameters sent with every gateway session.
#[derive(Debug, Clone)]
pub struct CheckoutOptions {
    pub currency: String,
    pub product_name: String,
    pub product_category: String,
    pub product_profile: String,
    pub success_url: String,
    pub fail_url: String,
    pub cancel_url: String,
    pub ipn_url: String,
}

impl CheckoutOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        let server = &settings.server;
        let gateway = &settings.gateway;
        Self {
            currency: gateway.currency.clone(),
            product_name: gateway.product_name.clone(),
            product_category: gateway.product_category.clone(),
            product_profile: gateway.product_profile.clone(),
            success_url: server.payment_callback_url("success"),
            fail_url: server.payment_callback_url("fail"),
            cancel_url: server.payment_callback_url("cancel"),
            ipn_url: server.payment_callback_url("ipn"),
        }
    }
}

pub struct PaymentService {
    repo: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
    options: CheckoutOptions,
}

impl PaymentService {
    pub fn new(
        repo: Arc<dyn PaymentRepository>,
        gateway: Arc<dyn PaymentGateway>,
        options: CheckoutOptions,
    ) -> Self {
        Self { repo, gateway, options }
    }

    /// Record a pending payment and open a hosted checkout session for it.
    ///
    /// The pending record is kept even when the gateway refuses the session.
    pub async fn initiate(&self, request: InitiatePaymentRequest) -> Result<PaymentSession> {
        let required = [
            &request.user_id,
            &request.package_id,
            &request.customer_name,
            &request.customer_email,
            &request.customer_phone,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(AppError::BadRequest(
                "Missing required fields: user_id, package_id, amount, customer_name, customer_email, customer_phone"
                    .to_string(),
            ));
        }
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(AppError::BadRequest(
                "Invalid payment data: amount must be greater than zero".to_string(),
            ));
        }

        let transaction_id = generate_transaction_id();
        let now = Utc::now();

        let payment = Payment {
            id: Uuid::new_v4(),
            transaction_id: transaction_id.clone(),
            user_id: request.user_id,
            package_id: request.package_id,
            amount: request.amount,
            currency: self.options.currency.clone(),
            customer_name: request.customer_name,
            customer_email: request.customer_email,
            customer_phone: request.customer_phone,
            status: PaymentStatus::Pending,
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
            validation_id: None,
            created_at: now,
            updated_at: now,
        };
        let payment = self.repo.create(payment).await?;

        let session_request = SessionRequest {
            total_amount: payment.amount,
            currency: payment.currency.clone(),
            tran_id: transaction_id.clone(),
            success_url: self.options.success_url.clone(),
            fail_url: self.options.fail_url.clone(),
            cancel_url: self.options.cancel_url.clone(),
            ipn_url: self.options.ipn_url.clone(),
            cus_name: payment.customer_name.clone(),
            cus_email: payment.customer_email.clone(),
            cus_phone: payment.customer_phone.clone(),
            shipping_method: "NO".to_string(),
            product_name: self.options.product_name.clone(),
            product_category: self.options.product_category.clone(),
            product_profile: self.options.product_profile.clone(),
        };

        let response = self.gateway.create_session(&session_request).await?;

        let (session_key, url) = match (&response.sessionkey, &response.gateway_page_url) {
            (Some(key), Some(url)) if !response.is_failed() && !key.is_empty() && !url.is_empty() => {
                (key.clone(), url.clone())
            }
            _ => {
                let reason = response
                    .failure_reason()
                    .unwrap_or("Failed to initiate payment session")
                    .to_string();
                tracing::warn!("Gateway refused session for {}: {}", transaction_id, reason);
                return Err(AppError::BadRequest(reason));
            }
        };

        tracing::info!("Payment {} initiated for user {}", transaction_id, payment.user_id);

        Ok(PaymentSession {
            url,
            transaction_id,
            session_key: Some(session_key),
        })
    }

    /// Ask the gateway whether a checkout identified by `val_id` went through.
    pub async fn validate(&self, val_id: &str) -> Result<ValidationResponse> {
        if val_id.trim().is_empty() {
            return Err(AppError::BadRequest("Missing val_id".to_string()));
        }

        self.gateway.validate(val_id).await.map_err(|e| match e {
            AppError::Gateway(_) => e,
            other => AppError::Gateway(other.to_string()),
        })
    }

    /// Settle a payment from a validation answer: `VALID` completes it,
    /// anything else fails it and is reported as a bad request.
    pub async fn confirm(
        &self,
        transaction_id: &str,
        validation: &ValidationResponse,
    ) -> Result<ConfirmationResult> {
        if self.repo.find_by_transaction_id(transaction_id).await?.is_none() {
            return Err(AppError::NotFound("Payment record not found".to_string()));
        }

        // A validation answer for some other checkout must not settle this one.
        if let Some(ref validated) = validation.tran_id {
            if validated != transaction_id {
                return Err(AppError::BadRequest(format!(
                    "Validation belongs to transaction {}, not {}",
                    validated, transaction_id
                )));
            }
        }

        if validation.status == VALID_STATUS {
            self.repo
                .update_status(transaction_id, PaymentStatus::Completed, validation.val_id.clone())
                .await?;
            tracing::info!("Payment {} completed", transaction_id);

            Ok(ConfirmationResult {
                success: true,
                transaction_id: transaction_id.to_string(),
                status: PaymentStatus::Completed,
                message: "Payment confirmed successfully".to_string(),
            })
        } else {
            self.repo
                .update_status(transaction_id, PaymentStatus::Failed, validation.val_id.clone())
                .await?;
            tracing::warn!(
                "Payment {} failed validation with status {}",
                transaction_id,
                validation.status
            );

            Err(AppError::BadRequest(format!(
                "Payment validation failed: {}",
                validation.status
            )))
        }
    }

    pub async fn get_details(&self, transaction_id: &str) -> Result<Payment> {
        if transaction_id.trim().is_empty() {
            return Err(AppError::BadRequest("Transaction ID is required".to_string()));
        }

        self.repo
            .find_by_transaction_id(transaction_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))
    }

    /// Payments for a user, newest first
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Payment>> {
        if user_id.trim().is_empty() {
            return Err(AppError::BadRequest("User ID is required".to_string()));
        }

        self.repo.find_by_user(user_id).await
    }

    /// Set a status from its wire name (`pending`, `completed`, `failed`, `cancelled`).
    pub async fn update_status_str(&self, transaction_id: &str, status: &str) -> Result<Payment> {
        let status = PaymentStatus::from_str(status).ok_or_else(|| {
            let valid: Vec<&str> = PaymentStatus::ALL.iter().map(|s| s.as_str()).collect();
            AppError::BadRequest(format!(
                "Invalid status. Must be one of: {}",
                valid.join(", ")
            ))
        })?;

        self.update_status(transaction_id, status).await
    }

    pub async fn update_status(&self, transaction_id: &str, status: PaymentStatus) -> Result<Payment> {
        if transaction_id.trim().is_empty() {
            return Err(AppError::BadRequest("Transaction ID is required".to_string()));
        }

        let payment = self
            .repo
            .update_status(transaction_id, status, None)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        tracing::info!("Payment {} marked {}", transaction_id, status.as_str());
        Ok(payment)
    }

    pub async fn stats(&self) -> Result<PaymentStats> {
        let total_payments = self.repo.count().await?;
        let breakdown = self.repo.status_breakdown().await?;

        let total_revenue = breakdown
            .iter()
            .filter(|b| b.status == PaymentStatus::Completed)
            .map(|b| b.total_amount)
            .sum();

        Ok(PaymentStats {
            total_payments,
            total_revenue,
            breakdown,
        })
    }
}
