use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    api::{
        extract::{ApiJson, CallbackPayload},
        response::ApiResponse,
        state::AppState,
    },
    domain::{
        ConfirmationResult, InitiatePaymentRequest, Payment, PaymentSession, PaymentStats,
        PaymentStatus, VALID_STATUS,
    },
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct InitiateBody {
    #[serde(alias = "userId")]
    user_id: Option<String>,
    #[serde(alias = "packageId")]
    package_id: Option<String>,
    amount: Option<f64>,
    #[serde(alias = "customerName")]
    customer_name: Option<String>,
    #[serde(alias = "customerEmail")]
    customer_email: Option<String>,
    #[serde(alias = "customerPhone")]
    customer_phone: Option<String>,
}

/// Fields the gateway posts to the callback and IPN URLs. Everything is
/// optional so that missing fields turn into our own 400s or redirects.
#[derive(Debug, Deserialize, Default)]
pub struct CallbackForm {
    tran_id: Option<String>,
    total_amount: Option<Value>,
    amount: Option<Value>,
    status: Option<String>,
    val_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    status: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn is_present(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

pub async fn initiate(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<InitiateBody>,
) -> Result<ApiResponse<PaymentSession>> {
    let missing = || {
        AppError::BadRequest(
            "Missing required fields: user_id, package_id, amount, customer_name, customer_email, customer_phone"
                .to_string(),
        )
    };

    let request = InitiatePaymentRequest {
        user_id: non_empty(body.user_id).ok_or_else(missing)?,
        package_id: non_empty(body.package_id).ok_or_else(missing)?,
        amount: body.amount.ok_or_else(missing)?,
        customer_name: non_empty(body.customer_name).ok_or_else(missing)?,
        customer_email: non_empty(body.customer_email).ok_or_else(missing)?,
        customer_phone: non_empty(body.customer_phone).ok_or_else(missing)?,
    };

    let session = state.service_context.payment_service.initiate(request).await?;

    Ok(ApiResponse::success_with_message(
        session,
        "Payment session initiated successfully",
    ))
}

/// Frontend-driven validation after the gateway reports back.
pub async fn validate(
    State(state): State<AppState>,
    CallbackPayload(form): CallbackPayload<CallbackForm>,
) -> Result<Response> {
    let tran_id = non_empty(form.tran_id)
        .filter(|_| is_present(&form.total_amount))
        .ok_or_else(|| {
            AppError::BadRequest("Missing required fields: tran_id, total_amount".to_string())
        })?;

    let payments = &state.service_context.payment_service;
    let reported_success = matches!(form.status.as_deref(), Some(VALID_STATUS) | Some("success"));

    if reported_success {
        let val_id = non_empty(form.val_id)
            .ok_or_else(|| AppError::BadRequest("Missing val_id".to_string()))?;

        let validation = payments.validate(&val_id).await?;
        let result: ConfirmationResult = payments.confirm(&tran_id, &validation).await?;

        Ok(ApiResponse::success_with_message(result, "Payment validated and confirmed").into_response())
    } else {
        let payment = payments.update_status(&tran_id, PaymentStatus::Failed).await?;

        Ok((
            StatusCode::BAD_REQUEST,
            ApiResponse::failure_with_data(payment, "Payment validation failed"),
        )
            .into_response())
    }
}

/// Server-to-server notification from the gateway.
pub async fn ipn(
    State(state): State<AppState>,
    CallbackPayload(form): CallbackPayload<CallbackForm>,
) -> Result<Response> {
    let tran_id = non_empty(form.tran_id)
        .filter(|_| is_present(&form.total_amount) || is_present(&form.amount))
        .ok_or_else(|| AppError::BadRequest("Missing required fields in IPN".to_string()))?;

    let val_id = non_empty(form.val_id).unwrap_or_default();

    let payments = &state.service_context.payment_service;
    let validation = payments.validate(&val_id).await?;

    if validation.status == VALID_STATUS {
        payments.confirm(&tran_id, &validation).await?;
        Ok(ApiResponse::message("IPN processed successfully").into_response())
    } else {
        tracing::warn!("IPN for {} rejected with status {}", tran_id, validation.status);
        payments.update_status(&tran_id, PaymentStatus::Failed).await?;

        Ok((
            StatusCode::BAD_REQUEST,
            ApiResponse::failure("Payment validation failed in IPN"),
        )
            .into_response())
    }
}

pub async fn details(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<ApiResponse<Payment>> {
    let payment = state
        .service_context
        .payment_service
        .get_details(&transaction_id)
        .await?;
    Ok(ApiResponse::success_with_message(
        payment,
        "Payment details retrieved successfully",
    ))
}

pub async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<Payment>>> {
    let payments = state
        .service_context
        .payment_service
        .list_for_user(&user_id)
        .await?;
    Ok(ApiResponse::success_with_message(
        payments,
        "User payments retrieved successfully",
    ))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    ApiJson(body): ApiJson<StatusBody>,
) -> Result<ApiResponse<Payment>> {
    let status = non_empty(body.status)
        .ok_or_else(|| AppError::BadRequest("Status field is required".to_string()))?;

    let payment = state
        .service_context
        .payment_service
        .update_status_str(&transaction_id, &status)
        .await?;
    Ok(ApiResponse::success_with_message(
        payment,
        "Payment status updated successfully",
    ))
}

pub async fn stats(State(state): State<AppState>) -> Result<ApiResponse<PaymentStats>> {
    let stats = state.service_context.payment_service.stats().await?;
    Ok(ApiResponse::success_with_message(
        stats,
        "Payment statistics retrieved successfully",
    ))
}

/// Browser redirect after a successful checkout. Always answers with a
/// redirect to the frontend, never with an error body.
pub async fn success(
    State(state): State<AppState>,
    payload: std::result::Result<CallbackPayload<CallbackForm>, AppError>,
) -> Redirect {
    let server = &state.settings.server;

    let form = match payload {
        Ok(CallbackPayload(form)) => form,
        Err(e) => {
            tracing::warn!("Unreadable payment success callback: {}", e);
            return Redirect::to(&server.frontend_payment_url("fail", &[("error", "validation_failed")]));
        }
    };

    let Some(tran_id) = non_empty(form.tran_id) else {
        return Redirect::to(&server.frontend_payment_url(
            "fail",
            &[("error", "missing_transaction_id")],
        ));
    };
    let val_id = non_empty(form.val_id).unwrap_or_default();

    let payments = &state.service_context.payment_service;
    let outcome = match payments.validate(&val_id).await {
        Ok(validation) => payments.confirm(&tran_id, &validation).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(_) => Redirect::to(&server.frontend_payment_url(
            "success",
            &[("tran_id", &tran_id), ("val_id", &val_id)],
        )),
        Err(e) => {
            tracing::warn!("Payment success callback for {} failed: {}", tran_id, e);
            Redirect::to(&server.frontend_payment_url("fail", &[("error", "validation_failed")]))
        }
    }
}

async fn settle_and_redirect(
    state: &AppState,
    tran_id: Option<String>,
    status: PaymentStatus,
    page: &str,
) -> Redirect {
    let server = &state.settings.server;

    let Some(tran_id) = non_empty(tran_id) else {
        return Redirect::to(&server.frontend_payment_url(
            page,
            &[("error", "missing_transaction_id")],
        ));
    };

    match state
        .service_context
        .payment_service
        .update_status(&tran_id, status)
        .await
    {
        Ok(_) => Redirect::to(&server.frontend_payment_url(page, &[("tran_id", &tran_id)])),
        Err(e) => {
            tracing::warn!("Payment {} callback for {} failed: {}", page, tran_id, e);
            Redirect::to(&server.frontend_payment_url(page, &[("error", "internal_error")]))
        }
    }
}

pub async fn fail(
    State(state): State<AppState>,
    Query(query): Query<CallbackForm>,
) -> Redirect {
    settle_and_redirect(&state, query.tran_id, PaymentStatus::Failed, "fail").await
}

pub async fn fail_post(
    State(state): State<AppState>,
    CallbackPayload(form): CallbackPayload<CallbackForm>,
) -> Redirect {
    settle_and_redirect(&state, form.tran_id, PaymentStatus::Failed, "fail").await
}

pub async fn cancel(
    State(state): State<AppState>,
    Query(query): Query<CallbackForm>,
) -> Redirect {
    settle_and_redirect(&state, query.tran_id, PaymentStatus::Cancelled, "cancel").await
}

pub async fn cancel_post(
    State(state): State<AppState>,
    CallbackPayload(form): CallbackPayload<CallbackForm>,
) -> Redirect {
    settle_and_redirect(&state, form.tran_id, PaymentStatus::Cancelled, "cancel").await
}
