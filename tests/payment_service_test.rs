mod common;

use common::FakeGateway;
use playpicker::{
    domain::{InitiatePaymentRequest, PaymentStatus},
    error::AppError,
};

fn checkout(user_id: &str, amount: f64) -> InitiatePaymentRequest {
    InitiatePaymentRequest {
        user_id: user_id.to_string(),
        package_id: "pkg-pro".to_string(),
        amount,
        customer_name: "Jordan Doe".to_string(),
        customer_email: "jordan@example.com".to_string(),
        customer_phone: "+15550100".to_string(),
    }
}

#[tokio::test]
async fn test_initiate_records_pending_payment() -> anyhow::Result<()> {
    let gateway = FakeGateway::accepting();
    let (ctx, _settings) = common::setup_context(gateway.clone()).await?;
    let payments = &ctx.payment_service;

    let session = payments.initiate(checkout("user-1", 49.99)).await?;
    assert_eq!(session.url, "https://gateway.test/pay/SESSION-KEY");
    assert!(session.transaction_id.starts_with("TXN-"));

    let payment = payments.get_details(&session.transaction_id).await?;
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.amount, 49.99);
    assert_eq!(payment.currency, "USD");
    assert_eq!(payment.payment_method, "SSLCommerz");

    let sent = gateway.session_requests.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].tran_id, session.transaction_id);
    assert_eq!(sent[0].success_url, "http://api.test/api/v1/payment/success");
    assert_eq!(sent[0].ipn_url, "http://api.test/api/v1/payment/ipn");

    Ok(())
}

#[tokio::test]
async fn test_initiate_rejects_bad_input() -> anyhow::Result<()> {
    let (ctx, _settings) = common::setup_context(FakeGateway::accepting()).await?;
    let payments = &ctx.payment_service;

    assert!(matches!(
        payments.initiate(checkout("user-1", 0.0)).await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        payments.initiate(checkout("  ", 10.0)).await,
        Err(AppError::BadRequest(_))
    ));
    assert_eq!(payments.stats().await?.total_payments, 0);

    Ok(())
}

#[tokio::test]
async fn test_refused_session_keeps_pending_record() -> anyhow::Result<()> {
    let (ctx, _settings) = common::setup_context(FakeGateway::refusing("Store is inactive")).await?;
    let payments = &ctx.payment_service;

    match payments.initiate(checkout("user-1", 10.0)).await {
        Err(AppError::BadRequest(reason)) => assert_eq!(reason, "Store is inactive"),
        other => panic!("expected a bad request, got {:?}", other.map(|s| s.url)),
    }

    let history = payments.list_for_user("user-1").await?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, PaymentStatus::Pending);

    Ok(())
}

#[tokio::test]
async fn test_valid_validation_completes_payment() -> anyhow::Result<()> {
    let gateway = FakeGateway::accepting();
    let (ctx, _settings) = common::setup_context(gateway.clone()).await?;
    let payments = &ctx.payment_service;

    let session = payments.initiate(checkout("user-1", 25.0)).await?;
    gateway.script_validation("VAL-1", &session.transaction_id, "VALID");

    let validation = payments.validate("VAL-1").await?;
    let result = payments.confirm(&session.transaction_id, &validation).await?;
    assert!(result.success);
    assert_eq!(result.status, PaymentStatus::Completed);

    let payment = payments.get_details(&session.transaction_id).await?;
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert_eq!(payment.validation_id.as_deref(), Some("VAL-1"));

    Ok(())
}

#[tokio::test]
async fn test_non_valid_validation_fails_payment() -> anyhow::Result<()> {
    let gateway = FakeGateway::accepting();
    let (ctx, _settings) = common::setup_context(gateway.clone()).await?;
    let payments = &ctx.payment_service;

    let session = payments.initiate(checkout("user-1", 25.0)).await?;
    gateway.script_validation("VAL-2", &session.transaction_id, "INVALID_TRANSACTION");

    let validation = payments.validate("VAL-2").await?;
    let result = payments.confirm(&session.transaction_id, &validation).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let payment = payments.get_details(&session.transaction_id).await?;
    assert_eq!(payment.status, PaymentStatus::Failed);

    Ok(())
}

#[tokio::test]
async fn test_validation_for_another_transaction_changes_nothing() -> anyhow::Result<()> {
    let gateway = FakeGateway::accepting();
    let (ctx, _settings) = common::setup_context(gateway.clone()).await?;
    let payments = &ctx.payment_service;

    let session = payments.initiate(checkout("user-1", 25.0)).await?;
    gateway.script_validation("VAL-3", "TXN-someone-else", "VALID");

    let validation = payments.validate("VAL-3").await?;
    let result = payments.confirm(&session.transaction_id, &validation).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let payment = payments.get_details(&session.transaction_id).await?;
    assert_eq!(payment.status, PaymentStatus::Pending);

    assert!(matches!(
        payments.confirm("TXN-missing", &validation).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(payments.validate("").await, Err(AppError::BadRequest(_))));
    assert!(matches!(payments.validate("VAL-unknown").await, Err(AppError::Gateway(_))));

    Ok(())
}

#[tokio::test]
async fn test_status_updates_and_stats() -> anyhow::Result<()> {
    let (ctx, _settings) = common::setup_context(FakeGateway::accepting()).await?;
    let payments = &ctx.payment_service;

    let paid = payments.initiate(checkout("user-1", 30.0)).await?;
    let also_paid = payments.initiate(checkout("user-2", 20.0)).await?;
    let cancelled = payments.initiate(checkout("user-1", 99.0)).await?;
    payments.initiate(checkout("user-3", 5.0)).await?;

    payments.update_status_str(&paid.transaction_id, "completed").await?;
    payments.update_status(&also_paid.transaction_id, PaymentStatus::Completed).await?;
    payments.update_status_str(&cancelled.transaction_id, "cancelled").await?;

    match payments.update_status_str(&paid.transaction_id, "refunded").await {
        Err(AppError::BadRequest(message)) => {
            assert!(message.contains("pending, completed, failed, cancelled"))
        }
        other => panic!("expected a bad request, got {:?}", other.map(|p| p.status)),
    }
    assert!(matches!(
        payments.update_status("TXN-missing", PaymentStatus::Failed).await,
        Err(AppError::NotFound(_))
    ));

    let stats = payments.stats().await?;
    assert_eq!(stats.total_payments, 4);
    assert_eq!(stats.total_revenue, 50.0);

    let completed = stats
        .breakdown
        .iter()
        .find(|b| b.status == PaymentStatus::Completed)
        .map(|b| b.count);
    assert_eq!(completed, Some(2));

    assert_eq!(payments.list_for_user("user-1").await?.len(), 2);

    Ok(())
}
