use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{Payment, PaymentStatus, StatusBreakdown},
    error::{AppError, Result},
    repository::PaymentRepository,
};

#[derive(FromRow)]
struct PaymentRow {
    id: String,
    transaction_id: String,
    user_id: String,
    package_id: String,
    amount: f64,
    currency: String,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    status: String,
    payment_method: String,
    validation_id: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(FromRow)]
struct BreakdownRow {
    status: String,
    count: i64,
    total_amount: f64,
}

pub struct SqlitePaymentRepository {
    pool: SqlitePool,
}

impl SqlitePaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_payment(row: PaymentRow) -> Result<Payment> {
        Ok(Payment {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            transaction_id: row.transaction_id,
            user_id: row.user_id,
            package_id: row.package_id,
            amount: row.amount,
            currency: row.currency,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            customer_phone: row.customer_phone,
            status: Self::parse_payment_status(&row.status)?,
            payment_method: row.payment_method,
            validation_id: row.validation_id,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn parse_payment_status(s: &str) -> Result<PaymentStatus> {
        PaymentStatus::from_str(s)
            .ok_or_else(|| AppError::Database(format!("Invalid payment status: {}", s)))
    }
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepository {
    async fn create(&self, payment: Payment) -> Result<Payment> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, transaction_id, user_id, package_id, amount, currency,
                customer_name, customer_email, customer_phone, status,
                payment_method, validation_id, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(payment.id.to_string())
        .bind(&payment.transaction_id)
        .bind(&payment.user_id)
        .bind(&payment.package_id)
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(&payment.customer_name)
        .bind(&payment.customer_email)
        .bind(&payment.customer_phone)
        .bind(payment.status.as_str())
        .bind(&payment.payment_method)
        .bind(&payment.validation_id)
        .bind(payment.created_at.naive_utc())
        .bind(payment.updated_at.naive_utc())
        .execute(&self.pool)
        .await?;

        self.find_by_transaction_id(&payment.transaction_id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created payment".to_string())
        })
    }

    async fn find_by_transaction_id(&self, transaction_id: &str) -> Result<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, transaction_id, user_id, package_id, amount, currency,
                   customer_name, customer_email, customer_phone, status,
                   payment_method, validation_id, created_at, updated_at
            FROM payments
            WHERE transaction_id = ?
            "#
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_payment).transpose()
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, transaction_id, user_id, package_id, amount, currency,
                   customer_name, customer_email, customer_phone, status,
                   payment_method, validation_id, created_at, updated_at
            FROM payments
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_payment)
            .collect()
    }

    async fn update_status(
        &self,
        transaction_id: &str,
        status: PaymentStatus,
        validation_id: Option<String>,
    ) -> Result<Option<Payment>> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = ?,
                validation_id = COALESCE(?, validation_id),
                updated_at = ?
            WHERE transaction_id = ?
            "#
        )
        .bind(status.as_str())
        .bind(&validation_id)
        .bind(now)
        .bind(transaction_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_transaction_id(transaction_id).await
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM payments")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn status_breakdown(&self) -> Result<Vec<StatusBreakdown>> {
        let rows = sqlx::query_as::<_, BreakdownRow>(
            r#"
            SELECT status, COUNT(*) AS count, COALESCE(SUM(amount), 0.0) AS total_amount
            FROM payments
            GROUP BY status
            ORDER BY status ASC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(StatusBreakdown {
                    status: Self::parse_payment_status(&row.status)?,
                    count: row.count,
                    total_amount: row.total_amount,
                })
            })
            .collect()
    }
}
