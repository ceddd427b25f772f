// src/db/payment_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::payment::Payment};

const PAYMENT_COLUMNS: &str =
    "id, tenant_id, submission_id, amount, method, reference, paid_at, created_at";

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_payment<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        submission_id: Uuid,
        amount: Decimal,
        method: &str,
        reference: Option<&str>,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO payments (tenant_id, submission_id, amount, method, reference, paid_at)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()))
             RETURNING {PAYMENT_COLUMNS}"
        );

        let payment = sqlx::query_as::<_, Payment>(&sql)
            .bind(tenant_id)
            .bind(submission_id)
            .bind(amount)
            .bind(method)
            .bind(reference)
            .bind(paid_at)
            .fetch_one(executor)
            .await?;

        Ok(payment)
    }

    /// Total já pago de uma submissão (para a detecção de quitação).
    pub async fn sum_for_submission<'e, E>(
        &self,
        executor: E,
        submission_id: Uuid,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: Option<Decimal> =
            sqlx::query_scalar("SELECT SUM(amount) FROM payments WHERE submission_id = $1")
                .bind(submission_id)
                .fetch_one(executor)
                .await?;

        Ok(total.unwrap_or(Decimal::ZERO))
    }

    pub async fn list_for_submission<'e, E>(
        &self,
        executor: E,
        submission_id: Uuid,
    ) -> Result<Vec<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {PAYMENT_COLUMNS}
             FROM payments
             WHERE submission_id = $1
             ORDER BY paid_at ASC"
        );

        let payments = sqlx::query_as::<_, Payment>(&sql)
            .bind(submission_id)
            .fetch_all(executor)
            .await?;

        Ok(payments)
    }
}
