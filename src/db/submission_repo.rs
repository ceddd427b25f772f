// src/db/submission_repo.rs

use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{form::FormData, submission::Submission},
};

const SUBMISSION_COLUMNS: &str = "id, tenant_id, session_id, user_id, client_id, first_name, \
                                  last_name, email, phone, delivery_method, status, funnel_stage, \
                                  current_step, total_amount, currency, raw_data, version, \
                                  created_at, updated_at";

#[derive(Clone)]
pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A janela de candidatas do upsert: as pendentes mais recentes.
    /// A varredura do session_id acontece no serviço, em memória.
    pub async fn list_recent_pending<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Submission>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {SUBMISSION_COLUMNS}
             FROM submissions
             WHERE tenant_id = $1 AND status = 'pending_payment'
             ORDER BY updated_at DESC
             LIMIT $2"
        );

        let rows = sqlx::query_as::<_, Submission>(&sql)
            .bind(tenant_id)
            .bind(limit)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }

    /// Primeira gravação de uma sessão: nasce pendente, versão 1.
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        session_id: &str,
        form: &FormData,
        funnel_stage: &str,
        current_step: i32,
        total_amount: Decimal,
        raw_data: &Value,
    ) -> Result<Submission, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO submissions
                 (tenant_id, session_id, first_name, last_name, email, phone,
                  delivery_method, status, funnel_stage, current_step,
                  total_amount, currency, raw_data)
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending_payment', $8, $9, $10, $11, $12)
             RETURNING {SUBMISSION_COLUMNS}"
        );

        let submission = sqlx::query_as::<_, Submission>(&sql)
            .bind(tenant_id)
            .bind(session_id)
            .bind(&form.first_name)
            .bind(&form.last_name)
            .bind(&form.email)
            .bind(&form.phone)
            .bind(form.delivery_method.map(|m| m.as_str()))
            .bind(funnel_stage)
            .bind(current_step)
            .bind(total_amount)
            .bind(&form.currency)
            .bind(raw_data)
            .fetch_one(executor)
            .await?;

        Ok(submission)
    }

    /// Atualização idempotente por sessão, guardada pela coluna de versão.
    /// `funnel_stage = None` deixa a coluna intocada (o gate de
    /// monotonicidade decidiu não avançar). Retorna None se a versão
    /// esperada já não existe: gravação concorrente venceu.
    pub async fn update_with_version<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        expected_version: i32,
        form: &FormData,
        funnel_stage: Option<&str>,
        current_step: i32,
        total_amount: Decimal,
        raw_data: &Value,
    ) -> Result<Option<Submission>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Duas queries explícitas em vez de SQL montado dinamicamente:
        // a diferença é exatamente uma coluna.
        let query = if let Some(stage) = funnel_stage {
            let sql = format!(
                "UPDATE submissions SET
                     first_name = $3, last_name = $4, email = $5, phone = $6,
                     delivery_method = $7, current_step = $8, total_amount = $9,
                     currency = $10, raw_data = $11, funnel_stage = $12,
                     version = version + 1, updated_at = NOW()
                 WHERE id = $1 AND version = $2
                 RETURNING {SUBMISSION_COLUMNS}"
            );
            sqlx::query_as::<_, Submission>(&sql)
                .bind(id)
                .bind(expected_version)
                .bind(&form.first_name)
                .bind(&form.last_name)
                .bind(&form.email)
                .bind(&form.phone)
                .bind(form.delivery_method.map(|m| m.as_str()))
                .bind(current_step)
                .bind(total_amount)
                .bind(&form.currency)
                .bind(raw_data)
                .bind(stage)
                .fetch_optional(executor)
                .await?
        } else {
            let sql = format!(
                "UPDATE submissions SET
                     first_name = $3, last_name = $4, email = $5, phone = $6,
                     delivery_method = $7, current_step = $8, total_amount = $9,
                     currency = $10, raw_data = $11,
                     version = version + 1, updated_at = NOW()
                 WHERE id = $1 AND version = $2
                 RETURNING {SUBMISSION_COLUMNS}"
            );
            sqlx::query_as::<_, Submission>(&sql)
                .bind(id)
                .bind(expected_version)
                .bind(&form.first_name)
                .bind(&form.last_name)
                .bind(&form.email)
                .bind(&form.phone)
                .bind(form.delivery_method.map(|m| m.as_str()))
                .bind(current_step)
                .bind(total_amount)
                .bind(&form.currency)
                .bind(raw_data)
                .fetch_optional(executor)
                .await?
        };

        Ok(query)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Submission>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {SUBMISSION_COLUMNS}
             FROM submissions
             WHERE tenant_id = $1 AND id = $2"
        );

        let submission = sqlx::query_as::<_, Submission>(&sql)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(submission)
    }

    /// Listagem do back-office com filtros opcionais.
    pub async fn list<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        status: Option<&str>,
        funnel_stage: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Submission>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {SUBMISSION_COLUMNS}
             FROM submissions
             WHERE tenant_id = $1
               AND ($2::text IS NULL OR status = $2)
               AND ($3::text IS NULL OR funnel_stage = $3)
             ORDER BY updated_at DESC
             LIMIT $4 OFFSET $5"
        );

        let rows = sqlx::query_as::<_, Submission>(&sql)
            .bind(tenant_id)
            .bind(status)
            .bind(funnel_stage)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }

    /// Escrita administrativa de status (caminho separado do formulário;
    /// aqui vale last-write-wins por linha).
    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
        status: &str,
    ) -> Result<Option<Submission>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE submissions
             SET status = $3, updated_at = NOW()
             WHERE tenant_id = $1 AND id = $2
             RETURNING {SUBMISSION_COLUMNS}"
        );

        let submission = sqlx::query_as::<_, Submission>(&sql)
            .bind(tenant_id)
            .bind(id)
            .bind(status)
            .fetch_optional(executor)
            .await?;

        Ok(submission)
    }

    /// Avança o estágio do funil (o serviço já aplicou o gate de rank).
    pub async fn set_funnel_stage<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
        funnel_stage: &str,
    ) -> Result<Option<Submission>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE submissions
             SET funnel_stage = $3, updated_at = NOW()
             WHERE tenant_id = $1 AND id = $2
             RETURNING {SUBMISSION_COLUMNS}"
        );

        let submission = sqlx::query_as::<_, Submission>(&sql)
            .bind(tenant_id)
            .bind(id)
            .bind(funnel_stage)
            .fetch_optional(executor)
            .await?;

        Ok(submission)
    }

    /// Reivindicação: liga as submissões pendentes da sessão à conta criada.
    pub async fn attach_user<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        session_id: &str,
        user_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE submissions
             SET user_id = $3, updated_at = NOW()
             WHERE tenant_id = $1 AND session_id = $2
               AND status = 'pending_payment' AND user_id IS NULL",
        )
        .bind(tenant_id)
        .bind(session_id)
        .bind(user_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Vincula o registro de CRM criado na finalização.
    pub async fn attach_client<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        client_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE submissions SET client_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(client_id)
        .execute(executor)
        .await?;

        Ok(())
    }
}
