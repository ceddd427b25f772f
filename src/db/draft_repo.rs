// src/db/draft_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, services::draft_store::DraftBackend};

// O backend de produção do DraftStore: um blob JSONB por chave de sessão.
#[derive(Clone)]
pub struct DraftRepository {
    pool: PgPool,
}

impl DraftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DraftBackend for DraftRepository {
    async fn load(&self, tenant_id: Uuid, key: &str) -> Result<Option<String>, AppError> {
        // payload::text para devolver o JSON como string; o parse leniente
        // acontece no DraftStore.
        let payload: Option<String> = sqlx::query_scalar(
            "SELECT payload::text FROM form_drafts WHERE tenant_id = $1 AND draft_key = $2",
        )
        .bind(tenant_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payload)
    }

    async fn store(
        &self,
        tenant_id: Uuid,
        key: &str,
        payload: &str,
        byte_size: i64,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO form_drafts (tenant_id, draft_key, payload, byte_size, updated_at)
             VALUES ($1, $2, $3::jsonb, $4, NOW())
             ON CONFLICT (tenant_id, draft_key) DO UPDATE SET
                 payload = $3::jsonb,
                 byte_size = $4,
                 updated_at = NOW()",
        )
        .bind(tenant_id)
        .bind(key)
        .bind(payload)
        .bind(byte_size)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, tenant_id: Uuid, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM form_drafts WHERE tenant_id = $1 AND draft_key = $2")
            .bind(tenant_id)
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
