// src/db/settings_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::settings::{TenantSettings, UpdateSettingsRequest},
};

const SETTINGS_COLUMNS: &str =
    "tenant_id, company_name, document_number, address, phone, email, pix_key, pix_key_type, updated_at";

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Busca as configurações; tenant sem linha ganha o registro vazio.
    pub async fn get_settings<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<TenantSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {SETTINGS_COLUMNS} FROM tenant_settings WHERE tenant_id = $1");

        let settings = sqlx::query_as::<_, TenantSettings>(&sql)
            .bind(tenant_id)
            .fetch_optional(executor)
            .await?;

        Ok(settings.unwrap_or(TenantSettings {
            tenant_id,
            company_name: None,
            document_number: None,
            address: None,
            phone: None,
            email: None,
            pix_key: None,
            pix_key_type: None,
            updated_at: None,
        }))
    }

    /// Upsert parcial: campos None preservam o valor atual da coluna.
    pub async fn update_settings<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        update: &UpdateSettingsRequest,
    ) -> Result<TenantSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO tenant_settings
                 (tenant_id, company_name, document_number, address, phone, email, pix_key, pix_key_type, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
             ON CONFLICT (tenant_id) DO UPDATE SET
                 company_name   = COALESCE($2, tenant_settings.company_name),
                 document_number = COALESCE($3, tenant_settings.document_number),
                 address        = COALESCE($4, tenant_settings.address),
                 phone          = COALESCE($5, tenant_settings.phone),
                 email          = COALESCE($6, tenant_settings.email),
                 pix_key        = COALESCE($7, tenant_settings.pix_key),
                 pix_key_type   = COALESCE($8, tenant_settings.pix_key_type),
                 updated_at     = NOW()
             RETURNING {SETTINGS_COLUMNS}"
        );

        let settings = sqlx::query_as::<_, TenantSettings>(&sql)
            .bind(tenant_id)
            .bind(&update.company_name)
            .bind(&update.document_number)
            .bind(&update.address)
            .bind(&update.phone)
            .bind(&update.email)
            .bind(&update.pix_key)
            .bind(&update.pix_key_type)
            .fetch_one(executor)
            .await?;

        Ok(settings)
    }
}
