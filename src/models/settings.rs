// src/models/settings.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Identidade do estabelecimento, usada no cabeçalho do recibo em PDF
// e no bloco de pagamento Pix.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantSettings {
    #[schema(ignore)] // O contexto (Header) já define o estabelecimento
    pub tenant_id: Uuid,

    #[schema(example = "Cartório Central Ltda")]
    pub company_name: Option<String>,

    #[schema(example = "12.345.678/0001-99")]
    pub document_number: Option<String>,

    #[schema(example = "Rua das Flores, 123 - Centro")]
    pub address: Option<String>,

    #[schema(example = "(11) 99999-8888")]
    pub phone: Option<String>,

    #[schema(example = "contato@cartorio.com")]
    pub email: Option<String>,

    #[schema(example = "12.345.678/0001-99")]
    pub pix_key: Option<String>,

    #[schema(example = "CNPJ")]
    pub pix_key_type: Option<String>,

    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[schema(example = "Cartório Central Ltda")]
    pub company_name: Option<String>,

    #[schema(example = "12.345.678/0001-99")]
    pub document_number: Option<String>,

    #[schema(example = "chave@pix.com.br")]
    pub pix_key: Option<String>,

    #[schema(example = "CNPJ")]
    pub pix_key_type: Option<String>,

    #[schema(example = "Av. Paulista, 1000")]
    pub address: Option<String>,

    pub phone: Option<String>,
    pub email: Option<String>,
}
