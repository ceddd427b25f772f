// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Um serviço notarial oferecido pelo estabelecimento.
// O preço final de um pedido é base + por-documento * quantidade.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotaryService {
    pub id: Uuid,
    pub tenant_id: Uuid,

    // Identificador opaco usado pelo formulário (selectedServices)
    #[schema(example = "apostille")]
    pub slug: String,

    #[schema(example = "Apostilamento de Haia")]
    pub name: String,

    pub description: Option<String>,

    #[schema(example = 120.0)]
    pub base_price: Decimal,

    #[schema(example = 35.0)]
    pub per_document_price: Decimal,

    // Serviço desativado some do formulário mas continua nos pedidos antigos
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
