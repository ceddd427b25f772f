// src/models/payment.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Um lançamento de pagamento contra uma submissão.
// A conciliação soma os lançamentos e compara com o total do pedido.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub submission_id: Uuid,

    #[schema(example = 155.0)]
    pub amount: Decimal,

    // pix | card | cash | transfer
    #[schema(example = "pix")]
    pub method: String,

    // Identificador externo (E2E do Pix, NSU do cartão...)
    pub reference: Option<String>,

    pub paid_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
