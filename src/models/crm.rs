// src/models/crm.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- CLIENTE ---

// A pessoa atendida pelo cartório. Criado (ou reaproveitado por e-mail)
// quando uma submissão é finalizada, ou manualmente pelo back-office.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub tenant_id: Uuid,

    // Preenchido quando a pessoa cria uma conta com o mesmo e-mail
    pub user_id: Option<Uuid>,

    #[schema(example = "Maria da Silva")]
    pub full_name: String,

    #[schema(example = "maria@email.com")]
    pub email: Option<String>,

    pub phone: Option<String>,

    #[schema(example = "12345678900")]
    pub document_number: Option<String>,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
