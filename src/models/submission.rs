// src/models/submission.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- STATUS ---

// Ciclo de vida do pedido no back-office.
// Armazenado como texto, igual ao estágio do funil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    PendingPayment,
    Paid,
    InProgress,
    Completed,
    Cancelled,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::PendingPayment => "pending_payment",
            SubmissionStatus::Paid => "paid",
            SubmissionStatus::InProgress => "in_progress",
            SubmissionStatus::Completed => "completed",
            SubmissionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<SubmissionStatus> {
        match value {
            "pending_payment" => Some(SubmissionStatus::PendingPayment),
            "paid" => Some(SubmissionStatus::Paid),
            "in_progress" => Some(SubmissionStatus::InProgress),
            "completed" => Some(SubmissionStatus::Completed),
            "cancelled" => Some(SubmissionStatus::Cancelled),
            _ => None,
        }
    }

    /// Transições permitidas pela operação de back-office.
    /// O salto pending_payment -> paid acontece só pelo registro de pagamento.
    pub fn can_transition_to(self, next: SubmissionStatus) -> bool {
        use SubmissionStatus::*;
        matches!(
            (self, next),
            (PendingPayment, Cancelled)
                | (Paid, InProgress)
                | (Paid, Cancelled)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
        )
    }
}

// --- A SUBMISSÃO ---

// O registro persistido de uma solicitação de serviço.
// Colunas espelham os campos principais do formulário; o snapshot completo
// (incluindo o sessionId) fica no blob raw_data para auditoria e replay.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub tenant_id: Uuid,

    // Identificador gerado no cliente, estável durante um preenchimento
    pub session_id: String,

    // Preenchido quando o cliente autentica e reivindica a sessão
    pub user_id: Option<Uuid>,

    // Vínculo com o registro de CRM, criado na finalização
    pub client_id: Option<Uuid>,

    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,

    pub delivery_method: Option<String>,

    #[schema(example = "pending_payment")]
    pub status: String,

    // Identificador textual do estágio (ver services::funnel)
    #[schema(example = "documents_uploaded")]
    pub funnel_stage: String,

    pub current_step: i32,

    pub total_amount: Decimal,

    #[schema(example = "BRL")]
    pub currency: String,

    // Snapshot integral do FormData + metadados do save
    pub raw_data: Value,

    // Token de concorrência otimista: incrementa a cada gravação do formulário
    pub version: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_faz_parse_do_proprio_identificador() {
        for status in [
            SubmissionStatus::PendingPayment,
            SubmissionStatus::Paid,
            SubmissionStatus::InProgress,
            SubmissionStatus::Completed,
            SubmissionStatus::Cancelled,
        ] {
            assert_eq!(SubmissionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SubmissionStatus::parse("outro"), None);
    }

    #[test]
    fn transicoes_de_status_respeitam_o_ciclo_de_vida() {
        use SubmissionStatus::*;
        assert!(Paid.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(PendingPayment.can_transition_to(Cancelled));

        // pending_payment -> paid só via pagamento registrado
        assert!(!PendingPayment.can_transition_to(Paid));
        assert!(!Completed.can_transition_to(InProgress));
        assert!(!Cancelled.can_transition_to(Paid));
    }
}
