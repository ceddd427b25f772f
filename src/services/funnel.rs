// src/services/funnel.rs

// Resolução do estágio do funil de captação.
// Tudo aqui é puro e total: nenhum acesso a banco, nenhum efeito colateral.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Os nove estágios do funil, na ordem canônica.
// A ordem de declaração É a ordem do funil: o rank deriva dela.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    Started,
    ServicesSelected,
    DocumentsUploaded,
    DeliveryMethodSelected,
    PersonalInfoCompleted,
    SummaryViewed,
    PaymentPending,
    PaymentCompleted,
    SubmissionCompleted,
}

impl FunnelStage {
    pub const ALL: [FunnelStage; 9] = [
        FunnelStage::Started,
        FunnelStage::ServicesSelected,
        FunnelStage::DocumentsUploaded,
        FunnelStage::DeliveryMethodSelected,
        FunnelStage::PersonalInfoCompleted,
        FunnelStage::SummaryViewed,
        FunnelStage::PaymentPending,
        FunnelStage::PaymentCompleted,
        FunnelStage::SubmissionCompleted,
    ];

    // O identificador textual é o formato de armazenamento (coluna e raw_data)
    pub fn as_str(&self) -> &'static str {
        match self {
            FunnelStage::Started => "started",
            FunnelStage::ServicesSelected => "services_selected",
            FunnelStage::DocumentsUploaded => "documents_uploaded",
            FunnelStage::DeliveryMethodSelected => "delivery_method_selected",
            FunnelStage::PersonalInfoCompleted => "personal_info_completed",
            FunnelStage::SummaryViewed => "summary_viewed",
            FunnelStage::PaymentPending => "payment_pending",
            FunnelStage::PaymentCompleted => "payment_completed",
            FunnelStage::SubmissionCompleted => "submission_completed",
        }
    }

    /// Parse leniente: identificador desconhecido vira `None`, nunca erro.
    pub fn parse(value: &str) -> Option<FunnelStage> {
        Self::ALL.iter().copied().find(|stage| stage.as_str() == value)
    }

    /// Posição 1..=9 na ordem canônica.
    pub fn rank(&self) -> u8 {
        // +1 porque o rank 0 é reservado para "desconhecido/vazio"
        Self::ALL.iter().position(|s| s == self).unwrap_or(0) as u8 + 1
    }
}

/// Rank de um identificador textual. Vazio ou desconhecido vale 0, o mínimo.
pub fn rank(stage: &str) -> u8 {
    FunnelStage::parse(stage.trim()).map(|s| s.rank()).unwrap_or(0)
}

/// A única porta de avanço do estágio persistido.
/// Candidato vazio nunca avança; caso contrário, só avança com rank
/// estritamente maior que o atual (invariante de monotonicidade).
pub fn should_advance(current: &str, candidate: &str) -> bool {
    if candidate.trim().is_empty() {
        return false;
    }
    rank(candidate) > rank(current)
}

// Tabela ordenada passo-do-formulário -> estágio do funil.
// Avaliada de cima para baixo: o primeiro limiar satisfeito vence.
pub const STEP_STAGE_THRESHOLDS: [(u32, FunnelStage); 4] = [
    (4, FunnelStage::PersonalInfoCompleted),
    (3, FunnelStage::DeliveryMethodSelected),
    (2, FunnelStage::DocumentsUploaded),
    (1, FunnelStage::ServicesSelected),
];

/// Estágio candidato derivado do número do passo atual do formulário.
pub fn stage_for_step(current_step: u32) -> FunnelStage {
    for (min_step, stage) in STEP_STAGE_THRESHOLDS {
        if current_step >= min_step {
            return stage;
        }
    }
    FunnelStage::Started
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_e_estritamente_crescente_na_ordem_declarada() {
        let mut previous = 0;
        for stage in FunnelStage::ALL {
            assert!(stage.rank() > previous, "{:?} não cresceu", stage);
            previous = stage.rank();
        }
    }

    #[test]
    fn rank_de_desconhecido_e_zero() {
        assert_eq!(rank(""), 0);
        assert_eq!(rank("   "), 0);
        assert_eq!(rank("estagio_que_nao_existe"), 0);
        assert_eq!(rank("started"), 1);
        assert_eq!(rank("submission_completed"), 9);
    }

    #[test]
    fn should_advance_equivale_a_comparar_ranks() {
        for a in FunnelStage::ALL {
            for b in FunnelStage::ALL {
                assert_eq!(
                    should_advance(a.as_str(), b.as_str()),
                    b.rank() > a.rank(),
                    "a={:?} b={:?}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn candidato_vazio_nunca_avanca() {
        assert!(!should_advance("started", ""));
        assert!(!should_advance("payment_completed", "  "));
        // Mesmo partindo de um atual desconhecido (rank 0)
        assert!(!should_advance("", ""));
    }

    #[test]
    fn atual_desconhecido_avanca_para_qualquer_estagio_valido() {
        assert!(should_advance("", "started"));
        assert!(should_advance("lixo", "services_selected"));
    }

    #[test]
    fn tabela_de_limiares_mapeia_os_passos() {
        assert_eq!(stage_for_step(0), FunnelStage::Started);
        assert_eq!(stage_for_step(1), FunnelStage::ServicesSelected);
        assert_eq!(stage_for_step(2), FunnelStage::DocumentsUploaded);
        assert_eq!(stage_for_step(3), FunnelStage::DeliveryMethodSelected);
        assert_eq!(stage_for_step(4), FunnelStage::PersonalInfoCompleted);
        // Acima do último limiar continua no mesmo estágio
        assert_eq!(stage_for_step(10), FunnelStage::PersonalInfoCompleted);
    }
}
