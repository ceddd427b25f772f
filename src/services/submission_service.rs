// src/services/submission_service.rs

use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, SubmissionRepository},
    models::{
        catalog::NotaryService,
        form::FormData,
        submission::{Submission, SubmissionStatus},
    },
    services::funnel::{self, FunnelStage},
};

// Janela de candidatas na reconciliação por sessão: as 20 pendentes mais
// recentes, varredura linear.
const SESSION_SCAN_WINDOW: i64 = 20;

// Estágios que o formulário público pode sinalizar diretamente
// (os demais derivam do número do passo no save).
const CLIENT_SIGNALABLE_STAGES: [FunnelStage; 2] =
    [FunnelStage::SummaryViewed, FunnelStage::PaymentPending];

#[derive(Clone)]
pub struct SubmissionService {
    repo: SubmissionRepository,
    catalog_repo: CatalogRepository,
    pool: PgPool,
}

// A decisão do upsert, separada do I/O para ser testável a seco.
#[derive(Debug, PartialEq)]
pub enum UpsertPlan {
    Insert {
        funnel_stage: &'static str,
    },
    Update {
        id: Uuid,
        expected_version: i32,
        // None = o gate de monotonicidade mandou deixar a coluna em paz
        funnel_stage: Option<&'static str>,
    },
}

/// Varre a janela de pendentes atrás da sessão e decide entre criar e
/// atualizar, já aplicando o gate de monotonicidade do funil.
pub fn plan_upsert(
    window: &[Submission],
    session_id: &str,
    candidate: FunnelStage,
) -> UpsertPlan {
    for row in window {
        if row.session_id == session_id {
            let funnel_stage = funnel::should_advance(&row.funnel_stage, candidate.as_str())
                .then(|| candidate.as_str());
            return UpsertPlan::Update {
                id: row.id,
                expected_version: row.version,
                funnel_stage,
            };
        }
    }
    UpsertPlan::Insert { funnel_stage: candidate.as_str() }
}

/// O identificador de sessão é obrigatório antes de qualquer escrita.
pub fn ensure_session_id(session_id: &str) -> Result<(), AppError> {
    if session_id.trim().is_empty() {
        return Err(AppError::SessionRequired);
    }
    Ok(())
}

/// Preço do pedido: para cada serviço selecionado, base + por-documento x
/// quantidade; mais a taxa do método de entrega.
pub fn compute_total(services: &[NotaryService], form: &FormData) -> Result<Decimal, AppError> {
    let mut total = Decimal::ZERO;

    for slug in &form.selected_services {
        let service = services
            .iter()
            .find(|s| s.slug == *slug)
            .ok_or_else(|| AppError::ServiceNotFound(slug.clone()))?;

        let documents = Decimal::from(form.documents_for(slug) as i64);
        total += service.base_price + service.per_document_price * documents;
    }

    if let Some(method) = form.delivery_method {
        total += method.fee();
    }

    Ok(total)
}

impl SubmissionService {
    pub fn new(repo: SubmissionRepository, catalog_repo: CatalogRepository, pool: PgPool) -> Self {
        Self { repo, catalog_repo, pool }
    }

    /// O único caminho de escrita do formulário público: find-or-create
    /// idempotente por sessão. Retorna o id da linha resultante.
    pub async fn save_submission(
        &self,
        tenant_id: Uuid,
        form: &FormData,
        current_step: u32,
        completed_steps: &[u32],
        total_amount: Decimal,
        session_id: &str,
    ) -> Result<Uuid, AppError> {
        // 1. Sessão obrigatória, antes de tocar no banco
        ensure_session_id(session_id)?;

        // 2. Estágio candidato pela tabela de limiares
        let candidate = funnel::stage_for_step(current_step);

        // 3. Janela de pendentes recentes + varredura pela sessão
        let window = self
            .repo
            .list_recent_pending(&self.pool, tenant_id, SESSION_SCAN_WINDOW)
            .await?;

        let plan = plan_upsert(&window, session_id, candidate);

        // Snapshot integral para auditoria/replay (o sessionId vai junto)
        let raw_data = json!({
            "formData": form,
            "currentStep": current_step,
            "completedSteps": completed_steps,
            "totalAmount": total_amount,
            "sessionId": session_id,
        });

        match plan {
            UpsertPlan::Insert { funnel_stage } => {
                let submission = self
                    .repo
                    .insert(
                        &self.pool,
                        tenant_id,
                        session_id,
                        form,
                        funnel_stage,
                        current_step as i32,
                        total_amount,
                        &raw_data,
                    )
                    .await?;

                tracing::info!(
                    submission_id = %submission.id,
                    session_id,
                    "📝 Nova submissão criada"
                );
                Ok(submission.id)
            }
            UpsertPlan::Update { id, expected_version, funnel_stage } => {
                let updated = self
                    .repo
                    .update_with_version(
                        &self.pool,
                        id,
                        expected_version,
                        form,
                        funnel_stage,
                        current_step as i32,
                        total_amount,
                        &raw_data,
                    )
                    .await?;

                // Zero linhas = outra gravação incrementou a versão primeiro
                let submission = updated.ok_or(AppError::SubmissionConflict)?;
                Ok(submission.id)
            }
        }
    }

    /// Orçamento calculado no servidor a partir do catálogo.
    pub async fn quote_total(&self, tenant_id: Uuid, form: &FormData) -> Result<Decimal, AppError> {
        let services = self
            .catalog_repo
            .find_by_slugs(&self.pool, tenant_id, &form.selected_services)
            .await?;

        compute_total(&services, form)
    }

    /// Eventos de funil sinalizados pelo formulário (resumo visto, checkout).
    /// Aplica o mesmo gate de monotonicidade do save.
    pub async fn record_funnel_event(
        &self,
        tenant_id: Uuid,
        session_id: &str,
        stage: &str,
    ) -> Result<String, AppError> {
        ensure_session_id(session_id)?;

        let candidate = FunnelStage::parse(stage)
            .filter(|s| CLIENT_SIGNALABLE_STAGES.contains(s))
            .ok_or_else(|| {
                let mut errors = validator::ValidationErrors::new();
                let mut err = validator::ValidationError::new("invalid_stage");
                err.message = Some("invalid_stage".into());
                errors.add("stage", err);
                AppError::ValidationError(errors)
            })?;

        let window = self
            .repo
            .list_recent_pending(&self.pool, tenant_id, SESSION_SCAN_WINDOW)
            .await?;

        let Some(row) = window.iter().find(|s| s.session_id == session_id) else {
            return Err(AppError::SubmissionNotFound);
        };

        if funnel::should_advance(&row.funnel_stage, candidate.as_str()) {
            self.repo
                .set_funnel_stage(&self.pool, tenant_id, row.id, candidate.as_str())
                .await?;
            Ok(candidate.as_str().to_string())
        } else {
            // Evento atrasado ou repetido: o estágio gravado permanece
            Ok(row.funnel_stage.clone())
        }
    }

    /// Liga as submissões pendentes da sessão à conta recém-autenticada.
    pub async fn claim_session(
        &self,
        tenant_id: Uuid,
        session_id: &str,
        user_id: Uuid,
    ) -> Result<u64, AppError> {
        ensure_session_id(session_id)?;
        self.repo.attach_user(&self.pool, tenant_id, session_id, user_id).await
    }

    pub async fn get_submission(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Submission, AppError> {
        self.repo
            .find_by_id(&self.pool, tenant_id, id)
            .await?
            .ok_or(AppError::SubmissionNotFound)
    }

    pub async fn list_submissions(
        &self,
        tenant_id: Uuid,
        status: Option<&str>,
        funnel_stage: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Submission>, AppError> {
        self.repo
            .list(&self.pool, tenant_id, status, funnel_stage, limit.clamp(1, 100), offset.max(0))
            .await
    }

    /// Transição administrativa de status (caminho separado do formulário).
    pub async fn transition(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        next: SubmissionStatus,
    ) -> Result<Submission, AppError> {
        let submission = self.get_submission(tenant_id, id).await?;

        let current = SubmissionStatus::parse(&submission.status).ok_or_else(|| {
            AppError::InvalidTransition {
                from: submission.status.clone(),
                to: next.as_str().to_string(),
            }
        })?;

        if !current.can_transition_to(next) {
            return Err(AppError::InvalidTransition {
                from: submission.status.clone(),
                to: next.as_str().to_string(),
            });
        }

        let updated = self
            .repo
            .set_status(&self.pool, tenant_id, id, next.as_str())
            .await?
            .ok_or(AppError::SubmissionNotFound)?;

        // Pedido concluído fecha o funil, respeitando a monotonicidade
        if next == SubmissionStatus::Completed
            && funnel::should_advance(&updated.funnel_stage, "submission_completed")
        {
            self.repo
                .set_funnel_stage(&self.pool, tenant_id, id, "submission_completed")
                .await?;
        }

        tracing::info!(submission_id = %id, from = %submission.status, to = next.as_str(), "Status alterado");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn submission_pendente(session_id: &str, funnel_stage: &str, version: i32) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            session_id: session_id.to_string(),
            user_id: None,
            client_id: None,
            first_name: "Maria".into(),
            last_name: "da Silva".into(),
            email: "maria@email.com".into(),
            phone: String::new(),
            delivery_method: None,
            status: "pending_payment".into(),
            funnel_stage: funnel_stage.to_string(),
            current_step: 1,
            total_amount: Decimal::ZERO,
            currency: "BRL".into(),
            raw_data: json!({}),
            version,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn servico(slug: &str, base: Decimal, per_doc: Decimal) -> NotaryService {
        NotaryService {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            slug: slug.to_string(),
            name: slug.to_string(),
            description: None,
            base_price: base,
            per_document_price: per_doc,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn sessao_vazia_e_recusada_antes_de_qualquer_escrita() {
        assert!(matches!(ensure_session_id(""), Err(AppError::SessionRequired)));
        assert!(matches!(ensure_session_id("   "), Err(AppError::SessionRequired)));
        assert!(ensure_session_id("session_1_abc").is_ok());
    }

    #[test]
    fn sem_correspondencia_na_janela_o_plano_e_insert() {
        let window = vec![submission_pendente("session_1_aaa", "started", 1)];
        let plan = plan_upsert(&window, "session_2_bbb", FunnelStage::ServicesSelected);
        assert_eq!(plan, UpsertPlan::Insert { funnel_stage: "services_selected" });
    }

    #[test]
    fn sessao_correspondente_atualiza_a_mesma_linha() {
        let row = submission_pendente("session_1_aaa", "services_selected", 3);
        let id = row.id;
        let window = vec![submission_pendente("session_9_zzz", "started", 1), row];

        let plan = plan_upsert(&window, "session_1_aaa", FunnelStage::DocumentsUploaded);
        assert_eq!(
            plan,
            UpsertPlan::Update {
                id,
                expected_version: 3,
                funnel_stage: Some("documents_uploaded"),
            }
        );
    }

    #[test]
    fn regressao_de_funil_deixa_a_coluna_intocada() {
        // O registro já está em personal_info_completed; um save atrasado do
        // passo 1 não pode rebaixar o estágio.
        let row = submission_pendente("session_1_aaa", "personal_info_completed", 5);
        let id = row.id;
        let window = vec![row];

        let plan = plan_upsert(&window, "session_1_aaa", FunnelStage::ServicesSelected);
        assert_eq!(
            plan,
            UpsertPlan::Update { id, expected_version: 5, funnel_stage: None }
        );
    }

    #[test]
    fn dois_saves_crescentes_nunca_rebaixam_o_estagio() {
        // Simula a sequência de chamadas do formulário sobre a mesma sessão
        let mut row = submission_pendente("session_1_aaa", "started", 1);

        for (step, expected_stage) in [
            (1, "services_selected"),
            (2, "documents_uploaded"),
            (1, "documents_uploaded"), // save atrasado: não regride
            (4, "personal_info_completed"),
        ] {
            let window = vec![row.clone()];
            match plan_upsert(&window, "session_1_aaa", funnel::stage_for_step(step)) {
                UpsertPlan::Update { funnel_stage, .. } => {
                    if let Some(stage) = funnel_stage {
                        row.funnel_stage = stage.to_string();
                    }
                    row.version += 1;
                }
                UpsertPlan::Insert { .. } => panic!("não deveria criar outra linha"),
            }
            assert_eq!(row.funnel_stage, expected_stage);
        }
    }

    #[test]
    fn orcamento_soma_base_documentos_e_entrega() {
        use crate::models::form::{DeliveryMethod, UploadedDocument};

        let services = vec![
            servico("apostille", Decimal::new(12000, 2), Decimal::new(3500, 2)),
            servico("sworn-translation", Decimal::new(8000, 2), Decimal::ZERO),
        ];

        let mut form = FormData::default();
        form.selected_services = vec!["apostille".into(), "sworn-translation".into()];
        form.service_documents.insert(
            "apostille".into(),
            vec![
                UploadedDocument { id: "d1".into(), ..Default::default() },
                UploadedDocument { id: "d2".into(), ..Default::default() },
            ],
        );
        form.delivery_method = Some(DeliveryMethod::Courier);

        // 120.00 + 2 x 35.00 + 80.00 + 45.00 de entrega
        let total = compute_total(&services, &form).unwrap();
        assert_eq!(total, Decimal::new(31500, 2));
    }

    #[test]
    fn orcamento_recusa_servico_fora_do_catalogo() {
        let services = vec![servico("apostille", Decimal::ONE, Decimal::ZERO)];
        let mut form = FormData::default();
        form.selected_services = vec!["inexistente".into()];

        assert!(matches!(
            compute_total(&services, &form),
            Err(AppError::ServiceNotFound(slug)) if slug == "inexistente"
        ));
    }

    #[test]
    fn formulario_vazio_orca_zero() {
        let total = compute_total(&[], &FormData::default()).unwrap();
        assert_eq!(total, Decimal::ZERO);
    }
}
