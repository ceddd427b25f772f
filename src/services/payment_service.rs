// src/services/payment_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CrmRepository, PaymentRepository, SubmissionRepository},
    models::{payment::Payment, submission::Submission},
    services::{draft_store::DraftStore, funnel},
};

#[derive(Clone)]
pub struct PaymentService {
    payment_repo: PaymentRepository,
    submission_repo: SubmissionRepository,
    crm_repo: CrmRepository,
    draft_store: Arc<DraftStore>,
    pool: PgPool,
}

// Resultado do lançamento: o pagamento criado e a submissão como ficou.
#[derive(Debug)]
pub struct RecordedPayment {
    pub payment: Payment,
    pub submission: Submission,
    pub settled: bool,
}

impl PaymentService {
    pub fn new(
        payment_repo: PaymentRepository,
        submission_repo: SubmissionRepository,
        crm_repo: CrmRepository,
        draft_store: Arc<DraftStore>,
        pool: PgPool,
    ) -> Self {
        Self { payment_repo, submission_repo, crm_repo, draft_store, pool }
    }

    /// Registra um pagamento contra a submissão. Quando a soma dos
    /// lançamentos quita o total do pedido, a submissão é finalizada:
    /// status `paid`, funil avança para payment_completed (respeitando a
    /// monotonicidade), cliente de CRM criado/reaproveitado e o rascunho
    /// da sessão é removido.
    pub async fn record_payment(
        &self,
        tenant_id: Uuid,
        submission_id: Uuid,
        amount: Decimal,
        method: &str,
        reference: Option<&str>,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<RecordedPayment, AppError> {
        let mut tx = self.pool.begin().await?;

        let submission = self
            .submission_repo
            .find_by_id(&mut *tx, tenant_id, submission_id)
            .await?
            .ok_or(AppError::SubmissionNotFound)?;

        // Pedido encerrado não recebe mais lançamentos
        if submission.status == "cancelled" || submission.status == "completed" {
            return Err(AppError::InvalidTransition {
                from: submission.status.clone(),
                to: "paid".to_string(),
            });
        }

        let payment = self
            .payment_repo
            .insert_payment(&mut *tx, tenant_id, submission_id, amount, method, reference, paid_at)
            .await?;

        let paid_total =
            self.payment_repo.sum_for_submission(&mut *tx, submission_id).await?;

        let settled = paid_total >= submission.total_amount
            && submission.status == "pending_payment";

        let mut current = submission;

        if settled {
            current = self
                .submission_repo
                .set_status(&mut *tx, tenant_id, submission_id, "paid")
                .await?
                .ok_or(AppError::SubmissionNotFound)?;

            if funnel::should_advance(&current.funnel_stage, "payment_completed") {
                current = self
                    .submission_repo
                    .set_funnel_stage(&mut *tx, tenant_id, submission_id, "payment_completed")
                    .await?
                    .ok_or(AppError::SubmissionNotFound)?;
            }

            // Cria (ou reaproveita por e-mail) o cliente do CRM
            let full_name = match format!("{} {}", current.first_name, current.last_name) {
                name if name.trim().is_empty() => "Consumidor Final".to_string(),
                name => name.trim().to_string(),
            };

            let email = (!current.email.is_empty()).then_some(current.email.as_str());
            let phone = (!current.phone.is_empty()).then_some(current.phone.as_str());

            let client = match self
                .crm_repo
                .find_by_email(&mut *tx, tenant_id, &current.email)
                .await?
            {
                Some(client) => client,
                None => {
                    self.crm_repo
                        .create_client(&mut *tx, tenant_id, &full_name, email, phone, None, None)
                        .await?
                }
            };

            self.submission_repo.attach_client(&mut *tx, submission_id, client.id).await?;
            current.client_id = Some(client.id);
        }

        tx.commit().await?;

        if settled {
            // Rascunho limpo fora da transação: é melhor esforço
            self.draft_store.clear(tenant_id, &current.session_id).await;
            tracing::info!(
                submission_id = %submission_id,
                total = %paid_total,
                "💰 Pagamento quitado; submissão finalizada"
            );
        }

        Ok(RecordedPayment { payment, submission: current, settled })
    }

    pub async fn list_for_submission(
        &self,
        tenant_id: Uuid,
        submission_id: Uuid,
    ) -> Result<Vec<Payment>, AppError> {
        // Garante que a submissão pertence ao tenant antes de listar
        self.submission_repo
            .find_by_id(&self.pool, tenant_id, submission_id)
            .await?
            .ok_or(AppError::SubmissionNotFound)?;

        self.payment_repo.list_for_submission(&self.pool, submission_id).await
    }
}
