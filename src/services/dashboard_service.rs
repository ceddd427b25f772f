// src/services/dashboard_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::dashboard::{FunnelReport, FunnelStageCount},
    services::funnel::FunnelStage,
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    /// Relatório de conversão: contagem por estágio, na ordem canônica do
    /// funil, com os estágios sem nenhuma submissão zerados.
    pub async fn funnel_report<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<FunnelReport, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let raw = self.repo.funnel_counts(executor, tenant_id).await?;

        let stages = FunnelStage::ALL
            .iter()
            .map(|stage| FunnelStageCount {
                funnel_stage: stage.as_str().to_string(),
                total: raw
                    .iter()
                    .find(|row| row.funnel_stage == stage.as_str())
                    .map(|row| row.total)
                    .unwrap_or(0),
            })
            .collect();

        Ok(FunnelReport { stages })
    }
}
