// src/db/dashboard_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::dashboard::FunnelStageCount};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Contagem bruta por estágio; o serviço completa os estágios zerados
    /// e impõe a ordem canônica do funil.
    pub async fn funnel_counts<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<Vec<FunnelStageCount>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let counts = sqlx::query_as::<_, FunnelStageCount>(
            "SELECT funnel_stage, COUNT(*) AS total
             FROM submissions
             WHERE tenant_id = $1
             GROUP BY funnel_stage",
        )
        .bind(tenant_id)
        .fetch_all(executor)
        .await?;

        Ok(counts)
    }
}
