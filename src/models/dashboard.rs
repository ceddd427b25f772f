// src/models/dashboard.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// Contagem de submissões por estágio do funil (relatório de conversão)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStageCount {
    #[schema(example = "services_selected")]
    pub funnel_stage: String,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FunnelReport {
    // Na ordem canônica do funil, estágios sem submissão incluídos com zero
    pub stages: Vec<FunnelStageCount>,
}
