// src/handlers/dashboard.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::dashboard::FunnelReport,
};

// GET /api/admin/dashboard/funnel
#[utoipa::path(
    get,
    path = "/api/admin/dashboard/funnel",
    tag = "Back-office",
    responses(
        (status = 200, description = "Contagem de submissões por estágio do funil", body = FunnelReport)
    ),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID do Estabelecimento")
    ),
    security(("api_jwt" = []))
)]
pub async fn funnel_report(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state
        .dashboard_service
        .funnel_report(&app_state.db_pool, tenant.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(report)))
}
