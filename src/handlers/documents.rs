// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
};

// GET /api/admin/submissions/{id}/receipt
#[utoipa::path(
    get,
    path = "/api/admin/submissions/{id}/receipt",
    tag = "Back-office",
    responses(
        (status = 200, description = "Recibo da solicitação em PDF", content_type = "application/pdf"),
        (status = 404, description = "Submissão não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da submissão"),
        ("x-tenant-id" = Uuid, Header, description = "ID do Estabelecimento")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_submission_receipt(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(submission_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let pdf_bytes = app_state
        .receipt_service
        .generate_submission_receipt(tenant.0, submission_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    // Configura os headers para o navegador baixar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"recibo_{}.pdf\"", submission_id),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}
