// src/handlers/admin.rs

// Back-office de submissões: listagem, detalhe, transição de status e
// lançamentos de pagamento. Caminho de escrita separado do formulário.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::submission::{Submission, SubmissionStatus},
};

// =============================================================================
//  ÁREA 1: SUBMISSÕES
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListSubmissionsQuery {
    pub status: Option<String>,
    pub funnel_stage: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// GET /api/admin/submissions
#[utoipa::path(
    get,
    path = "/api/admin/submissions",
    tag = "Back-office",
    responses(
        (status = 200, description = "Submissões do estabelecimento", body = Vec<Submission>)
    ),
    params(
        ("status" = Option<String>, Query, description = "Filtro por status"),
        ("funnelStage" = Option<String>, Query, description = "Filtro por estágio do funil"),
        ("x-tenant-id" = Uuid, Header, description = "ID do Estabelecimento")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_submissions(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(params): Query<ListSubmissionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let submissions = app_state
        .submission_service
        .list_submissions(
            tenant.0,
            params.status.as_deref(),
            params.funnel_stage.as_deref(),
            params.limit.unwrap_or(50),
            params.offset.unwrap_or(0),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(submissions)))
}

// GET /api/admin/submissions/{id}
#[utoipa::path(
    get,
    path = "/api/admin/submissions/{id}",
    tag = "Back-office",
    responses(
        (status = 200, description = "Detalhe da submissão", body = Submission),
        (status = 404, description = "Submissão não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da submissão"),
        ("x-tenant-id" = Uuid, Header, description = "ID do Estabelecimento")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_submission(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let submission = app_state
        .submission_service
        .get_submission(tenant.0, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(submission)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionPayload {
    #[schema(example = "in_progress")]
    pub status: SubmissionStatus,
}

// POST /api/admin/submissions/{id}/transition
#[utoipa::path(
    post,
    path = "/api/admin/submissions/{id}/transition",
    tag = "Back-office",
    request_body = TransitionPayload,
    responses(
        (status = 200, description = "Status alterado", body = Submission),
        (status = 409, description = "Transição não permitida")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da submissão"),
        ("x-tenant-id" = Uuid, Header, description = "ID do Estabelecimento")
    ),
    security(("api_jwt" = []))
)]
pub async fn transition_submission(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let submission = app_state
        .submission_service
        .transition(tenant.0, id, payload.status)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(submission)))
}

// =============================================================================
//  ÁREA 2: PAGAMENTOS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentPayload {
    #[schema(example = 155.0)]
    pub amount: Decimal,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "pix")]
    pub method: String,

    #[schema(example = "E2E1234567890")]
    pub reference: Option<String>,

    pub paid_at: Option<DateTime<Utc>>,
}

// POST /api/admin/submissions/{id}/payments
#[utoipa::path(
    post,
    path = "/api/admin/submissions/{id}/payments",
    tag = "Back-office",
    request_body = RecordPaymentPayload,
    responses(
        (status = 201, description = "Pagamento lançado; quitação finaliza a submissão"),
        (status = 409, description = "Submissão encerrada não recebe lançamentos")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da submissão"),
        ("x-tenant-id" = Uuid, Header, description = "ID do Estabelecimento")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordPaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let recorded = app_state
        .payment_service
        .record_payment(
            tenant.0,
            id,
            payload.amount,
            &payload.method,
            payload.reference.as_deref(),
            payload.paid_at,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "payment": recorded.payment,
            "submission": recorded.submission,
            "settled": recorded.settled,
        })),
    ))
}

// GET /api/admin/submissions/{id}/payments
#[utoipa::path(
    get,
    path = "/api/admin/submissions/{id}/payments",
    tag = "Back-office",
    responses(
        (status = 200, description = "Lançamentos da submissão")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da submissão"),
        ("x-tenant-id" = Uuid, Header, description = "ID do Estabelecimento")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = app_state
        .payment_service
        .list_for_submission(tenant.0, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(payments)))
}
