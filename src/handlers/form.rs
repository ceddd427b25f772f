// src/handlers/form.rs

// As rotas públicas do formulário de captação: save-submission (o único
// caminho de escrita da submissão pelo lado do cliente), rascunho durável,
// retomada de passo, orçamento e eventos de funil.

use axum::{
    Json,
    extract::{Query, RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::form::FormData,
    services::{draft_store, resume},
};

// =============================================================================
//  ÁREA 1: SESSÃO E SAVE-SUBMISSION
// =============================================================================

// POST /api/form/session
#[utoipa::path(
    post,
    path = "/api/form/session",
    tag = "Formulário",
    responses(
        (status = 201, description = "Identificador de sessão emitido")
    ),
    params(
        ("x-tenant-id" = uuid::Uuid, Header, description = "ID do Estabelecimento")
    )
)]
pub async fn create_session(_tenant: TenantContext) -> impl IntoResponse {
    (StatusCode::CREATED, Json(json!({ "sessionId": draft_store::new_session_id() })))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveSubmissionPayload {
    pub form_data: FormData,

    #[schema(example = 2)]
    pub current_step: u32,

    #[serde(default)]
    pub completed_steps: Vec<u32>,

    #[schema(example = 155.0)]
    pub total_amount: Decimal,

    // Ausência é recusada pelo serviço antes de qualquer escrita
    #[serde(default)]
    #[schema(example = "session_1733836800000_a1b2c3d4")]
    pub session_id: String,
}

// POST /api/save-submission
#[utoipa::path(
    post,
    path = "/api/save-submission",
    tag = "Formulário",
    request_body = SaveSubmissionPayload,
    responses(
        (status = 200, description = "Submissão criada ou atualizada (idempotente por sessão)"),
        (status = 400, description = "Identificador de sessão ausente"),
        (status = 409, description = "Gravação concorrente detectada")
    ),
    params(
        ("x-tenant-id" = uuid::Uuid, Header, description = "ID do Estabelecimento")
    )
)]
pub async fn save_submission(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<SaveSubmissionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let id = app_state
        .submission_service
        .save_submission(
            tenant.0,
            &payload.form_data,
            payload.current_step,
            &payload.completed_steps,
            payload.total_amount,
            &payload.session_id,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "id": id }))))
}

// =============================================================================
//  ÁREA 2: RASCUNHO DURÁVEL
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftQuery {
    pub session_id: String,
}

// GET /api/form/draft
#[utoipa::path(
    get,
    path = "/api/form/draft",
    tag = "Formulário",
    responses(
        (status = 200, description = "Rascunho atual (default quando ausente ou corrompido)", body = FormData)
    ),
    params(
        ("sessionId" = String, Query, description = "Chave do rascunho"),
        ("x-tenant-id" = uuid::Uuid, Header, description = "ID do Estabelecimento")
    )
)]
pub async fn read_draft(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(params): Query<DraftQuery>,
) -> impl IntoResponse {
    // Leitura nunca falha: chave ausente ou JSON inválido viram o default
    let form = app_state
        .draft_store
        .read(tenant.0, &params.session_id, FormData::default())
        .await;

    (StatusCode::OK, Json(form))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WriteDraftPayload {
    #[validate(length(min = 1, message = "required"))]
    pub session_id: String,

    pub form_data: FormData,

    // Identifica a aba para a janela de proteção contra gravações cruzadas
    #[serde(default)]
    #[schema(example = "tab-7f3d")]
    pub instance_id: Option<String>,
}

// PUT /api/form/draft
#[utoipa::path(
    put,
    path = "/api/form/draft",
    tag = "Formulário",
    request_body = WriteDraftPayload,
    responses(
        (status = 200, description = "Resultado da gravação (sinais de quota não são erro)", body = draft_store::DraftWriteOutcome)
    ),
    params(
        ("x-tenant-id" = uuid::Uuid, Header, description = "ID do Estabelecimento")
    )
)]
pub async fn write_draft(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<WriteDraftPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| crate::common::error::AppError::ValidationError(e)
            .to_api_error(&locale, &app_state.i18n_store))?;

    let writer = payload.instance_id.as_deref().unwrap_or("web");

    // Quota estourada ou backend fora não bloqueiam o preenchimento:
    // a resposta informa, o cliente decide o que mostrar.
    let outcome = app_state
        .draft_store
        .write(tenant.0, &payload.session_id, payload.form_data, writer)
        .await;

    Ok((StatusCode::OK, Json(outcome)))
}

// =============================================================================
//  ÁREA 3: RETOMADA E ORÇAMENTO
// =============================================================================

// GET /api/form/resume
#[utoipa::path(
    get,
    path = "/api/form/resume",
    tag = "Formulário",
    responses(
        (status = 200, description = "Passo de retomada e caminho de redirecionamento")
    ),
    params(
        ("sessionId" = String, Query, description = "Chave do rascunho"),
        ("x-tenant-id" = uuid::Uuid, Header, description = "ID do Estabelecimento")
    )
)]
pub async fn resume_step(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RawQuery(raw_query): RawQuery,
    Query(params): Query<DraftQuery>,
) -> impl IntoResponse {
    let form = app_state
        .draft_store
        .read(tenant.0, &params.session_id, FormData::default())
        .await;

    let step_index = resume::resume_step_index(&form);
    // A query string original segue junto no redirecionamento
    let path = resume::resume_path(&form, raw_query.as_deref());

    (StatusCode::OK, Json(json!({ "stepIndex": step_index, "path": path })))
}

// POST /api/form/quote
#[utoipa::path(
    post,
    path = "/api/form/quote",
    tag = "Formulário",
    request_body = FormData,
    responses(
        (status = 200, description = "Total calculado no servidor"),
        (status = 404, description = "Serviço selecionado fora do catálogo")
    ),
    params(
        ("x-tenant-id" = uuid::Uuid, Header, description = "ID do Estabelecimento")
    )
)]
pub async fn quote(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(form): Json<FormData>,
) -> Result<impl IntoResponse, ApiError> {
    let total = app_state
        .submission_service
        .quote_total(tenant.0, &form)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "total": total, "currency": form.currency }))))
}

// =============================================================================
//  ÁREA 4: EVENTOS DE FUNIL E REIVINDICAÇÃO DA SESSÃO
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FunnelEventPayload {
    #[schema(example = "session_1733836800000_a1b2c3d4")]
    pub session_id: String,

    #[schema(example = "summary_viewed")]
    pub stage: String,
}

// POST /api/form/funnel-event
#[utoipa::path(
    post,
    path = "/api/form/funnel-event",
    tag = "Formulário",
    request_body = FunnelEventPayload,
    responses(
        (status = 200, description = "Estágio após o evento (nunca regride)")
    ),
    params(
        ("x-tenant-id" = uuid::Uuid, Header, description = "ID do Estabelecimento")
    )
)]
pub async fn funnel_event(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<FunnelEventPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let stage = app_state
        .submission_service
        .record_funnel_event(tenant.0, &payload.session_id, &payload.stage)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "funnelStage": stage }))))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSessionPayload {
    pub session_id: String,
}

// POST /api/form/claim (autenticado)
#[utoipa::path(
    post,
    path = "/api/form/claim",
    tag = "Formulário",
    request_body = ClaimSessionPayload,
    responses(
        (status = 200, description = "Submissões pendentes da sessão ligadas à conta")
    ),
    params(
        ("x-tenant-id" = uuid::Uuid, Header, description = "ID do Estabelecimento")
    ),
    security(("api_jwt" = []))
)]
pub async fn claim_session(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Json(payload): Json<ClaimSessionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let linked = app_state
        .submission_service
        .claim_session(tenant.0, &payload.session_id, user.0.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "linked": linked }))))
}
