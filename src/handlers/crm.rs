// src/handlers/crm.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::crm::Client,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Maria da Silva")]
    pub full_name: String,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "maria@email.com")]
    pub email: Option<String>,

    pub phone: Option<String>,

    #[schema(example = "12345678900")]
    pub document_number: Option<String>,

    pub notes: Option<String>,
}

// POST /api/crm/clients
#[utoipa::path(
    post,
    path = "/api/crm/clients",
    tag = "CRM",
    request_body = CreateClientPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Client),
        (status = 400, description = "Dados inválidos")
    ),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID do Estabelecimento")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<CreateClientPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let client = app_state
        .crm_service
        .create_client(
            &app_state.db_pool,
            tenant.0,
            &payload.full_name,
            payload.email.as_deref(),
            payload.phone.as_deref(),
            payload.document_number.as_deref(),
            payload.notes.as_deref(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(client)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchClientsQuery {
    // Termo de busca: nome, e-mail ou documento
    pub q: Option<String>,
}

// GET /api/crm/clients
#[utoipa::path(
    get,
    path = "/api/crm/clients",
    tag = "CRM",
    responses(
        (status = 200, description = "Lista de clientes", body = Vec<Client>)
    ),
    params(
        ("q" = Option<String>, Query, description = "Busca por nome, e-mail ou documento"),
        ("x-tenant-id" = Uuid, Header, description = "ID do Estabelecimento")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(params): Query<SearchClientsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let clients = app_state
        .crm_service
        .search_clients(&app_state.db_pool, tenant.0, params.q.as_deref().unwrap_or(""))
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(clients)))
}
