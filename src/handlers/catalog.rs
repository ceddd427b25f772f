// src/handlers/catalog.rs

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::catalog::NotaryService,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServicePayload {
    #[validate(length(min = 2, message = "required"))]
    #[schema(example = "apostille")]
    pub slug: String,

    #[validate(length(min = 2, message = "required"))]
    #[schema(example = "Apostilamento de Haia")]
    pub name: String,

    pub description: Option<String>,

    #[schema(example = 120.0)]
    pub base_price: Decimal,

    #[serde(default)]
    #[schema(example = 35.0)]
    pub per_document_price: Decimal,
}

// POST /api/admin/services (back-office)
#[utoipa::path(
    post,
    path = "/api/admin/services",
    tag = "Catálogo",
    request_body = CreateServicePayload,
    responses(
        (status = 201, description = "Serviço criado", body = NotaryService),
        (status = 409, description = "Slug já existe neste estabelecimento")
    ),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID do Estabelecimento")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_service(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Json(payload): Json<CreateServicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let service = app_state
        .catalog_service
        .create_service(
            &app_state.db_pool,
            tenant.0,
            &payload.slug,
            &payload.name,
            payload.description.as_deref(),
            payload.base_price,
            payload.per_document_price,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(service)))
}

// GET /api/catalog/services (público: o formulário monta o passo 2 daqui)
#[utoipa::path(
    get,
    path = "/api/catalog/services",
    tag = "Catálogo",
    responses(
        (status = 200, description = "Serviços ativos do estabelecimento", body = Vec<NotaryService>)
    ),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID do Estabelecimento")
    )
)]
pub async fn list_services(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let services = app_state
        .catalog_service
        .list_services(&app_state.db_pool, tenant.0, true)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(services)))
}
