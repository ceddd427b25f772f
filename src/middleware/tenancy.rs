// src/middleware/tenancy.rs

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use uuid::Uuid;

use crate::common::error::ApiError; // Usamos o nosso ApiError para rejeição

// O nome do nosso cabeçalho HTTP customizado
const TENANT_ID_HEADER: &str = "x-tenant-id";

// O extrator do estabelecimento que a requisição quer aceder.
// Tanto o formulário público quanto o back-office mandam este cabeçalho;
// a verificação de MEMBRO fica no tenant_guard, só para o back-office.
#[derive(Debug, Clone)]
pub struct TenantContext(pub Uuid);

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    // ApiError já implementa IntoResponse
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts.headers.get(TENANT_ID_HEADER);

        match header_value {
            Some(value) => {
                let value_str = value.to_str().map_err(|_| {
                    ApiError::new(
                        StatusCode::BAD_REQUEST,
                        "Cabeçalho X-Tenant-ID contém caracteres inválidos.",
                    )
                })?;

                let tenant_id = Uuid::parse_str(value_str).map_err(|_| {
                    ApiError::new(
                        StatusCode::BAD_REQUEST,
                        "Cabeçalho X-Tenant-ID inválido (não é um UUID).",
                    )
                })?;

                Ok(TenantContext(tenant_id))
            }
            None => Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "O cabeçalho X-Tenant-ID é obrigatório.",
            )),
        }
    }
}
