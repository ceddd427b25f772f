// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro de domínio, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // O save-submission exige o identificador de sessão antes de qualquer escrita
    #[error("Identificador de sessão ausente")]
    SessionRequired,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Utilizador sem acesso a este tenant")]
    TenantAccessDenied,

    #[error("Submissão não encontrada")]
    SubmissionNotFound,

    // A coluna de versão detectou uma gravação concorrente
    #[error("Conflito de versão na submissão")]
    SubmissionConflict,

    #[error("Serviço '{0}' não encontrado no catálogo")]
    ServiceNotFound(String),

    #[error("Cliente não encontrado")]
    ClientNotFound,

    #[error("Transição de status inválida: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro já pronto para virar resposta HTTP, com a mensagem traduzida.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), details: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => Json(json!({ "error": self.message, "details": details })),
            None => Json(json!({ "error": self.message })),
        };
        (self.status, body).into_response()
    }
}

impl AppError {
    /// Código i18n + status HTTP de cada variante.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation"),
            AppError::SessionRequired => (StatusCode::BAD_REQUEST, "session_required"),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "email_exists"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found"),
            AppError::TenantAccessDenied => (StatusCode::FORBIDDEN, "tenant_access_denied"),
            AppError::SubmissionNotFound => (StatusCode::NOT_FOUND, "submission_not_found"),
            AppError::SubmissionConflict => (StatusCode::CONFLICT, "submission_conflict"),
            AppError::ServiceNotFound(_) => (StatusCode::NOT_FOUND, "service_not_found"),
            AppError::ClientNotFound => (StatusCode::NOT_FOUND, "client_not_found"),
            AppError::InvalidTransition { .. } => (StatusCode::CONFLICT, "invalid_transition"),
            AppError::UniqueConstraintViolation(_) => (StatusCode::CONFLICT, "unique_violation"),
            AppError::FontNotFound(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            // Todos os outros viram 500 genérico; o detalhe fica no log.
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// Converte para a resposta HTTP com a mensagem no idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let (status, code) = self.status_and_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let mut api = ApiError::new(status, store.translate(&locale.0, code));

        // Validação devolve todos os códigos de campo, não só a primeira falha.
        if let AppError::ValidationError(errors) = self {
            let mut details = serde_json::Map::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<serde_json::Value> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| json!(m.to_string())))
                    .collect();
                details.insert(field.to_string(), json!(messages));
            }
            api.details = Some(serde_json::Value::Object(details));
        }

        api
    }
}

// Fallback para os pontos onde o Locale não está na mão (middlewares).
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _code) = self.status_and_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
