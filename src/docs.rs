// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Formulário público ---
        handlers::form::create_session,
        handlers::form::save_submission,
        handlers::form::read_draft,
        handlers::form::write_draft,
        handlers::form::resume_step,
        handlers::form::quote,
        handlers::form::funnel_event,
        handlers::form::claim_session,

        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Catálogo ---
        handlers::catalog::create_service,
        handlers::catalog::list_services,

        // --- Back-office ---
        handlers::admin::list_submissions,
        handlers::admin::get_submission,
        handlers::admin::transition_submission,
        handlers::admin::record_payment,
        handlers::admin::list_payments,
        handlers::documents::generate_submission_receipt,
        handlers::dashboard::funnel_report,

        // --- CRM ---
        handlers::crm::create_client,
        handlers::crm::list_clients,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,

        // --- Tenancy ---
        handlers::tenancy::create_tenant,
        handlers::tenancy::list_my_tenants,
    ),
    components(
        schemas(
            // --- Formulário ---
            models::form::FormData,
            models::form::UploadedDocument,
            models::form::Signatory,
            models::form::DeliveryMethod,
            handlers::form::SaveSubmissionPayload,
            handlers::form::WriteDraftPayload,
            handlers::form::FunnelEventPayload,
            handlers::form::ClaimSessionPayload,
            services::draft_store::DraftWriteOutcome,
            services::funnel::FunnelStage,

            // --- Submissões ---
            models::submission::Submission,
            models::submission::SubmissionStatus,
            handlers::admin::TransitionPayload,
            handlers::admin::RecordPaymentPayload,

            // --- Catálogo ---
            models::catalog::NotaryService,
            handlers::catalog::CreateServicePayload,

            // --- CRM ---
            models::crm::Client,
            handlers::crm::CreateClientPayload,

            // --- Pagamentos ---
            models::payment::Payment,

            // --- Dashboard ---
            models::dashboard::FunnelStageCount,
            models::dashboard::FunnelReport,

            // --- Settings ---
            models::settings::TenantSettings,
            models::settings::UpdateSettingsRequest,

            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Tenancy ---
            models::tenancy::Tenant,
            handlers::tenancy::CreateTenantPayload,
        )
    ),
    tags(
        (name = "Formulário", description = "Captação pública: rascunho, retomada, orçamento e save-submission"),
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Catálogo", description = "Serviços notariais oferecidos"),
        (name = "Back-office", description = "Submissões, pagamentos e relatórios"),
        (name = "CRM", description = "Clientes do estabelecimento"),
        (name = "Configurações", description = "Identidade do estabelecimento e Pix"),
        (name = "Tenancy", description = "Gestão de estabelecimentos e acesso")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
