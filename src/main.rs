//src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::{auth_guard, tenant_guard};

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Assinante do canal de rascunhos: registra gravações vindas de outras
    // "abas" no log (o mesmo canal serve qualquer observador futuro).
    let mut draft_events = app_state.draft_store.subscribe();
    tokio::spawn(async move {
        loop {
            match draft_events.recv().await {
                Ok(event) => {
                    tracing::debug!(key = %event.key, writer = %event.writer, "Rascunho atualizado");
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // O formulário público de captação (sessão + rascunho + retomada)
    let form_routes = Router::new()
        .route("/session", post(handlers::form::create_session))
        .route("/draft"
               ,get(handlers::form::read_draft)
               .put(handlers::form::write_draft)
        )
        .route("/resume", get(handlers::form::resume_step))
        .route("/quote", post(handlers::form::quote))
        .route("/funnel-event", post(handlers::form::funnel_event));

    // Reivindicação da sessão exige conta autenticada
    let claim_routes = Router::new()
        .route("/claim", post(handlers::form::claim_session))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Catálogo público: o passo "escolha de serviços" monta a lista daqui
    let catalog_routes = Router::new()
        .route("/services", get(handlers::catalog::list_services));

    // Back-office (Auth + Tenancy em tudo)
    let admin_routes = Router::new()
        .route("/submissions", get(handlers::admin::list_submissions))
        .route("/submissions/{id}", get(handlers::admin::get_submission))
        .route("/submissions/{id}/transition", post(handlers::admin::transition_submission))
        .route("/submissions/{id}/payments"
               ,post(handlers::admin::record_payment)
               .get(handlers::admin::list_payments)
        )
        .route("/submissions/{id}/receipt", get(handlers::documents::generate_submission_receipt))
        .route("/dashboard/funnel", get(handlers::dashboard::funnel_report))
        .route("/services", post(handlers::catalog::create_service))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let crm_routes = Router::new()
        .route("/clients"
               ,post(handlers::crm::create_client)
               .get(handlers::crm::list_clients)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let settings_routes = Router::new()
        .route("/"
               ,get(handlers::settings::get_settings)
               .put(handlers::settings::update_settings)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let tenancy_routes = Router::new()
        .route("/"
               ,post(handlers::tenancy::create_tenant)
               .get(handlers::tenancy::list_my_tenants)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        // O único caminho de escrita da submissão pelo lado do formulário
        .route("/api/save-submission", post(handlers::form::save_submission))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/form", form_routes.merge(claim_routes))
        .nest("/api/catalog", catalog_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/crm", crm_routes)
        .nest("/api/settings", settings_routes)
        .nest("/api/tenants", tenancy_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}

