// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    common::{events::TracingSignalSink, i18n::I18nStore},
    db::{
        CatalogRepository, CrmRepository, DashboardRepository, DraftRepository,
        PaymentRepository, SettingsRepository, SubmissionRepository, TenantRepository,
        UserRepository,
    },
    services::{
        auth::AuthService,
        catalog_service::CatalogService,
        crm_service::CrmService,
        dashboard_service::DashboardService,
        draft_store::{DraftStore, DraftStoreConfig},
        payment_service::PaymentService,
        receipt_service::ReceiptService,
        submission_service::SubmissionService,
        tenancy_service::TenantService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub i18n_store: Arc<I18nStore>,

    pub auth_service: AuthService,
    pub tenancy_service: TenantService,
    pub submission_service: SubmissionService,
    pub draft_store: Arc<DraftStore>,
    pub crm_service: CrmService,
    pub catalog_service: CatalogService,
    pub payment_service: PaymentService,
    pub receipt_service: ReceiptService,
    pub dashboard_service: DashboardService,
    pub settings_repo: SettingsRepository,
}

impl AppState {
    // Carrega as configurações e monta o gráfico de dependências
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Repositórios ---
        let user_repo = UserRepository::new(db_pool.clone());
        let tenant_repo = TenantRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let crm_repo = CrmRepository::new(db_pool.clone());
        let submission_repo = SubmissionRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());
        let draft_repo = DraftRepository::new(db_pool.clone());

        // --- Rascunhos: janela de proteção configurável (ms; 0 desliga) ---
        let protection_window = match env::var("DRAFT_PROTECTION_WINDOW_MS") {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(0) => None,
                Ok(ms) => Some(Duration::from_millis(ms)),
                Err(_) => DraftStoreConfig::default().protection_window,
            },
            Err(_) => DraftStoreConfig::default().protection_window,
        };

        let draft_store = Arc::new(DraftStore::new(
            Arc::new(draft_repo),
            Arc::new(TracingSignalSink),
            DraftStoreConfig { protection_window, ..Default::default() },
        ));

        // --- Serviços ---
        let auth_service = AuthService::new(
            user_repo,
            crm_repo.clone(),
            jwt_secret.clone(),
            db_pool.clone(),
        );
        let tenancy_service = TenantService::new(tenant_repo, db_pool.clone());
        let submission_service = SubmissionService::new(
            submission_repo.clone(),
            catalog_repo.clone(),
            db_pool.clone(),
        );
        let crm_service = CrmService::new(crm_repo.clone());
        let catalog_service = CatalogService::new(catalog_repo.clone());
        let payment_service = PaymentService::new(
            payment_repo.clone(),
            submission_repo.clone(),
            crm_repo,
            draft_store.clone(),
            db_pool.clone(),
        );
        let receipt_service = ReceiptService::new(
            submission_repo,
            catalog_repo,
            settings_repo.clone(),
            payment_repo,
            db_pool.clone(),
        );
        let dashboard_service = DashboardService::new(dashboard_repo);

        Ok(Self {
            db_pool,
            jwt_secret,
            i18n_store: Arc::new(I18nStore::new()),
            auth_service,
            tenancy_service,
            submission_service,
            draft_store,
            crm_service,
            catalog_service,
            payment_service,
            receipt_service,
            dashboard_service,
            settings_repo,
        })
    }
}
