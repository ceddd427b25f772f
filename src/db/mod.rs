pub mod user_repo;
pub use user_repo::UserRepository;
pub mod tenancy_repo;
pub use tenancy_repo::TenantRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod crm_repo;
pub use crm_repo::CrmRepository;
pub mod submission_repo;
pub use submission_repo::SubmissionRepository;
pub mod draft_repo;
pub use draft_repo::DraftRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
