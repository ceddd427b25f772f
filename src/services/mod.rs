pub mod auth;
pub mod catalog_service;
pub mod crm_service;
pub mod dashboard_service;
pub mod draft_store;
pub mod funnel;
pub mod payment_service;
pub mod receipt_service;
pub mod resume;
pub mod submission_service;
pub mod tenancy_service;
