pub mod auth;
pub mod catalog;
pub mod crm;
pub mod dashboard;
pub mod form;
pub mod payment;
pub mod settings;
pub mod submission;
pub mod tenancy;
