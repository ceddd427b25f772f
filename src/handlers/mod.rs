pub mod admin;
pub mod auth;
pub mod catalog;
pub mod crm;
pub mod dashboard;
pub mod documents;
pub mod form;
pub mod settings;
pub mod tenancy;
