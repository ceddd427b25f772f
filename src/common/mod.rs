pub mod error;
pub mod events;
pub mod i18n;
