pub mod address;
pub mod i18n;
pub mod wizard;
