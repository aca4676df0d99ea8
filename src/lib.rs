//! Driver profile onboarding service.
//!
//! Drivers complete their marketplace profile through a six-step wizard.
//! Every transition saves the draft, advancing is gated on the current
//! step's fields and the final submit hands the profile to moderation.

pub mod address;
pub mod app;
pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod i18n;
pub mod middleware;
pub mod modules;
pub mod telemetry;
pub mod wizard;

pub use app::create_router;
pub use app_state::AppState;
