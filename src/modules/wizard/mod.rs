pub mod handlers;
pub mod routes;

pub use routes::{session_routes, wizard_routes};
