pub mod handlers;
pub mod routes;

pub use routes::address_routes;
