pub mod current_user;
pub mod language;
pub mod tracing;

pub use current_user::CurrentUser;
pub use language::language_middleware;
pub use self::tracing::observability_middleware;
