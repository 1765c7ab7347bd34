mod auth;
mod error_handler;

pub use auth::{AuthenticatedContext, api_auth_middleware, page_auth_middleware, require_session};
pub use error_handler::log_errors;
