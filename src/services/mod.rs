pub mod auth;
pub mod items;

pub use auth::{AuthError, AuthService, Registration};
pub use items::{ItemInput, ItemService};
