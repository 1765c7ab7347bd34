mod handler;
mod model;

pub use handler::{login, login_form, logout, register, register_form};
pub use model::{LoginForm, RegisterForm};
