mod handler;
mod model;

pub use handler::{create, create_form, delete, index, list, update, update_form};
pub use model::ItemForm;
