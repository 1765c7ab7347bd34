pub mod item;
pub mod user;

pub use item::{Item, ItemChanges, ItemType, NewItem};
pub use user::{NewUser, User};
