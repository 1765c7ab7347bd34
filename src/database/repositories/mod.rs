pub mod item;
pub mod user;

pub use item::PgItemRepository;
pub use user::PgUserRepository;
