//! Database repositories for the data access layer

mod classify;
mod product;
mod user;

pub use classify::{classify_violation, ViolationMessages};
pub use product::ProductRepository;
pub use user::UserRepository;
