//! Data models for the catalog.

mod event;
mod product;
mod trace;
mod user;

pub use event::ProductEvent;
pub use product::NewProduct;
pub use trace::TraceId;
pub use user::NewUser;
