mod service;
mod store;

pub use service::AuthService;
pub use store::SessionStore;
