#![forbid(unsafe_code)]

pub mod catalog;
pub mod certificate;
pub mod error;
pub mod model;
pub mod route;
pub mod time;

pub use catalog::{Catalog, CatalogError};
pub use error::Error;
pub use time::Clock;
