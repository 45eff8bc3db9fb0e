pub mod client;
pub mod error;
pub mod traits;

pub use client::HttpCatalog;
pub use error::{CatalogError, Result};
pub use traits::{GenreLookup, NoCatalog};
