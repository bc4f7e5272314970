pub mod catalog_client;

pub use catalog_client::{CatalogApi, HttpCatalogClient, LocalCatalog, CATALOG_SERVICE};
