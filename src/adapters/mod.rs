// Adapters: concrete CatalogRepository implementations.
pub mod http;
pub mod memory;
