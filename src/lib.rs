pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, OutputFormat};

pub use adapters::{http::HttpCatalog, memory::InMemoryCatalog};
pub use config::CatalogFile;
pub use crate::core::{color, pricing::PricingEngine};
pub use domain::model::{BlendIngredient, PriceQuote, TierComparison};
pub use domain::ports::CatalogRepository;
pub use utils::error::{BlendError, Result};
