use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlendError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Catalog endpoint returned status {status} for {url}")]
    CatalogStatusError { status: u16, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Ingredient variant {variant_id} not found")]
    VariantNotFoundError { variant_id: String },

    #[error("Blend volume must be a positive number of ounces, got {ounces}")]
    InvalidVolumeError { ounces: f64 },

    #[error("Invalid decimal value for {field}: {value}")]
    InvalidDecimalError { field: String, value: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid config value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required config: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, BlendError>;
