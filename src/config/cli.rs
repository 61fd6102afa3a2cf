use crate::domain::model::BlendIngredient;
use crate::utils::error::{BlendError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive, validate_range, validate_url, Validate,
};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "blendcraft")]
#[command(about = "Price and preview custom juice blends")]
pub struct CliConfig {
    /// TOML catalog file to price against (offline mode)
    #[arg(long, conflicts_with = "endpoint")]
    pub catalog: Option<String>,

    /// Base URL of the juice service data API
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Blend line in the form variant_id:percentage (repeatable)
    #[arg(long = "ingredient", value_name = "VARIANT_ID:PERCENTAGE")]
    pub ingredients: Vec<String>,

    /// Bottle volume in ounces
    #[arg(long, default_value = "16")]
    pub ounces: f64,

    /// Price as this user, applying their active subscription
    #[arg(long)]
    pub user: Option<String>,

    /// Also price the blend under every active plan
    #[arg(long)]
    pub compare_tiers: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write the per-ingredient breakdown to a CSV file
    #[arg(long)]
    pub export_csv: Option<String>,

    #[arg(long, default_value = "10")]
    pub timeout_seconds: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl CliConfig {
    /// Parses the repeated `--ingredient` flags into a blend composition,
    /// preserving the order they were given in.
    pub fn blend(&self) -> Result<Vec<BlendIngredient>> {
        self.ingredients
            .iter()
            .map(|raw| parse_ingredient_arg(raw))
            .collect()
    }
}

fn parse_ingredient_arg(raw: &str) -> Result<BlendIngredient> {
    let (variant_id, percentage) =
        raw.rsplit_once(':')
            .ok_or_else(|| BlendError::InvalidConfigValueError {
                field: "ingredient".to_string(),
                value: raw.to_string(),
                reason: "Expected variant_id:percentage".to_string(),
            })?;

    validate_non_empty_string("ingredient", variant_id)?;

    let percentage: f64 =
        percentage
            .parse()
            .map_err(|_| BlendError::InvalidConfigValueError {
                field: "ingredient".to_string(),
                value: raw.to_string(),
                reason: "Percentage is not a number".to_string(),
            })?;
    validate_range("ingredient", percentage, 0.0, 100.0)?;

    Ok(BlendIngredient {
        variant_id: variant_id.to_string(),
        percentage,
    })
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.catalog.is_some() && self.endpoint.is_some() {
            return Err(BlendError::ConfigError {
                message: "Use either --catalog or --endpoint, not both".to_string(),
            });
        }
        if self.catalog.is_none() && self.endpoint.is_none() {
            return Err(BlendError::MissingConfigError {
                field: "catalog or endpoint".to_string(),
            });
        }
        if let Some(endpoint) = &self.endpoint {
            validate_url("endpoint", endpoint)?;
        }
        if self.ingredients.is_empty() {
            return Err(BlendError::MissingConfigError {
                field: "ingredient".to_string(),
            });
        }
        self.blend()?;
        validate_positive("ounces", self.ounces)?;
        validate_range("timeout_seconds", self.timeout_seconds as f64, 1.0, 300.0)?;
        Ok(())
    }
}
