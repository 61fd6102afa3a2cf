use crate::adapters::memory::InMemoryCatalog;
use crate::domain::model::{IngredientVariant, SubscriptionPlan, UserSubscription};
use crate::utils::error::{BlendError, Result};
use crate::utils::validation::{
    validate_hex_color, validate_non_empty_string, validate_non_negative, validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A full catalog fixture: ingredient variants, subscription plans, and
/// (optionally) user subscriptions, loaded from a TOML file. Backs the
/// CLI's offline mode and integration tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub variants: Vec<IngredientVariant>,
    #[serde(default)]
    pub plans: Vec<SubscriptionPlan>,
    #[serde(default)]
    pub subscriptions: Vec<UserSubscription>,
}

impl CatalogFile {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    /// Replaces `${VAR_NAME}` placeholders with environment values.
    /// Unset variables are left as-is so the TOML error points at them.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        let mut variant_ids = HashSet::new();
        for (index, variant) in self.variants.iter().enumerate() {
            validate_non_empty_string(&format!("variants[{}].id", index), &variant.id)?;
            validate_non_empty_string(&format!("variants[{}].name", index), &variant.name)?;
            validate_hex_color(&format!("variants[{}].color", index), &variant.color)?;
            validate_non_negative(
                &format!("variants[{}].base_cost_per_oz", index),
                variant.base_cost_per_oz,
            )?;
            if !variant_ids.insert(variant.id.as_str()) {
                return Err(BlendError::InvalidConfigValueError {
                    field: format!("variants[{}].id", index),
                    value: variant.id.clone(),
                    reason: "Duplicate variant id".to_string(),
                });
            }
        }

        let mut plan_ids = HashSet::new();
        for (index, plan) in self.plans.iter().enumerate() {
            validate_non_empty_string(&format!("plans[{}].id", index), &plan.id)?;
            validate_non_empty_string(&format!("plans[{}].name", index), &plan.name)?;
            validate_non_negative(
                &format!("plans[{}].price_per_month", index),
                plan.price_per_month,
            )?;
            validate_non_negative(
                &format!("plans[{}].per_oz_multiplier", index),
                plan.per_oz_multiplier,
            )?;
            if let Some(threshold) = plan.volume_discount_threshold {
                validate_non_negative(
                    &format!("plans[{}].volume_discount_threshold", index),
                    threshold,
                )?;
            }
            if let Some(percentage) = plan.volume_discount_percentage {
                validate_range(
                    &format!("plans[{}].volume_discount_percentage", index),
                    percentage,
                    0.0,
                    100.0,
                )?;
            }
            if !plan_ids.insert(plan.id.as_str()) {
                return Err(BlendError::InvalidConfigValueError {
                    field: format!("plans[{}].id", index),
                    value: plan.id.clone(),
                    reason: "Duplicate plan id".to_string(),
                });
            }
        }

        for (index, subscription) in self.subscriptions.iter().enumerate() {
            validate_non_empty_string(
                &format!("subscriptions[{}].user_id", index),
                &subscription.user_id,
            )?;
            if !plan_ids.contains(subscription.plan_id.as_str()) {
                return Err(BlendError::InvalidConfigValueError {
                    field: format!("subscriptions[{}].plan_id", index),
                    value: subscription.plan_id.clone(),
                    reason: "References a plan not defined in this catalog".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn into_catalog(self) -> InMemoryCatalog {
        InMemoryCatalog::new(self.variants, self.plans, self.subscriptions)
    }
}

impl Validate for CatalogFile {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
