//! HTTP catalog client for the juice service's REST data API.
//!
//! The API speaks camelCase JSON and encodes decimal columns as strings
//! (`"baseCostPerOz": "0.35"`), so the wire records here are private to
//! the adapter and converted into domain types on the way in.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::model::{
    ActiveSubscription, IngredientKind, IngredientVariant, SubscriptionPlan, SubscriptionStatus,
    SubscriptionTier, UserSubscription,
};
use crate::domain::ports::CatalogRepository;
use crate::utils::error::{BlendError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Builds a client with a request timeout. Timeout policy lives in
    /// the adapter; the pricing engine never waits on anything itself.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        tracing::debug!("Catalog response status: {}", status);

        if !status.is_success() {
            return Err(BlendError::CatalogStatusError {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogRepository for HttpCatalog {
    async fn get_variants_by_ids(&self, ids: &[String]) -> Result<Vec<IngredientVariant>> {
        // The API has no by-id filter; fetch the catalog and select locally.
        let records: Vec<VariantRecord> = self.get_json("/api/ingredient-variants").await?;

        records
            .into_iter()
            .filter(|record| ids.iter().any(|id| id == &record.id))
            .map(VariantRecord::into_domain)
            .collect()
    }

    async fn get_active_subscription_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<ActiveSubscription>> {
        let url = format!("{}/api/users/{}/subscription", self.base_url, user_id);
        tracing::debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("No active subscription for user {}", user_id);
            return Ok(None);
        }

        let status = response.status();
        if !status.is_success() {
            return Err(BlendError::CatalogStatusError {
                status: status.as_u16(),
                url,
            });
        }

        let record: SubscriptionRecord = response.json().await?;
        Ok(Some(record.into_domain()?))
    }

    async fn list_active_plans(&self) -> Result<Vec<SubscriptionPlan>> {
        // The endpoint already serves active plans in display order.
        let records: Vec<PlanRecord> = self.get_json("/api/subscription-plans").await?;
        records.into_iter().map(PlanRecord::into_domain).collect()
    }
}

fn parse_decimal(field: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| BlendError::InvalidDecimalError {
            field: field.to_string(),
            value: value.to_string(),
        })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantRecord {
    id: String,
    name: String,
    ingredient_type: IngredientKind,
    base_ingredient: String,
    variant_name: String,
    base_cost_per_oz: String,
    color: String,
    #[serde(default = "default_true")]
    is_active: bool,
}

impl VariantRecord {
    fn into_domain(self) -> Result<IngredientVariant> {
        let base_cost_per_oz = parse_decimal("baseCostPerOz", &self.base_cost_per_oz)?;
        Ok(IngredientVariant {
            id: self.id,
            name: self.name,
            kind: self.ingredient_type,
            base_ingredient: self.base_ingredient,
            variant_name: self.variant_name,
            base_cost_per_oz,
            color: self.color,
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanRecord {
    id: String,
    name: String,
    tier: SubscriptionTier,
    price_per_month: String,
    per_oz_multiplier: String,
    #[serde(default)]
    volume_discount_threshold: Option<f64>,
    #[serde(default)]
    volume_discount_percentage: Option<String>,
    #[serde(default = "default_true")]
    is_active: bool,
    #[serde(default)]
    sort_order: i32,
}

impl PlanRecord {
    fn into_domain(self) -> Result<SubscriptionPlan> {
        let price_per_month = parse_decimal("pricePerMonth", &self.price_per_month)?;
        let per_oz_multiplier = parse_decimal("perOzMultiplier", &self.per_oz_multiplier)?;
        let volume_discount_percentage = self
            .volume_discount_percentage
            .map(|value| parse_decimal("volumeDiscountPercentage", &value))
            .transpose()?;

        Ok(SubscriptionPlan {
            id: self.id,
            name: self.name,
            tier: self.tier,
            price_per_month,
            per_oz_multiplier,
            volume_discount_threshold: self.volume_discount_threshold,
            volume_discount_percentage,
            is_active: self.is_active,
            sort_order: self.sort_order,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionRecord {
    id: String,
    user_id: String,
    plan_id: String,
    status: SubscriptionStatus,
    start_date: DateTime<Utc>,
    plan: PlanRecord,
}

impl SubscriptionRecord {
    fn into_domain(self) -> Result<ActiveSubscription> {
        let plan = self.plan.into_domain()?;
        Ok(ActiveSubscription {
            subscription: UserSubscription {
                id: self.id,
                user_id: self.user_id,
                plan_id: self.plan_id,
                status: self.status,
                started_at: self.start_date,
            },
            plan,
        })
    }
}

fn default_true() -> bool {
    true
}
