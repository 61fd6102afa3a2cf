use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientKind {
    Fruit,
    Vegetable,
    Herb,
    Supplement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Basic,
    Premium,
    Vip,
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionTier::Basic => write!(f, "basic"),
            SubscriptionTier::Premium => write!(f, "premium"),
            SubscriptionTier::Vip => write!(f, "vip"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Cancelled,
}

/// A purchasable ingredient variant, e.g. "Honeycrisp" of base ingredient "apple".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientVariant {
    pub id: String,
    pub name: String,
    pub kind: IngredientKind,
    pub base_ingredient: String,
    pub variant_name: String,
    pub base_cost_per_oz: f64,
    pub color: String,
    pub is_active: bool,
}

/// One line of a customer's blend: which variant, and what share of the blend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendIngredient {
    pub variant_id: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: String,
    pub name: String,
    pub tier: SubscriptionTier,
    pub price_per_month: f64,
    pub per_oz_multiplier: f64,
    pub volume_discount_threshold: Option<f64>,
    pub volume_discount_percentage: Option<f64>,
    pub is_active: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSubscription {
    pub id: String,
    pub user_id: String,
    pub plan_id: String,
    pub status: SubscriptionStatus,
    pub started_at: DateTime<Utc>,
}

/// A user's active subscription joined with the plan it points at.
#[derive(Debug, Clone)]
pub struct ActiveSubscription {
    pub subscription: UserSubscription,
    pub plan: SubscriptionPlan,
}

/// Per-ingredient cost line inside a quote. Values are kept at full
/// precision; only the quote totals are rounded for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBreakdownItem {
    pub variant_name: String,
    pub percentage: f64,
    pub cost_per_oz: f64,
    pub cost_contribution: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    pub base_price: f64,
    pub subscription_discount: f64,
    pub volume_discount: f64,
    pub final_price: f64,
    pub price_per_oz: f64,
    pub subscription_tier: Option<SubscriptionTier>,
    pub price_breakdown: Vec<PriceBreakdownItem>,
}

/// What one plan would make of a given blend, for side-by-side comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierSaving {
    pub plan_id: String,
    pub plan_name: String,
    pub tier: SubscriptionTier,
    pub monthly_fee: f64,
    pub final_price: f64,
    pub savings: f64,
    pub savings_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierComparison {
    pub base_price: f64,
    pub tier_savings: Vec<TierSaving>,
}
