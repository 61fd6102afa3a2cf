//! Blend pricing engine.
//!
//! Prices a custom blend from ingredient costs, then applies the
//! customer's subscription terms: a per-ounce multiplier and, past a
//! plan-specific volume threshold, a percentage discount. All math runs
//! at full `f64` precision; totals are rounded once at the boundary
//! (cents for prices, four decimals for the per-ounce rate).

use std::collections::HashMap;

use tracing::debug;

use crate::domain::model::{
    BlendIngredient, PriceBreakdownItem, PriceQuote, SubscriptionPlan, TierComparison, TierSaving,
};
use crate::domain::ports::CatalogRepository;
use crate::utils::error::{BlendError, Result};

pub struct PricingEngine<R> {
    repository: R,
}

/// Intermediate costing shared by quotes and tier comparisons.
struct BlendCosting {
    base_price: f64,
    breakdown: Vec<PriceBreakdownItem>,
}

/// Result of applying one plan's terms to a base price.
struct PlanPricing {
    subscription_discount: f64,
    volume_discount: f64,
    final_price: f64,
}

impl<R: CatalogRepository> PricingEngine<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Quotes a blend for a given volume, applying the user's active
    /// subscription when a user id is provided.
    pub async fn calculate_blend_price(
        &self,
        user_id: Option<&str>,
        blend: &[BlendIngredient],
        ounces: f64,
    ) -> Result<PriceQuote> {
        let costing = self.cost_blend(blend, ounces).await?;

        let mut subscription_tier = None;
        let mut per_oz_multiplier = 1.0;
        let mut volume_discount_threshold = None;
        let mut volume_discount_percentage = None;

        if let Some(user_id) = user_id {
            if let Some(active) = self
                .repository
                .get_active_subscription_for_user(user_id)
                .await?
            {
                debug!(
                    "Applying plan {} ({} tier) for user {}",
                    active.plan.id, active.plan.tier, user_id
                );
                subscription_tier = Some(active.plan.tier);
                per_oz_multiplier = active.plan.per_oz_multiplier;
                volume_discount_threshold = active.plan.volume_discount_threshold;
                volume_discount_percentage = active.plan.volume_discount_percentage;
            }
        }

        let priced = apply_plan_terms(
            costing.base_price,
            ounces,
            per_oz_multiplier,
            volume_discount_threshold,
            volume_discount_percentage,
        );

        Ok(PriceQuote {
            base_price: round_currency(costing.base_price),
            subscription_discount: round_currency(priced.subscription_discount),
            volume_discount: round_currency(priced.volume_discount),
            final_price: round_currency(priced.final_price),
            price_per_oz: round_rate(priced.final_price / ounces),
            subscription_tier,
            price_breakdown: costing.breakdown,
        })
    }

    /// Prices the blend under every active plan so customers can compare
    /// what each tier would save them.
    pub async fn calculate_tier_savings(
        &self,
        blend: &[BlendIngredient],
        ounces: f64,
    ) -> Result<TierComparison> {
        let costing = self.cost_blend(blend, ounces).await?;
        let plans = self.repository.list_active_plans().await?;
        debug!("Comparing {} active plans", plans.len());

        let tier_savings = plans
            .into_iter()
            .map(|plan| {
                let priced = apply_plan_terms(
                    costing.base_price,
                    ounces,
                    plan.per_oz_multiplier,
                    plan.volume_discount_threshold,
                    plan.volume_discount_percentage,
                );
                let savings = costing.base_price - priced.final_price;
                let savings_percentage = if costing.base_price > 0.0 {
                    (savings / costing.base_price) * 100.0
                } else {
                    0.0
                };

                TierSaving {
                    plan_id: plan.id,
                    plan_name: plan.name,
                    tier: plan.tier,
                    monthly_fee: plan.price_per_month,
                    final_price: round_currency(priced.final_price),
                    savings: round_currency(savings),
                    savings_percentage: round_currency(savings_percentage),
                }
            })
            .collect();

        Ok(TierComparison {
            base_price: round_currency(costing.base_price),
            tier_savings,
        })
    }

    /// The plans currently on offer, in display order.
    pub async fn get_subscription_plans(&self) -> Result<Vec<SubscriptionPlan>> {
        self.repository.list_active_plans().await
    }

    /// Costs the raw blend: per-ingredient contributions and the
    /// undiscounted base price. Fails on unknown variants rather than
    /// silently pricing a partial blend.
    async fn cost_blend(&self, blend: &[BlendIngredient], ounces: f64) -> Result<BlendCosting> {
        if ounces.is_nan() || ounces <= 0.0 {
            return Err(BlendError::InvalidVolumeError { ounces });
        }

        let ids: Vec<String> = blend.iter().map(|i| i.variant_id.clone()).collect();
        let variants = self.repository.get_variants_by_ids(&ids).await?;
        let by_id: HashMap<&str, _> = variants.iter().map(|v| (v.id.as_str(), v)).collect();

        let mut base_price_per_oz = 0.0;
        let mut breakdown = Vec::with_capacity(blend.len());

        for ingredient in blend {
            let variant = by_id.get(ingredient.variant_id.as_str()).ok_or_else(|| {
                BlendError::VariantNotFoundError {
                    variant_id: ingredient.variant_id.clone(),
                }
            })?;

            let contribution = variant.base_cost_per_oz * (ingredient.percentage / 100.0);
            base_price_per_oz += contribution;

            breakdown.push(PriceBreakdownItem {
                variant_name: variant.name.clone(),
                percentage: ingredient.percentage,
                cost_per_oz: variant.base_cost_per_oz,
                cost_contribution: contribution * ounces,
            });
        }

        let base_price = base_price_per_oz * ounces;
        debug!(
            "Costed blend of {} ingredients at {} oz: base price {:.4}",
            blend.len(),
            ounces,
            base_price
        );

        Ok(BlendCosting {
            base_price,
            breakdown,
        })
    }
}

/// Applies a plan's multiplier and volume terms to an already-costed
/// base price. The volume discount needs a threshold, a volume at or
/// above it, and a positive percentage; plans without volume terms
/// never discount on volume.
fn apply_plan_terms(
    base_price: f64,
    ounces: f64,
    per_oz_multiplier: f64,
    volume_discount_threshold: Option<f64>,
    volume_discount_percentage: Option<f64>,
) -> PlanPricing {
    let price_after_subscription = base_price * per_oz_multiplier;
    let subscription_discount = base_price - price_after_subscription;

    let mut volume_discount = 0.0;
    if let (Some(threshold), Some(percentage)) =
        (volume_discount_threshold, volume_discount_percentage)
    {
        if ounces >= threshold && percentage > 0.0 {
            volume_discount = price_after_subscription * (percentage / 100.0);
        }
    }

    PlanPricing {
        subscription_discount,
        volume_discount,
        final_price: price_after_subscription - volume_discount,
    }
}

fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round_rate(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
