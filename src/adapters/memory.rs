//! In-memory catalog, used for config-file runs and as a test double.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::model::{
    ActiveSubscription, IngredientVariant, SubscriptionPlan, SubscriptionStatus, UserSubscription,
};
use crate::domain::ports::CatalogRepository;
use crate::utils::error::Result;

pub struct InMemoryCatalog {
    variants: HashMap<String, IngredientVariant>,
    plans: Vec<SubscriptionPlan>,
    subscriptions: Vec<UserSubscription>,
}

impl InMemoryCatalog {
    pub fn new(
        variants: Vec<IngredientVariant>,
        plans: Vec<SubscriptionPlan>,
        subscriptions: Vec<UserSubscription>,
    ) -> Self {
        let variants = variants.into_iter().map(|v| (v.id.clone(), v)).collect();
        Self {
            variants,
            plans,
            subscriptions,
        }
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn get_variants_by_ids(&self, ids: &[String]) -> Result<Vec<IngredientVariant>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.variants.get(id).cloned())
            .collect())
    }

    async fn get_active_subscription_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<ActiveSubscription>> {
        let subscription = self.subscriptions.iter().find(|s| {
            s.user_id == user_id && s.status == SubscriptionStatus::Active
        });

        let subscription = match subscription {
            Some(s) => s,
            None => return Ok(None),
        };

        let plan = self.plans.iter().find(|p| p.id == subscription.plan_id);
        Ok(plan.map(|plan| ActiveSubscription {
            subscription: subscription.clone(),
            plan: plan.clone(),
        }))
    }

    async fn list_active_plans(&self) -> Result<Vec<SubscriptionPlan>> {
        let mut plans: Vec<SubscriptionPlan> =
            self.plans.iter().filter(|p| p.is_active).cloned().collect();
        plans.sort_by_key(|p| p.sort_order);
        Ok(plans)
    }
}
