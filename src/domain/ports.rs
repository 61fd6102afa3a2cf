use crate::domain::model::{ActiveSubscription, IngredientVariant, SubscriptionPlan};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read access to the ingredient and subscription catalog.
///
/// The pricing engine only ever reads; where the catalog lives (HTTP API,
/// config file, test fixture) is an adapter concern.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Fetches the variants with the given ids. Unknown ids are simply
    /// absent from the result; callers decide whether that is an error.
    async fn get_variants_by_ids(&self, ids: &[String]) -> Result<Vec<IngredientVariant>>;

    /// Resolves the user's active subscription together with its plan.
    /// Returns `None` for users without an active subscription.
    async fn get_active_subscription_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<ActiveSubscription>>;

    /// Lists the plans currently offered, in display order.
    async fn list_active_plans(&self) -> Result<Vec<SubscriptionPlan>>;
}
