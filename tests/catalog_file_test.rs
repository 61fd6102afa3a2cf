use std::io::Write;

use tempfile::NamedTempFile;

use blendcraft::{BlendError, BlendIngredient, CatalogFile, PricingEngine};

const SEED_CATALOG: &str = r##"
[[variants]]
id = "honeycrisp-apple"
name = "Honeycrisp Apple"
kind = "fruit"
base_ingredient = "apple"
variant_name = "Honeycrisp"
base_cost_per_oz = 0.35
color = "#f4d03f"
is_active = true

[[variants]]
id = "curly-kale"
name = "Curly Kale"
kind = "vegetable"
base_ingredient = "kale"
variant_name = "Curly"
base_cost_per_oz = 0.30
color = "#355e3b"
is_active = true

[[variants]]
id = "fresh-ginger"
name = "Fresh Ginger"
kind = "herb"
base_ingredient = "ginger"
variant_name = "Fresh"
base_cost_per_oz = 0.50
color = "#c9a66b"
is_active = true

[[plans]]
id = "basic"
name = "Basic Squeeze"
tier = "basic"
price_per_month = 9.99
per_oz_multiplier = 1.0
is_active = true
sort_order = 1

[[plans]]
id = "premium"
name = "Premium Press"
tier = "premium"
price_per_month = 29.99
per_oz_multiplier = 0.9
volume_discount_threshold = 16
volume_discount_percentage = 5.0
is_active = true
sort_order = 2

[[plans]]
id = "vip"
name = "VIP Cold Press"
tier = "vip"
price_per_month = 59.99
per_oz_multiplier = 0.8
volume_discount_threshold = 64
volume_discount_percentage = 10.0
is_active = true
sort_order = 3

[[subscriptions]]
id = "sub-1"
user_id = "ada"
plan_id = "premium"
status = "active"
started_at = "2026-02-01T09:00:00Z"

[[subscriptions]]
id = "sub-2"
user_id = "grace"
plan_id = "vip"
status = "cancelled"
started_at = "2025-06-01T09:00:00Z"
"##;

fn write_catalog(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn ingredient(variant_id: &str, percentage: f64) -> BlendIngredient {
    BlendIngredient {
        variant_id: variant_id.to_string(),
        percentage,
    }
}

#[tokio::test]
async fn test_quote_from_catalog_file() -> anyhow::Result<()> {
    let file = write_catalog(SEED_CATALOG);
    let catalog = CatalogFile::from_path(file.path())?;
    catalog.validate_config()?;

    let engine = PricingEngine::new(catalog.into_catalog());
    let blend = vec![ingredient("curly-kale", 50.0), ingredient("fresh-ginger", 50.0)];

    let quote = engine.calculate_blend_price(None, &blend, 16.0).await?;

    assert_eq!(quote.base_price, 6.4);
    assert_eq!(quote.final_price, 6.4);
    assert_eq!(quote.price_per_oz, 0.4);
    assert_eq!(quote.price_breakdown.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_subscriber_quote_from_catalog_file() -> anyhow::Result<()> {
    let file = write_catalog(SEED_CATALOG);
    let catalog = CatalogFile::from_path(file.path())?;
    let engine = PricingEngine::new(catalog.into_catalog());

    let blend = vec![ingredient("curly-kale", 50.0), ingredient("fresh-ginger", 50.0)];
    let quote = engine
        .calculate_blend_price(Some("ada"), &blend, 16.0)
        .await?;

    // Premium plan: 10% off, plus 5% volume discount at the 16 oz threshold.
    assert_eq!(quote.base_price, 6.4);
    assert_eq!(quote.subscription_discount, 0.64);
    assert_eq!(quote.volume_discount, 0.29);
    assert_eq!(quote.final_price, 5.47);

    Ok(())
}

#[tokio::test]
async fn test_cancelled_subscription_is_ignored() -> anyhow::Result<()> {
    let file = write_catalog(SEED_CATALOG);
    let catalog = CatalogFile::from_path(file.path())?;
    let engine = PricingEngine::new(catalog.into_catalog());

    let quote = engine
        .calculate_blend_price(Some("grace"), &[ingredient("honeycrisp-apple", 100.0)], 16.0)
        .await?;

    assert_eq!(quote.subscription_discount, 0.0);
    assert_eq!(quote.subscription_tier, None);
    assert_eq!(quote.base_price, quote.final_price);

    Ok(())
}

#[tokio::test]
async fn test_tier_comparison_from_catalog_file() -> anyhow::Result<()> {
    let file = write_catalog(SEED_CATALOG);
    let catalog = CatalogFile::from_path(file.path())?;
    let engine = PricingEngine::new(catalog.into_catalog());

    let blend = vec![ingredient("honeycrisp-apple", 100.0)];
    let comparison = engine.calculate_tier_savings(&blend, 64.0).await?;

    assert_eq!(comparison.base_price, 22.4);
    assert_eq!(comparison.tier_savings.len(), 3);

    let basic = &comparison.tier_savings[0];
    assert_eq!(basic.plan_id, "basic");
    assert_eq!(basic.final_price, 22.4);
    assert_eq!(basic.savings_percentage, 0.0);

    // Premium: 22.4 * 0.9 = 20.16, minus 5% volume discount above 16 oz.
    let premium = &comparison.tier_savings[1];
    assert_eq!(premium.final_price, 19.15);
    assert_eq!(premium.savings, 3.25);

    // VIP: 22.4 * 0.8 = 17.92, minus 10% at the 64 oz threshold.
    let vip = &comparison.tier_savings[2];
    assert_eq!(vip.final_price, 16.13);
    assert_eq!(vip.savings, 6.27);
    assert_eq!(vip.savings_percentage, 28.0);

    Ok(())
}

#[tokio::test]
async fn test_unknown_variant_fails_with_file_catalog() -> anyhow::Result<()> {
    let file = write_catalog(SEED_CATALOG);
    let catalog = CatalogFile::from_path(file.path())?;
    let engine = PricingEngine::new(catalog.into_catalog());

    let blend = vec![ingredient("dragonfruit", 100.0)];
    let err = engine
        .calculate_blend_price(None, &blend, 16.0)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BlendError::VariantNotFoundError { variant_id } if variant_id == "dragonfruit"
    ));

    Ok(())
}

#[test]
fn test_invalid_catalog_file_is_rejected() {
    let file = write_catalog(
        r#"
[[variants]]
id = "mystery"
name = "Mystery Juice"
kind = "fruit"
base_ingredient = "mystery"
variant_name = "Mystery"
base_cost_per_oz = 0.10
color = "greenish"
is_active = true
"#,
    );

    let catalog = CatalogFile::from_path(file.path()).unwrap();
    let err = catalog.validate_config().unwrap_err();
    assert!(matches!(err, BlendError::InvalidConfigValueError { .. }));
}

#[test]
fn test_unparseable_toml_is_rejected() {
    let file = write_catalog("[[variants]\nid = broken");
    let err = CatalogFile::from_path(file.path()).unwrap_err();
    assert!(matches!(err, BlendError::TomlError(_)));
}
