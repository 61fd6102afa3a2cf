use httpmock::prelude::*;

use blendcraft::{BlendError, BlendIngredient, HttpCatalog, PricingEngine};

fn ingredient(variant_id: &str, percentage: f64) -> BlendIngredient {
    BlendIngredient {
        variant_id: variant_id.to_string(),
        percentage,
    }
}

fn variants_fixture() -> serde_json::Value {
    serde_json::json!([
        {
            "id": "curly-kale",
            "name": "Curly Kale",
            "ingredientType": "vegetable",
            "baseIngredient": "kale",
            "variantName": "Curly",
            "baseCostPerOz": "0.3000",
            "color": "#355e3b",
            "isActive": true
        },
        {
            "id": "fresh-ginger",
            "name": "Fresh Ginger",
            "ingredientType": "herb",
            "baseIngredient": "ginger",
            "variantName": "Fresh",
            "baseCostPerOz": "0.5000",
            "color": "#f4d03f",
            "isActive": true
        }
    ])
}

fn plans_fixture() -> serde_json::Value {
    serde_json::json!([
        {
            "id": "basic",
            "name": "Basic Squeeze",
            "tier": "basic",
            "pricePerMonth": "9.99",
            "perOzMultiplier": "1.0000",
            "volumeDiscountThreshold": null,
            "volumeDiscountPercentage": null,
            "isActive": true,
            "sortOrder": 1
        },
        {
            "id": "premium",
            "name": "Premium Press",
            "tier": "premium",
            "pricePerMonth": "29.99",
            "perOzMultiplier": "0.9000",
            "volumeDiscountThreshold": 128,
            "volumeDiscountPercentage": "5.00",
            "isActive": true,
            "sortOrder": 2
        },
        {
            "id": "vip",
            "name": "VIP Cold Press",
            "tier": "vip",
            "pricePerMonth": "59.99",
            "perOzMultiplier": "0.8000",
            "volumeDiscountThreshold": 16,
            "volumeDiscountPercentage": "10.00",
            "isActive": true,
            "sortOrder": 3
        }
    ])
}

#[tokio::test]
async fn test_quote_without_user_over_http() {
    let server = MockServer::start();
    let variants_mock = server.mock(|when, then| {
        when.method(GET).path("/api/ingredient-variants");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(variants_fixture());
    });

    let engine = PricingEngine::new(HttpCatalog::new(&server.base_url()));
    let blend = vec![ingredient("curly-kale", 50.0), ingredient("fresh-ginger", 50.0)];

    let quote = engine
        .calculate_blend_price(None, &blend, 16.0)
        .await
        .unwrap();

    variants_mock.assert();
    assert_eq!(quote.base_price, 6.4);
    assert_eq!(quote.final_price, 6.4);
    assert_eq!(quote.price_per_oz, 0.4);
    assert_eq!(quote.subscription_tier, None);
    assert_eq!(quote.price_breakdown.len(), 2);
    assert_eq!(quote.price_breakdown[0].variant_name, "Curly Kale");
}

#[tokio::test]
async fn test_quote_applies_subscription_from_user_endpoint() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/ingredient-variants");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(variants_fixture());
    });
    let subscription_mock = server.mock(|when, then| {
        when.method(GET).path("/api/users/ada/subscription");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "id": "sub-42",
                "userId": "ada",
                "planId": "vip",
                "status": "active",
                "startDate": "2026-01-15T08:30:00.000Z",
                "plan": {
                    "id": "vip",
                    "name": "VIP Cold Press",
                    "tier": "vip",
                    "pricePerMonth": "59.99",
                    "perOzMultiplier": "0.9000",
                    "volumeDiscountThreshold": 16,
                    "volumeDiscountPercentage": "5.00",
                    "sortOrder": 3
                }
            }));
    });

    let engine = PricingEngine::new(HttpCatalog::new(&server.base_url()));
    let blend = vec![ingredient("curly-kale", 50.0), ingredient("fresh-ginger", 50.0)];

    let quote = engine
        .calculate_blend_price(Some("ada"), &blend, 16.0)
        .await
        .unwrap();

    subscription_mock.assert();
    assert_eq!(quote.base_price, 6.4);
    assert_eq!(quote.subscription_discount, 0.64);
    assert_eq!(quote.volume_discount, 0.29);
    assert_eq!(quote.final_price, 5.47);
    assert_eq!(quote.price_per_oz, 0.342);
}

#[tokio::test]
async fn test_user_without_subscription_gets_base_price() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/ingredient-variants");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(variants_fixture());
    });
    let subscription_mock = server.mock(|when, then| {
        when.method(GET).path("/api/users/drifter/subscription");
        then.status(404);
    });

    let engine = PricingEngine::new(HttpCatalog::new(&server.base_url()));
    let blend = vec![ingredient("curly-kale", 100.0)];

    let quote = engine
        .calculate_blend_price(Some("drifter"), &blend, 16.0)
        .await
        .unwrap();

    subscription_mock.assert();
    assert_eq!(quote.subscription_discount, 0.0);
    assert_eq!(quote.base_price, quote.final_price);
    assert_eq!(quote.subscription_tier, None);
}

#[tokio::test]
async fn test_unknown_variant_is_a_hard_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/ingredient-variants");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(variants_fixture());
    });

    let engine = PricingEngine::new(HttpCatalog::new(&server.base_url()));
    let blend = vec![ingredient("curly-kale", 50.0), ingredient("starfruit", 50.0)];

    let err = engine
        .calculate_blend_price(None, &blend, 16.0)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BlendError::VariantNotFoundError { variant_id } if variant_id == "starfruit"
    ));
}

#[tokio::test]
async fn test_catalog_server_error_propagates() {
    let server = MockServer::start();
    let failing_mock = server.mock(|when, then| {
        when.method(GET).path("/api/ingredient-variants");
        then.status(503);
    });

    let engine = PricingEngine::new(HttpCatalog::new(&server.base_url()));
    let err = engine
        .calculate_blend_price(None, &[ingredient("curly-kale", 100.0)], 16.0)
        .await
        .unwrap_err();

    failing_mock.assert();
    assert!(matches!(
        err,
        BlendError::CatalogStatusError { status: 503, .. }
    ));
}

#[tokio::test]
async fn test_malformed_decimal_in_catalog_is_rejected() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/ingredient-variants");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {
                    "id": "curly-kale",
                    "name": "Curly Kale",
                    "ingredientType": "vegetable",
                    "baseIngredient": "kale",
                    "variantName": "Curly",
                    "baseCostPerOz": "thirty cents",
                    "color": "#355e3b",
                    "isActive": true
                }
            ]));
    });

    let engine = PricingEngine::new(HttpCatalog::new(&server.base_url()));
    let err = engine
        .calculate_blend_price(None, &[ingredient("curly-kale", 100.0)], 16.0)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BlendError::InvalidDecimalError { field, .. } if field == "baseCostPerOz"
    ));
}

#[tokio::test]
async fn test_tier_savings_over_http() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/ingredient-variants");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(variants_fixture());
    });
    let plans_mock = server.mock(|when, then| {
        when.method(GET).path("/api/subscription-plans");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(plans_fixture());
    });

    let engine = PricingEngine::new(HttpCatalog::new(&server.base_url()));
    let comparison = engine
        .calculate_tier_savings(&[ingredient("curly-kale", 100.0)], 16.0)
        .await
        .unwrap();

    plans_mock.assert();
    assert_eq!(comparison.base_price, 4.8);
    assert_eq!(comparison.tier_savings.len(), 3);

    // Basic has no discount at all.
    assert_eq!(comparison.tier_savings[0].savings, 0.0);
    assert_eq!(comparison.tier_savings[0].savings_percentage, 0.0);

    // Premium's volume threshold (128 oz) is not met at 16 oz.
    assert_eq!(comparison.tier_savings[1].final_price, 4.32);
    assert_eq!(comparison.tier_savings[1].savings_percentage, 10.0);

    // VIP gets both the multiplier and the 10% volume discount.
    assert_eq!(comparison.tier_savings[2].final_price, 3.46);
    assert_eq!(comparison.tier_savings[2].savings, 1.34);
    assert_eq!(comparison.tier_savings[2].savings_percentage, 28.0);
}

#[tokio::test]
async fn test_plan_listing_passthrough() {
    let server = MockServer::start();
    let plans_mock = server.mock(|when, then| {
        when.method(GET).path("/api/subscription-plans");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(plans_fixture());
    });

    let engine = PricingEngine::new(HttpCatalog::new(&server.base_url()));
    let plans = engine.get_subscription_plans().await.unwrap();

    plans_mock.assert();
    assert_eq!(plans.len(), 3);
    assert_eq!(plans[0].id, "basic");
    assert_eq!(plans[2].per_oz_multiplier, 0.8);
    assert_eq!(plans[2].volume_discount_threshold, Some(16.0));
}
