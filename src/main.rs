use anyhow::Context;
use clap::Parser;
use std::collections::HashMap;
use std::time::Duration;

use blendcraft::config::CatalogFile;
use blendcraft::core::color::{self, ColorPortion};
use blendcraft::domain::model::{IngredientVariant, PriceQuote, TierComparison};
use blendcraft::utils::{logger, validation::Validate};
use blendcraft::{
    BlendIngredient, CatalogRepository, CliConfig, HttpCatalog, OutputFormat, PricingEngine,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting blendcraft CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let blend = config.blend()?;

    if let Some(path) = &config.catalog {
        tracing::info!("📁 Loading catalog from: {}", path);
        let catalog = CatalogFile::from_path(path)
            .with_context(|| format!("Failed to load catalog file '{}'", path))?;

        if let Err(e) = catalog.validate_config() {
            tracing::error!("❌ Catalog validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }

        run_quotes(catalog.into_catalog(), &config, &blend).await
    } else if let Some(endpoint) = &config.endpoint {
        tracing::info!("📡 Using catalog endpoint: {}", endpoint);
        let repository =
            HttpCatalog::with_timeout(endpoint, Duration::from_secs(config.timeout_seconds))?;
        run_quotes(repository, &config, &blend).await
    } else {
        // validate() guarantees a source; kept for hand-built configs.
        anyhow::bail!("No catalog source configured");
    }
}

async fn run_quotes<R: CatalogRepository>(
    repository: R,
    config: &CliConfig,
    blend: &[BlendIngredient],
) -> anyhow::Result<()> {
    // The bottle preview needs variant colors, fetched before the engine
    // takes ownership of the repository.
    let ids: Vec<String> = blend.iter().map(|i| i.variant_id.clone()).collect();
    let variants = repository.get_variants_by_ids(&ids).await?;
    let preview = build_preview(&variants, blend);

    let engine = PricingEngine::new(repository);

    let quote = match engine
        .calculate_blend_price(config.user.as_deref(), blend, config.ounces)
        .await
    {
        Ok(quote) => quote,
        Err(e) => {
            tracing::error!("❌ Price calculation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let comparison = if config.compare_tiers {
        Some(engine.calculate_tier_savings(blend, config.ounces).await?)
    } else {
        None
    };

    match config.format {
        OutputFormat::Table => render_table(config, &quote, comparison.as_ref(), &preview),
        OutputFormat::Json => render_json(&quote, comparison.as_ref(), &preview)?,
    }

    if let Some(path) = &config.export_csv {
        export_breakdown_csv(path, &quote)
            .with_context(|| format!("Failed to export breakdown to '{}'", path))?;
        println!("📁 Breakdown exported to: {}", path);
    }

    tracing::info!("✅ Quote complete");
    Ok(())
}

#[derive(Debug, serde::Serialize)]
struct BlendPreview {
    mixed_color: String,
    opacity: f64,
    garnish_color: String,
    fill_gradient: String,
}

fn build_preview(variants: &[IngredientVariant], blend: &[BlendIngredient]) -> BlendPreview {
    let colors: HashMap<&str, &str> = variants
        .iter()
        .map(|v| (v.id.as_str(), v.color.as_str()))
        .collect();

    let portions: Vec<ColorPortion> = blend
        .iter()
        .filter_map(|ingredient| {
            colors
                .get(ingredient.variant_id.as_str())
                .map(|hex| ColorPortion {
                    color: (*hex).to_string(),
                    percentage: ingredient.percentage,
                })
        })
        .collect();

    let mixed_color = color::mix_juice_colors(&portions);
    let fill: f64 = blend.iter().map(|i| i.percentage).sum();

    BlendPreview {
        opacity: color::estimate_opacity(&mixed_color),
        garnish_color: color::suggest_garnish_color(&mixed_color),
        fill_gradient: color::get_bottle_fill_gradient(&mixed_color, fill),
        mixed_color,
    }
}

fn render_table(
    config: &CliConfig,
    quote: &PriceQuote,
    comparison: Option<&TierComparison>,
    preview: &BlendPreview,
) {
    println!("🧃 Blend quote ({} oz):", config.ounces);
    println!();
    println!(
        "  {:<24} {:>7} {:>10} {:>14}",
        "Ingredient", "Pct", "Cost/oz", "Contribution"
    );
    for item in &quote.price_breakdown {
        println!(
            "  {:<24} {:>6.1}% {:>10.4} {:>14.4}",
            item.variant_name, item.percentage, item.cost_per_oz, item.cost_contribution
        );
    }
    println!();
    println!("  Base price:            ${:>8.2}", quote.base_price);
    if let Some(tier) = quote.subscription_tier {
        println!("  Subscription tier:      {}", tier);
    }
    println!("  Subscription discount: ${:>8.2}", quote.subscription_discount);
    println!("  Volume discount:       ${:>8.2}", quote.volume_discount);
    println!("  Final price:           ${:>8.2}", quote.final_price);
    println!("  Price per oz:          ${:>8.4}", quote.price_per_oz);

    if let Some(comparison) = comparison {
        println!();
        println!("📊 Tier comparison (base ${:.2}):", comparison.base_price);
        println!(
            "  {:<20} {:<8} {:>10} {:>9} {:>9}",
            "Plan", "Tier", "$/month", "Final", "Savings"
        );
        for saving in &comparison.tier_savings {
            println!(
                "  {:<20} {:<8} {:>10.2} {:>9.2} {:>8.1}%",
                saving.plan_name,
                saving.tier,
                saving.monthly_fee,
                saving.final_price,
                saving.savings_percentage
            );
        }
    }

    println!();
    println!("🎨 Bottle preview:");
    println!("  Mixed color:  {}", preview.mixed_color);
    println!("  Opacity:      {:.2}", preview.opacity);
    println!("  Garnish:      {}", preview.garnish_color);
    println!("  Fill:         {}", preview.fill_gradient);
}

fn render_json(
    quote: &PriceQuote,
    comparison: Option<&TierComparison>,
    preview: &BlendPreview,
) -> anyhow::Result<()> {
    let envelope = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "quote": quote,
        "tier_comparison": comparison,
        "preview": preview,
    });

    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn export_breakdown_csv(path: &str, quote: &PriceQuote) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["variant_name", "percentage", "cost_per_oz", "cost_contribution"])?;

    for item in &quote.price_breakdown {
        writer.write_record([
            item.variant_name.clone(),
            item.percentage.to_string(),
            item.cost_per_oz.to_string(),
            item.cost_contribution.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
