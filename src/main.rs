use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use offergen::inventory::columns;
use offergen::record_matcher::DEFAULT_MAX_SUGGESTIONS;
use offergen::report::LogSink;
use offergen::{GeneratorConfig, Inventory, OfferGenerator, RecordMatcher};

/// Generate an offer letter PDF from an inventory CSV and a brochure PDF
#[derive(Parser)]
#[command(name = "offergen", version)]
struct Args {
    /// Inventory CSV file
    #[arg(long)]
    inventory: PathBuf,

    /// Brochure PDF file
    #[arg(long)]
    brochure: Option<PathBuf>,

    /// Unit number to generate an offer for
    #[arg(long)]
    unit: Option<String>,

    /// Output path for the assembled PDF
    #[arg(long, default_value = "offer.pdf")]
    output: PathBuf,

    /// Print ranked suggestions for a requirement text instead of generating
    #[arg(long)]
    suggest: Option<String>,

    /// JSON config file overriding the built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GeneratorConfig::from_json(&fs::read(path)?)?,
        None => GeneratorConfig::default(),
    };

    let inventory = Inventory::from_csv_bytes(&fs::read(&args.inventory)?)?;

    if let Some(requirement) = &args.suggest {
        let matcher = RecordMatcher::new(config.matcher.clone());
        let suggestions = matcher.suggest(&inventory, requirement, DEFAULT_MAX_SUGGESTIONS);
        let rows: Vec<serde_json::Value> = suggestions
            .iter()
            .map(|s| {
                serde_json::json!({
                    "unit": s.record.get(columns::UNIT_NUMBER),
                    "development": s.record.get(columns::DEV_NAME),
                    "score": s.score,
                    "reasons": s.reasons,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let brochure_path = args.brochure.context("--brochure is required to generate")?;
    let unit = args.unit.context("--unit is required to generate")?;
    let brochure_bytes = fs::read(&brochure_path)?;

    let generator = OfferGenerator::new(config);
    let bytes = generator.generate(&inventory, &unit, &brochure_bytes, &mut LogSink)?;

    fs::write(&args.output, bytes)?;
    println!("Offer letter written to {}", args.output.display());
    Ok(())
}
