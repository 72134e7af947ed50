use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;

use spotline_core::{
    ExtractedOrder, OrderError, OrderProcessor, ProfileManager, SourceKind, SouthAsianChoice,
};

#[derive(Parser)]
#[command(name = "spotline")]
#[command(about = "Normalize and consolidate extracted insertion orders into schedule lines")]
struct Args {
    /// Path to the extracted order (JSON format)
    #[arg(short, long)]
    input: String,

    /// Path to a custom source profile (YAML format)
    #[arg(short, long)]
    profile: Option<String>,

    /// Builtin source kind: annual-buy, net-rate-agency, compact-day, or generic
    #[arg(short, long, default_value = "generic")]
    source: String,

    /// South Asian block choice when the order needs one: hindi, punjabi, or both
    #[arg(long)]
    south_asian: Option<String>,

    /// Output file path (if not specified, auto-generated based on input)
    #[arg(short, long)]
    output: Option<String>,

    /// Show available source profiles and exit
    #[arg(long)]
    show_profiles: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("🦀 Spotline Order Engine");

    if args.show_profiles {
        show_profiles();
        return Ok(());
    }

    if !Path::new(&args.input).exists() {
        println!("⚠️  Input order not found at: {}", args.input);
        println!("   Please check the file path.");
        return Ok(());
    }

    let profile = load_profile(&args)?;
    println!("📋 Source profile: {:?}", profile.source);

    let mut order = load_order(&args.input)?;
    if let Some(choice) = parse_south_asian(args.south_asian.as_deref())? {
        order.south_asian_choice = Some(choice);
    }

    let processor = OrderProcessor::new(profile);
    match processor.process(&order) {
        Ok(output) => {
            println!("✅ Successfully processed order {}", order.order_code);
            println!("📊 Output metrics:");
            println!("   - Schedule lines: {}", output.lines.len());
            println!(
                "   - Total spots: {}",
                output.lines.iter().map(|l| l.total_spots).sum::<u32>()
            );
            if output.diagnostics.rows_skipped > 0 {
                println!(
                    "   - Skipped rows: {} (see diagnostics in output)",
                    output.diagnostics.rows_skipped
                );
            }

            let output_path = if let Some(output) = &args.output {
                output.clone()
            } else {
                let input_name = Path::new(&args.input)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("output");
                format!("{input_name}_spotline.json")
            };

            let json = serde_json::to_string_pretty(&output)?;
            std::fs::write(&output_path, json)?;
            println!("💾 Schedule lines saved to: {}", output_path);
        }
        Err(OrderError::PendingDisambiguation { language }) => {
            println!("⏸️  Order needs a disambiguation choice for {language}");
            println!("   Re-run with: --south-asian hindi | punjabi | both");
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("❌ Processing failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Resolve the processing profile: custom YAML wins over the builtin kind.
fn load_profile(args: &Args) -> Result<spotline_core::SourceProfile> {
    if let Some(path) = &args.profile {
        println!("📋 Loaded profile from: {}", path);
        return spotline_core::SourceProfile::load_from_file(path)
            .with_context(|| format!("failed to load profile from {path}"));
    }

    let kind = match args.source.as_str() {
        "annual-buy" => SourceKind::AnnualBuy,
        "net-rate-agency" => SourceKind::NetRateAgency,
        "compact-day" => SourceKind::CompactDay,
        "generic" => SourceKind::Generic,
        other => anyhow::bail!(
            "unknown source kind {other:?} (expected annual-buy, net-rate-agency, compact-day, or generic)"
        ),
    };
    Ok(ProfileManager::new().get(&kind).clone())
}

fn load_order(path: &str) -> Result<ExtractedOrder> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read order from {path}"))?;
    serde_json::from_str(&content).with_context(|| format!("invalid order JSON in {path}"))
}

fn parse_south_asian(value: Option<&str>) -> Result<Option<SouthAsianChoice>> {
    match value {
        None => Ok(None),
        Some("hindi") => Ok(Some(SouthAsianChoice::Hindi)),
        Some("punjabi") => Ok(Some(SouthAsianChoice::Punjabi)),
        Some("both") => Ok(Some(SouthAsianChoice::Both)),
        Some(other) => anyhow::bail!(
            "unknown South Asian choice {other:?} (expected hindi, punjabi, or both)"
        ),
    }
}

fn show_profiles() {
    println!("\n📋 Builtin Source Profiles:");
    println!("  annual-buy       - Annual cable buys; weeks derive from the flight window");
    println!("  net-rate-agency  - Net rates grossed up at the 15% commission factor");
    println!("  compact-day      - Compact day-run formats with printed week columns");
    println!("  generic          - No gross-up, 15 minute separation, ROS M-Su 6a-11:59p");

    println!("\n📝 Usage Examples:");
    println!("  spotline -i order.json");
    println!("  spotline -i order.json -s net-rate-agency -o lines.json");
    println!("  spotline -i order.json --south-asian both");
    println!("  spotline -i order.json -p my_profile.yaml");
}
