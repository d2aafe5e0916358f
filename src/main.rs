use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};

use layoffs_pipeline::analysis;
use layoffs_pipeline::config::CleaningRules;
use layoffs_pipeline::logging;
use layoffs_pipeline::pipeline::{self, CleanSummary, Pipeline};
use layoffs_pipeline::records::LayoffRecord;

#[derive(Parser)]
#[command(name = "layoffs_pipeline")]
#[command(about = "Cleaning and analysis pipeline for the global layoffs dataset")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the cleaning pipeline and write the cleaned CSV
    Clean {
        /// Path to the raw layoffs CSV
        #[arg(long)]
        input: PathBuf,
        /// Where to write the cleaned CSV
        #[arg(long)]
        output: PathBuf,
        /// Optional TOML rules file (defaults to the built-in rule set)
        #[arg(long)]
        rules: Option<PathBuf>,
    },
    /// Run analysis queries over a cleaned CSV
    Analyze {
        /// Path to a cleaned CSV
        #[arg(long)]
        input: PathBuf,
        /// Specific query to run. Available: date-range, totals, shutdowns,
        /// by-company, by-industry, by-country, monthly, top-companies
        #[arg(long)]
        query: Option<String>,
        /// Rank cutoff for the top-companies query
        #[arg(long, default_value_t = 5)]
        top: usize,
        /// Emit results as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run cleaning then analysis sequentially
    Run {
        /// Path to the raw layoffs CSV
        #[arg(long)]
        input: PathBuf,
        /// Where to write the cleaned CSV
        #[arg(long)]
        output: PathBuf,
        /// Optional TOML rules file
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Rank cutoff for the top-companies query
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
}

const QUERY_NAMES: [&str; 8] = [
    "date-range",
    "totals",
    "shutdowns",
    "by-company",
    "by-industry",
    "by-country",
    "monthly",
    "top-companies",
];

fn load_rules(path: Option<PathBuf>) -> Result<CleaningRules, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            info!("Loading cleaning rules from {}", path.display());
            Ok(CleaningRules::load(&path)?)
        }
        None => Ok(CleaningRules::default()),
    }
}

fn clean(
    input: &PathBuf,
    output: &PathBuf,
    rules: Option<PathBuf>,
) -> Result<Vec<LayoffRecord>, Box<dyn std::error::Error>> {
    let pipeline = Pipeline::new(load_rules(rules)?);
    println!("🚀 Cleaning {}...", input.display());

    let (records, summary) = match pipeline.run(input) {
        Ok(result) => result,
        Err(e) => {
            error!("Pipeline failed: {}", e);
            return Err(e.into());
        }
    };
    pipeline::write_clean_csv(&records, output)?;
    print_summary(&summary, output);
    Ok(records)
}

fn print_summary(summary: &CleanSummary, output: &PathBuf) {
    println!("\n📊 Cleaning run {}:", summary.run_id);
    println!("   Source rows: {}", summary.source_rows);
    println!("   Duplicates removed: {}", summary.duplicates_removed);
    println!(
        "   Fields nulled (bad dates/numbers): {}/{}",
        summary.issues.unparseable_dates, summary.issues.unparseable_numbers
    );
    println!(
        "   Fixups (location/industry/country): {}/{}/{}",
        summary.issues.location_fixes,
        summary.issues.industry_collapses,
        summary.issues.country_fixes
    );
    println!("   Industries imputed: {}", summary.imputed_industries);
    println!("   Uninformative rows dropped: {}", summary.dropped_rows);
    println!("   Output rows: {}", summary.output_rows);
    println!("   Output file: {}", output.display());
}

fn run_query(
    records: &[LayoffRecord],
    name: &str,
    top: usize,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match name {
        "date-range" => match analysis::date_range(records) {
            Some(range) if json => println!("{}", serde_json::to_string_pretty(&range)?),
            Some(range) => println!("📅 Events span {} to {}", range.earliest, range.latest),
            None => println!("📅 No dated records"),
        },
        "totals" => {
            let totals = analysis::dataset_totals(records);
            if json {
                println!("{}", serde_json::to_string_pretty(&totals)?);
            } else {
                println!(
                    "Σ {} laid off, ${}M raised across the dataset",
                    totals.total_laid_off, totals.funds_raised_millions
                );
            }
        }
        "shutdowns" => {
            let count = analysis::full_shutdown_count(records);
            if json {
                println!("{}", serde_json::json!({ "full_shutdowns": count }));
            } else {
                println!("🏚️  {} full-company shutdowns (100% laid off)", count);
            }
        }
        "by-company" | "by-industry" | "by-country" => {
            let groups = match name {
                "by-company" => analysis::totals_by_company(records),
                "by-industry" => analysis::totals_by_industry(records),
                _ => analysis::totals_by_country(records),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else {
                println!("Total laid off {}:", name.replace('-', " "));
                for group in groups.iter().take(20) {
                    println!("   {:<30} {}", group.key, group.total_laid_off);
                }
            }
        }
        "monthly" => {
            let months = analysis::monthly_running_totals(records);
            if json {
                println!("{}", serde_json::to_string_pretty(&months)?);
            } else {
                println!("Month      laid off    running total");
                for month in &months {
                    println!(
                        "   {}   {:>8}    {:>8}",
                        month.month, month.laid_off, month.running_total
                    );
                }
            }
        }
        "top-companies" => {
            let ranked = analysis::top_companies_per_year(records, top);
            if json {
                println!("{}", serde_json::to_string_pretty(&ranked)?);
            } else {
                println!("Top {} companies per year:", top);
                for entry in &ranked {
                    println!(
                        "   {}  #{:<2} {:<30} {}",
                        entry.year, entry.rank, entry.company, entry.total_laid_off
                    );
                }
            }
        }
        other => {
            warn!("Unknown query requested: {}", other);
            println!("⚠️  Unknown query: {}", other);
            println!("   Available: {}", QUERY_NAMES.join(", "));
        }
    }
    Ok(())
}

fn analyze(
    records: &[LayoffRecord],
    query: Option<String>,
    top: usize,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match query {
        Some(name) => run_query(records, &name, top, json)?,
        None => {
            for name in QUERY_NAMES {
                run_query(records, name, top, json)?;
                if !json {
                    println!();
                }
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Clean {
            input,
            output,
            rules,
        } => {
            clean(&input, &output, rules)?;
        }
        Commands::Analyze {
            input,
            query,
            top,
            json,
        } => {
            let records = pipeline::read_clean_csv(&input)?;
            info!("Loaded {} cleaned records for analysis", records.len());
            analyze(&records, query, top, json)?;
        }
        Commands::Run {
            input,
            output,
            rules,
            top,
        } => {
            let records = clean(&input, &output, rules)?;
            println!();
            analyze(&records, None, top, false)?;
        }
    }

    Ok(())
}
