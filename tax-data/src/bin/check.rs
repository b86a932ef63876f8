use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tax_core::TaxSchedule;
use tax_data::ScheduleLoader;

/// Check the bracket schedules in a CSV file.
///
/// The CSV file should have the following columns:
/// - tax_year: The tax year (e.g., 2022)
/// - min: The lower bound of the bracket
/// - max: The upper bound (empty for the top bracket)
/// - rate: The marginal tax rate as a fraction (e.g., 0.15)
#[derive(Parser, Debug)]
#[command(name = "tax-schedule-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing the schedules
    #[arg(short, long)]
    file: PathBuf,

    /// Only check this tax year
    #[arg(short, long)]
    year: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Checking schedules in: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = ScheduleLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let mut schedules = ScheduleLoader::group(&records);
    if let Some(year) = &args.year {
        schedules.retain(|y, _| y == year);
        if schedules.is_empty() {
            bail!("No schedule for tax year {year} in {}", args.file.display());
        }
    }

    let mut invalid = 0;
    for (year, brackets) in schedules {
        let count = brackets.len();
        match TaxSchedule::new(brackets) {
            Ok(schedule) => println!(
                "{year}: {count} brackets, top rate {}",
                schedule.top_rate()
            ),
            Err(e) => {
                println!("{year}: INVALID ({e})");
                invalid += 1;
            }
        }
    }

    if invalid > 0 {
        bail!("{invalid} invalid schedule(s) in {}", args.file.display());
    }

    println!("All schedules are valid.");
    Ok(())
}
