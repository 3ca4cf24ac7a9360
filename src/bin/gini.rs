use anyhow::{Result, anyhow, bail};
use clap::{Parser, ValueEnum};
use gini_rs::api::normalize_country_code;
use gini_rs::transform::{self, RoundingTransform};
use gini_rs::{Client, ClientConfig, DateSpec, FetchOutcome, IndicatorRecord};
use gini_rs::{interpret, stats, storage};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "gini",
    version,
    about = "Fetch the GINI index of a country from the World Bank API"
)]
struct Cli {
    /// The 3-letter ISO country code (e.g., ARG, USA, BRA).
    country_code: String,
    /// Show historical data in addition to the latest value.
    #[arg(short = 'H', long, default_value_t = false)]
    history: bool,
    /// Also process the latest value with the rounding transform.
    #[arg(short = 'C', long, default_value_t = false)]
    process: bool,
    /// Year (YYYY) or range (YYYY:YYYY). Defaults to 2011:2020.
    #[arg(short = 'd', long)]
    date: Option<String>,
    /// Print summary statistics of the history.
    #[arg(long, default_value_t = false)]
    stats: bool,
    /// Save the records to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{:.2}", x),
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let code = normalize_country_code(&cli.country_code)?;
    let mut config = ClientConfig::from_env()?;
    if let Some(s) = &cli.date {
        config.date = DateSpec::parse(s)
            .ok_or_else(|| anyhow!("invalid --date, expected YYYY or YYYY:YYYY"))?;
    }
    let period = config.date;
    let client = Client::new(config)?;

    eprintln!("Fetching GINI data for {}...", code);
    let records = match client.lookup(&code) {
        FetchOutcome::Success(records) => records,
        FetchOutcome::Empty => {
            println!(
                "\nNo GINI data points found for {} in the period {}.",
                code, period
            );
            return Ok(());
        }
        FetchOutcome::Failure(e) => {
            let context = format!("error fetching data for {}", code);
            return Err(anyhow::Error::new(e).context(context));
        }
    };

    if let Some(path) = cli.out.as_ref() {
        save(&records, path, cli.format.as_ref())?;
        eprintln!("Saved {} records to {}", records.len(), path.display());
    }

    let Some(latest) = interpret::select_latest(&records) else {
        println!(
            "\nData found for {}, but no records had a valid GINI value in the period {}.",
            code, period
        );
        if cli.history {
            println!("\n--- Historical Data (raw/invalid values might be present) ---");
            print_lines(
                &interpret::format_raw_history(&records),
                "(No historical records found in response)",
            );
        }
        return Ok(());
    };

    println!("\n--- GINI Index Summary ---");
    println!(
        "Country:      {}",
        latest.country_name.as_deref().unwrap_or(&code)
    );
    println!(
        "Latest Year:  {}",
        latest.period.as_deref().unwrap_or("N/A")
    );
    if let Some(value) = latest.numeric_value() {
        println!("Latest GINI:  {:.2}", value);
        if cli.process {
            println!("\n--- Rounding Transform ---");
            match transform::apply(&RoundingTransform, value) {
                Some(out) => {
                    println!("Input:        {:.2}", value);
                    println!("Output:       {}", out);
                }
                None => eprintln!("Error during transform processing (check logs)."),
            }
        }
    }

    if cli.history {
        println!("\n--- Historical Data (Oldest First, Valid Only) ---");
        print_lines(
            &interpret::format_history(&records),
            "(No valid historical records found)",
        );
    }

    if cli.stats {
        let s = stats::summarize(&records);
        println!(
            "\n{}  count={} missing={} invalid={}  min={} max={} mean={} median={}",
            code,
            s.count,
            s.missing,
            s.invalid,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median)
        );
    }

    Ok(())
}

fn print_lines(lines: &[String], when_empty: &str) {
    if lines.is_empty() {
        println!("  {}", when_empty);
    }
    for line in lines {
        println!("  {}", line);
    }
}

fn save(records: &[IndicatorRecord], path: &Path, format: Option<&OutFormat>) -> Result<()> {
    let fmt = match format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_csv(records, path),
        "json" => storage::save_json(records, path),
        other => bail!("unsupported format: {}", other),
    }
}
