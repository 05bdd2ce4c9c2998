//! LRJS deadline CLI tool
//!
//! A command-line tool for computing the Art. 82.5 / Art. 45 LRJS filing
//! deadline before a labour trial.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use plazo_lrjs::date::{format_date_es, format_iso, parse_trial_date};
use plazo_lrjs::deadline::{DEFAULT_SEARCH_CAP_DAYS, BUSINESS_DAYS_BEFORE_TRIAL};
use plazo_lrjs::holidays::{
    collect_holidays, compose_holiday_input, lookup_years, JsonHolidayFile, NamedHoliday,
};
use plazo_lrjs::{
    calculate_deadline_with, is_non_business_day, parse_holidays, CalculatorConfig,
    DeadlineResult, HolidaySet, RawHolidayInput,
};

/// LRJS deadline calculator - Art. 82.5 and Art. 45 filing deadlines
#[derive(Parser)]
#[command(name = "plazo-lrjs")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Deadline for a trial, weekends only
    plazo-lrjs calc 2026-02-26

    # Add local holidays by hand and from a file
    plazo-lrjs calc 26/02/2026 --holiday 2026-02-12 -f festivos.txt

    # Use a holiday-discovery response saved as JSON
    plazo-lrjs calc 2026-02-26 --discovered madrid-2026.json --location Madrid --format json

    # Check which lines of a holiday list are accepted
    plazo-lrjs parse festivos.txt")]
struct Cli {
    /// Print debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the filing deadline for a trial date
    Calc {
        /// Trial date (YYYY-MM-DD, DD/MM/YYYY or "today")
        trial_date: String,

        #[command(flatten)]
        holidays: HolidayArgs,

        /// Business days counted back from the trial
        #[arg(long, default_value_t = BUSINESS_DAYS_BEFORE_TRIAL)]
        business_days: u32,

        /// Calendar days each walk may examine before giving up
        #[arg(long, default_value_t = DEFAULT_SEARCH_CAP_DAYS)]
        search_cap: u32,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the dates accepted from a holiday list ("-" reads stdin)
    Parse {
        /// Holiday text file, one YYYY-MM-DD per line
        input: PathBuf,
    },

    /// Tell whether a date is a business day
    Check {
        /// Date to check (YYYY-MM-DD, DD/MM/YYYY or "today")
        date: String,

        #[command(flatten)]
        holidays: HolidayArgs,
    },
}

/// Holiday sources shared by the subcommands
#[derive(Args)]
struct HolidayArgs {
    /// Holiday text file, one YYYY-MM-DD per line (repeatable, "-" reads stdin)
    #[arg(short = 'f', long = "holidays-file")]
    holiday_files: Vec<PathBuf>,

    /// A single holiday date (repeatable)
    #[arg(long = "holiday")]
    holidays: Vec<String>,

    /// Holiday-discovery response as JSON ({"holidays": [{"date", "name"}]})
    #[arg(long)]
    discovered: Option<PathBuf>,

    /// Place of the trial, used when querying discovered holidays
    #[arg(long, default_value = "")]
    location: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Calc { trial_date, holidays, business_days, search_cap, format } => {
            cmd_calc(&trial_date, &holidays, business_days, search_cap, format)
        }
        Commands::Parse { input } => cmd_parse(&input),
        Commands::Check { date, holidays } => cmd_check(&date, &holidays),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Read a text file, or stdin for "-"
fn read_text(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        return io::read_to_string(io::stdin()).context("Failed to read stdin");
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Gather every holiday source into one set
///
/// Returns the set plus the named holidays found by discovery, for display.
fn load_holidays(
    args: &HolidayArgs,
    trial_date: NaiveDate,
    window_days: u32,
) -> Result<(HolidaySet, Vec<NamedHoliday>)> {
    let discovered = match &args.discovered {
        Some(path) => {
            let provider = JsonHolidayFile::new(path);
            let years = lookup_years(trial_date, window_days);
            collect_holidays(&provider, &args.location, &years).with_context(|| {
                format!("Failed to load discovered holidays from {}", path.display())
            })?
        }
        None => Vec::new(),
    };

    let mut manual = RawHolidayInput::default();
    for path in &args.holiday_files {
        manual.push_text(&read_text(path)?);
    }
    for date in &args.holidays {
        manual.push_text(date);
    }

    // Both sources cross the same parsing boundary before they are combined
    let mut holidays = parse_holidays(&compose_holiday_input(&discovered, ""));
    holidays.merge(&parse_holidays(&manual));
    Ok((holidays, discovered))
}

/// Compute and print the deadline
fn cmd_calc(
    trial_date: &str,
    holiday_args: &HolidayArgs,
    business_days: u32,
    search_cap: u32,
    format: OutputFormat,
) -> Result<()> {
    let trial_date = parse_trial_date(trial_date)?;
    let config = CalculatorConfig {
        business_days,
        search_cap_days: search_cap,
        ..CalculatorConfig::default()
    };

    let (holidays, discovered) = load_holidays(holiday_args, trial_date, config.search_cap_days)?;
    if !discovered.is_empty() {
        eprintln!("Loaded {} discovered holidays", discovered.len());
    }

    let result = calculate_deadline_with(trial_date, &holidays, &config)
        .context("Could not compute the deadline")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => print_result(&result, &holidays, &discovered),
    }

    Ok(())
}

fn print_result(result: &DeadlineResult, holidays: &HolidaySet, discovered: &[NamedHoliday]) {
    println!("Fecha del juicio:   {}", format_date_es(&result.trial_date));
    println!(
        "Plazo ordinario:    {} (hasta las 23:59)",
        format_date_es(&result.theoretical_deadline)
    );
    println!(
        "Prórroga (Art. 45): {} (hasta las {})",
        format_date_es(&result.prorrogue_date),
        result.prorrogue_cutoff.format("%H:%M")
    );

    println!();
    println!("Días hábiles computados:");
    for (i, day) in result.business_days_track.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, format_date_es(day));
    }

    let in_window: Vec<&NaiveDate> = holidays
        .iter()
        .filter(|d| **d >= result.theoretical_deadline)
        .filter(|d| **d < result.trial_date || **d < result.prorrogue_date)
        .collect();
    if !in_window.is_empty() {
        println!();
        println!("Festivos en el periodo:");
        for day in in_window {
            let iso = format_iso(day);
            match discovered.iter().find(|h| h.date.trim() == iso && !h.name.is_empty()) {
                Some(h) => println!("  - {} ({})", format_date_es(day), h.name),
                None => println!("  - {}", format_date_es(day)),
            }
        }
    }
}

/// Print the accepted holiday dates
fn cmd_parse(input: &Path) -> Result<()> {
    let text = read_text(input)?;
    let total = text.lines().filter(|l| !l.trim().is_empty()).count();
    let holidays = parse_holidays(&RawHolidayInput::new(text));

    for day in &holidays {
        println!("{}", format_iso(day));
    }

    eprintln!("Accepted {} dates from {} lines", holidays.len(), total);
    Ok(())
}

/// Report whether a date is a business day
fn cmd_check(date: &str, holiday_args: &HolidayArgs) -> Result<()> {
    let date = parse_trial_date(date)?;
    let (holidays, _) = load_holidays(holiday_args, date, 0)?;

    let verdict = if is_non_business_day(date, &holidays) { "inhábil" } else { "hábil" };
    println!("{}: {}", format_date_es(&date), verdict);

    Ok(())
}
