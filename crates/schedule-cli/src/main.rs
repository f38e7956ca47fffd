//! `schedule` CLI — next and previous fire times of calendar schedules.
//!
//! ## Usage
//!
//! ```sh
//! # Next weekday 10:00 on an odd day of September
//! schedule next "*.9.*/2 1-5 10:00:00" --from 2025-09-06T00:00:00
//!
//! # Five most recent last-day-of-month noons, as JSON
//! schedule prev "*.*.32 12:00:00" -n 5 --json
//!
//! # Show how an expression was parsed
//! schedule explain "2025.1-6.1 9:30:00"
//! ```

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use log::{debug, LevelFilter};
use schedule_engine::{CalendarSchedule, Direction};

/// Timestamp layout accepted by `--from`; fractional seconds are optional.
const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

#[derive(Parser)]
#[command(
    name = "schedule",
    version,
    about = "Find fire times of calendar schedule expressions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the next fire times at or after a starting point
    Next(SearchArgs),
    /// Print the previous fire times at or before a starting point
    Prev(SearchArgs),
    /// Print the parsed rules of an expression as JSON
    Explain {
        /// Schedule expression, e.g. "*.*.* 1-5 09:00:00"
        expr: String,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Schedule expression, e.g. "*.*.* 1-5 09:00:00"
    expr: String,
    /// Starting point as YYYY-MM-DDTHH:MM:SS[.fff] (defaults to now)
    #[arg(long)]
    from: Option<String>,
    /// Number of fire times to print
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,
    /// Allow the starting point itself as the first result
    #[arg(long)]
    inclusive: bool,
    /// Print a JSON array instead of one timestamp per line
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Next(args) => search(&args, Direction::Forward),
        Commands::Prev(args) => search(&args, Direction::Backward),
        Commands::Explain { expr } => {
            let spec = schedule_engine::parse(&expr)
                .with_context(|| format!("Failed to parse schedule: '{}'", expr))?;
            println!("{}", serde_json::to_string_pretty(&spec)?);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn search(args: &SearchArgs, direction: Direction) -> Result<()> {
    let schedule: CalendarSchedule = args
        .expr
        .parse()
        .with_context(|| format!("Failed to parse schedule: '{}'", args.expr))?;
    let start = match args.from.as_deref() {
        Some(text) => parse_timestamp(text)?,
        None => Local::now().naive_local(),
    };
    debug!("searching {:?} from {}", direction, start);

    let times = collect(&schedule, start, direction, args.count, args.inclusive)
        .context("Failed to compute fire times")?;

    if args.json {
        let rendered: Vec<String> = times.iter().map(|t| format_timestamp(*t)).collect();
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        for t in &times {
            println!("{}", format_timestamp(*t));
        }
    }
    Ok(())
}

/// Up to `count` fire times from `start`. The first result may equal `start`
/// only when `inclusive` is set; a search that leaves the year window ends the
/// list early unless nothing was found at all.
fn collect(
    schedule: &CalendarSchedule,
    start: NaiveDateTime,
    direction: Direction,
    count: usize,
    inclusive: bool,
) -> schedule_engine::error::Result<Vec<NaiveDateTime>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let first = match (direction, inclusive) {
        (Direction::Forward, true) => schedule.nearest_event(start)?,
        (Direction::Forward, false) => schedule.next_event(start)?,
        (Direction::Backward, true) => schedule.nearest_prev_event(start)?,
        (Direction::Backward, false) => schedule.prev_event(start)?,
    };
    let rest = match direction {
        Direction::Forward => schedule.upcoming(first),
        Direction::Backward => schedule.preceding(first),
    };
    Ok(std::iter::once(first).chain(rest).take(count).collect())
}

fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, INPUT_FORMAT).with_context(|| {
        format!(
            "Invalid --from timestamp: '{}' (expected YYYY-MM-DDTHH:MM:SS[.fff])",
            text
        )
    })
}

fn format_timestamp(t: NaiveDateTime) -> String {
    t.format(OUTPUT_FORMAT).to_string()
}
