//! CLI argument definitions for the `dine` reports.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dine",
    version,
    about = "Restaurant listing reports - clean a snapshot and rank what it holds",
    long_about = "Clean a raw restaurant listing snapshot and report on it.\n\n\
                  Rows are deduplicated, incomplete rows dropped, cuisines reduced to\n\
                  their primary token, and country and rating codes resolved before\n\
                  any report runs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Headline counts: restaurants, countries, cities, cuisines, votes.
    Overview(QueryArgs),

    /// Per-country restaurant counts, cities, votes and cost.
    Countries(QueryArgs),

    /// City rankings by restaurants, rating band and cuisine variety.
    Cities(QueryArgs),

    /// Best restaurants and cuisines.
    Cuisines(CuisineArgs),
}

#[derive(Parser)]
pub struct QueryArgs {
    /// Path to the raw snapshot CSV.
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// JSON file with alternate country and rating-color tables.
    #[arg(long = "lookup-tables", value_name = "JSON")]
    pub lookup_tables: Option<PathBuf>,

    /// Restrict to a country label (repeatable).
    #[arg(long = "country", value_name = "COUNTRY")]
    pub countries: Vec<String>,

    /// Minimum votes a restaurant needs to be counted. Also replaces the
    /// vote thresholds of ranked sections (150 for top restaurants, 100 for
    /// cuisine ratings).
    #[arg(long = "min-votes", value_name = "N")]
    pub min_votes: Option<u64>,

    /// Lowest rating to include (inclusive).
    #[arg(long = "rating-min", value_name = "RATING")]
    pub rating_min: Option<f64>,

    /// Highest rating to include (inclusive).
    #[arg(long = "rating-max", value_name = "RATING")]
    pub rating_max: Option<f64>,

    /// Rows per ranked section (defaults: 10 cities, 7 per rating band,
    /// 20 restaurants, 10 cuisines).
    #[arg(long = "top", value_name = "N")]
    pub top: Option<usize>,

    /// Output format.
    #[arg(long = "output", value_enum, default_value = "table")]
    pub output: OutputArg,
}

#[derive(Parser)]
pub struct CuisineArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Restrict to a primary cuisine (repeatable).
    #[arg(long = "cuisine", value_name = "CUISINE")]
    pub cuisines: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
