use anyhow::Result;
use dine_cli::load::load_records;
use dine_cli::report::{
    ReportLimits, Section, city_sections, country_sections, cuisine_sections, overview_sections,
    render_sections, sections_to_json,
};
use dine_query::{FilterComposer, RatingRange, RecordFilter};
use tracing::info_span;

use crate::cli::{CuisineArgs, OutputArg, QueryArgs};

/// Subcommands that filter by country only.
#[derive(Clone, Copy, Debug)]
pub enum Report {
    Overview,
    Countries,
    Cities,
}

pub fn run_report(report: Report, args: &QueryArgs) -> Result<()> {
    let span = info_span!("report", kind = ?report);
    let _guard = span.enter();
    let records = load_records(&args.snapshot, args.lookup_tables.as_deref())?;
    let filter = build_filter(args, &[]);
    let sections = match report {
        Report::Overview => overview_sections(&records, &filter),
        Report::Countries => country_sections(&records, &filter)?,
        Report::Cities => city_sections(&records, &filter, &limits(args))?,
    };
    print_sections(&sections, args.output)
}

pub fn run_cuisines(args: &CuisineArgs) -> Result<()> {
    let span = info_span!("report", kind = "cuisines");
    let _guard = span.enter();
    let records = load_records(&args.query.snapshot, args.query.lookup_tables.as_deref())?;
    let filter = build_filter(&args.query, &args.cuisines);
    let sections = cuisine_sections(&records, &filter, &limits(&args.query))?;
    print_sections(&sections, args.query.output)
}

/// Omitted flags leave their criterion open.
fn build_filter(args: &QueryArgs, cuisines: &[String]) -> RecordFilter {
    let countries = (!args.countries.is_empty()).then(|| args.countries.clone());
    let cuisines = (!cuisines.is_empty()).then(|| cuisines.to_vec());
    let rating_range = (args.rating_min.is_some() || args.rating_max.is_some())
        .then(|| RatingRange::new(args.rating_min, args.rating_max));
    FilterComposer::compose(countries, cuisines, args.min_votes, rating_range)
}

fn limits(args: &QueryArgs) -> ReportLimits {
    ReportLimits {
        top: args.top,
        min_votes: args.min_votes,
    }
}

fn print_sections(sections: &[Section], output: OutputArg) -> Result<()> {
    match output {
        OutputArg::Table => print!("{}", render_sections(sections)),
        OutputArg::Json => println!("{}", sections_to_json(sections)?),
    }
    Ok(())
}
