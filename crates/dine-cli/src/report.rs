//! Report sections and their rendering.
//!
//! Each subcommand produces a list of titled [`ResultTable`]s. Tables keep
//! their canonical column names until rendering, where display names are
//! applied.

use std::collections::BTreeMap;

use anyhow::Result;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use dine_model::{RestaurantRecord, Value};
use dine_query::views::{self, RatingBand};
use dine_query::{RecordFilter, ResultTable, SortDirection};
use serde::Serialize;
use tracing::warn;

/// Line printed in place of an empty table.
pub const NO_DATA: &str = "no data for this selection";

const TOP_CITIES: usize = 10;
const TOP_RATED_CITIES: usize = 7;
const TOP_RESTAURANTS: usize = 20;
const TOP_RESTAURANTS_MIN_VOTES: u64 = 150;
const TOP_CUISINES: usize = 10;
const CUISINE_RATING_MIN_VOTES: u64 = 100;

/// Header labels for canonical column names.
const DISPLAY_NAMES: [(&str, &str); 30] = [
    ("rank", "Rank"),
    ("restaurant_id", "Restaurant ID"),
    ("restaurant_name", "Restaurant Name"),
    ("country_code", "Country Code"),
    ("country", "Country"),
    ("city", "City"),
    ("address", "Address"),
    ("locality", "Locality"),
    ("locality_verbose", "Locality Verbose"),
    ("longitude", "Longitude"),
    ("latitude", "Latitude"),
    ("cuisine", "Cuisine"),
    ("average_cost_for_two", "Average Cost for two"),
    ("currency", "Currency"),
    ("has_table_booking", "Table Booking"),
    ("has_online_delivery", "Online Delivery"),
    ("is_delivering_now", "Delivering Now"),
    ("price_tier", "Price Tier"),
    ("rating", "Rating"),
    ("rating_color", "Rating Color"),
    ("rating_text", "Rating Text"),
    ("votes", "Votes"),
    ("restaurants", "Restaurants"),
    ("countries", "Countries"),
    ("cities", "Cities"),
    ("cuisines", "Cuisines"),
    ("total_votes", "Total Votes"),
    ("votes_per_restaurant", "Votes per Restaurant"),
    ("mean_cost_for_two", "Mean Cost for two"),
    ("mean_rating", "Mean Rating"),
];

/// Columns shown for ranked restaurants; the full record is too wide.
const RANKED_COLUMNS: [&str; 8] = [
    "rank",
    "restaurant_id",
    "restaurant_name",
    "country",
    "city",
    "cuisine",
    "rating",
    "votes",
];

/// Caller overrides for section sizes and vote thresholds.
///
/// Unset fields fall back to each section's own default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportLimits {
    /// Rows per ranked section.
    pub top: Option<usize>,
    /// Minimum votes for vote-thresholded sections.
    pub min_votes: Option<u64>,
}

impl ReportLimits {
    fn top_or(&self, default: usize) -> usize {
        self.top.unwrap_or(default)
    }

    fn min_votes_or(&self, default: u64) -> u64 {
        self.min_votes.unwrap_or(default)
    }
}

/// A titled result table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub table: ResultTable,
}

impl Section {
    pub fn new(title: impl Into<String>, table: ResultTable) -> Self {
        Self {
            title: title.into(),
            table,
        }
    }
}

pub fn overview_sections(records: &[RestaurantRecord], filter: &RecordFilter) -> Vec<Section> {
    let overview = views::overview(records, filter);
    vec![Section::new("Overview", overview.to_table())]
}

pub fn country_sections(
    records: &[RestaurantRecord],
    filter: &RecordFilter,
) -> Result<Vec<Section>> {
    Ok(vec![
        Section::new(
            "Restaurants by country",
            views::restaurants_by_country(records, filter)?,
        ),
        Section::new("Cities by country", views::cities_by_country(records, filter)?),
        Section::new(
            "Votes per restaurant by country",
            views::votes_per_restaurant_by_country(records, filter)?,
        ),
        Section::new(
            "Mean cost for two by country",
            views::cost_for_two_by_country(records, filter)?,
        ),
    ])
}

pub fn city_sections(
    records: &[RestaurantRecord],
    filter: &RecordFilter,
    limits: &ReportLimits,
) -> Result<Vec<Section>> {
    let top = limits.top_or(TOP_CITIES);
    let top_rated = limits.top_or(TOP_RATED_CITIES);
    Ok(vec![
        Section::new(
            "Top cities by restaurants",
            views::top_cities_by_restaurants(records, filter, top)?,
        ),
        Section::new(
            "Cities with most restaurants rated 4.0 or more",
            views::cities_by_rating_band(records, filter, RatingBand::High, top_rated)?,
        ),
        Section::new(
            "Cities with most restaurants rated 2.5 or less",
            views::cities_by_rating_band(records, filter, RatingBand::Low, top_rated)?,
        ),
        Section::new(
            "Top cities by distinct cuisines",
            views::top_cities_by_unique_cuisines(records, filter, top)?,
        ),
    ])
}

pub fn cuisine_sections(
    records: &[RestaurantRecord],
    filter: &RecordFilter,
    limits: &ReportLimits,
) -> Result<Vec<Section>> {
    let top_restaurants = limits.top_or(TOP_RESTAURANTS);
    let restaurant_votes = limits.min_votes_or(TOP_RESTAURANTS_MIN_VOTES);
    let top_cuisines = limits.top_or(TOP_CUISINES);
    let cuisine_votes = limits.min_votes_or(CUISINE_RATING_MIN_VOTES);
    Ok(vec![
        Section::new(
            "Best restaurant per cuisine",
            views::best_restaurant_per_cuisine(records, filter)
                .select_columns(&RANKED_COLUMNS),
        ),
        Section::new(
            "Top restaurants",
            views::top_restaurants(records, filter, restaurant_votes, top_restaurants)?,
        ),
        Section::new(
            "Best cuisines by mean rating",
            views::cuisines_by_mean_rating(
                records,
                filter,
                SortDirection::Descending,
                cuisine_votes,
                top_cuisines,
            )?,
        ),
        Section::new(
            "Worst cuisines by mean rating",
            views::cuisines_by_mean_rating(
                records,
                filter,
                SortDirection::Ascending,
                cuisine_votes,
                top_cuisines,
            )?,
        ),
    ])
}

pub fn display_names() -> BTreeMap<&'static str, &'static str> {
    DISPLAY_NAMES.into_iter().collect()
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn value_cell(value: &Value) -> Cell {
    match value {
        Value::Int(_) | Value::Float(_) => {
            Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
        }
        Value::Bool(true) => Cell::new("yes").fg(Color::Green),
        Value::Bool(false) => Cell::new("no").fg(Color::DarkGrey),
        Value::Text(text) => Cell::new(text),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// Renders one result table with display names as headers.
pub fn render_table(table: &ResultTable) -> Table {
    let display = table.clone().with_display_names(&display_names());
    let mut rendered = Table::new();
    rendered.set_header(
        display
            .columns()
            .iter()
            .map(|name| header_cell(name))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut rendered);
    for row in display.rows() {
        rendered.add_row(row.iter().map(value_cell).collect::<Vec<_>>());
    }
    rendered
}

/// Renders sections as titled tables, or the no-data line for empty ones.
pub fn render_sections(sections: &[Section]) -> String {
    let mut out = String::new();
    for (idx, section) in sections.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&section.title);
        out.push('\n');
        if let Some(warning) = section.table.warning() {
            warn!(section = %section.title, "{warning}");
            out.push_str(NO_DATA);
        } else {
            out.push_str(&render_table(&section.table).to_string());
        }
        out.push('\n');
    }
    out
}

/// Serializes sections as pretty JSON.
pub fn sections_to_json(sections: &[Section]) -> Result<String> {
    Ok(serde_json::to_string_pretty(sections)?)
}
