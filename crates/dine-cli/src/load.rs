//! Snapshot loading for the command line.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use dine_ingest::read_snapshot;
use dine_model::{LookupTables, RecordSet};
use dine_normalize::{CodeResolver, RecordCleaner, normalize};
use tracing::{debug, info, info_span};

/// Reads, cleans and resolves a snapshot.
///
/// Lookup tables come from `lookup_tables` when given, otherwise the built-in
/// defaults are used.
pub fn load_records(snapshot: &Path, lookup_tables: Option<&Path>) -> Result<RecordSet> {
    let span = info_span!("load", path = %snapshot.display());
    let _guard = span.enter();
    let start = Instant::now();

    let tables = match lookup_tables {
        Some(path) => LookupTables::from_json_path(path)
            .with_context(|| format!("load lookup tables {}", path.display()))?,
        None => LookupTables::default(),
    };
    debug!(
        countries = tables.countries.len(),
        rating_colors = tables.rating_colors.len(),
        "Using lookup tables"
    );

    let raw = read_snapshot(snapshot)
        .with_context(|| format!("read snapshot {}", snapshot.display()))?;
    let normalized = normalize(&raw, &RecordCleaner::default(), &CodeResolver::new(tables))
        .with_context(|| format!("normalize snapshot {}", snapshot.display()))?;

    for step in &normalized.report.steps {
        debug!(
            step = %step.step,
            removed = step.removed(),
            "Cleaning step summary"
        );
    }
    info!(
        records = normalized.records.len(),
        duration_ms = start.elapsed().as_millis(),
        "Snapshot loaded"
    );
    Ok(normalized.records)
}
