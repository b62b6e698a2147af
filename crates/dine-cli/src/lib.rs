//! CLI library components for the `dine` restaurant reports.

pub mod load;
pub mod logging;
pub mod report;
