//! Output formatting module
//!
//! Renders run summaries, aggregates, plans and suite listings.

mod formatter;

pub use formatter::{OutputFormat, ResultFormatter};
