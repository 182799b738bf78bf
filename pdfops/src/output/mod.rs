//! User-facing output for the CLI.
//!
//! Operation results are summarized here so every front end reports
//! partial failures the same way.

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter, Verbosity};

use crate::engine::{CompressOutput, PageIssue};
use crate::io::format_file_size;
use crate::services::RatingSummary;

/// Report pages an operation had to leave out or unchanged.
///
/// Warnings are shown even in quiet mode.
pub fn display_page_issues(formatter: &OutputFormatter, issues: &[PageIssue]) {
    if issues.is_empty() {
        return;
    }

    formatter.warning(&format!("{} page(s) could not be processed", issues.len()));
    for (index, issue) in issues.iter().enumerate() {
        formatter.list_item(index + 1, &issue.to_string());
    }
}

/// Display the outcome of a compression.
pub fn display_compress_summary(formatter: &OutputFormatter, output: &CompressOutput) {
    formatter.success(&format!(
        "Compressed {} page(s): {} -> {} ({:.1}%)",
        output.page_count,
        format_file_size(output.input_size as u64),
        format_file_size(output.output_size as u64),
        output.ratio() * 100.0
    ));

    if output.output_size >= output.input_size {
        formatter.info("Document was already compact; output is not smaller");
    }

    if output.uncompressed_pages > 0 {
        formatter.detail("Pages left uncompressed", &output.uncompressed_pages.to_string());
    }
}

/// Display aggregated ratings.
pub fn display_rating_summary(formatter: &OutputFormatter, summary: &RatingSummary) {
    formatter.section("Ratings");
    formatter.info(&format!(
        "{} rating(s), average {:.1}, {} unseen",
        summary.total, summary.average, summary.unseen
    ));
    for (stars, count) in summary.distribution.iter().enumerate().rev() {
        formatter.info(&format!("  {} ★  {count}", stars + 1));
    }
    formatter.info(&format!(
        "{} in the last 7 days ({:.1}%)",
        summary.recent, summary.recent_percentage
    ));
}
