//! Page selector parsing.
//!
//! Turns user supplied strings such as `"all"`, `"2-5,8"` or `"3,1,4"` into a
//! [`PageSelection`]: a sorted, duplicate-free set of zero-based page indices
//! that are guaranteed to exist in the document.
//!
//! Parsing is lenient. Fragments that are out of range or not numeric are
//! dropped and the rest of the selector still applies. Only a selector in
//! which *no* fragment can be read as a page number or a range is reported
//! as an error, which keeps "nothing matched" and "could not parse"
//! distinguishable.
//!
//! # Examples
//!
//! ```
//! use pdfops::selector::parse_selector;
//!
//! let selection = parse_selector("2-3,5", 5).unwrap();
//! assert_eq!(selection.indices(), &[1, 2, 4]);
//!
//! let selection = parse_selector("10", 5).unwrap();
//! assert!(selection.is_empty());
//!
//! assert!(parse_selector("abc", 5).is_err());
//! ```

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// Keyword selecting every page.
pub const ALL_PAGES: &str = "all";

/// Error returned when a selector cannot be interpreted at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// No fragment of the selector is a page number or a page range.
    #[error("Unparseable page selector '{selector}'")]
    Unparseable {
        /// The selector as supplied by the caller.
        selector: String,
    },
}

/// Zero-based page indices selected from a document.
///
/// Invariant: indices are strictly ascending and every index is lower than
/// the page count the selection was parsed against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSelection {
    indices: Vec<usize>,
}

impl PageSelection {
    /// Select every page of a document with `total_pages` pages.
    pub fn all(total_pages: usize) -> Self {
        Self {
            indices: (0..total_pages).collect(),
        }
    }

    /// Selection containing no pages.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Selected indices in ascending order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of selected pages.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no page is selected.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Whether the zero-based `index` is selected.
    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// Consume the selection, returning the indices.
    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }
}

/// Parse a selector against a document with `total_pages` pages.
///
/// The selector is trimmed and lowercased. An empty selector or `"all"`
/// selects every page. Otherwise the selector is split on commas and each
/// fragment is either a 1-based page number or an inclusive `start-end`
/// range. Ranges are clamped to the document; page numbers outside of it are
/// ignored.
///
/// # Errors
///
/// Returns [`SelectorError::Unparseable`] when not a single fragment is a
/// number or a range.
pub fn parse_selector(
    selector: &str,
    total_pages: usize,
) -> Result<PageSelection, SelectorError> {
    let normalized = selector.trim().to_lowercase();

    if normalized.is_empty() || normalized == ALL_PAGES {
        return Ok(PageSelection::all(total_pages));
    }

    let mut pages: BTreeSet<usize> = BTreeSet::new();
    let mut understood = 0usize;

    for fragment in fragments(&normalized) {
        if fragment.contains('-') {
            let Some((start, end)) = parse_range(fragment) else {
                continue;
            };
            understood += 1;
            if let Some(range) = clamp_range(start, end, total_pages) {
                pages.extend(range);
            }
        } else {
            let Some(page) = parse_page_number(fragment) else {
                continue;
            };
            understood += 1;
            if page >= 1 && page <= total_pages as i64 {
                pages.insert(page as usize);
            }
        }
    }

    if understood == 0 {
        return Err(SelectorError::Unparseable {
            selector: selector.to_string(),
        });
    }

    Ok(PageSelection {
        indices: pages.into_iter().map(|page| page - 1).collect(),
    })
}

/// Split a comma separated list into trimmed, non-empty fragments.
pub(crate) fn fragments(input: &str) -> impl Iterator<Item = &str> {
    input.split(',').map(str::trim).filter(|part| !part.is_empty())
}

/// Parse a single 1-based page number.
pub(crate) fn parse_page_number(fragment: &str) -> Option<i64> {
    fragment.trim().parse::<i64>().ok()
}

/// Parse a `start-end` fragment. Both bounds must be integers.
pub(crate) fn parse_range(fragment: &str) -> Option<(i64, i64)> {
    let (start, end) = fragment.split_once('-')?;
    let start = start.trim().parse::<i64>().ok()?;
    let end = end.trim().parse::<i64>().ok()?;
    Some((start, end))
}

/// Clamp an inclusive 1-based range to `1..=total_pages`.
///
/// Returns `None` when nothing is left after clamping.
pub(crate) fn clamp_range(start: i64, end: i64, total_pages: usize) -> Option<RangeInclusive<usize>> {
    let start = start.max(1);
    let end = end.min(total_pages as i64);

    if start > end {
        return None;
    }

    Some(start as usize..=end as usize)
}
