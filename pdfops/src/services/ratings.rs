//! User ratings with an aggregated summary.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::storage::{Record, RecordLog, Storage, unique_id};
use crate::config::DEFAULT_RATINGS_RETAINED;
use crate::error::{PdfOpsError, Result};

/// File name of the ratings record.
pub const RATINGS_FILE: &str = "ratings.json";

/// Lowest accepted rating.
pub const MIN_RATING: i64 = 1;

/// Highest accepted rating.
pub const MAX_RATING: i64 = 5;

/// Window counted as recent by [`RatingSummary`].
pub const RECENT_DAYS: i64 = 7;

/// A submitted rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Identifier, derived from the submission time.
    pub id: String,
    /// Stars, 1 to 5.
    pub rating: u8,
    /// Free text feedback, possibly empty.
    #[serde(default)]
    pub feedback: String,
    /// Page the rating was submitted from.
    #[serde(default)]
    pub page: String,
    /// Submission time.
    pub timestamp: DateTime<Utc>,
    /// Whether an administrator has seen the rating.
    #[serde(default)]
    pub seen: bool,
}

impl Record for Rating {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_seen(&self) -> bool {
        self.seen
    }

    fn mark_seen(&mut self) {
        self.seen = true;
    }
}

/// Aggregate view over all ratings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    /// Number of ratings.
    pub total: usize,
    /// Mean rating, rounded to one decimal; zero without ratings.
    pub average: f64,
    /// Count per star value, index 0 holding one-star ratings.
    pub distribution: [usize; 5],
    /// Ratings not seen yet.
    pub unseen: usize,
    /// Ratings submitted within the last [`RECENT_DAYS`] days.
    pub recent: usize,
    /// `recent` as a percentage of `total`, rounded to one decimal.
    pub recent_percentage: f64,
}

/// Rating collection service.
#[derive(Debug)]
pub struct RatingService<S> {
    log: RecordLog<Rating, S>,
}

impl<S: Storage<Vec<Rating>>> RatingService<S> {
    /// Service keeping the newest 1000 ratings in `storage`.
    pub fn new(storage: S) -> Self {
        Self::with_retention(storage, DEFAULT_RATINGS_RETAINED)
    }

    /// Service keeping the newest `retained` ratings.
    pub fn with_retention(storage: S, retained: usize) -> Self {
        Self {
            log: RecordLog::new(storage).with_retention(retained),
        }
    }

    /// Record a rating submitted now.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::InvalidRating`] for values outside 1 to 5, or
    /// a storage error.
    pub fn submit(&self, rating: i64, feedback: Option<&str>, page: Option<&str>) -> Result<Rating> {
        self.submit_at(rating, feedback, page, Utc::now())
    }

    /// Record a rating submitted at `now`.
    ///
    /// # Errors
    ///
    /// See [`RatingService::submit`].
    pub fn submit_at(
        &self,
        rating: i64,
        feedback: Option<&str>,
        page: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Rating> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(PdfOpsError::InvalidRating { rating });
        }

        let base_id = format!("rating_{}", now.format("%Y%m%d%H%M%S%6f"));
        let rating = self.log.update(|ratings| {
            let record = Rating {
                id: unique_id(base_id, ratings),
                rating: rating as u8,
                feedback: feedback.unwrap_or_default().trim().to_string(),
                page: page.unwrap_or_default().trim().to_string(),
                timestamp: now,
                seen: false,
            };
            ratings.push(record.clone());
            record
        })?;

        info!(id = %rating.id, stars = rating.rating, "Rating recorded");
        Ok(rating)
    }

    /// All stored ratings, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn all(&self) -> Result<Vec<Rating>> {
        self.log.read_all()
    }

    /// Flag every rating as seen. Returns how many were unseen.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written.
    pub fn mark_all_seen(&self) -> Result<usize> {
        self.log.mark_all_seen()
    }

    /// Delete a rating. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written.
    pub fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.log.remove(id)?.is_some())
    }

    /// Aggregate the stored ratings as of `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn summary(&self, now: DateTime<Utc>) -> Result<RatingSummary> {
        Ok(summarize(&self.log.read_all()?, now))
    }
}

fn summarize(ratings: &[Rating], now: DateTime<Utc>) -> RatingSummary {
    let total = ratings.len();
    let cutoff = now - Duration::days(RECENT_DAYS);

    let mut distribution = [0; 5];
    let mut sum = 0u64;
    for rating in ratings {
        if let Some(slot) = usize::from(rating.rating)
            .checked_sub(1)
            .and_then(|index| distribution.get_mut(index))
        {
            *slot += 1;
        }
        sum += u64::from(rating.rating);
    }

    let unseen = ratings.iter().filter(|r| !r.seen).count();
    let recent = ratings.iter().filter(|r| r.timestamp > cutoff).count();

    let (average, recent_percentage) = if total == 0 {
        (0.0, 0.0)
    } else {
        (
            round1(sum as f64 / total as f64),
            round1(recent as f64 / total as f64 * 100.0),
        )
    };

    RatingSummary {
        total,
        average,
        distribution,
        unseen,
        recent,
        recent_percentage,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
