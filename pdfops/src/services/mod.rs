//! Usage statistics and user feedback.
//!
//! Each service owns an injected [`Storage`] backend and is safe to share
//! between threads. [`Services::open`] wires all of them to JSON files in
//! the configured data directory.
//!
//! # Examples
//!
//! ```no_run
//! use pdfops::Config;
//! use pdfops::services::{Operation, Services};
//!
//! let services = Services::open(&Config::default());
//! services.stats.record_operation(Operation::Merge);
//! ```

pub mod contacts;
pub mod ratings;
pub mod stats;
pub mod storage;

pub use contacts::{ContactForm, ContactMessage, ContactService};
pub use ratings::{Rating, RatingService, RatingSummary};
pub use stats::{Operation, StatsSnapshot, UsageStats};
pub use storage::{JsonFileStorage, MemoryStorage, Record, RecordLog, Storage};

use crate::config::Config;

/// Statistics persisted as JSON.
pub type FileUsageStats = UsageStats<JsonFileStorage<StatsSnapshot>>;

/// Ratings persisted as JSON.
pub type FileRatingService = RatingService<JsonFileStorage<Vec<Rating>>>;

/// Contact messages persisted as JSON.
pub type FileContactService = ContactService<JsonFileStorage<Vec<ContactMessage>>>;

/// All services, backed by files in one data directory.
#[derive(Debug)]
pub struct Services {
    /// Usage statistics.
    pub stats: FileUsageStats,
    /// Ratings.
    pub ratings: FileRatingService,
    /// Contact messages.
    pub contacts: FileContactService,
}

impl Services {
    /// Open the services in `config.data_dir`.
    ///
    /// Nothing is read or created until a service is used.
    pub fn open(config: &Config) -> Self {
        Self {
            stats: UsageStats::new(JsonFileStorage::new(config.data_file(stats::STATS_FILE))),
            ratings: RatingService::with_retention(
                JsonFileStorage::new(config.data_file(ratings::RATINGS_FILE)),
                config.ratings_retained,
            ),
            contacts: ContactService::new(
                JsonFileStorage::new(config.data_file(contacts::CONTACTS_FILE)),
                JsonFileStorage::new(config.data_file(contacts::ARCHIVED_CONTACTS_FILE)),
            ),
        }
    }
}
