//! Animasu Scraper Core Library
//!
//! Turns pages of the Animasu streaming site into typed catalog records.
//!
//! # Features
//! - Ongoing, movie, filter, search, genre and character listings
//! - Anime detail pages with genres, character types and episode list
//! - Episode pages with decoded stream mirrors and download links
//! - Process-wide TTL cache so repeated requests skip the upstream fetch

pub mod cache;
pub mod client;
pub mod document;
pub mod error;
pub mod parser;
pub mod scraper;
pub mod types;

// Re-export main types for convenience
pub use cache::{CacheKey, CachedPage, Clock, ManualClock, Namespace, PageCache, SystemClock, TtlCache};
pub use client::{AnimasuClient, ClientConfig};
pub use error::{AnimasuError, Result};
pub use scraper::AnimasuScraper;
pub use types::{
    AnimeDetail, Card, CountedListingPage, DownloadGroup, DownloadLink, EpisodeLink, EpisodePage,
    ListingPage, Mirror, Pagination, TaxonomyLink,
};
