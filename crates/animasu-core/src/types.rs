//! Data types for the Animasu scraper
//!
//! Every record serializes in camelCase. Scalar fields are optional because
//! each one is extracted independently and a missing element only blanks
//! that field.

use serde::{Deserialize, Serialize};

/// Summary record for one entry of a listing page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Display title
    pub title: Option<String>,
    /// Path segment identifying the entry (e.g. "one-piece")
    pub slug: Option<String>,
    /// Poster image URL
    pub thumbnail_url: Option<String>,
    /// Episode badge (e.g. "Episode 12")
    pub episode: Option<String>,
    /// Type badge (TV, Movie, OVA, ...)
    #[serde(rename = "type")]
    pub anime_type: Option<String>,
    /// Status/subtitle badge
    pub status: Option<String>,
}

/// Next/previous navigation state of a listing page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page (1-based)
    pub current_page: Option<u32>,
    /// Whether a "next" control exists
    pub has_next: bool,
    /// Whether a "previous" control exists
    pub has_prev: bool,
    /// Page number the "next" control points to
    pub next_page: Option<u32>,
    /// Page number the "previous" control points to
    pub prev_page: Option<u32>,
    /// Raw href of the "next" control
    pub next_url: Option<String>,
    /// Raw href of the "previous" control
    pub prev_url: Option<String>,
}

/// Listing page with button-style pagination (ongoing, movies, filter)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPage {
    pub anime: Vec<Card>,
    pub pagination: Pagination,
}

/// Listing page with a total page count (search, genre, character)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountedListingPage {
    pub anime: Vec<Card>,
    pub pagination_count: Option<u32>,
}

/// Genre or character-type link on a detail page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyLink {
    pub name: Option<String>,
    pub slug: Option<String>,
}

/// Entry of the episode list on a detail page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeLink {
    pub label: Option<String>,
    pub slug: Option<String>,
}

/// Detail page record, one per detail block on the page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeDetail {
    pub thumbnail_url: Option<String>,
    pub title: Option<String>,
    pub alternate_name: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub anime_type: Option<String>,
    pub release_date: Option<String>,
    pub duration: Option<String>,
    pub synopsis: Option<String>,
    pub genres: Vec<TaxonomyLink>,
    pub character_types: Vec<TaxonomyLink>,
    pub episodes: Vec<EpisodeLink>,
}

/// Selectable video source on an episode page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mirror {
    /// Visible option text
    pub label: Option<String>,
    /// Embed URL taken from the decoded option payload
    pub stream_url: String,
}

/// Single download link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLink {
    /// Hosting service name shown on the page
    pub host: Option<String>,
    pub url: String,
}

/// Download links sharing one quality level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadGroup {
    /// Quality label (e.g. "720p")
    pub quality: Option<String>,
    pub links: Vec<DownloadLink>,
}

/// Episode/stream page record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodePage {
    pub title: Option<String>,
    pub mirrors: Vec<Mirror>,
    pub downloads: Vec<DownloadGroup>,
}
