//! HTML extractors for Animasu pages
//!
//! - `cards`: listing cards shared by every catalog page
//! - `pagination`: previous/next buttons and numbered page counts
//! - `detail`: anime detail page
//! - `stream`: episode page mirrors and downloads
//!
//! Extractors never perform I/O and never fail because an element is
//! missing; only a malformed built-in selector produces an error.

pub mod cards;
pub mod detail;
pub mod pagination;
pub mod stream;

pub use cards::parse_cards;
pub use detail::{parse_anime_details, parse_episode_list};
pub use pagination::{page_number_from_url, parse_pagination_buttons, parse_pagination_count};
pub use stream::{decode_mirror_value, embed_source, parse_downloads, parse_episode_page};
