//! Main Animasu scraper API
//!
//! Every operation follows the same pipeline: look the result up in the page
//! cache, and on a miss fetch the page, parse it, run the extractors and
//! store the record before returning it.

use std::sync::Arc;

use scraper::Html;
use tracing::{debug, warn};

use crate::cache::{CacheKey, Cacheable, Namespace, PageCache, TtlCache};
use crate::client::AnimasuClient;
use crate::document::parse_document;
use crate::error::{AnimasuError, Result};
use crate::parser::{
    parse_anime_details, parse_cards, parse_episode_page, parse_pagination_buttons,
    parse_pagination_count,
};
use crate::types::{AnimeDetail, CountedListingPage, EpisodePage, ListingPage};

/// Main scraper API for Animasu
///
/// All operations take `&self`, so one scraper can be shared behind an `Arc`.
/// Failures are never retried; their `Serialize` form is the generic public
/// failure message.
///
/// # Example
/// ```no_run
/// use animasu_core::AnimasuScraper;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scraper = AnimasuScraper::new()?;
///
///     let ongoing = scraper.ongoing_series(1).await?;
///     println!("{} ongoing series", ongoing.anime.len());
///
///     Ok(())
/// }
/// ```
pub struct AnimasuScraper {
    client: AnimasuClient,
    cache: Arc<PageCache>,
}

impl AnimasuScraper {
    /// Create a new scraper with default configuration and its own cache.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        let client = AnimasuClient::new()?;
        Ok(Self::with_client(client))
    }

    /// Create a scraper around a pre-configured client with its own cache.
    pub fn with_client(client: AnimasuClient) -> Self {
        Self::with_parts(client, Arc::new(TtlCache::new()))
    }

    /// Create a scraper sharing an existing page cache.
    pub fn with_parts(client: AnimasuClient, cache: Arc<PageCache>) -> Self {
        Self { client, cache }
    }

    /// The page cache backing this scraper.
    pub fn cache(&self) -> &Arc<PageCache> {
        &self.cache
    }

    /// Currently airing series.
    ///
    /// # Example
    /// ```no_run
    /// use animasu_core::AnimasuScraper;
    ///
    /// # async fn example() -> Result<(), animasu_core::AnimasuError> {
    /// let scraper = AnimasuScraper::new()?;
    /// let page = scraper.ongoing_series(2).await?;
    /// for card in page.anime {
    ///     println!("{:?} -> {:?}", card.title, card.slug);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn ongoing_series(&self, page: u32) -> Result<ListingPage> {
        validate_page(page)?;

        let key = CacheKey::new(Namespace::Ongoing, [page]);
        let path = format!("/sedang-tayang/?halaman={}", page);
        self.cached(key, &path, |document| listing_page(document, page))
            .await
    }

    /// Detail records of one anime, one per detail block on its page.
    pub async fn anime_details(&self, slug: &str) -> Result<Vec<AnimeDetail>> {
        let slug = require_slug(slug)?;

        let key = CacheKey::new(Namespace::Anime, [slug]);
        let path = format!("/anime/{}", slug);
        self.cached(key, &path, parse_anime_details).await
    }

    /// Stream mirrors and downloads of one episode.
    pub async fn anime_episode(&self, slug: &str) -> Result<EpisodePage> {
        let slug = require_slug(slug)?;

        let key = CacheKey::new(Namespace::Episode, [slug]);
        let path = format!("/{}", slug);
        self.cached(key, &path, parse_episode_page).await
    }

    /// Search by keyword.
    ///
    /// # Returns
    /// * `Err(AnimasuError::InvalidInput)` if keyword is empty or whitespace-only
    pub async fn search(&self, keyword: &str, page: u32) -> Result<CountedListingPage> {
        validate_page(page)?;
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(AnimasuError::InvalidInput(
                "Search keyword cannot be empty".to_string(),
            ));
        }

        let key = CacheKey::new(Namespace::Search, [keyword.to_string(), page.to_string()]);
        let path = format!("/page/{}/?s={}", page, urlencoding::encode(keyword));
        self.cached(key, &path, counted_listing_page).await
    }

    /// Anime of one genre.
    pub async fn genre(&self, slug: &str, page: u32) -> Result<CountedListingPage> {
        validate_page(page)?;
        let slug = require_slug(slug)?;

        let key = CacheKey::new(Namespace::Genre, [slug.to_string(), page.to_string()]);
        let path = format!("/genre/{}/page/{}", slug, page);
        self.cached(key, &path, counted_listing_page).await
    }

    /// Anime of one character type.
    pub async fn character_type(&self, slug: &str, page: u32) -> Result<CountedListingPage> {
        validate_page(page)?;
        let slug = require_slug(slug)?;

        let key = CacheKey::new(Namespace::Character, [slug.to_string(), page.to_string()]);
        let path = format!("/karakter/{}/page/{}", slug, page);
        self.cached(key, &path, counted_listing_page).await
    }

    /// Movie listing.
    pub async fn movies(&self, page: u32) -> Result<ListingPage> {
        validate_page(page)?;

        let key = CacheKey::new(Namespace::Movies, [page]);
        let path = format!("/movie/?halaman={}", page);
        self.cached(key, &path, |document| listing_page(document, page))
            .await
    }

    /// Advanced filter listing.
    ///
    /// `query` is a raw query string (e.g. `"genre[]=action&status=ongoing"`)
    /// appended to the filter page URL as-is.
    pub async fn filter_list(&self, query: &str, page: u32) -> Result<ListingPage> {
        validate_page(page)?;
        let query = query.trim().trim_start_matches(|c: char| c == '?' || c == '&');

        let key = CacheKey::new(Namespace::Filter, [query.to_string(), page.to_string()]);
        let path = if query.is_empty() {
            format!("/pencarian/?halaman={}", page)
        } else {
            format!("/pencarian/?halaman={}&{}", page, query)
        };
        self.cached(key, &path, |document| listing_page(document, page))
            .await
    }

    /// Serve `key` from the cache, or fetch `path`, extract and store it.
    async fn cached<T, F>(&self, key: CacheKey, path: &str, extract: F) -> Result<T>
    where
        T: Cacheable + Clone,
        F: FnOnce(&Html) -> Result<T>,
    {
        if let Some(hit) = self.cache.get(&key).and_then(T::from_cached) {
            debug!(key = %key, "cache hit");
            return Ok(hit);
        }
        debug!(key = %key, "cache miss");

        match self.load(path, extract).await {
            Ok(value) => {
                self.cache.set(key.clone(), value.clone().into_cached());
                debug!(key = %key, "cache stored");
                Ok(value)
            }
            Err(error) => {
                warn!(key = %key, error = %error, "scrape failed");
                Err(error)
            }
        }
    }

    async fn load<T, F>(&self, path: &str, extract: F) -> Result<T>
    where
        F: FnOnce(&Html) -> Result<T>,
    {
        let markup = self.client.fetch(path).await?;
        let document = parse_document(&markup);
        extract(&document)
    }
}

fn listing_page(document: &Html, page: u32) -> Result<ListingPage> {
    let mut pagination = parse_pagination_buttons(document)?;
    pagination.current_page = Some(page);

    Ok(ListingPage {
        anime: parse_cards(document)?,
        pagination,
    })
}

fn counted_listing_page(document: &Html) -> Result<CountedListingPage> {
    Ok(CountedListingPage {
        anime: parse_cards(document)?,
        pagination_count: parse_pagination_count(document)?,
    })
}

fn validate_page(page: u32) -> Result<()> {
    if page == 0 {
        return Err(AnimasuError::InvalidPage(page));
    }
    Ok(())
}

fn require_slug(slug: &str) -> Result<&str> {
    let slug = slug.trim().trim_matches('/');
    if slug.is_empty() {
        return Err(AnimasuError::InvalidInput("Slug cannot be empty".to_string()));
    }
    Ok(slug)
}
