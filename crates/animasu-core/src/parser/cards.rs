//! Listing card parser
//!
//! Ongoing, movie, filter, search, genre and character pages all render
//! their entries with the same card markup.

use scraper::{ElementRef, Html, Selector};

use crate::document::{image_source, path_segment, select_attr, select_text, selector};
use crate::error::Result;
use crate::types::Card;

/// Path segment of a card link holding the slug (`https://host/anime/{slug}/`).
const CARD_SLUG_SEGMENT: usize = 4;

/// Matches both the `<div class="bs">` and `<article class="bs">` card variants.
const CARD_ITEMS: &str = "div.listupd .bs";

/// Selectors applied inside each card, compiled once per page.
struct CardSelectors {
    title: Selector,
    titled_link: Selector,
    link: Selector,
    image: Selector,
    episode: Selector,
    anime_type: Selector,
    status: Selector,
}

impl CardSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            title: selector("div.tt")?,
            titled_link: selector("a[title]")?,
            link: selector("a")?,
            image: selector("img")?,
            episode: selector("span.epx")?,
            anime_type: selector("div.typez")?,
            status: selector("span.sb")?,
        })
    }
}

/// Parse every card of a listing page.
///
/// # Errors
/// Only fails on a malformed built-in selector; missing card fields are
/// reported as `None`.
pub fn parse_cards(document: &Html) -> Result<Vec<Card>> {
    let card_selector = selector(CARD_ITEMS)?;
    let selectors = CardSelectors::new()?;

    Ok(document
        .select(&card_selector)
        .map(|element| parse_card(&element, &selectors))
        .collect())
}

/// Parse a single card element.
fn parse_card(element: &ElementRef, selectors: &CardSelectors) -> Card {
    let title = select_text(element, &selectors.title)
        .or_else(|| select_attr(element, &selectors.titled_link, "title"));

    let slug = select_attr(element, &selectors.link, "href")
        .and_then(|href| path_segment(&href, CARD_SLUG_SEGMENT));

    let thumbnail_url = element
        .select(&selectors.image)
        .next()
        .and_then(|img| image_source(&img));

    Card {
        title,
        slug,
        thumbnail_url,
        episode: select_text(element, &selectors.episode),
        anime_type: select_text(element, &selectors.anime_type),
        status: select_text(element, &selectors.status),
    }
}
