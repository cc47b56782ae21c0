//! Pagination parsers
//!
//! Browse pages (ongoing, movies, filter) render previous/next buttons.
//! Search, genre and character pages render numbered page links instead.

use scraper::{ElementRef, Html};

use crate::document::{element_text, non_empty, selector};
use crate::error::Result;
use crate::types::Pagination;

/// Parse previous/next buttons.
///
/// `current_page` is inferred from the button targets; callers that know
/// the requested page should overwrite it.
pub fn parse_pagination_buttons(document: &Html) -> Result<Pagination> {
    let prev_selector = selector("div.hpage a.l")?;
    let next_selector = selector("div.hpage a.r")?;

    let prev = document.select(&prev_selector).next();
    let next = document.select(&next_selector).next();

    let prev_url = prev.as_ref().and_then(link_target);
    let next_url = next.as_ref().and_then(link_target);
    let prev_page = prev_url.as_deref().and_then(page_number_from_url);
    let next_page = next_url.as_deref().and_then(page_number_from_url);

    let current_page = next_page
        .and_then(|page| page.checked_sub(1))
        .filter(|page| *page > 0)
        .or_else(|| prev_page.and_then(|page| page.checked_add(1)));

    Ok(Pagination {
        current_page,
        has_next: next.is_some(),
        has_prev: prev.is_some(),
        next_page,
        prev_page,
        next_url,
        prev_url,
    })
}

/// Parse the total page count from numbered page links.
///
/// Returns `None` when the page has no numbered pagination.
pub fn parse_pagination_count(document: &Html) -> Result<Option<u32>> {
    let number_selector = selector("div.pagination .page-numbers")?;

    Ok(document
        .select(&number_selector)
        .filter_map(|element| element_text(&element))
        .filter_map(|text| parse_count(&text))
        .max())
}

/// Extract a page number from a listing URL.
///
/// Understands `?halaman=N`, `?paged=N` and `/page/N/`.
///
/// # Examples
/// ```
/// use animasu_core::parser::page_number_from_url;
///
/// assert_eq!(page_number_from_url("https://v1.animasu.top/movie/?halaman=3"), Some(3));
/// assert_eq!(page_number_from_url("https://v1.animasu.top/genre/action/page/7/"), Some(7));
/// assert_eq!(page_number_from_url("https://v1.animasu.top/movie/"), None);
/// ```
pub fn page_number_from_url(url: &str) -> Option<u32> {
    let re = regex_lite::Regex::new(r"(?:[?&](?:halaman|paged)=|/page/)(\d+)").ok()?;
    let caps = re.captures(url)?;
    caps.get(1)?.as_str().parse().ok()
}

fn link_target(link: &ElementRef) -> Option<String> {
    link.value().attr("href").and_then(|href| non_empty(href.trim()))
}

/// Page links may use thousands separators ("1.234").
fn parse_count(text: &str) -> Option<u32> {
    let digits: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, '.' | ','))
        .collect();
    digits.parse().ok()
}
