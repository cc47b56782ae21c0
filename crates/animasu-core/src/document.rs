//! Thin layer over `scraper` used by every extractor
//!
//! Each call to `parse_document` or `parse_fragment` builds a fresh tree, so a
//! fragment decoded out of an attribute is parsed without any link to the page
//! it came from.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AnimasuError, Result};

/// Parse a full page.
pub fn parse_document(raw: &str) -> Html {
    Html::parse_document(raw)
}

/// Parse a standalone markup fragment.
pub fn parse_fragment(raw: &str) -> Html {
    Html::parse_fragment(raw)
}

/// Compile a CSS selector.
///
/// # Errors
/// Returns `AnimasuError::ParseError` if the selector is malformed.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| AnimasuError::ParseError(format!("Invalid selector {:?}: {:?}", css, e)))
}

/// Trimmed text content of an element, None when blank.
pub fn element_text(element: &ElementRef) -> Option<String> {
    non_empty(element.text().collect::<String>().trim())
}

/// Trimmed text of the first element under `scope` matching `selector`.
pub fn select_text(scope: &ElementRef, selector: &Selector) -> Option<String> {
    let element = scope.select(selector).next()?;
    element_text(&element)
}

/// Text of every element under `scope` matching `selector`, concatenated in
/// document order and trimmed as a whole.
pub fn select_joined_text(scope: &ElementRef, selector: &Selector) -> Option<String> {
    let joined: String = scope
        .select(selector)
        .flat_map(|element| element.text())
        .collect();
    non_empty(joined.trim())
}

/// Attribute value of the first element under `scope` matching `selector`.
pub fn select_attr(scope: &ElementRef, selector: &Selector, attr: &str) -> Option<String> {
    let element = scope.select(selector).next()?;
    element.value().attr(attr).and_then(|value| non_empty(value.trim()))
}

/// Segment `index` of `href` split on `/`.
///
/// Indices count from the scheme, so for `https://host/anime/slug/` index 3
/// is `anime` and index 4 is `slug`.
pub fn path_segment(href: &str, index: usize) -> Option<String> {
    href.split('/').nth(index).and_then(non_empty)
}

/// Lazy-loaded images keep the real URL in `data-src`.
pub fn image_source(image: &ElementRef) -> Option<String> {
    let value = image.value();
    value
        .attr("data-src")
        .and_then(|src| non_empty(src.trim()))
        .or_else(|| value.attr("src").and_then(|src| non_empty(src.trim())))
}

pub(crate) fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
