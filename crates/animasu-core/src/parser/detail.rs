//! Anime detail page parser
//!
//! Metadata fields are located by their literal label (e.g. "Status:") inside
//! the info block and read from the text around it. The markup gives no
//! stronger structure than that, so a label that is missing or renamed
//! upstream simply leaves its field empty.

use scraper::{ElementRef, Html, Selector};

use crate::document::{
    element_text, image_source, non_empty, path_segment, select_attr, select_joined_text,
    select_text, selector,
};
use crate::error::Result;
use crate::types::{AnimeDetail, EpisodeLink, TaxonomyLink};

/// Label anchors of the metadata list.
const FIELD_LABELS: &str = "div.infox div.spe span b";

/// Label anchors of the character list, which has its own toggle span.
const CHARACTER_LABELS: &str = "div.infox div.spe span#tikar_shw b";

/// Path segment holding the slug of a genre/character link (`https://host/genre/{slug}/`).
const TAXONOMY_SLUG_SEGMENT: usize = 4;

/// Path segment holding the slug of an episode link (`https://host/{slug}/`).
const EPISODE_SLUG_SEGMENT: usize = 3;

pub const STATUS_LABEL: &str = "Status:";
pub const TYPE_LABEL: &str = "Jenis:";
pub const RELEASE_LABEL: &str = "Rilis:";
pub const DURATION_LABEL: &str = "Durasi:";
pub const GENRE_LABEL: &str = "Genre:";
pub const CHARACTER_LABEL: &str = "Karakter:";

struct DetailSelectors {
    thumbnail: Selector,
    title: Selector,
    alternate_name: Selector,
    field_labels: Selector,
    character_labels: Selector,
    link: Selector,
}

impl DetailSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            thumbnail: selector("div.thumb img:first-child")?,
            title: selector("div.infox h1")?,
            alternate_name: selector("div.infox span.alter")?,
            field_labels: selector(FIELD_LABELS)?,
            character_labels: selector(CHARACTER_LABELS)?,
            link: selector("a")?,
        })
    }
}

/// Parse every detail block of an anime page.
///
/// The synopsis and episode list live outside the detail block, so every
/// returned record carries the page-wide values. When several paragraphs
/// match the synopsis selector their text is concatenated.
///
/// # Errors
/// Only fails on a malformed built-in selector.
pub fn parse_anime_details(document: &Html) -> Result<Vec<AnimeDetail>> {
    let block_selector = selector("div.bigcontent")?;
    let synopsis_selector = selector("div.sinopsis p:first-child")?;
    let selectors = DetailSelectors::new()?;

    let synopsis = select_joined_text(&document.root_element(), &synopsis_selector);
    let episodes = parse_episode_list(document)?;

    Ok(document
        .select(&block_selector)
        .map(|block| parse_detail_block(&block, &selectors, synopsis.as_deref(), &episodes))
        .collect())
}

fn parse_detail_block(
    block: &ElementRef,
    selectors: &DetailSelectors,
    synopsis: Option<&str>,
    episodes: &[EpisodeLink],
) -> AnimeDetail {
    let thumbnail_url = block
        .select(&selectors.thumbnail)
        .next()
        .and_then(|img| image_source(&img));
    let field = |label: &str| labeled_value(block, &selectors.field_labels, label);

    AnimeDetail {
        thumbnail_url,
        title: select_text(block, &selectors.title),
        alternate_name: select_text(block, &selectors.alternate_name),
        status: field(STATUS_LABEL),
        anime_type: field(TYPE_LABEL),
        release_date: field(RELEASE_LABEL),
        duration: field(DURATION_LABEL),
        synopsis: synopsis.map(str::to_string),
        genres: labeled_links(block, &selectors.field_labels, &selectors.link, GENRE_LABEL),
        character_types: labeled_links(
            block,
            &selectors.character_labels,
            &selectors.link,
            CHARACTER_LABEL,
        ),
        episodes: episodes.to_vec(),
    }
}

/// Parents of the label anchors under `block` whose text contains `label`,
/// in document order and without duplicates.
fn label_containers<'a>(block: &ElementRef<'a>, anchors: &Selector, label: &str) -> Vec<ElementRef<'a>> {
    let mut containers: Vec<ElementRef<'a>> = Vec::new();
    for anchor in block.select(anchors) {
        if !anchor.text().collect::<String>().contains(label) {
            continue;
        }
        if let Some(parent) = anchor.parent().and_then(ElementRef::wrap) {
            if !containers.contains(&parent) {
                containers.push(parent);
            }
        }
    }
    containers
}

/// Text of the first labelled entry with the `"<label> "` prefix removed.
fn labeled_value(block: &ElementRef, anchors: &Selector, label: &str) -> Option<String> {
    let container = label_containers(block, anchors, label).into_iter().next()?;
    let text = container.text().collect::<String>();
    let value = text.replacen(&format!("{} ", label), "", 1);
    non_empty(value.trim())
}

/// Links inside every entry labelled `label`.
fn labeled_links(
    block: &ElementRef,
    anchors: &Selector,
    links: &Selector,
    label: &str,
) -> Vec<TaxonomyLink> {
    label_containers(block, anchors, label)
        .iter()
        .flat_map(|container| container.select(links))
        .map(|link| TaxonomyLink {
            name: element_text(&link),
            slug: link
                .value()
                .attr("href")
                .and_then(|href| path_segment(href, TAXONOMY_SLUG_SEGMENT)),
        })
        .collect()
}

/// Parse the episode list of a detail page.
pub fn parse_episode_list(document: &Html) -> Result<Vec<EpisodeLink>> {
    let item_selector = selector("div.bixbox ul#daftarepisode li")?;
    let link_selector = selector("span.lchx a")?;

    Ok(document
        .select(&item_selector)
        .map(|item| EpisodeLink {
            label: select_text(&item, &link_selector),
            slug: select_attr(&item, &link_selector, "href")
                .and_then(|href| path_segment(&href, EPISODE_SLUG_SEGMENT)),
        })
        .collect())
}
