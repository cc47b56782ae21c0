//! Episode page parser
//!
//! Each mirror option stores its player as base64-encoded markup in the
//! option value. The payload is decoded and parsed as a separate fragment,
//! and the embed URL is read from that fragment alone.

use base64::{engine::general_purpose::STANDARD, Engine};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::document::{
    element_text, parse_fragment, select_attr, select_joined_text, select_text, selector,
};
use crate::error::Result;
use crate::types::{DownloadGroup, DownloadLink, EpisodePage, Mirror};

/// Player elements looked up inside a decoded mirror payload, in priority order.
struct EmbedSelectors {
    iframe: Selector,
    embed: Selector,
}

impl EmbedSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            iframe: selector("iframe[src]")?,
            embed: selector("embed[src]")?,
        })
    }
}

/// Parse an episode page.
///
/// Mirror options that cannot be decoded, or whose payload holds no
/// embeddable element, are left out of the result. The title comes from the
/// last article; inside it, every matching heading is concatenated.
///
/// # Errors
/// Only fails on a malformed built-in selector.
pub fn parse_episode_page(document: &Html) -> Result<EpisodePage> {
    let article_selector = selector("div.postbody article")?;
    let title_selector = selector("div.meta div.lm h1")?;
    let option_selector = selector("select.mirror option")?;
    let embeds = EmbedSelectors::new()?;

    let mut title = None;
    let mut mirrors = Vec::new();

    for article in document.select(&article_selector) {
        title = select_joined_text(&article, &title_selector);

        mirrors.extend(
            article
                .select(&option_selector)
                .filter_map(|option| parse_mirror_option(&option, &embeds)),
        );
    }

    Ok(EpisodePage {
        title,
        mirrors,
        downloads: parse_downloads(document)?,
    })
}

fn parse_mirror_option(option: &ElementRef, embeds: &EmbedSelectors) -> Option<Mirror> {
    let value = option.value().attr("value").map(str::trim).unwrap_or("");
    if value.is_empty() {
        return None;
    }

    let label = element_text(option);

    let Some(payload) = decode_mirror_value(value) else {
        debug!(label = ?label, "skipping mirror option with undecodable payload");
        return None;
    };

    let Some(stream_url) = find_embed(&payload, embeds) else {
        debug!(label = ?label, "skipping mirror option without embeddable player");
        return None;
    };

    Some(Mirror { label, stream_url })
}

/// Decode a base64 mirror payload into markup text.
///
/// Returns None if the value is not valid base64.
///
/// # Examples
/// ```
/// use animasu_core::parser::decode_mirror_value;
///
/// assert_eq!(decode_mirror_value("PGI+aGk8L2I+").as_deref(), Some("<b>hi</b>"));
/// assert_eq!(decode_mirror_value("not base64!"), None);
/// ```
pub fn decode_mirror_value(value: &str) -> Option<String> {
    let bytes = STANDARD.decode(value.trim()).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Source URL of the first iframe or embed in a markup fragment.
///
/// # Errors
/// Only fails on a malformed built-in selector.
pub fn embed_source(fragment: &str) -> Result<Option<String>> {
    Ok(find_embed(fragment, &EmbedSelectors::new()?))
}

fn find_embed(fragment: &str, embeds: &EmbedSelectors) -> Option<String> {
    let document = parse_fragment(fragment);
    let root = document.root_element();

    select_attr(&root, &embeds.iframe, "src").or_else(|| select_attr(&root, &embeds.embed, "src"))
}

/// Parse download links grouped by quality.
pub fn parse_downloads(document: &Html) -> Result<Vec<DownloadGroup>> {
    let group_selector = selector("div.soraddlx div.soraurlx")?;
    let link_selector = selector("a[href]")?;
    let quality_selector = selector("strong")?;

    Ok(document
        .select(&group_selector)
        .filter_map(|group| {
            let links: Vec<DownloadLink> = group
                .select(&link_selector)
                .filter_map(|link| {
                    let url = link.value().attr("href")?.trim();
                    if url.is_empty() {
                        return None;
                    }
                    Some(DownloadLink {
                        host: element_text(&link),
                        url: url.to_string(),
                    })
                })
                .collect();

            if links.is_empty() {
                return None;
            }

            Some(DownloadGroup {
                quality: select_text(&group, &quality_selector),
                links,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;

    fn encode(markup: &str) -> String {
        STANDARD.encode(markup)
    }

    fn episode_page(options: &str) -> String {
        format!(
            r#"<html><body><div class="postbody">
              <article>
                <div class="meta"><div class="lm"><h1>Sousou no Frieren Episode 1</h1></div></div>
                <select class="mirror" name="mirror">{}</select>
              </article>
            </div></body></html>"#,
            options
        )
    }

    #[test]
    fn test_valid_mirror() {
        let options = format!(
            r#"<option value="">Pilih Server</option><option value="{}"> Server 1 </option>"#,
            encode(r#"<iframe src="https://embed.test/v/abc" allowfullscreen></iframe>"#)
        );
        let page = parse_episode_page(&parse_document(&episode_page(&options))).unwrap();

        assert_eq!(page.title.as_deref(), Some("Sousou no Frieren Episode 1"));
        assert_eq!(
            page.mirrors,
            vec![Mirror {
                label: Some("Server 1".to_string()),
                stream_url: "https://embed.test/v/abc".to_string(),
            }]
        );
    }

    #[test]
    fn test_mirror_without_embed_is_skipped() {
        let options = format!(
            r#"<option value="{}">Broken</option><option value="{}">Good</option>"#,
            encode("<div>player removed</div>"),
            encode(r#"<IFRAME SRC="https://embed.test/v/good"></IFRAME>"#)
        );
        let page = parse_episode_page(&parse_document(&episode_page(&options))).unwrap();

        assert_eq!(page.mirrors.len(), 1);
        assert_eq!(page.mirrors[0].label.as_deref(), Some("Good"));
        assert_eq!(page.mirrors[0].stream_url, "https://embed.test/v/good");
    }

    #[test]
    fn test_malformed_base64_is_skipped() {
        let options = format!(
            r#"<option value="%%%not-base64%%%">Bad</option><option value="{}">Good</option>"#,
            encode(r#"<iframe src="https://embed.test/v/ok"></iframe>"#)
        );
        let page = parse_episode_page(&parse_document(&episode_page(&options))).unwrap();

        assert_eq!(page.mirrors.len(), 1);
        assert_eq!(page.mirrors[0].label.as_deref(), Some("Good"));
    }

    #[test]
    fn test_embed_element_fallback() {
        assert_eq!(
            embed_source(r#"<embed src="https://embed.test/e/1">"#).unwrap().as_deref(),
            Some("https://embed.test/e/1")
        );
        assert_eq!(embed_source(r#"<iframe></iframe>"#).unwrap(), None);
        assert_eq!(embed_source("").unwrap(), None);
    }

    #[test]
    fn test_inner_fragment_does_not_see_outer_page() {
        // The outer page has an iframe of its own; the option payload does not.
        let html = format!(
            r#"<html><body><div class="postbody"><article>
                <iframe src="https://outer.test/player"></iframe>
                <select class="mirror"><option value="{}">Empty</option></select>
            </article></div></body></html>"#,
            encode("<p>nothing</p>")
        );
        let page = parse_episode_page(&parse_document(&html)).unwrap();
        assert!(page.mirrors.is_empty());
    }

    #[test]
    fn test_mirror_without_label() {
        let options = format!(
            r#"<option value="{}"></option>"#,
            encode(r#"<iframe src="https://embed.test/v/x"></iframe>"#)
        );
        let page = parse_episode_page(&parse_document(&episode_page(&options))).unwrap();
        assert_eq!(page.mirrors[0].label, None);
    }

    #[test]
    fn test_last_article_title_wins() {
        let html = r#"<div class="postbody">
            <article><div class="meta"><div class="lm"><h1>First</h1></div></div></article>
            <article><div class="meta"><div class="lm"><h1>Second</h1></div></div></article>
        </div>"#;
        let page = parse_episode_page(&parse_document(html)).unwrap();
        assert_eq!(page.title.as_deref(), Some("Second"));
    }

    #[test]
    fn test_title_joins_headings_of_last_article() {
        let html = r#"<div class="postbody">
            <article><div class="meta"><div class="lm"><h1>Ignored</h1></div></div></article>
            <article><div class="meta">
                <div class="lm"><h1>Mushishi </h1></div>
                <div class="lm"><h1>Episode 3</h1></div>
            </div></article>
        </div>"#;
        let page = parse_episode_page(&parse_document(html)).unwrap();
        assert_eq!(page.title.as_deref(), Some("Mushishi Episode 3"));
    }

    #[test]
    fn test_downloads() {
        let html = r#"<div class="soraddlx">
            <div class="soraurlx"><strong>480p</strong>
                <a href="https://files.test/a">Mega</a>
                <a href="https://files.test/b">Drive</a>
            </div>
            <div class="soraurlx"><strong>720p</strong></div>
        </div>"#;
        let page = parse_episode_page(&parse_document(html)).unwrap();

        assert_eq!(page.downloads.len(), 1);
        let group = &page.downloads[0];
        assert_eq!(group.quality.as_deref(), Some("480p"));
        assert_eq!(group.links.len(), 2);
        assert_eq!(group.links[1].host.as_deref(), Some("Drive"));
        assert_eq!(group.links[1].url, "https://files.test/b");
    }

    #[test]
    fn test_empty_page() {
        let page = parse_episode_page(&parse_document("<html></html>")).unwrap();
        assert_eq!(page, EpisodePage::default());
    }
}
