//! Best-effort article extraction from raw HTML.
//!
//! Body text is taken from the first non-empty of: the first `<article>`, the
//! main landmark (`role="main"`, then `id="main"`), or every `<p>` joined by a
//! blank line. Authors are gathered from meta tags and `rel=author` markup,
//! falling back to common byline classes only when those are absent.

use crate::types::ordered_authors;
use crate::utils::text::element_text;
use scraper::{Html, Selector};

const AUTHOR_META_PROPERTIES: [&str; 3] = ["article:author", "og:article:author", "og:author"];

/// Consulted in order, only when no meta/rel author was found.
const BYLINE_SELECTORS: [&str; 4] = [".byline__name", ".author", ".byline", "#byline"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleContent {
    pub text: Option<String>,
    pub authors: Vec<String>,
}

/// Extract main text and authors from a full HTML document.
pub fn extract(html: &str) -> ArticleContent {
    let document = Html::parse_document(html);
    ArticleContent {
        text: extract_text(&document),
        authors: extract_authors(&document),
    }
}

pub fn extract_text(document: &Html) -> Option<String> {
    first_text(document, "article")
        .or_else(|| first_text(document, r#"[role="main"]"#))
        .or_else(|| first_text(document, "#main"))
        .or_else(|| paragraph_text(document))
}

pub fn extract_authors(document: &Html) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();

    if let Some(meta) = selector("meta") {
        let metas: Vec<_> = document.select(&meta).collect();

        for el in &metas {
            let is_author = el
                .value()
                .attr("name")
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("author"));
            if is_author {
                found.extend(el.value().attr("content").map(str::to_string));
            }
        }

        for el in &metas {
            let is_author = el.value().attr("property").is_some_and(|prop| {
                let prop = prop.trim().to_ascii_lowercase();
                AUTHOR_META_PROPERTIES.contains(&prop.as_str())
            });
            if is_author {
                found.extend(el.value().attr("content").map(str::to_string));
            }
        }
    }

    if let Some(rel) = selector("[rel]") {
        for el in document.select(&rel) {
            let is_author = el.value().attr("rel").is_some_and(|rel| {
                rel.split_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("author"))
            });
            if !is_author {
                continue;
            }
            let text = element_text(el);
            if !text.is_empty() {
                found.push(text);
            } else if let Some(content) = el.value().attr("content") {
                found.push(content.to_string());
            }
        }
    }

    let mut authors = ordered_authors(found);
    if authors.is_empty() {
        authors = byline_author(document).into_iter().collect();
    }
    authors
}

fn byline_author(document: &Html) -> Option<String> {
    BYLINE_SELECTORS.iter().find_map(|css| {
        let sel = selector(css)?;
        let el = document.select(&sel).next()?;
        let text = element_text(el);
        (!text.is_empty()).then_some(text)
    })
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    let el = document.select(&sel).next()?;
    let text = element_text(el);
    (!text.is_empty()).then_some(text)
}

fn paragraph_text(document: &Html) -> Option<String> {
    let sel = selector("p")?;
    let joined = document
        .select(&sel)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    let joined = joined.trim();
    (!joined.is_empty()).then(|| joined.to_string())
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}
