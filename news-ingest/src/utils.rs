/// Text helpers shared by the extractors and normalizers
pub mod text {
    use scraper::{ElementRef, Html, Node};

    /// Elements whose contents never count as readable text.
    const SKIPPED_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

    /// Plain text of an element: trimmed text nodes joined by a single space.
    /// `script`, `style` and `noscript` subtrees are skipped.
    pub fn element_text(element: ElementRef<'_>) -> String {
        let mut pieces = Vec::new();
        collect_text(element, &mut pieces);
        pieces.join(" ")
    }

    fn collect_text<'a>(element: ElementRef<'a>, pieces: &mut Vec<&'a str>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        pieces.push(trimmed);
                    }
                }
                Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()) => {}
                Node::Element(_) => {
                    if let Some(child_element) = ElementRef::wrap(child) {
                        collect_text(child_element, pieces);
                    }
                }
                _ => {}
            }
        }
    }

    /// Strip markup from an HTML fragment (feed summaries, oEmbed snippets).
    pub fn html_to_text(html: &str) -> String {
        if !html.contains('<') && !html.contains('&') {
            return html.split_whitespace().collect::<Vec<_>>().join(" ");
        }
        let fragment = Html::parse_fragment(html);
        element_text(fragment.root_element())
    }

    /// First `max_chars` characters of `text`, on a char boundary.
    pub fn truncate_chars(text: &str, max_chars: usize) -> String {
        text.chars().take(max_chars).collect()
    }
}

/// URL utilities
pub mod url {
    use url::Url;

    /// Resolve `href` against `base`, returning an absolute URL.
    pub fn resolve(base: &str, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        match Url::parse(base) {
            Ok(base) => base.join(href).ok().map(|u| u.to_string()),
            Err(_) => Url::parse(href).ok().map(|u| u.to_string()),
        }
    }

    /// Lowercased host of `url_str`, if it parses.
    pub fn host(url_str: &str) -> Option<String> {
        Url::parse(url_str)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
    }

    /// True when `host` is `domain` or one of its subdomains.
    pub fn host_matches(host: &str, domain: &str) -> bool {
        host == domain || host.ends_with(&format!(".{domain}"))
    }
}

/// Time utilities
pub mod time {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    /// Start of the recency window ending at `now`. A window reaching past
    /// the representable range starts at `DateTime::<Utc>::MIN_UTC`.
    pub fn cutoff(now: DateTime<Utc>, hours: u32) -> DateTime<Utc> {
        now.checked_sub_signed(Duration::hours(i64::from(hours)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// True when `published` falls at or after the cutoff.
    pub fn is_recent(published: DateTime<Utc>, cutoff: DateTime<Utc>) -> bool {
        published >= cutoff
    }

    /// Convert fractional unix seconds (Reddit's `created_utc`) to UTC.
    pub fn from_unix_seconds(secs: f64) -> DateTime<Utc> {
        let whole = secs.trunc() as i64;
        let nanos = ((secs.fract().abs()) * 1_000_000_000.0) as u32;
        Utc.timestamp_opt(whole, nanos).single().unwrap_or_default()
    }
}
