// Queryable HTML view over a fetched page body

use crate::error::{Result, ScanError};
use scraper::{ElementRef, Html, Selector};

/// Minimal document substituted whenever the page could not be fetched.
pub const DEFAULT_DOCUMENT: &str = "<html><body><p>Default Content</p></body></html>";

/// Parsed HTML document.
///
/// Parsing never fails: malformed markup is repaired the way browsers do it,
/// so every body (including the fetch placeholders) yields a usable tree.
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// The minimal document used when the real page is unavailable
    pub fn fallback() -> Self {
        Self::parse(DEFAULT_DOCUMENT)
    }

    /// All elements whose tag is in `tags`, optionally restricted to those
    /// carrying attribute `attr`.
    pub fn select(&self, tags: &[&str], attr: Option<&str>) -> Result<Vec<ElementRef<'_>>> {
        let selector = build_selector(tags, attr)?;
        Ok(self.html.select(&selector).collect())
    }

    pub fn count(&self, tags: &[&str], attr: Option<&str>) -> Result<usize> {
        let selector = build_selector(tags, attr)?;
        Ok(self.html.select(&selector).count())
    }

    /// Values of `attr` on every element of `tags` that carries it
    pub fn attr_values(&self, tags: &[&str], attr: &str) -> Result<Vec<String>> {
        Ok(self
            .select(tags, Some(attr))?
            .into_iter()
            .filter_map(|element| element.value().attr(attr))
            .map(|value| value.to_string())
            .collect())
    }

    /// Count elements matching an arbitrary CSS selector.
    pub fn count_css(&self, css: &str) -> Result<usize> {
        let selector = Selector::parse(css)
            .map_err(|e| ScanError::ParseError(format!("invalid selector '{}': {:?}", css, e)))?;
        Ok(self.html.select(&selector).count())
    }

    pub fn anchors_with_href(&self) -> Result<usize> {
        self.count(&["a"], Some("href"))
    }

    /// `href` of every `<link>` element (favicons, stylesheets, canonical...)
    pub fn link_hrefs(&self) -> Result<Vec<String>> {
        self.attr_values(&["link"], "href")
    }

    pub fn media_count(&self) -> Result<usize> {
        self.count(&["img", "audio", "embed", "iframe"], None)
    }

    pub fn script_sources_count(&self) -> Result<usize> {
        self.count(&["script", "link"], Some("src"))
    }

    pub fn form_actions_count(&self) -> Result<usize> {
        self.count(&["form"], Some("action"))
    }
}

fn build_selector(tags: &[&str], attr: Option<&str>) -> Result<Selector> {
    if tags.is_empty() {
        return Err(ScanError::ParseError("empty tag set".to_string()));
    }

    let css = tags
        .iter()
        .map(|tag| match attr {
            Some(attr) => format!("{}[{}]", tag, attr),
            None => tag.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ");

    Selector::parse(&css)
        .map_err(|e| ScanError::ParseError(format!("invalid selector '{}': {:?}", css, e)))
}
