//! Salient text extraction from HTML.
//!
//! ### Algorithm
//! - Detach `script`, `style`, `noscript` and `iframe` subtrees.
//! - Read a fixed list of regions (see [`Region`]), each region being the
//!   text of every matching element in document order, joined by spaces.
//! - Build `content` from all regions in order, normalize it and cap its length.
//!
//! ### Stable Abstraction
//! - Uses the `Extractor` trait so the scraper can take another engine.

pub mod normalize;

pub use normalize::{normalize_text, truncate_chars};

use scraper::{Html, Selector};
use scrapecache_core::config::{AppConfig, MAX_CONTENT_CHARS};
use scrapecache_core::{Error, Headings, ScrapedContent};

/// Elements whose text never counts as content.
const STRIPPED_TAGS: &str = "script, style, noscript, iframe";

/// Configuration for content extraction.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Maximum length of the combined `content` field in characters (default: 50000)
    pub max_content_chars: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { max_content_chars: MAX_CONTENT_CHARS }
    }
}

impl From<&AppConfig> for ExtractConfig {
    fn from(config: &AppConfig) -> Self {
        Self { max_content_chars: config.max_content_chars }
    }
}

/// A zone of the document that text is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Title,
    MetaDescription,
    H1,
    H2,
    Article,
    Main,
    ContentBlocks,
    Paragraphs,
    ListItems,
}

impl Region {
    /// Order in which regions are concatenated into `content`.
    pub const ORDER: [Region; 9] = [
        Region::Title,
        Region::MetaDescription,
        Region::H1,
        Region::H2,
        Region::Article,
        Region::Main,
        Region::ContentBlocks,
        Region::Paragraphs,
        Region::ListItems,
    ];

    /// CSS selector matching this region.
    pub fn selector(self) -> &'static str {
        match self {
            Region::Title => "title",
            Region::MetaDescription => r#"meta[name="description"]"#,
            Region::H1 => "h1",
            Region::H2 => "h2",
            Region::Article => "article",
            Region::Main => "main",
            Region::ContentBlocks => r#".content, #content, [class*="content"]"#,
            Region::Paragraphs => "p",
            Region::ListItems => "li",
        }
    }
}

/// Stable extractor trait for content extraction.
pub trait Extractor: Send + Sync {
    /// Extract salient text from the HTML served at `url`.
    fn extract(&self, url: &str, html: &str) -> Result<ScrapedContent, Error>;
}

/// Selector-based extractor built on `scraper`.
pub struct ContentExtractor {
    config: ExtractConfig,
    stripped: Selector,
    regions: Vec<(Region, Selector)>,
}

impl ContentExtractor {
    pub fn new(config: ExtractConfig) -> Self {
        let stripped = Selector::parse(STRIPPED_TAGS).expect("invalid selector");
        let regions = Region::ORDER
            .iter()
            .map(|&region| (region, Selector::parse(region.selector()).expect("invalid selector")))
            .collect();

        Self { config, stripped, regions }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extract from an already-parsed document.
    ///
    /// Takes the document by value because non-content subtrees are detached
    /// from it before any text is read.
    pub fn extract_document(&self, url: &str, mut document: Html) -> ScrapedContent {
        self.strip_non_content(&mut document);

        let texts: Vec<(Region, String)> = self
            .regions
            .iter()
            .map(|(region, selector)| (*region, region_text(&document, *region, selector)))
            .collect();

        let region = |wanted: Region| {
            texts
                .iter()
                .find(|(r, _)| *r == wanted)
                .map(|(_, text)| text.as_str())
                .unwrap_or_default()
        };

        let combined = texts.iter().map(|(_, text)| text.as_str()).collect::<Vec<_>>().join(" ");
        let content = truncate_chars(&normalize_text(&combined), self.config.max_content_chars);

        ScrapedContent {
            url: url.to_string(),
            title: normalize_text(region(Region::Title)),
            headings: Headings { h1: normalize_text(region(Region::H1)), h2: normalize_text(region(Region::H2)) },
            meta_description: normalize_text(region(Region::MetaDescription)),
            content,
            error: None,
            cached_at: None,
        }
    }

    fn strip_non_content(&self, document: &mut Html) {
        let ids: Vec<_> = document.select(&self.stripped).map(|el| el.id()).collect();
        for id in ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}

impl Extractor for ContentExtractor {
    fn extract(&self, url: &str, html: &str) -> Result<ScrapedContent, Error> {
        let document = Html::parse_document(html);
        let content = self.extract_document(url, document);

        tracing::debug!(url, title = %content.title, chars = content.content.chars().count(), "extracted content");

        Ok(content)
    }
}

/// Text of one region: the meta description's `content` attribute, or the
/// text of every matching element joined by single spaces.
fn region_text(document: &Html, region: Region, selector: &Selector) -> String {
    if region == Region::MetaDescription {
        return document
            .select(selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .unwrap_or_default()
            .to_string();
    }

    document
        .select(selector)
        .map(|el| el.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
