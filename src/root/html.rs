//! In-memory search root over parsed HTML
//!
//! `LiveDocument` holds HTML source that other tasks may rewrite while a
//! search is pending (the stand-in for scripts injecting content late). Each
//! round re-parses the current source with `scraper`, so a round always sees
//! the document as it is at that moment.

use async_trait::async_trait;
use parking_lot::RwLock;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;
use url::Url;

use super::{ElementSnapshot, Scope, SearchRoot};
use crate::utils::FRAME_TAGS;

/// Error types for the HTML backend
#[derive(Debug, Clone, Error)]
pub enum HtmlError {
    /// Selector failed to parse
    #[error("'{selector}' is not a valid selector: {message}")]
    InvalidSelector { selector: String, message: String },

    /// Element root locator matched nothing in the current document
    #[error("Search root '{0}' is not present in the document")]
    RootNotFound(String),

    /// Frame content belongs to another origin
    #[error("Blocked access from origin '{origin}' to cross-origin frame '{src}'")]
    CrossOriginFrame { src: String, origin: String },

    /// Document URL could not be parsed
    #[error("Invalid document URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Default)]
struct DocumentState {
    source: String,
    url: Option<Url>,
    /// Nested window documents keyed by frame `name` or `id`
    frames: HashMap<String, LiveDocument>,
}

/// Shared, mutable HTML document
///
/// Clones share the same underlying document.
#[derive(Debug, Clone, Default)]
pub struct LiveDocument {
    inner: Arc<RwLock<DocumentState>>,
}

impl LiveDocument {
    pub fn new(html: impl Into<String>) -> Self {
        Self::from_parts(html.into(), None)
    }

    fn from_parts(source: String, url: Option<Url>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(DocumentState {
                source,
                url,
                frames: HashMap::new(),
            })),
        }
    }

    /// Set the document URL used for frame origin checks
    ///
    /// Until a URL is set, frames with an absolute http(s) `src` are treated
    /// as cross-origin.
    ///
    /// # Errors
    ///
    /// Returns `HtmlError::InvalidUrl` when `url` is not an absolute URL.
    pub fn with_url(self, url: &str) -> Result<Self, HtmlError> {
        let parsed = Url::parse(url).map_err(|source| HtmlError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        self.inner.write().url = Some(parsed);
        Ok(self)
    }

    /// Replace the whole document source
    pub fn set_html(&self, html: impl Into<String>) {
        self.inner.write().source = html.into();
    }

    /// Append markup to the end of the source
    ///
    /// The parser moves trailing content into `<body>`, so this behaves like a
    /// script appending to the body.
    pub fn append_html(&self, fragment: &str) {
        self.inner.write().source.push_str(fragment);
    }

    /// Attach `document` as the window document of the frame named `name`
    pub fn attach_frame(&self, name: impl Into<String>, document: LiveDocument) {
        self.inner.write().frames.insert(name.into(), document);
    }

    pub fn detach_frame(&self, name: &str) -> Option<LiveDocument> {
        self.inner.write().frames.remove(name)
    }

    #[must_use]
    pub fn html(&self) -> String {
        self.inner.read().source.clone()
    }

    #[must_use]
    pub fn url(&self) -> Option<Url> {
        self.inner.read().url.clone()
    }

    fn frame(&self, name: &str) -> Option<LiveDocument> {
        self.inner.read().frames.get(name).cloned()
    }

    fn parse(&self) -> Html {
        Html::parse_document(&self.inner.read().source)
    }
}

/// Search root backed by a [`LiveDocument`]
#[derive(Debug, Clone)]
pub enum HtmlRoot {
    /// Search the whole document
    Document(LiveDocument),
    /// Search below the first element matching `locator`
    Element {
        document: LiveDocument,
        locator: String,
    },
}

impl HtmlRoot {
    pub fn document(document: LiveDocument) -> Self {
        HtmlRoot::Document(document)
    }

    pub fn element(document: LiveDocument, locator: impl Into<String>) -> Self {
        HtmlRoot::Element {
            document,
            locator: locator.into(),
        }
    }

    fn resolve_scope(&self) -> Result<Scope<HtmlRoot>, HtmlError> {
        let HtmlRoot::Element { document, locator } = self else {
            return Ok(Scope::Itself);
        };

        let html = document.parse();
        let element = locate(&html, locator)?;
        let frame = element.value();
        if !FRAME_TAGS.contains(&frame.name()) {
            return Ok(Scope::Itself);
        }

        // Content document first: srcdoc always wins over src
        if let Some(srcdoc) = frame.attr("srcdoc") {
            trace!("Frame '{}' resolved to its srcdoc content document", locator);
            let nested = LiveDocument::from_parts(srcdoc.to_string(), document.url());
            return Ok(Scope::Nested(HtmlRoot::Document(nested)));
        }

        if let Some(src) = frame.attr("src") {
            check_same_origin(document.url().as_ref(), src)?;
        }

        // Fall back to the nested window's document
        let window = frame
            .attr("name")
            .and_then(|name| document.frame(name))
            .or_else(|| frame.attr("id").and_then(|id| document.frame(id)));

        Ok(match window {
            Some(nested) => Scope::Nested(HtmlRoot::Document(nested)),
            None => {
                trace!("Frame '{}' has no nested document yet", locator);
                Scope::Unavailable
            }
        })
    }

    fn collect(&self, selector: &str) -> Result<Vec<ElementSnapshot>, HtmlError> {
        let selector = parse_selector(selector)?;
        match self {
            HtmlRoot::Document(document) => {
                let html = document.parse();
                Ok(html.select(&selector).map(snapshot).collect())
            }
            HtmlRoot::Element { document, locator } => {
                let html = document.parse();
                let root = locate(&html, locator)?;
                Ok(root.select(&selector).map(snapshot).collect())
            }
        }
    }
}

#[async_trait]
impl SearchRoot for HtmlRoot {
    type Element = ElementSnapshot;
    type Error = HtmlError;

    async fn scope(&self) -> Result<Scope<Self>, HtmlError> {
        self.resolve_scope()
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementSnapshot>, HtmlError> {
        self.collect(selector)
    }
}

fn parse_selector(selector: &str) -> Result<Selector, HtmlError> {
    Selector::parse(selector).map_err(|e| HtmlError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

fn locate<'a>(html: &'a Html, locator: &str) -> Result<ElementRef<'a>, HtmlError> {
    let selector = parse_selector(locator)?;
    html.select(&selector)
        .next()
        .ok_or_else(|| HtmlError::RootNotFound(locator.to_string()))
}

/// Frames on another origin throw on access rather than reporting no document
/// Without a document URL the document has an opaque origin, so any absolute
/// http(s) `src` is foreign. Relative sources stay same-document.
fn check_same_origin(base: Option<&Url>, src: &str) -> Result<(), HtmlError> {
    let Some(base) = base else {
        return match Url::parse(src) {
            Ok(target) if matches!(target.scheme(), "http" | "https") => {
                Err(HtmlError::CrossOriginFrame {
                    src: target.to_string(),
                    origin: String::from("null"),
                })
            }
            _ => Ok(()),
        };
    };
    let Ok(target) = base.join(src) else {
        return Ok(());
    };
    if target.scheme() == "about" || target.origin() == base.origin() {
        return Ok(());
    }
    Err(HtmlError::CrossOriginFrame {
        src: target.to_string(),
        origin: base.origin().ascii_serialization(),
    })
}

fn snapshot(element: ElementRef<'_>) -> ElementSnapshot {
    let value = element.value();
    ElementSnapshot {
        tag: value.name().to_string(),
        attributes: value
            .attrs()
            .map(|(name, val)| (name.to_string(), val.to_string()))
            .collect(),
        text: element.text().collect(),
        outer_html: element.html(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <ul id="list"><li class="item">one</li><li class="item">two</li></ul>
        <div id="solo">alone</div>
    </body></html>"#;

    #[tokio::test]
    async fn test_query_all_preserves_document_order() {
        let root = HtmlRoot::document(LiveDocument::new(PAGE));
        let matches = match root.query_all("li.item").await {
            Ok(m) => m,
            Err(e) => panic!("query should succeed: {e}"),
        };
        let texts: Vec<&str> = matches.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two"]);
        assert_eq!(matches[0].tag, "li");
        assert!(matches[0].has_class("item"));
    }

    #[tokio::test]
    async fn test_element_root_searches_descendants_only() {
        let root = HtmlRoot::element(LiveDocument::new(PAGE), "#list");
        let Ok(matches) = root.query_all("li").await else {
            panic!("query should succeed");
        };
        assert_eq!(matches.len(), 2);

        let Ok(outside) = root.query_all("#solo").await else {
            panic!("query should succeed");
        };
        assert!(outside.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_selector_is_reported() {
        let root = HtmlRoot::document(LiveDocument::new(PAGE));
        let result = root.query_all("li[").await;
        assert!(matches!(result, Err(HtmlError::InvalidSelector { .. })));
    }

    #[tokio::test]
    async fn test_missing_element_root_is_reported() {
        let root = HtmlRoot::element(LiveDocument::new(PAGE), "#nope");
        let result = root.query_all("li").await;
        assert!(matches!(result, Err(HtmlError::RootNotFound(ref l)) if l == "#nope"));
    }

    #[tokio::test]
    async fn test_non_frame_element_scopes_to_itself() {
        let root = HtmlRoot::element(LiveDocument::new(PAGE), "#list");
        assert!(matches!(root.scope().await, Ok(Scope::Itself)));
    }

    #[tokio::test]
    async fn test_srcdoc_frame_resolves_content_document() {
        let doc = LiveDocument::new(
            r#"<body><iframe id="f" srcdoc="<p class='inner'>hi</p>"><p class="inner">fallback</p></iframe></body>"#,
        );
        let root = HtmlRoot::element(doc, "#f");
        let Ok(Scope::Nested(nested)) = root.scope().await else {
            panic!("srcdoc frame should resolve to a nested document");
        };
        let Ok(matches) = nested.query_all("p.inner").await else {
            panic!("nested query should succeed");
        };
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "hi");
    }

    #[tokio::test]
    async fn test_named_frame_falls_back_to_window_document() {
        let doc = LiveDocument::new(r#"<body><iframe name="side" src="/side.html"></iframe></body>"#)
            .with_url("https://example.com/index.html");
        let Ok(doc) = doc else {
            panic!("url should parse");
        };
        let root = HtmlRoot::element(doc.clone(), "iframe");
        assert!(matches!(root.scope().await, Ok(Scope::Unavailable)));

        doc.attach_frame("side", LiveDocument::new("<body><b>side</b></body>"));
        let Ok(Scope::Nested(nested)) = root.scope().await else {
            panic!("attached window document should be used");
        };
        let Ok(matches) = nested.query_all("b").await else {
            panic!("nested query should succeed");
        };
        assert_eq!(matches[0].text, "side");
    }

    #[tokio::test]
    async fn test_cross_origin_frame_access_fails() {
        let Ok(doc) = LiveDocument::new(
            r#"<body><iframe id="ad" src="https://ads.example.net/slot"></iframe></body>"#,
        )
        .with_url("https://example.com/") else {
            panic!("url should parse");
        };
        let root = HtmlRoot::element(doc, "#ad");
        let result = root.scope().await;
        assert!(matches!(result, Err(HtmlError::CrossOriginFrame { .. })));
    }

    #[tokio::test]
    async fn test_absolute_frame_src_is_foreign_without_document_url() {
        let doc = LiveDocument::new(
            r#"<body><iframe id="ad" src="https://ads.example.net/slot"></iframe>
               <iframe id="local" src="/local.html"></iframe></body>"#,
        );

        let foreign = HtmlRoot::element(doc.clone(), "#ad").scope().await;
        assert!(matches!(
            foreign,
            Err(HtmlError::CrossOriginFrame { ref origin, .. }) if origin == "null"
        ));

        let local = HtmlRoot::element(doc, "#local").scope().await;
        assert!(matches!(local, Ok(Scope::Unavailable)));
    }

    #[test]
    fn test_invalid_document_url() {
        let result = LiveDocument::new("").with_url("not a url");
        assert!(matches!(result, Err(HtmlError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_clones_share_mutations() {
        let doc = LiveDocument::new("<body></body>");
        let root = HtmlRoot::document(doc.clone());
        doc.append_html(r#"<span id="late">x</span>"#);
        let Ok(matches) = root.query_all("#late").await else {
            panic!("query should succeed");
        };
        assert_eq!(matches.len(), 1);
        assert!(doc.html().contains("late"));
    }
}
