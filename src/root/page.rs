//! Live browser search root over a chromiumoxide `Page`
//!
//! Every round evaluates a small script in the page. The script resolves the
//! effective scope (document, element, or a frame's nested document) and runs
//! `querySelectorAll` there, returning serialized [`ElementSnapshot`]s.
//! JavaScript exceptions (bad selector, cross-origin `SecurityError`) come
//! back as `PageError::Evaluate` and are never retried.

use async_trait::async_trait;
use chromiumoxide::Page;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;
use tracing::trace;

use super::{ElementSnapshot, Scope, SearchRoot};

/// Error types for the browser backend
#[derive(Debug, Clone, Error)]
pub enum PageError {
    /// Script evaluation failed or threw
    #[error("Failed to evaluate lookup script: {0}")]
    Evaluate(String),

    /// Script result did not have the expected shape
    #[error("Failed to decode lookup result: {0}")]
    Decode(String),

    /// Element root locator matched nothing in the current page
    #[error("Search root '{0}' is not present in the page")]
    RootNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageTarget {
    Document,
    Element(String),
    /// Nested document of the frame matched by the locator
    FrameDocument(String),
}

/// Search root backed by a live page
#[derive(Clone)]
pub struct PageRoot {
    page: Page,
    target: PageTarget,
}

impl fmt::Debug for PageRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRoot")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum ScriptOutcome {
    Ok {
        #[serde(default)]
        matches: Vec<ElementSnapshot>,
    },
    Missing,
    Unavailable,
    Element,
    Document,
}

impl PageRoot {
    /// Search the page's top-level document
    pub fn document(page: Page) -> Self {
        Self {
            page,
            target: PageTarget::Document,
        }
    }

    /// Search below the first element matching `locator`
    ///
    /// When that element is an `<iframe>` or `<frame>`, rounds are redirected
    /// into its nested document.
    pub fn element(page: Page, locator: impl Into<String>) -> Self {
        Self {
            page,
            target: PageTarget::Element(locator.into()),
        }
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    async fn evaluate(&self, script: String) -> Result<ScriptOutcome, PageError> {
        let result = self
            .page
            .evaluate(script.as_str())
            .await
            .map_err(|e| PageError::Evaluate(e.to_string()))?;
        result
            .into_value::<ScriptOutcome>()
            .map_err(|e| PageError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SearchRoot for PageRoot {
    type Element = ElementSnapshot;
    type Error = PageError;

    async fn scope(&self) -> Result<Scope<Self>, PageError> {
        let PageTarget::Element(locator) = &self.target else {
            return Ok(Scope::Itself);
        };

        match self.evaluate(scope_script(locator)).await? {
            ScriptOutcome::Document => Ok(Scope::Nested(Self {
                page: self.page.clone(),
                target: PageTarget::FrameDocument(locator.clone()),
            })),
            ScriptOutcome::Unavailable => {
                trace!("Frame '{}' has no nested document yet", locator);
                Ok(Scope::Unavailable)
            }
            ScriptOutcome::Element | ScriptOutcome::Ok { .. } => Ok(Scope::Itself),
            ScriptOutcome::Missing => Err(PageError::RootNotFound(locator.clone())),
        }
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementSnapshot>, PageError> {
        let script = match &self.target {
            PageTarget::Document => query_script(None, false, selector),
            PageTarget::Element(locator) => {
                query_script(Some(locator.as_str()), false, selector)
            }
            PageTarget::FrameDocument(locator) => {
                query_script(Some(locator.as_str()), true, selector)
            }
        };

        match self.evaluate(script).await? {
            ScriptOutcome::Ok { matches } => Ok(matches),
            // Frame lost its document between scope resolution and query
            ScriptOutcome::Unavailable => Ok(Vec::new()),
            ScriptOutcome::Missing => Err(PageError::RootNotFound(match &self.target {
                PageTarget::Element(l) | PageTarget::FrameDocument(l) => l.clone(),
                PageTarget::Document => String::from("document"),
            })),
            other => Err(PageError::Decode(format!("unexpected lookup status {other:?}"))),
        }
    }
}

/// JSON string literal; safe to splice into a script
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| String::from("\"\""))
}

fn scope_script(locator: &str) -> String {
    format!(
        r#"(() => {{
            const el = document.querySelector({locator});
            if (!el) return {{ status: 'missing' }};
            const tag = el.tagName.toLowerCase();
            if (tag !== 'iframe' && tag !== 'frame') return {{ status: 'element' }};
            const doc = el.contentDocument || (el.contentWindow && el.contentWindow.document);
            return {{ status: doc ? 'document' : 'unavailable' }};
        }})()"#,
        locator = js_string(locator),
    )
}

fn query_script(locator: Option<&str>, frame: bool, selector: &str) -> String {
    format!(
        r#"(() => {{
            const locator = {locator};
            let scope = document;
            if (locator !== null) {{
                const el = document.querySelector(locator);
                if (!el) return {{ status: 'missing' }};
                scope = el;
                if ({frame}) {{
                    scope = el.contentDocument || (el.contentWindow && el.contentWindow.document);
                    if (!scope) return {{ status: 'unavailable' }};
                }}
            }}
            const matches = Array.from(scope.querySelectorAll({selector})).map(el => ({{
                tag: el.tagName.toLowerCase(),
                attributes: Object.fromEntries(Array.from(el.attributes).map(a => [a.name, a.value])),
                text: el.textContent || '',
                outerHtml: el.outerHTML
            }}));
            return {{ status: 'ok', matches }};
        }})()"#,
        locator = locator.map_or_else(|| String::from("null"), js_string),
        frame = frame,
        selector = js_string(selector),
    )
}
