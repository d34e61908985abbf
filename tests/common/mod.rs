//! Test utilities and helper functions for the element finder test suite

use anyhow::Result;
use async_trait::async_trait;
use kodegen_tools_element_finder::{LiveDocument, Scope, SearchRoot};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Install a tracing subscriber honouring `RUST_LOG`; safe to call repeatedly
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Creates a test HTML document with the given body markup
#[allow(dead_code)]
pub fn create_test_html(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
</head>
<body>
    {body}
</body>
</html>"#
    )
}

/// Creates a live test document served from `url`
#[allow(dead_code)]
pub fn create_test_document(url: &str, title: &str, body: &str) -> Result<LiveDocument> {
    Ok(LiveDocument::new(create_test_html(title, body)).with_url(url)?)
}

/// Wraps a root and counts query rounds, including rounds redirected into a
/// nested document
#[derive(Debug, Clone)]
pub struct CountingRoot<R> {
    inner: R,
    queries: Arc<AtomicU32>,
}

#[allow(dead_code)]
impl<R> CountingRoot<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            queries: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn queries(&self) -> u32 {
        self.queries.load(Ordering::SeqCst)
    }

    /// Shared counter, readable while a search holds the root
    pub fn counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.queries)
    }
}

#[async_trait]
impl<R: SearchRoot> SearchRoot for CountingRoot<R> {
    type Element = R::Element;
    type Error = R::Error;

    async fn scope(&self) -> std::result::Result<Scope<Self>, Self::Error> {
        Ok(match self.inner.scope().await? {
            Scope::Itself => Scope::Itself,
            Scope::Nested(inner) => Scope::Nested(CountingRoot {
                inner,
                queries: Arc::clone(&self.queries),
            }),
            Scope::Unavailable => {
                // An unavailable frame still costs a round
                self.queries.fetch_add(1, Ordering::SeqCst);
                Scope::Unavailable
            }
        })
    }

    async fn query_all(
        &self,
        selector: &str,
    ) -> std::result::Result<Vec<Self::Element>, Self::Error> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.query_all(selector).await
    }
}
