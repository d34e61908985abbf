//! Search roots: the document-like structures a finder can poll
//!
//! A root answers two questions each round: where should the query actually
//! run (frame redirection), and which descendants match a selector.

pub mod html;
pub mod page;
mod snapshot;

pub use html::{HtmlError, HtmlRoot, LiveDocument};
pub use page::{PageError, PageRoot};
pub use snapshot::ElementSnapshot;

use async_trait::async_trait;

/// Effective search context resolved for one round
#[derive(Debug, Clone)]
pub enum Scope<R> {
    /// Not a frame: query the root itself
    Itself,
    /// Frame-like root whose nested document is reachable
    Nested(R),
    /// Frame-like root with no nested document yet; the round counts as empty
    Unavailable,
}

/// A node that supports "find all descendants matching a selector"
///
/// Implementations must not mutate the document they search.
#[async_trait]
pub trait SearchRoot: Send + Sync + Sized {
    type Element: Send;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Resolve frame redirection for this round
    ///
    /// Frame-like roots return their nested document, preferring the content
    /// document and falling back to the nested window's document. Access that
    /// fails outright (e.g. cross-origin) is an error, not `Unavailable`.
    async fn scope(&self) -> Result<Scope<Self>, Self::Error>;

    /// All descendants matching `selector`, in document order
    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, Self::Error>;
}
