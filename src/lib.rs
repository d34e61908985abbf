//! Poll-based element lookup for documents that render late.
//!
//! [`ElementFinder`] searches a [`SearchRoot`] for a selector, retrying on a
//! fixed interval until something matches, a bounded number of rounds is
//! spent, or (in unbounded mode) forever. Frame-like roots are searched
//! through their nested document.
//!
//! Two roots ship with the crate: [`HtmlRoot`] over an in-memory
//! [`LiveDocument`] parsed with `scraper`, and [`PageRoot`] over a live
//! chromiumoxide page.

pub mod config;
pub mod finder;
pub mod root;
pub mod utils;

pub use config::{ConfigError, FinderConfig, FinderConfigBuilder};
pub use finder::{
    Attempts, ElementFinder, FindError, FindResult, InvalidAttempts, Matched, Scheduler,
    SearchRequest, SearchState, Step, TokioScheduler, find,
};
pub use root::{
    ElementSnapshot, HtmlError, HtmlRoot, LiveDocument, PageError, PageRoot, Scope, SearchRoot,
};
