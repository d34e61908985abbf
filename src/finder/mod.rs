//! Poll-based element lookup
//!
//! A search runs its first round immediately, then keeps polling the root on
//! a fixed interval until a round matches something, the bounded budget is
//! spent, or the caller cancels. One match settles as [`Matched::One`];
//! several settle as [`Matched::Many`] in document order.

mod errors;
mod matched;
mod request;
mod scheduler;
mod state;

pub use errors::{FindError, InvalidAttempts};
pub use matched::Matched;
pub use request::{Attempts, SearchRequest};
pub use scheduler::{Scheduler, TokioScheduler};
pub use state::{SearchState, Step};

use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::config::FinderConfig;
use crate::root::{Scope, SearchRoot};

/// Result of one search invocation
pub type FindResult<R> =
    Result<Matched<<R as SearchRoot>::Element>, FindError<<R as SearchRoot>::Error>>;

/// Finder bound to an explicit search root
///
/// The root is always supplied by the caller; there is no implicit
/// top-level document.
///
/// # Example
/// ```no_run
/// use kodegen_tools_element_finder::{ElementFinder, HtmlRoot, LiveDocument};
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let document = LiveDocument::new("<body><div id='app'></div></body>");
/// let finder = ElementFinder::new(HtmlRoot::document(document));
/// let app = finder.find("#app").await?;
/// assert_eq!(app.count(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ElementFinder<R, S = TokioScheduler> {
    root: R,
    config: FinderConfig,
    scheduler: S,
}

impl<R: SearchRoot> ElementFinder<R> {
    /// Finder with the default policy (10 rounds, 100ms apart)
    pub fn new(root: R) -> Self {
        Self::with_config(root, FinderConfig::default())
    }

    pub fn with_config(root: R, config: FinderConfig) -> Self {
        Self {
            root,
            config,
            scheduler: TokioScheduler,
        }
    }
}

impl<R: SearchRoot, S: Scheduler> ElementFinder<R, S> {
    /// Swap the scheduler that drives delays between rounds
    pub fn with_scheduler<T: Scheduler>(self, scheduler: T) -> ElementFinder<R, T> {
        ElementFinder {
            root: self.root,
            config: self.config,
            scheduler,
        }
    }

    #[must_use]
    pub fn root(&self) -> &R {
        &self.root
    }

    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Search for `selector` using the configured attempts and interval
    ///
    /// # Errors
    ///
    /// `FindError::NotFound` when every round is empty, `FindError::Query`
    /// when the root fails to answer.
    pub async fn find(&self, selector: &str) -> FindResult<R> {
        let request = SearchRequest::from_config(selector, &self.config);
        self.find_with(&request).await
    }

    /// Search with an explicit request
    ///
    /// # Errors
    ///
    /// See [`ElementFinder::find`]; additionally `FindError::Cancelled` when
    /// the request's token fires.
    pub async fn find_with(&self, request: &SearchRequest) -> FindResult<R> {
        search(&self.root, &self.scheduler, request).await
    }
}

/// Search `root` once with the tokio scheduler
///
/// # Errors
///
/// See [`ElementFinder::find_with`].
pub async fn find<R: SearchRoot>(root: &R, request: &SearchRequest) -> FindResult<R> {
    search(root, &TokioScheduler, request).await
}

async fn search<R, S>(root: &R, scheduler: &S, request: &SearchRequest) -> FindResult<R>
where
    R: SearchRoot,
    S: Scheduler,
{
    let selector = request.selector();
    let mut state = SearchState::new(request.attempts());
    let start = Instant::now();

    debug!(
        "Searching for '{}' (attempts: {}, interval: {:?})",
        selector,
        request.attempts(),
        request.interval()
    );

    loop {
        if request.cancellation().is_some_and(|t| t.is_cancelled()) {
            return Err(cancelled(selector, &state));
        }

        let round = state.begin_round();
        let found = run_round(root, selector).await.map_err(FindError::Query)?;

        if let Some(matched) = Matched::from_matches(found) {
            debug!(
                "Found {} match(es) for '{}' on round {} after {:?}",
                matched.count(),
                selector,
                round,
                start.elapsed()
            );
            return Ok(matched);
        }

        match state.settle_empty_round() {
            Step::Exhausted => {
                debug!(
                    "Giving up on '{}' after {} rounds ({:?})",
                    selector,
                    round,
                    start.elapsed()
                );
                return Err(FindError::NotFound {
                    selector: selector.to_string(),
                    rounds: round,
                });
            }
            Step::Retry => {
                trace!(
                    "Round {} for '{}' was empty, retrying in {:?}",
                    round,
                    selector,
                    request.interval()
                );
                match request.cancellation() {
                    Some(token) => {
                        tokio::select! {
                            biased;
                            () = token.cancelled() => return Err(cancelled(selector, &state)),
                            () = scheduler.delay(request.interval()) => {}
                        }
                    }
                    None => scheduler.delay(request.interval()).await,
                }
            }
        }
    }
}

/// One round: resolve frame scoping, then query the effective context
async fn run_round<R: SearchRoot>(root: &R, selector: &str) -> Result<Vec<R::Element>, R::Error> {
    match root.scope().await? {
        Scope::Itself => root.query_all(selector).await,
        Scope::Nested(document) => document.query_all(selector).await,
        Scope::Unavailable => Ok(Vec::new()),
    }
}

fn cancelled<E: std::error::Error + 'static>(selector: &str, state: &SearchState) -> FindError<E> {
    warn!(
        "Search for '{}' cancelled after {} rounds",
        selector,
        state.rounds()
    );
    FindError::Cancelled {
        selector: selector.to_string(),
        rounds: state.rounds(),
    }
}
