//! Navigation controller.
//!
//! # Responsibilities
//! - Track the current resolution (route, params, query) over a route table
//! - Normalize navigation targets under the base path
//! - Notify subscribers after every state transition
//!
//! # States
//! ```text
//! uninitialized --start()/push()--> resolved --start()/push()--> resolved
//! ```
//! "resolved" includes the no-match outcome (`route()` is `None`).
//!
//! # Design Decisions
//! - One type serves both execution contexts; the variant only changes where
//!   the ambient URL comes from (`NoLocation` vs `MemoryHistory`)
//! - State is an immutable snapshot swapped atomically, so observers never
//!   see a half-applied transition
//! - `push`/`start` never fail: faults are logged and degrade to no-match

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use thiserror::Error;
use url::Url;

use crate::observability::metrics;
use crate::routing::history::{Location, MemoryHistory, NoLocation};
use crate::routing::observer::{Observer, SubscriptionId};
use crate::routing::pattern::Params;
use crate::routing::query::QueryMap;
use crate::routing::table::{ResolvedRoute, RouteTable};

/// Origin used to resolve relative navigation targets.
const RESOLVE_ORIGIN: &str = "http://localhost";

/// Unexpected failure while resolving a navigation target.
#[derive(Debug, Error)]
pub enum NavigationFault {
    #[error("invalid navigation target `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Which host environment a navigator serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Construct, resolve one URL, discard (server render).
    SingleShot,
    /// Long-lived session with a history stack.
    Interactive,
}

/// Snapshot of the navigator's state.
#[derive(Debug)]
pub struct NavigationState<H> {
    route: Option<ResolvedRoute<H>>,
    query: QueryMap,
}

impl<H> NavigationState<H> {
    pub fn route(&self) -> Option<&ResolvedRoute<H>> {
        self.route.as_ref()
    }

    pub fn query(&self) -> &QueryMap {
        &self.query
    }
}

impl<H> Default for NavigationState<H> {
    fn default() -> Self {
        Self {
            route: None,
            query: QueryMap::new(),
        }
    }
}

/// Stateful wrapper around a [`RouteTable`].
pub struct Navigator<H> {
    table: Arc<RouteTable<H>>,
    base: String,
    context: ExecutionContext,
    location: Arc<dyn Location>,
    state: ArcSwap<NavigationState<H>>,
    resolved: AtomicBool,
    observer: Observer,
}

impl<H> std::fmt::Debug for Navigator<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("base", &self.base)
            .field("context", &self.context)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

impl<H> Navigator<H> {
    /// Pick the variant for the hosting environment.
    pub fn for_context(context: ExecutionContext, table: Arc<RouteTable<H>>) -> Self {
        match context {
            ExecutionContext::SingleShot => Self::single_shot(table),
            ExecutionContext::Interactive => {
                let initial = format!("{}/", table.base());
                Self::interactive(table, Arc::new(MemoryHistory::with_initial_path(initial)))
            }
        }
    }

    /// Navigator for a one-shot render; `start()` resolves the root path.
    pub fn single_shot(table: Arc<RouteTable<H>>) -> Self {
        Self::new(table, ExecutionContext::SingleShot, Arc::new(NoLocation))
    }

    /// Navigator for a long-lived session reading its URL from `location`.
    ///
    /// In this mode the query follows the location's query string.
    pub fn interactive(table: Arc<RouteTable<H>>, location: Arc<dyn Location>) -> Self {
        Self::new(table, ExecutionContext::Interactive, location)
    }

    fn new(table: Arc<RouteTable<H>>, context: ExecutionContext, location: Arc<dyn Location>) -> Self {
        let base = table.base().to_string();
        Self {
            table,
            base,
            context,
            location,
            state: ArcSwap::from_pointee(NavigationState::default()),
            resolved: AtomicBool::new(false),
            observer: Observer::new(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn context(&self) -> ExecutionContext {
        self.context
    }

    /// Whether `start` or `push` has run at least once.
    pub fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::Acquire)
    }

    /// The full current state, consistent across fields.
    pub fn snapshot(&self) -> Arc<NavigationState<H>> {
        self.state.load_full()
    }

    pub fn route(&self) -> Option<ResolvedRoute<H>> {
        self.state.load().route.clone()
    }

    /// Current parameters; empty when nothing matched.
    pub fn params(&self) -> Params {
        self.state
            .load()
            .route
            .as_ref()
            .map(|r| r.params().clone())
            .unwrap_or_default()
    }

    /// Current query; empty when never set.
    pub fn query(&self) -> QueryMap {
        self.state.load().query.clone()
    }

    /// Replace the query from a raw query string or a parsed map.
    ///
    /// Does not notify subscribers.
    pub fn set_query(&self, query: impl Into<QueryMap>) {
        let query = query.into();
        self.state.rcu(|current| NavigationState {
            route: current.route.clone(),
            query: query.clone(),
        });
    }

    pub fn subscribe(&self, f: impl Fn() + Send + Sync + 'static) -> SubscriptionId {
        self.observer.subscribe(f)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observer.unsubscribe(id)
    }

    /// Resolve the ambient URL (the root path when there is none).
    pub fn start(&self) {
        let url = self.location.current().unwrap_or_default();
        self.navigate(&url);
    }

    /// Navigate to `url`, prefixing the base path when missing.
    pub fn push(&self, url: &str) {
        let full = self.normalize(url);
        self.location.push(&full);
        self.navigate(&full);
    }

    /// Step back in history and re-resolve. Returns false when there is
    /// nowhere to go (always the case for single-shot navigators).
    pub fn back(&self) -> bool {
        match self.location.back() {
            Some(url) => {
                self.navigate(&url);
                true
            }
            None => false,
        }
    }

    /// Step forward in history and re-resolve.
    pub fn forward(&self) -> bool {
        match self.location.forward() {
            Some(url) => {
                self.navigate(&url);
                true
            }
            None => false,
        }
    }

    fn normalize(&self, url: &str) -> String {
        if url.starts_with(&self.base) {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base, url)
        } else {
            format!("{}/{}", self.base, url)
        }
    }

    fn navigate(&self, url: &str) {
        let (route, query) = match self.find_route(url) {
            Ok(found) => found,
            Err(fault) => {
                tracing::error!(url = %url, error = %fault, "Navigation fault, treating as no match");
                metrics::record_navigation_fault();
                (None, None)
            }
        };

        self.state.rcu(|current| NavigationState {
            route: route.clone(),
            query: query.clone().unwrap_or_else(|| current.query.clone()),
        });
        self.resolved.store(true, Ordering::Release);
        self.observer.notify();
    }

    /// Resolve the pathname of `url`. The query string is returned only for
    /// interactive sessions, where it is part of the ambient location.
    fn find_route(
        &self,
        url: &str,
    ) -> Result<(Option<ResolvedRoute<H>>, Option<QueryMap>), NavigationFault> {
        let parsed = Url::parse(RESOLVE_ORIGIN)
            .and_then(|origin| origin.join(url))
            .map_err(|source| NavigationFault::InvalidUrl {
                url: url.to_string(),
                source,
            })?;

        let route = self.table.resolve(parsed.path());
        tracing::debug!(
            path = parsed.path(),
            pattern = route.as_ref().map(|r| r.pattern()),
            "Resolved navigation target"
        );

        let query = match self.context {
            ExecutionContext::Interactive => Some(QueryMap::parse(parsed.query().unwrap_or(""))),
            ExecutionContext::SingleShot => None,
        };
        Ok((route, query))
    }
}

impl<H: Clone> Navigator<H> {
    /// Handler of the current route.
    pub fn target(&self) -> Option<H> {
        self.state.load().route.as_ref().map(|r| r.handler().clone())
    }
}
