//! Route registration and lookup.
//!
//! # Responsibilities
//! - Store compiled routes keyed by their pattern string
//! - Resolve a path to the first matching route plus its parameters
//! - Return an explicit no-match (`None`) rather than an error
//!
//! # Design Decisions
//! - Registration order is the match order (first match wins, no scoring)
//! - Re-registering a pattern replaces the entry in place, keeping its position
//! - Compiled routes are shared via `Arc` so resolutions can outlive a lookup
//! - O(n) scan over routes (acceptable for storefront-sized tables)

use std::sync::Arc;

use crate::routing::pattern::{Params, PathPattern, PatternError};

/// A registered route: the original pattern, its compiled matcher and a handler.
#[derive(Debug)]
pub struct CompiledRoute<H> {
    pattern: String,
    matcher: PathPattern,
    handler: H,
}

impl<H> CompiledRoute<H> {
    /// The pattern string this route was registered under.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Declared parameter names, in order.
    pub fn param_names(&self) -> &[String] {
        self.matcher.param_names()
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// The outcome of a successful lookup.
#[derive(Debug)]
pub struct ResolvedRoute<H> {
    route: Arc<CompiledRoute<H>>,
    path: String,
    params: Params,
}

// Manual impl: deriving would require `H: Clone`.
impl<H> Clone for ResolvedRoute<H> {
    fn clone(&self) -> Self {
        Self {
            route: Arc::clone(&self.route),
            path: self.path.clone(),
            params: self.params.clone(),
        }
    }
}

impl<H> ResolvedRoute<H> {
    /// The matched route.
    pub fn route(&self) -> &CompiledRoute<H> {
        &self.route
    }

    /// The pattern string of the matched route.
    pub fn pattern(&self) -> &str {
        &self.route.pattern
    }

    /// The path that produced the match.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Look up one parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn handler(&self) -> &H {
        &self.route.handler
    }
}

/// Ordered table of compiled routes under an optional base prefix.
#[derive(Debug)]
pub struct RouteTable<H> {
    base: String,
    routes: Vec<Arc<CompiledRoute<H>>>,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RouteTable<H> {
    /// Create an empty table with no base prefix.
    pub fn new() -> Self {
        Self::with_base("")
    }

    /// Create an empty table whose patterns are all implicitly prefixed by `base`.
    ///
    /// A trailing `/` on the base is dropped, so `"/"` behaves like `""`.
    pub fn with_base(base: impl Into<String>) -> Self {
        let base = base.into();
        let base = base.strip_suffix('/').unwrap_or(&base).to_string();
        Self {
            base,
            routes: Vec::new(),
        }
    }

    /// The normalized base prefix.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Compile and store `pattern`.
    ///
    /// An existing entry with the same pattern string is replaced but keeps
    /// its original position in the match order.
    pub fn register(&mut self, pattern: impl Into<String>, handler: H) -> Result<(), PatternError> {
        let pattern = pattern.into();
        let matcher = PathPattern::compile(&self.base, &pattern)?;
        let route = Arc::new(CompiledRoute {
            pattern,
            matcher,
            handler,
        });

        match self.routes.iter().position(|r| r.pattern == route.pattern) {
            Some(idx) => {
                tracing::debug!(pattern = %route.pattern, "Replacing registered route");
                self.routes[idx] = route;
            }
            None => self.routes.push(route),
        }
        Ok(())
    }

    /// Find the first route, in registration order, matching the whole `path`.
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute<H>> {
        self.routes.iter().find_map(|route| {
            route.matcher.matches(path).map(|params| ResolvedRoute {
                route: Arc::clone(route),
                path: path.to_string(),
                params,
            })
        })
    }

    /// Registered pattern strings in match order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.pattern.as_str())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
