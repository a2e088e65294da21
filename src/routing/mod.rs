//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (at startup):
//!     pattern string + handler
//!     → pattern.rs (split into literal / :param segments)
//!     → table.rs (stored in registration order)
//!
//! Navigation:
//!     push(url) / start()
//!     → navigator.rs (base prefix, pathname extraction)
//!     → table.rs (first matching route)
//!     → NavigationState swapped, observer.rs notifies subscribers
//! ```
//!
//! # Design Decisions
//! - Deterministic: same path and registration order always give the same route
//! - First match wins; callers register specific patterns before general ones
//! - No match is a value (`None`), not an error
//! - No regex in matching (segment comparison only)

pub mod history;
pub mod navigator;
pub mod observer;
pub mod pattern;
pub mod query;
pub mod table;

pub use history::{Location, MemoryHistory, NoLocation};
pub use navigator::{ExecutionContext, NavigationFault, NavigationState, Navigator};
pub use observer::{Observer, SubscriptionId};
pub use pattern::{Params, PathPattern, PatternError};
pub use query::QueryMap;
pub use table::{CompiledRoute, ResolvedRoute, RouteTable};
