//! Non-fatal diagnostic emission and filtering.
//!
//! `alarum` raises classified, non-halting notices ("warnings") and runs
//! each one through an ordered, mutable rule chain that decides whether it
//! is suppressed, escalated into a hard failure, deduplicated, or handed
//! to the active handler. Scoped overrides save and restore the whole
//! configuration on every exit path, and a capture mode redirects delivery
//! into a buffer for tests.
//!
//! # Example
//!
//! ```
//! use alarum::{Action, Engine};
//!
//! let engine = Engine::new();
//! let builtins = engine.builtins();
//!
//! // Escalate runtime warnings into hard failures.
//! engine.install_simple(Action::Error, Some(builtins.runtime), 0);
//!
//! let err = engine
//!     .emit("Value might be unstable", builtins.runtime)
//!     .unwrap_err();
//! assert_eq!(err.category(), builtins.runtime);
//!
//! // Capture instead of printing, within a restored-on-drop scope.
//! {
//!     let (_scope, captured) = engine.scoped_capture();
//!     engine.install_simple(Action::Always, Some(builtins.user), 0);
//!     engine.emit("heads up", builtins.user).ok();
//!     assert_eq!(captured.len(), 1);
//! }
//! ```

mod category;
mod dedup;
mod engine;
mod errors;
mod filter;
mod handler;
mod location;
mod scope;

pub use category::{BuiltinCategories, CategoryId, CategoryRegistry};
pub use dedup::DedupRegistry;
pub use engine::{Engine, Outcome};
pub use errors::{ConfigError, Escalated};
pub use filter::{parse_spec, parse_specs, Action, FilterChain, FilterRule};
pub use handler::{
    default_format, CapturedWarnings, Formatter, HandlerImpl, StreamHandler, WarningEvent,
};
pub use location::SourceLocation;
pub use scope::ScopeGuard;
