//! The emission engine: orchestrates location resolution, filter
//! evaluation, repeat suppression, and delivery.
//!
//! All process-wide mutable pieces (filter chain, dedup registry, active
//! handler, formatter) live in one [`EngineState`] value behind a single
//! mutex, so the sharing policy is a single auditable lock rather than
//! ambient globals. The category registry sits beside it behind a read
//! lock: it is append-only and deliberately not part of scope snapshots.
//!
//! Per emission: `Resolving → Matching → {Suppressed | Escalated |
//! Delivered}`. The filter decision and dedup update happen atomically
//! under the state lock; delivery happens after it is released, holding
//! only the handler slot's own lock.

use std::io::Write;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard, RwLock};
use tracing::{debug, trace};

use crate::category::{BuiltinCategories, CategoryId, CategoryRegistry};
use crate::dedup::DedupRegistry;
use crate::errors::{ConfigError, Escalated};
use crate::filter::{self, Action, FilterChain, FilterRule};
use crate::handler::{default_format, Formatter, SharedHandler, WarningEvent};
use crate::location::{self, SourceLocation};

/// Terminal state of a non-escalated emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The event reached the active handler (or capture buffer).
    Delivered,
    /// Filtered out or recognized as a repeat; no handler invocation.
    Suppressed,
}

/// The swappable process-wide state: everything a scope snapshots.
#[derive(Clone)]
pub(crate) struct EngineState {
    pub(crate) chain: FilterChain,
    pub(crate) dedup: DedupRegistry,
    pub(crate) handler: SharedHandler,
    pub(crate) formatter: Formatter,
}

struct EngineInner {
    state: Mutex<EngineState>,
    categories: RwLock<CategoryRegistry>,
    builtins: BuiltinCategories,
}

/// Handle to a warning engine. Cloning is cheap and shares the engine.
///
/// Construction installs the built-in default filter chain before any
/// emission can occur.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl Engine {
    /// Create an engine with the built-in categories and default chain.
    pub fn new() -> Self {
        let categories = CategoryRegistry::new();
        let builtins = categories.builtins();
        let state = EngineState {
            chain: FilterChain::with_defaults(&builtins),
            dedup: DedupRegistry::new(),
            handler: SharedHandler::stderr(),
            formatter: default_format,
        };
        Engine {
            inner: Arc::new(EngineInner {
                state: Mutex::new(state),
                categories: RwLock::new(categories),
                builtins,
            }),
        }
    }

    pub(crate) fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.inner.state.lock()
    }

    // --- categories -----------------------------------------------------

    /// Handles to the built-in category hierarchy.
    pub fn builtins(&self) -> BuiltinCategories {
        self.inner.builtins
    }

    /// Register a custom category under `parent`.
    pub fn register_category(
        &self,
        name: &str,
        parent: CategoryId,
    ) -> Result<CategoryId, ConfigError> {
        let id = self.inner.categories.write().register(name, parent)?;
        debug!(category = name, "registered warning category");
        Ok(id)
    }

    /// Look up a category by name.
    pub fn lookup_category(&self, name: &str) -> Option<CategoryId> {
        self.inner.categories.read().lookup(name)
    }

    /// The name of a registered category.
    pub fn category_name(&self, id: CategoryId) -> String {
        self.inner.categories.read().name(id).to_owned()
    }

    /// True iff `ancestor` is reachable from `child` in the category tree.
    /// Useful for matching an [`Escalated`] failure by ancestor category.
    pub fn is_subtype(&self, child: CategoryId, ancestor: CategoryId) -> bool {
        self.inner.categories.read().is_subtype(child, ancestor)
    }

    // --- filter configuration -------------------------------------------

    /// Front-insert a wildcard-message, wildcard-module rule.
    pub fn install_simple(&self, action: Action, category: Option<CategoryId>, line: u32) {
        debug!(%action, "installing simple filter rule");
        self.lock_state()
            .chain
            .insert_front(FilterRule::simple(action, category, line));
    }

    /// Front-insert a fully general rule.
    pub fn install_filtered(
        &self,
        action: Action,
        message: Option<&str>,
        category: Option<CategoryId>,
        module: Option<&str>,
        line: u32,
    ) -> Result<(), ConfigError> {
        let rule = FilterRule::filtered(action, message, category, module, line)?;
        debug!(%action, "installing filter rule");
        self.lock_state().chain.insert_front(rule);
        Ok(())
    }

    /// Replace the chain with the built-in default chain.
    pub fn reset(&self) {
        debug!("resetting filter chain to defaults");
        self.lock_state().chain = FilterChain::with_defaults(&self.inner.builtins);
    }

    /// Apply a comma-separated list of `action:message:category:module:line`
    /// filter specs, front-inserted left to right so the last spec wins.
    ///
    /// The whole list is validated before any rule is installed; a bad
    /// spec leaves the chain unchanged.
    pub fn apply_filter_specs(&self, specs: &str) -> Result<(), ConfigError> {
        let rules = {
            let categories = self.inner.categories.read();
            filter::parse_specs(specs, &categories)?
        };
        let mut state = self.lock_state();
        for rule in rules {
            state.chain.insert_front(rule);
        }
        Ok(())
    }

    /// Snapshot of the current filter chain (for inspection and tests).
    pub fn filter_chain(&self) -> FilterChain {
        self.lock_state().chain.clone()
    }

    // --- handler configuration ------------------------------------------

    /// Replace the active handler with a callback.
    pub fn set_handler(&self, handler: impl FnMut(&WarningEvent) + Send + 'static) {
        self.lock_state().handler =
            SharedHandler::from_impl(crate::handler::HandlerImpl::Custom(Box::new(handler)));
    }

    /// Replace the active handler with a stream handler writing to `stream`.
    pub fn set_stream(&self, stream: Box<dyn Write + Send>) {
        self.lock_state().handler = SharedHandler::from_impl(crate::handler::HandlerImpl::Stream(
            crate::handler::StreamHandler::new(stream),
        ));
    }

    /// Replace the formatter used by stream handlers.
    pub fn set_formatter(&self, formatter: Formatter) {
        self.lock_state().formatter = formatter;
    }

    // --- emission --------------------------------------------------------

    /// Emit a warning attributed to the immediate caller.
    #[track_caller]
    pub fn emit(&self, message: &str, category: CategoryId) -> Result<Outcome, Escalated> {
        self.emit_resolved(message, category, location::caller())
    }

    /// Emit a warning attributed `depth` frames out from this call.
    ///
    /// Depth 1 is the immediate caller. When the requested depth exceeds
    /// what the stack (or its debug info) can provide, attribution falls
    /// back to the immediate caller; the failure is never surfaced.
    #[track_caller]
    pub fn emit_with_depth(
        &self,
        message: &str,
        category: CategoryId,
        depth: u32,
    ) -> Result<Outcome, Escalated> {
        let fallback = location::caller();
        self.emit_resolved(message, category, location::resolve(depth, fallback))
    }

    /// Emit a warning with an explicit location, bypassing resolution.
    pub fn emit_at(
        &self,
        message: &str,
        category: CategoryId,
        location: SourceLocation,
    ) -> Result<Outcome, Escalated> {
        self.emit_resolved(message, category, location)
    }

    fn emit_resolved(
        &self,
        message: &str,
        category: CategoryId,
        location: SourceLocation,
    ) -> Result<Outcome, Escalated> {
        let category_name = self.category_name(category);

        // Filter decision and dedup update are atomic under the state
        // lock; a scope swap can never interleave mid-evaluation.
        let delivery = {
            let categories = self.inner.categories.read();
            let mut state = self.lock_state();
            let action = state.chain.evaluate(message, category, &location, &categories);
            trace!(%action, %location, "filter chain matched");
            match action {
                Action::Ignore => return Ok(Outcome::Suppressed),
                Action::Error => {
                    return Err(Escalated::new(
                        category,
                        category_name,
                        message.to_owned(),
                        location,
                    ));
                }
                Action::Always | Action::Default | Action::Module | Action::Once => {
                    if state.dedup.should_suppress_repeat(action, category, &location) {
                        trace!(%location, "suppressing repeated warning");
                        return Ok(Outcome::Suppressed);
                    }
                    let event = WarningEvent {
                        message: message.to_owned(),
                        category,
                        category_name,
                        location,
                        action,
                    };
                    (state.handler.clone(), state.formatter, event)
                }
            }
        };

        // Deliver outside the state lock so a slow or reconfiguring
        // handler never blocks filter evaluation on other threads.
        let (handler, formatter, event) = delivery;
        handler.deliver(&event, formatter);
        Ok(Outcome::Delivered)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
