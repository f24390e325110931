//! Error types for the warning engine.
//!
//! Two kinds of failure leave this crate:
//! - [`ConfigError`]: bad rule or category registration, surfaced
//!   synchronously to whoever registered it.
//! - [`Escalated`]: a warning that an `error`-action filter rule turned into
//!   a hard failure, returned to the caller of `emit`.
//!
//! Stack-depth resolution failures are recovered internally (fall back to
//! the immediate caller) and never appear here.

use thiserror::Error;

use crate::category::CategoryId;
use crate::location::SourceLocation;

/// Error raised when registering a filter rule or category fails.
///
/// Always surfaced synchronously to the registering caller; the filter
/// chain is left unchanged when any of these occur.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A category was registered with itself as parent.
    #[error("category `{name}` cannot be its own parent")]
    SelfParent {
        /// The offending category name.
        name: String,
    },

    /// The supplied parent id does not exist in the registry.
    #[error("unknown parent category id {id}")]
    UnknownParent {
        /// The raw id that was out of range.
        id: u32,
    },

    /// A category with this name is already registered.
    #[error("category `{name}` is already registered")]
    DuplicateCategory {
        /// The duplicated name.
        name: String,
    },

    /// A filter spec named a category that is not registered.
    #[error("unknown warning category `{name}`")]
    UnknownCategory {
        /// The unrecognized category name.
        name: String,
    },

    /// A filter spec named an action that is not one of the six known ones.
    #[error("unknown filter action `{name}`")]
    UnknownAction {
        /// The unrecognized action name.
        name: String,
    },

    /// A message or module pattern failed to compile.
    #[error("invalid filter pattern `{pattern}`")]
    BadPattern {
        /// The pattern as supplied.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// The line field of a filter spec was not a non-negative integer.
    #[error("invalid line number `{value}` in filter spec")]
    BadLine {
        /// The unparseable line field.
        value: String,
    },

    /// A filter spec had more than the five `action:message:category:module:line` fields.
    #[error("malformed filter spec `{spec}`")]
    MalformedSpec {
        /// The spec as supplied.
        spec: String,
    },
}

/// A warning promoted to a hard failure by an `error`-action filter rule.
///
/// Carries the warning's own category so callers can match it the way they
/// would match the warning itself, by exact category or by ancestor via
/// [`Engine::is_subtype`](crate::Engine::is_subtype).
#[derive(Debug, Clone, Error)]
#[error("{category_name}: {message}")]
pub struct Escalated {
    category: CategoryId,
    category_name: String,
    message: String,
    location: SourceLocation,
}

impl Escalated {
    pub(crate) fn new(
        category: CategoryId,
        category_name: String,
        message: String,
        location: SourceLocation,
    ) -> Self {
        Escalated {
            category,
            category_name,
            message,
            location,
        }
    }

    /// The category of the escalated warning.
    pub fn category(&self) -> CategoryId {
        self.category
    }

    /// The category name, resolved at escalation time.
    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    /// The warning message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Where the warning was attributed.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }
}
