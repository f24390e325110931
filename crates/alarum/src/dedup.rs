//! Repeat suppression for delivered warnings.
//!
//! The repeat-suppressing actions differ only in key granularity:
//! `default` keys on (category, module, line), `module` on
//! (category, module), and `once` on the category alone. `always` never
//! suppresses, and `ignore`/`error` emissions never reach the registry.
//!
//! Registration is monotonic within a scope; the scope manager replaces
//! the whole registry on exit instead of unpicking individual keys.

use rustc_hash::FxHashSet;

use crate::category::CategoryId;
use crate::filter::Action;
use crate::location::SourceLocation;

/// Key granularity mirrors the action that recorded it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DedupKey {
    /// Action `default`: first occurrence per (category, module, line).
    Exact {
        category: CategoryId,
        module: String,
        line: u32,
    },
    /// Action `module`: first occurrence per (category, module).
    PerModule {
        category: CategoryId,
        module: String,
    },
    /// Action `once`: first occurrence per category.
    PerCategory { category: CategoryId },
}

/// Set of already-delivered warning keys.
#[derive(Debug, Clone, Default)]
pub struct DedupRegistry {
    seen: FxHashSet<DedupKey>,
}

impl DedupRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        DedupRegistry {
            seen: FxHashSet::default(),
        }
    }

    /// True iff an equivalent warning was already delivered under this
    /// action's granularity. A first sighting records the key and returns
    /// false.
    pub fn should_suppress_repeat(
        &mut self,
        action: Action,
        category: CategoryId,
        location: &SourceLocation,
    ) -> bool {
        let key = match action {
            Action::Always | Action::Ignore | Action::Error => return false,
            Action::Default => DedupKey::Exact {
                category,
                module: location.module.clone(),
                line: location.line,
            },
            Action::Module => DedupKey::PerModule {
                category,
                module: location.module.clone(),
            },
            Action::Once => DedupKey::PerCategory { category },
        };
        !self.seen.insert(key)
    }

    /// Number of recorded keys.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True when nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests;
