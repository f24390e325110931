//! Ordered filter rules deciding what happens to each warning.
//!
//! A [`FilterChain`] is scanned front to back; the first rule whose every
//! field matches decides the [`Action`]. When nothing matches, an implicit
//! trailing `Default` rule applies. Front insertion gives the most recently
//! added rule the highest precedence.
//!
//! Matching semantics per field:
//! - message pattern: anchored regex against the start of the message,
//!   case-insensitive; absent = wildcard
//! - category: wildcard or subtype match in the category tree
//! - module pattern: anchored regex against the module identifier,
//!   case-sensitive; absent = wildcard
//! - line: 0 = wildcard, else exact

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::category::{BuiltinCategories, CategoryId, CategoryRegistry};
use crate::errors::ConfigError;
use crate::location::SourceLocation;

/// What to do with a warning matched by a filter rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Suppress the warning entirely.
    Ignore,
    /// Escalate the warning into a hard failure.
    Error,
    /// Deliver every occurrence, repeats included.
    Always,
    /// Deliver the first occurrence per (category, module, line).
    Default,
    /// Deliver the first occurrence per (category, module).
    Module,
    /// Deliver the first occurrence per category.
    Once,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Ignore => "ignore",
            Action::Error => "error",
            Action::Always => "always",
            Action::Default => "default",
            Action::Module => "module",
            Action::Once => "once",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Action {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(Action::Ignore),
            "error" => Ok(Action::Error),
            "always" => Ok(Action::Always),
            "default" => Ok(Action::Default),
            "module" => Ok(Action::Module),
            "once" => Ok(Action::Once),
            other => Err(ConfigError::UnknownAction {
                name: other.to_owned(),
            }),
        }
    }
}

/// One entry in the filter chain.
#[derive(Debug, Clone)]
pub struct FilterRule {
    action: Action,
    /// Anchored, case-insensitive; `None` matches any message.
    message: Option<Regex>,
    /// `None` matches any category.
    category: Option<CategoryId>,
    /// Anchored, case-sensitive; `None` matches any module.
    module: Option<Regex>,
    /// 0 matches any line.
    line: u32,
}

impl FilterRule {
    /// Build a rule that matches on category and line only (wildcard
    /// message and module).
    pub fn simple(action: Action, category: Option<CategoryId>, line: u32) -> Self {
        FilterRule {
            action,
            message: None,
            category,
            module: None,
            line,
        }
    }

    /// Build a fully general rule. Patterns are compiled as anchored
    /// prefix regexes; compilation failure is a [`ConfigError::BadPattern`].
    pub fn filtered(
        action: Action,
        message: Option<&str>,
        category: Option<CategoryId>,
        module: Option<&str>,
        line: u32,
    ) -> Result<Self, ConfigError> {
        let message = message
            .map(|pattern| compile_prefix(pattern, true))
            .transpose()?;
        let module = module
            .map(|pattern| compile_prefix(pattern, false))
            .transpose()?;
        Ok(FilterRule {
            action,
            message,
            category,
            module,
            line,
        })
    }

    /// The action this rule selects when it matches.
    pub fn action(&self) -> Action {
        self.action
    }

    /// The category this rule matches, `None` for any.
    pub fn category(&self) -> Option<CategoryId> {
        self.category
    }

    /// True iff all four fields match.
    pub fn matches(
        &self,
        message: &str,
        category: CategoryId,
        location: &SourceLocation,
        registry: &CategoryRegistry,
    ) -> bool {
        if let Some(pattern) = &self.message {
            if !pattern.is_match(message) {
                return false;
            }
        }
        if let Some(rule_category) = self.category {
            if !registry.is_subtype(category, rule_category) {
                return false;
            }
        }
        if let Some(pattern) = &self.module {
            if !pattern.is_match(&location.module) {
                return false;
            }
        }
        self.line == 0 || self.line == location.line
    }
}

/// Compile a user pattern as an anchored prefix match.
fn compile_prefix(pattern: &str, case_insensitive: bool) -> Result<Regex, ConfigError> {
    // The non-capturing group keeps top-level alternations anchored.
    let anchored = if case_insensitive {
        format!("^(?i:{pattern})")
    } else {
        format!("^(?:{pattern})")
    };
    Regex::new(&anchored).map_err(|source| ConfigError::BadPattern {
        pattern: pattern.to_owned(),
        source,
    })
}

/// Ordered list of filter rules; front = highest precedence.
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    rules: Vec<FilterRule>,
}

impl FilterChain {
    /// An empty chain (everything falls through to `Default`).
    pub fn empty() -> Self {
        FilterChain { rules: Vec::new() }
    }

    /// The built-in default chain: ignore pending-deprecation, import,
    /// resource and bytes warnings; `Default` for everything else.
    pub fn with_defaults(builtins: &BuiltinCategories) -> Self {
        let mut chain = FilterChain::empty();
        for category in [
            builtins.pending_deprecation,
            builtins.import,
            builtins.resource,
            builtins.bytes,
        ] {
            chain.push_back(FilterRule::simple(Action::Ignore, Some(category), 0));
        }
        chain
    }

    /// Insert at the front, taking precedence over every existing rule.
    pub fn insert_front(&mut self, rule: FilterRule) {
        self.rules.insert(0, rule);
    }

    /// Append at the back, lowest precedence.
    pub fn push_back(&mut self, rule: FilterRule) {
        self.rules.push(rule);
    }

    /// The rules in precedence order.
    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    /// Number of rules in the chain.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the chain has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First match wins; no match means `Default`. Pure over its inputs.
    pub fn evaluate(
        &self,
        message: &str,
        category: CategoryId,
        location: &SourceLocation,
        registry: &CategoryRegistry,
    ) -> Action {
        self.rules
            .iter()
            .find(|rule| rule.matches(message, category, location, registry))
            .map_or(Action::Default, FilterRule::action)
    }
}

/// Parse one `action[:message[:category[:module[:line]]]]` filter spec.
///
/// Empty fields are wildcards. Message and module are treated as literal
/// prefixes (escaped before compilation): bulk configuration takes plain
/// text, unlike the programmatic [`FilterRule::filtered`] surface.
pub fn parse_spec(spec: &str, registry: &CategoryRegistry) -> Result<FilterRule, ConfigError> {
    let fields: Vec<&str> = spec.split(':').map(str::trim).collect();
    if fields.len() > 5 {
        return Err(ConfigError::MalformedSpec {
            spec: spec.to_owned(),
        });
    }

    let field = |idx: usize| fields.get(idx).copied().filter(|f| !f.is_empty());

    let action = Action::from_str(field(0).unwrap_or("default"))?;
    let message = field(1).map(regex::escape);
    let category = field(2)
        .map(|name| {
            registry.lookup(name).ok_or_else(|| ConfigError::UnknownCategory {
                name: name.to_owned(),
            })
        })
        .transpose()?;
    let module = field(3).map(regex::escape);
    let line = field(4)
        .map(|value| {
            value.parse::<u32>().map_err(|_| ConfigError::BadLine {
                value: value.to_owned(),
            })
        })
        .transpose()?
        .unwrap_or(0);

    FilterRule::filtered(action, message.as_deref(), category, module.as_deref(), line)
}

/// Parse a comma-separated list of filter specs, left to right.
///
/// Empty segments are skipped. The caller is expected to front-insert the
/// results in order, so the last spec in the list ends up winning.
pub fn parse_specs(list: &str, registry: &CategoryRegistry) -> Result<Vec<FilterRule>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| parse_spec(segment, registry))
        .collect()
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
