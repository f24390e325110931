//! Warning categories as a single-rooted, runtime-extensible tree.
//!
//! Categories are data, not types: each is a `{name, parent}` node and a
//! filter rule matches a category `C` against its own category `F` iff
//! `C == F` or `F` is an ancestor of `C`. New categories can be registered
//! at runtime by naming a parent; the registry is append-only.

use rustc_hash::FxHashMap;

use crate::errors::ConfigError;

/// Handle to a registered warning category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoryId(u32);

impl CategoryId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn raw(self) -> u32 {
        self.0
    }
}

/// One node in the category tree.
#[derive(Debug, Clone)]
struct CategoryNode {
    name: String,
    /// `None` only for the root.
    parent: Option<CategoryId>,
}

/// Handles to the built-in category hierarchy, seeded at registry creation.
///
/// `warning` is the root; every other category, built-in or custom,
/// transitively descends from it.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinCategories {
    /// Root of the hierarchy; matches everything as a filter category.
    pub warning: CategoryId,
    /// Default category for ad-hoc warnings from user code.
    pub user: CategoryId,
    /// A feature is deprecated and will be removed.
    pub deprecation: CategoryId,
    /// A feature will be deprecated in a future release.
    pub pending_deprecation: CategoryId,
    /// Behavior aimed at end users will change.
    pub future: CategoryId,
    /// Dubious runtime behavior, e.g. numeric instability.
    pub runtime: CategoryId,
    /// Dubious syntax or construct usage.
    pub syntax: CategoryId,
    /// A problem occurred while loading a module.
    pub import: CategoryId,
    /// A resource was possibly leaked.
    pub resource: CategoryId,
    /// Dubious byte-vs-text handling.
    pub bytes: CategoryId,
}

/// Append-only registry of warning categories.
///
/// Seeded with the built-in hierarchy; custom categories are added with
/// [`CategoryRegistry::register`]. Ids are never invalidated.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    nodes: Vec<CategoryNode>,
    by_name: FxHashMap<String, CategoryId>,
    builtins: BuiltinCategories,
}

impl CategoryRegistry {
    /// Create a registry seeded with the built-in categories.
    pub fn new() -> Self {
        let mut registry = CategoryRegistry {
            nodes: Vec::with_capacity(16),
            by_name: FxHashMap::default(),
            // Placeholder ids, overwritten below once the nodes exist.
            builtins: BuiltinCategories {
                warning: CategoryId(0),
                user: CategoryId(0),
                deprecation: CategoryId(0),
                pending_deprecation: CategoryId(0),
                future: CategoryId(0),
                runtime: CategoryId(0),
                syntax: CategoryId(0),
                import: CategoryId(0),
                resource: CategoryId(0),
                bytes: CategoryId(0),
            },
        };

        let warning = registry.push("Warning", None);
        registry.builtins = BuiltinCategories {
            warning,
            user: registry.push("UserWarning", Some(warning)),
            deprecation: registry.push("DeprecationWarning", Some(warning)),
            pending_deprecation: registry.push("PendingDeprecationWarning", Some(warning)),
            future: registry.push("FutureWarning", Some(warning)),
            runtime: registry.push("RuntimeWarning", Some(warning)),
            syntax: registry.push("SyntaxWarning", Some(warning)),
            import: registry.push("ImportWarning", Some(warning)),
            resource: registry.push("ResourceWarning", Some(warning)),
            bytes: registry.push("BytesWarning", Some(warning)),
        };
        registry
    }

    /// Infallible insertion for seeding; names are known-unique.
    fn push(&mut self, name: &str, parent: Option<CategoryId>) -> CategoryId {
        // Node count is bounded by registration calls, far below u32::MAX.
        #[expect(
            clippy::cast_possible_truncation,
            reason = "category count never approaches u32::MAX"
        )]
        let id = CategoryId(self.nodes.len() as u32);
        self.nodes.push(CategoryNode {
            name: name.to_owned(),
            parent,
        });
        self.by_name.insert(name.to_owned(), id);
        id
    }

    /// Handles to the built-in categories.
    pub fn builtins(&self) -> BuiltinCategories {
        self.builtins
    }

    /// Register a custom category under `parent`.
    ///
    /// Rejects duplicate names, out-of-range parents, and self-parenting
    /// (the only cycle expressible when every node names an existing
    /// parent).
    pub fn register(&mut self, name: &str, parent: CategoryId) -> Result<CategoryId, ConfigError> {
        let Some(parent_node) = self.nodes.get(parent.index()) else {
            return Err(ConfigError::UnknownParent { id: parent.raw() });
        };
        if parent_node.name == name {
            return Err(ConfigError::SelfParent {
                name: name.to_owned(),
            });
        }
        if self.by_name.contains_key(name) {
            return Err(ConfigError::DuplicateCategory {
                name: name.to_owned(),
            });
        }
        Ok(self.push(name, Some(parent)))
    }

    /// Look up a category by name.
    pub fn lookup(&self, name: &str) -> Option<CategoryId> {
        self.by_name.get(name).copied()
    }

    /// The name of a registered category.
    pub fn name(&self, id: CategoryId) -> &str {
        self.nodes
            .get(id.index())
            .map_or("<unknown>", |node| node.name.as_str())
    }

    /// True iff `ancestor` is reachable from `child` by parent links
    /// (reflexive: every category is a subtype of itself).
    pub fn is_subtype(&self, child: CategoryId, ancestor: CategoryId) -> bool {
        let mut current = Some(child);
        // Bounded by tree height; parents always point at earlier nodes.
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id.index()).and_then(|node| node.parent);
        }
        false
    }

    /// Number of registered categories, built-ins included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the registry is seeded at construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
