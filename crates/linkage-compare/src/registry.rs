//! Comparator registry.
//!
//! Maps normalized comparator names to [`Comparator`] implementations. A
//! registry is populated during configuration and then shared read-only by
//! the matching engine.
//!
//! # Example
//!
//! ```ignore
//! use linkage_compare::{ComparatorRegistry, default_registry};
//!
//! let registry = default_registry();
//! let comparison = registry.evaluate("ratio", &left, &right, None, &params)?;
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use linkage_model::{FieldValue, LinkageError, Params, Result};

use crate::builtin::register_builtins;
use crate::comparator::{Comparator, Comparison, ComparisonContext};

struct Entry {
    comparator: Box<dyn Comparator>,
    description: Option<String>,
}

/// Registry of comparators indexed by lower-cased, trimmed name.
///
/// # Thread Safety
///
/// Every comparator is `Send + Sync`, so a populated registry can be
/// shared across threads by reference. The default registry is cached
/// using [`OnceLock`].
#[derive(Default)]
pub struct ComparatorRegistry {
    entries: BTreeMap<String, Entry>,
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl ComparatorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in comparator.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        register_builtins(&mut registry);
        registry
    }

    /// Registers a comparator under a normalized name.
    ///
    /// An existing entry under the same name is replaced. The optional
    /// description overrides [`Comparator::description`] in listings.
    ///
    /// # Errors
    ///
    /// Returns [`LinkageError::InvalidComparatorName`] if the name is empty
    /// after trimming.
    pub fn register<C>(&mut self, name: &str, comparator: C, description: Option<&str>) -> Result<()>
    where
        C: Comparator + 'static,
    {
        let key = normalize_name(name);
        if key.is_empty() {
            return Err(LinkageError::InvalidComparatorName);
        }
        self.entries.insert(
            key,
            Entry {
                comparator: Box::new(comparator),
                description: description.map(str::to_string),
            },
        );
        Ok(())
    }

    /// Registers a built-in under a name known to be valid.
    pub(crate) fn insert_boxed(&mut self, name: &str, comparator: Box<dyn Comparator>) {
        self.entries.insert(
            normalize_name(name),
            Entry {
                comparator,
                description: None,
            },
        );
    }

    /// Looks up a comparator by name.
    ///
    /// # Errors
    ///
    /// Returns [`LinkageError::ComparatorNotFound`] carrying the sorted list
    /// of registered names.
    pub fn get(&self, name: &str) -> Result<&dyn Comparator> {
        let key = normalize_name(name);
        self.entries
            .get(&key)
            .map(|entry| entry.comparator.as_ref())
            .ok_or_else(|| LinkageError::ComparatorNotFound {
                name: key,
                available: self.names().into_iter().map(str::to_string).collect(),
            })
    }

    /// Looks up and invokes a comparator.
    ///
    /// The comparison is returned as produced; scores are not clamped.
    pub fn evaluate(
        &self,
        name: &str,
        left: &FieldValue,
        right: &FieldValue,
        context: Option<&ComparisonContext<'_>>,
        params: &Params,
    ) -> Result<Comparison> {
        let comparator = self.get(name)?;
        Ok(comparator.compare(left, right, context, params))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Description for a registered name: the one given at registration,
    /// else the comparator's own.
    pub fn describe(&self, name: &str) -> Option<&str> {
        self.entries.get(&normalize_name(name)).map(|entry| {
            entry
                .description
                .as_deref()
                .unwrap_or_else(|| entry.comparator.description())
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize_name(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ComparatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparatorRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Cached registry holding the built-in comparators.
static DEFAULT_REGISTRY: OnceLock<ComparatorRegistry> = OnceLock::new();

/// Returns the process-wide registry of built-in comparators.
///
/// Built on first access and read-only afterwards. Callers that need
/// custom comparators build their own [`ComparatorRegistry`].
pub fn default_registry() -> &'static ComparatorRegistry {
    DEFAULT_REGISTRY.get_or_init(ComparatorRegistry::with_builtins)
}
