//! Named sets of window functions.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use alphav_core::InformationTag;

use crate::function::{Builtin, WindowFunction};

/// Mapping from result name to window function.
///
/// A name may be declared without a function (or bound to a built-in name
/// that does not exist). The engine rejects such a set with
/// [`DataError::MissingCalculation`](alphav_core::DataError::MissingCalculation)
/// before computing anything. Names iterate in lexicographic order.
pub struct Calculations<T: InformationTag> {
    entries: BTreeMap<String, Option<Arc<dyn WindowFunction<T>>>>,
}

impl<T: InformationTag> Calculations<T> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) a calculation.
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: WindowFunction<T> + 'static,
    {
        self.insert(name, function);
        self
    }

    /// Adds (or replaces) a built-in calculation.
    #[must_use]
    pub fn with_builtin(mut self, name: impl Into<String>, builtin: Builtin) -> Self {
        self.entries.insert(name.into(), Some(builtin.function()));
        self
    }

    /// Adds (or replaces) a calculation.
    pub fn insert<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: WindowFunction<T> + 'static,
    {
        self.entries.insert(name.into(), Some(Arc::new(function)));
    }

    /// Binds `name` to the built-in called `function`.
    ///
    /// Unknown function names leave `name` unbound.
    pub fn insert_builtin(&mut self, name: impl Into<String>, function: &str) {
        let bound = function.parse::<Builtin>().ok().map(|b| b.function());
        self.entries.insert(name.into(), bound);
    }

    /// Declares a name with no function yet.
    pub fn declare(&mut self, name: impl Into<String>) {
        self.entries.entry(name.into()).or_insert(None);
    }

    /// Binds a function to a declared (or new) name.
    pub fn bind(&mut self, name: &str, function: Arc<dyn WindowFunction<T>>) {
        self.entries.insert(name.to_string(), Some(function));
    }

    /// Returns the number of names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no names.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the first name without a function, if any.
    #[must_use]
    pub fn first_unbound(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, f)| f.is_none())
            .map(|(name, _)| name.as_str())
    }

    /// Iterates over bound calculations in name order.
    pub fn bound(&self) -> impl Iterator<Item = (&str, &Arc<dyn WindowFunction<T>>)> {
        self.entries
            .iter()
            .filter_map(|(name, f)| f.as_ref().map(|f| (name.as_str(), f)))
    }
}

impl<T: InformationTag> Default for Calculations<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: InformationTag> Clone for Calculations<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T: InformationTag> fmt::Debug for Calculations<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(name, func)| (name, if func.is_some() { "bound" } else { "unbound" })),
            )
            .finish()
    }
}
