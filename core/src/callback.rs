//! Callback registry — caller-supplied predicates for `@callback(name)@`.
//!
//! An unregistered name is a configuration error surfaced immediately, not
//! a silent pass. Predicates must be side-effect-free and `Send + Sync`;
//! the engine may be invoked concurrently from independent tests.

use crate::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A caller-registered predicate over the actual value.
pub type CallbackFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Mapping from placeholder name to predicate.
///
/// # Example
///
/// ```
/// use fixmatch::{CallbackRegistry, Value};
///
/// let mut registry = CallbackRegistry::new();
/// registry.register("positive", |v: &Value| v.as_integer().is_some_and(|i| i > 0));
/// assert!(registry.get("positive").is_some());
/// assert!(registry.get("missing").is_none());
/// ```
#[derive(Default, Clone)]
pub struct CallbackRegistry {
    callbacks: HashMap<String, CallbackFn>,
}

impl CallbackRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate under the given placeholder name.
    ///
    /// Re-registering a name replaces the previous predicate.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) {
        self.callbacks.insert(name.into(), Arc::new(predicate));
    }

    /// Look up a predicate by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CallbackFn> {
        self.callbacks.get(name)
    }

    /// Registered names, sorted for deterministic error messages.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.callbacks.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns `true` if no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

// Closures are not Debug; print the registered names instead.
impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("names", &self.names())
            .finish()
    }
}
