//! Include fragment table
//!
//! `#include` directives never touch the filesystem. Instead, each include
//! name resolves against this table of synthetic stand-in text (typedefs a
//! real system header would supply). An unregistered name resolves to
//! empty text rather than an error: a header not registered for the
//! selected platform simply is not needed.

use std::collections::HashMap;

use tracing::trace;

/// Mapping from include identifier (e.g. `"windows.h"`) to literal
/// replacement text
#[derive(Debug, Clone, Default)]
pub struct FragmentTable {
    entries: HashMap<String, String>,
}

impl FragmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register replacement text for an include name
    ///
    /// Repeat registration overwrites: a later, more specific platform
    /// rule may replace an earlier generic stub.
    pub fn add(&mut self, name: &str, text: &str) {
        self.entries.insert(name.to_string(), text.to_string());
    }

    /// Replacement text for an include name, empty if unregistered
    pub fn resolve(&self, name: &str) -> &str {
        match self.entries.get(name) {
            Some(text) => text,
            None => {
                trace!("no fragment registered for {name:?}, splicing empty text");
                ""
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}
