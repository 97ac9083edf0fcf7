//! Macro definition table
//!
//! Stores object-like macro definitions for one preprocessing run. A
//! definition with no value means "defined, empty replacement" (used for
//! calling-convention macros like `GLFWAPI` that must vanish from the
//! output). Tables are cloned per composition and never shared mutably.

use std::collections::HashMap;

use glfwgen_core::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static IDENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// A single macro definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDefinition {
    pub name: String,
    /// `None` = defined with empty replacement
    pub value: Option<String>,
}

impl MacroDefinition {
    /// Create a macro that is simply defined (empty replacement)
    pub fn defined(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: None,
        }
    }

    /// Create a macro with a replacement value
    pub fn with_value(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }
}

/// Mutable mapping from macro name to definition
///
/// Redefinition silently overwrites; strictness about conflicting
/// redefinitions is a policy of the [engine](crate::engine::Preprocessor),
/// not of the table.
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    defs: HashMap<String, Option<String>>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a macro, overwriting any existing definition
    ///
    /// Fails with [`Error::InvalidName`] if `name` is empty or not C
    /// identifier syntax.
    pub fn define(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        if !IDENT_RE.is_match(name) {
            return Err(Error::InvalidName(name.to_string()));
        }
        self.defs.insert(name.to_string(), value.map(str::to_string));
        Ok(())
    }

    /// Remove a definition; absent names are not an error
    pub fn undefine(&mut self, name: &str) {
        self.defs.remove(name);
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    /// Replacement text for a defined macro
    ///
    /// Outer `None` = not defined; inner `None` = defined with empty
    /// replacement.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.defs.get(name).map(|v| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl FromIterator<MacroDefinition> for MacroTable {
    fn from_iter<I: IntoIterator<Item = MacroDefinition>>(iter: I) -> Self {
        let mut table = MacroTable::new();
        for def in iter {
            table.defs.insert(def.name, def.value);
        }
        table
    }
}
