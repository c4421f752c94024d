//! Symbol interning for variable names.
//!
//! Claim formulas refer to variables by `SymbolId` rather than inline
//! strings. All names are stored once; interning the same name twice
//! yields the same id, so symbol identity is an integer comparison
//! during substitution and free-variable checks.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};

/// Unique identifier for an interned symbol (variable name).
///
/// Using usize for direct Vec indexing without casts.
pub type SymbolId = usize;

/// Symbol table for interning variable names.
///
/// # Design
/// - `strings`: canonical storage, indexed by SymbolId
/// - `lookup`: reverse map for O(1) intern check
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    /// Canonical string storage (SymbolId = index)
    strings: Vec<String>,
    /// Reverse lookup: string → SymbolId
    lookup: HashMap<String, SymbolId>,
}

impl SymbolTable {
    /// Create a new empty symbol table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its SymbolId.
    ///
    /// If the string is already interned, returns the existing id.
    /// Otherwise, stores it and returns a new id.
    pub fn intern(&mut self, s: &str) -> SymbolId {
        if let Some(&id) = self.lookup.get(s) {
            return id;
        }

        let id = self.strings.len();
        let owned = s.to_string();
        self.strings.push(owned.clone());
        self.lookup.insert(owned, id);
        id
    }

    /// Resolve a SymbolId back to its string.
    ///
    /// # Panics
    /// Panics if id is invalid (out of bounds).
    #[inline]
    pub fn resolve(&self, id: SymbolId) -> &str {
        &self.strings[id]
    }

    /// Get id for a string if it exists, without interning.
    #[inline]
    pub fn get_id(&self, s: &str) -> Option<SymbolId> {
        self.lookup.get(s).copied()
    }

    /// Number of interned symbols.
    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

// =============================================================================
// Process-wide interner
// =============================================================================

/// The process-wide table behind [`intern`]/[`resolve`].
///
/// Read-mostly; the mutex is the extent of its thread-safety guarantee.
fn table() -> &'static Mutex<SymbolTable> {
    static TABLE: OnceLock<Mutex<SymbolTable>> = OnceLock::new();
    TABLE.get_or_init(|| Mutex::new(SymbolTable::new()))
}

/// Intern `name` in the process-wide table. Same name, same id.
pub fn intern(name: &str) -> SymbolId {
    table()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .intern(name)
}

/// Resolve an id interned via [`intern`] back to its name.
///
/// # Panics
/// Panics if `id` was never returned by [`intern`].
pub fn resolve(id: SymbolId) -> String {
    table()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .resolve(id)
        .to_string()
}

/// Id for `name` if it has been interned, without interning it.
pub fn lookup(name: &str) -> Option<SymbolId> {
    table()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_id(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_same_id() {
        let mut t = SymbolTable::new();
        let a = t.intern("x");
        let b = t.intern("x");
        assert_eq!(a, b);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_distinct_names_distinct_ids() {
        let mut t = SymbolTable::new();
        let a = t.intern("x");
        let b = t.intern("y");
        assert_ne!(a, b);
        assert_eq!(t.resolve(a), "x");
        assert_eq!(t.resolve(b), "y");
    }

    #[test]
    fn test_get_id_does_not_intern() {
        let mut t = SymbolTable::new();
        assert_eq!(t.get_id("z"), None);
        let id = t.intern("z");
        assert_eq!(t.get_id("z"), Some(id));
    }

    #[test]
    fn test_process_wide_identity() {
        let a = intern("claim_ast::symbol::tests::unique");
        let b = intern("claim_ast::symbol::tests::unique");
        assert_eq!(a, b);
        assert_eq!(resolve(a), "claim_ast::symbol::tests::unique");
    }
}
