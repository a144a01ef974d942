//! String interner for identifiers and string literals.
//!
//! Provides O(1) interning and lookup. Interned strings are leaked to get a
//! `'static` lifetime, so `lookup` hands out plain `&'static str`s that
//! outlive any lock guard.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::Name;

/// Storage for interned strings.
struct InternTable {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by `Name`.
    strings: Vec<&'static str>,
}

/// Interner for identifiers and literal text.
///
/// Shared by the lexer, parser, resolver, and the driver. Interior
/// mutability lets every phase intern through a shared reference.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned.
    pub fn new() -> Self {
        let empty: &'static str = "";
        let mut map = FxHashMap::default();
        map.insert(empty, 0);
        StringInterner {
            table: RwLock::new(InternTable {
                map,
                strings: vec![empty],
            }),
        }
    }

    /// Intern a string, returning its Name.
    pub fn intern(&self, s: &str) -> Name {
        if let Some(&index) = self.table.read().map.get(s) {
            return Name::from_raw(index);
        }

        let mut guard = self.table.write();
        // Double-check after acquiring write lock
        if let Some(&index) = guard.map.get(s) {
            return Name::from_raw(index);
        }

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let index = u32::try_from(guard.strings.len())
            .unwrap_or_else(|_| panic!("string interner exceeded u32::MAX entries"));
        guard.strings.push(leaked);
        guard.map.insert(leaked, index);
        Name::from_raw(index)
    }

    /// Look up the string for a Name.
    ///
    /// Unknown names (from a different interner) resolve to the empty string.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    /// Look up a string without interning it.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().map.get(s).map(|&index| Name::from_raw(index))
    }

    /// Number of interned strings (including the empty string).
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// The interner always holds at least the empty string.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
