//! Keyword interning.
//!
//! Block and field names are interned once while parsing; every schema
//! entity stores the dense [`KeywordIndex`] instead of the string, so name
//! comparisons and the optional keyword sort are integer operations.

use std::collections::HashMap;
use std::fmt;

use crate::error::SchemaError;

/// Dense index of an interned keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeywordIndex(usize);

impl KeywordIndex {
    /// Wraps a raw index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for KeywordIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bidirectional keyword table, append-only.
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    names: Vec<String>,
    index: HashMap<String, KeywordIndex>,
}

impl KeywordTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `name`, assigning the next one on first use.
    pub fn intern(&mut self, name: &str) -> KeywordIndex {
        if let Some(&existing) = self.index.get(name) {
            return existing;
        }
        let keyword = KeywordIndex(self.names.len());
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), keyword);
        keyword
    }

    /// Looks up the index of an already interned name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<KeywordIndex> {
        self.index.get(name).copied()
    }

    /// Returns the name for an index.
    ///
    /// # Errors
    /// Returns [`SchemaError::KeywordNotFound`] for an index never assigned.
    pub fn name(&self, keyword: KeywordIndex) -> Result<&str, SchemaError> {
        self.names
            .get(keyword.0)
            .map(String::as_str)
            .ok_or(SchemaError::KeywordNotFound { index: keyword.0 })
    }

    /// Returns the number of interned keywords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates keywords in index order.
    pub fn iter(&self) -> impl Iterator<Item = (KeywordIndex, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (KeywordIndex(i), name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_keyword_is_zero() {
        let mut table = KeywordTable::new();
        assert_eq!(table.intern("AgentData"), KeywordIndex::new(0));
        assert_eq!(table.intern("AgentID"), KeywordIndex::new(1));
        assert_eq!(table.intern("AgentData"), KeywordIndex::new(0));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_name_lookup() {
        let mut table = KeywordTable::new();
        let id = table.intern("SessionID");
        assert_eq!(table.name(id).unwrap(), "SessionID");
        assert_eq!(table.lookup("SessionID"), Some(id));
        assert_eq!(table.lookup("Missing"), None);
        assert!(matches!(
            table.name(KeywordIndex::new(5)),
            Err(SchemaError::KeywordNotFound { index: 5 })
        ));
    }

    #[test]
    fn test_iter_in_index_order() {
        let mut table = KeywordTable::new();
        for name in ["c", "a", "b"] {
            table.intern(name);
        }
        let names: Vec<_> = table.iter().map(|(_, name)| name).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    proptest! {
        #[test]
        fn prop_interning_is_stable(names in proptest::collection::vec("[A-Za-z]{1,8}", 1..32)) {
            let mut table = KeywordTable::new();
            let first: Vec<_> = names.iter().map(|n| table.intern(n)).collect();
            let second: Vec<_> = names.iter().map(|n| table.intern(n)).collect();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first[0], KeywordIndex::new(0));
            for (name, keyword) in names.iter().zip(&first) {
                prop_assert_eq!(table.name(*keyword).unwrap(), name.as_str());
            }
        }
    }
}
