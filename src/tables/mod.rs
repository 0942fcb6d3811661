//! Symbol tables: layers, line types and text styles

use crate::types::Handle;
use indexmap::IndexMap;

pub mod layer;
pub mod linetype;
pub mod textstyle;

pub use layer::{Layer, LayerFlags, LayerState};
pub use linetype::{LineType, LineTypeElement};
pub use textstyle::{TextStyle, TextStyleFlags};

/// Base trait for all table entries
pub trait TableEntry {
    /// Get the entry's handle, if the file gave one
    fn handle(&self) -> Option<Handle>;

    /// Get the entry's name
    fn name(&self) -> &str;
}

/// Generic table for storing named entries
///
/// Entries keep insertion order; lookups ignore case.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T: TableEntry> {
    entries: IndexMap<String, T>,
}

impl<T: TableEntry> Table<T> {
    /// Create a new empty table
    pub fn new() -> Self {
        Table {
            entries: IndexMap::new(),
        }
    }

    /// Add an entry, failing if the name is taken
    pub fn add(&mut self, entry: T) -> Result<(), String> {
        let name = entry.name().to_uppercase();
        if self.entries.contains_key(&name) {
            return Err(format!("Entry '{}' already exists in table", entry.name()));
        }
        self.entries.insert(name, entry);
        Ok(())
    }

    /// Insert an entry, replacing any entry with the same name
    ///
    /// A replaced entry keeps its original position.
    pub fn insert(&mut self, entry: T) -> Option<T> {
        self.entries.insert(entry.name().to_uppercase(), entry)
    }

    /// Get an entry by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(&name.to_uppercase())
    }

    /// Get a mutable entry by name (case-insensitive)
    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries.get_mut(&name.to_uppercase())
    }

    /// Check if an entry exists (case-insensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_uppercase())
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Iterate over all entries mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.values_mut()
    }

    /// Get all entry names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.name())
    }
}

impl<T: TableEntry> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct MockEntry {
        name: String,
        value: i32,
    }

    impl TableEntry for MockEntry {
        fn handle(&self) -> Option<Handle> {
            None
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn entry(name: &str, value: i32) -> MockEntry {
        MockEntry {
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn test_table_add_and_get() {
        let mut table = Table::new();
        assert!(table.add(entry("Test", 1)).is_ok());
        assert!(table.contains("Test"));
        assert!(table.contains("test"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_table_duplicate_add_fails() {
        let mut table = Table::new();
        assert!(table.add(entry("Test", 1)).is_ok());
        assert!(table.add(entry("TEST", 2)).is_err());
        assert_eq!(table.get("test").map(|e| e.value), Some(1));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut table = Table::new();
        table.insert(entry("A", 1));
        table.insert(entry("B", 2));
        let old = table.insert(entry("a", 3));
        assert_eq!(old.map(|e| e.value), Some(1));
        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, vec!["a", "B"]);
        assert_eq!(table.get("A").map(|e| e.value), Some(3));
    }
}
