//! Insertion-ordered lookup tables for brands and categories.

use std::collections::HashMap;

/// Map from value id to an entry, iterated in first-insertion order.
///
/// Re-inserting an id replaces its entry but keeps its position.
#[derive(Debug, Clone)]
pub struct LookupTable<V> {
    index: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V> Default for LookupTable<V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<V> LookupTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Returns true when the id is new.
    pub fn upsert(&mut self, id: impl Into<String>, value: V) -> bool {
        let id = id.into();
        match self.index.get(&id) {
            Some(&position) => {
                self.entries[position].1 = value;
                false
            }
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, value));
                true
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&V> {
        self.index.get(id).map(|&position| &self.entries[position].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(id, value)| (id.as_str(), value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub name: String,
    pub parent_id: Option<String>,
}

impl CategoryEntry {
    pub fn new(name: impl Into<String>, parent_id: Option<String>) -> Self {
        Self {
            name: name.into(),
            parent_id,
        }
    }
}

/// Brand id to display name.
pub type BrandTable = LookupTable<String>;

/// Category id to name and parent.
pub type CategoryTable = LookupTable<CategoryEntry>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reinsert_overwrites_in_place() {
        let mut brands = BrandTable::new();
        assert!(brands.upsert("b1", "Acme".to_string()));
        assert!(brands.upsert("b2", "Globex".to_string()));
        assert!(!brands.upsert("b1", "Acme Corp".to_string()));

        let entries: Vec<_> = brands.iter().collect();
        assert_eq!(
            entries,
            vec![("b1", &"Acme Corp".to_string()), ("b2", &"Globex".to_string())]
        );
        assert_eq!(brands.len(), 2);
    }
}
