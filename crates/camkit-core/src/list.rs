//! Ordered name/value list used for folder and file listings.

/// One listing entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEntry {
    /// Folder or file name.
    pub name: String,
    /// Driver-defined value; usually empty.
    pub value: String,
}

/// Ordered sequence of name/value entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CameraList {
    entries: Vec<ListEntry>,
}

impl CameraList {
    /// Empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry at the end.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push(ListEntry {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Number of entries.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ListEntry> {
        self.entries.get(index)
    }

    /// Name of the entry at `index`.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.name.as_str())
    }

    /// Every entry name, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Iterate over entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ListEntry> {
        self.entries.iter()
    }

    /// Mutable access for reordering or editing entries.
    pub fn entries_mut(&mut self) -> &mut Vec<ListEntry> {
        &mut self.entries
    }
}

impl<'a> IntoIterator for &'a CameraList {
    type Item = &'a ListEntry;
    type IntoIter = std::slice::Iter<'a, ListEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_reset() {
        let mut list = CameraList::new();
        list.append("b", "");
        list.append("a", "1");
        assert_eq!(list.count(), 2);
        assert_eq!(list.names(), vec!["b", "a"]);
        assert_eq!(list.get(1).map(|e| e.value.as_str()), Some("1"));

        list.reset();
        assert!(list.is_empty());
        assert_eq!(list.name(0), None);
    }
}
