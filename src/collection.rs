use crate::objects::Table;
use crate::table_loader;
use crate::Error;
use chrono::Utc;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Objects stored in reading order, grouped by a key
///
/// The objects live in one `Vec` and each group only holds positions in it.
/// Nothing is ever removed or moved, so positions stay valid and both the
/// collection and every group keep the insertion order.
pub struct GroupedCollection<T> {
    storage: Vec<T>,
    groups: HashMap<String, Vec<usize>>,
    key: fn(&T) -> &str,
}

impl<T> GroupedCollection<T> {
    /// Creates an empty collection grouping the objects by `key`
    pub fn new(key: fn(&T) -> &str) -> Self {
        Self {
            storage: Vec::new(),
            groups: HashMap::new(),
            key,
        }
    }

    /// Creates an empty collection with room for `capacity` objects
    pub fn with_capacity(key: fn(&T) -> &str, capacity: usize) -> Self {
        Self {
            storage: Vec::with_capacity(capacity),
            groups: HashMap::new(),
            key,
        }
    }

    /// Builds the collection from objects in their reading order
    pub fn from_objects<I: IntoIterator<Item = T>>(key: fn(&T) -> &str, iter: I) -> Self {
        let iter = iter.into_iter();
        let mut c = Self::with_capacity(key, iter.size_hint().0);
        for o in iter {
            c.push(o);
        }
        c
    }

    /// Appends an object at the end of the collection and of its group
    ///
    /// Duplicates are kept. Returns the position of the object.
    pub fn push(&mut self, o: T) -> usize {
        let index = self.storage.len();
        let key = (self.key)(&o);
        match self.groups.get_mut(key) {
            Some(group) => group.push(index),
            None => {
                self.groups.insert(key.to_owned(), vec![index]);
            }
        }
        self.storage.push(o);
        index
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.storage.get(index)
    }

    /// Iterates over the objects sharing the `key`, in insertion order
    ///
    /// An unknown key gives an empty iterator.
    pub fn group<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a T> + 'a {
        self.groups
            .get(key)
            .map(|g| g.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |i| &self.storage[*i])
    }

    /// Number of distinct keys
    pub fn nb_groups(&self) -> usize {
        self.groups.len()
    }

    /// Distinct keys, in the order they were first seen
    pub fn keys(&self) -> Vec<&str> {
        let mut firsts: Vec<(usize, &str)> = self
            .groups
            .iter()
            .map(|(k, g)| (g[0], k.as_str()))
            .collect();
        firsts.sort_unstable();
        firsts.into_iter().map(|(_, k)| k).collect()
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Iterates over all the objects, in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.storage.iter()
    }
}

impl<T: Table> GroupedCollection<T> {
    /// Reads a whole table, grouping its rows by `key`
    ///
    /// Fails without building anything if the header of the table does not match [Table::HEADERS].
    pub fn read_from<R: Read>(
        reader: R,
        file_name: &str,
        key: fn(&T) -> &str,
    ) -> Result<Self, Error> {
        let now = Utc::now();
        let mut c = Self::new(key);
        table_loader::read_table(reader, file_name, T::HEADERS, |row, _| {
            c.push(row.deserialize()?);
            Ok(())
        })?;
        log::info!(
            "parsed {} rows of {} ({} groups) in {} ms",
            c.len(),
            file_name,
            c.nb_groups(),
            Utc::now().signed_duration_since(now).num_milliseconds()
        );
        Ok(c)
    }

    /// Opens and reads a whole table, see [GroupedCollection::read_from]
    pub fn from_path<P: AsRef<Path>>(path: P, key: fn(&T) -> &str) -> Result<Self, Error> {
        let (file, file_name) = table_loader::open_table(path)?;
        Self::read_from(file, &file_name, key)
    }
}

impl<T> std::fmt::Debug for GroupedCollection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupedCollection")
            .field("len", &self.storage.len())
            .field("nb_groups", &self.groups.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_letter(s: &String) -> &str {
        &s[..1]
    }

    #[test]
    fn groups_keep_insertion_order() {
        let words = ["banana", "apple", "blueberry", "avocado", "cherry", "banana"];
        let c =
            GroupedCollection::from_objects(first_letter, words.iter().map(|w| w.to_string()));

        assert_eq!(6, c.len());
        assert_eq!(3, c.nb_groups());
        assert_eq!(
            vec!["banana", "blueberry", "banana"],
            c.group("b").collect::<Vec<_>>()
        );
        assert_eq!(vec!["apple", "avocado"], c.group("a").collect::<Vec<_>>());
        assert_eq!(vec!["b", "a", "c"], c.keys());
        assert_eq!(Some(&"avocado".to_owned()), c.get(3));
    }

    #[test]
    fn unknown_group() {
        let c = GroupedCollection::from_objects(first_letter, vec!["x".to_owned()]);
        assert_eq!(0, c.group("y").count());
        assert_eq!(vec!["x"], c.keys());
    }

    #[test]
    fn from_objects_reserves_room() {
        let words: Vec<String> = (0..10).map(|i| format!("w{}", i)).collect();
        let c = GroupedCollection::from_objects(first_letter, words);
        assert!(c.storage.capacity() >= 10);
        assert_eq!(10, c.group("w").count());
    }

    #[test]
    fn push_returns_position() {
        let mut c = GroupedCollection::with_capacity(first_letter, 2);
        assert!(c.is_empty());
        assert_eq!(0, c.push("one".to_owned()));
        assert_eq!(1, c.push("two".to_owned()));
        assert_eq!(vec!["one", "two"], c.iter().collect::<Vec<_>>());
    }
}
