//! Generic persisted record list.
//!
//! Each collection is a JSON array under one storage key. Every operation
//! reads the whole list, applies the change and writes it back: create
//! appends, update replaces the full object in place, delete filters.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use std::marker::PhantomData;

use crate::error::{Error, Result};
use crate::storage::{self, Storage};

/// A record that can live in a [`Collection`].
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Identifier type of this record.
    type Id: PartialEq + Display + Clone;

    /// Human-readable record kind for error messages.
    const KIND: &'static str;

    /// The record's unique id.
    fn id(&self) -> &Self::Id;
}

/// A list of records persisted under a fixed storage key.
pub struct Collection<'a, T> {
    storage: &'a dyn Storage,
    key: &'static str,
    _marker: PhantomData<T>,
}

impl<'a, T: Record> Collection<'a, T> {
    /// Bind a collection to `key` in `storage`.
    pub fn new(storage: &'a dyn Storage, key: &'static str) -> Self {
        Self { storage, key, _marker: PhantomData }
    }

    /// All records in stored order.
    pub fn all(&self) -> Vec<T> {
        storage::load_list(self.storage, self.key)
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.all().len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.all().is_empty()
    }

    /// Look up a record by id.
    pub fn get(&self, id: &T::Id) -> Result<T> {
        self.all()
            .into_iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| Error::not_found(T::KIND, id))
    }

    /// Records matching `pred`, in stored order.
    pub fn filter<F>(&self, pred: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.all().into_iter().filter(|r| pred(r)).collect()
    }

    /// Append a new record. Fails if its id is already taken.
    pub fn create(&self, record: T) -> Result<T> {
        let mut records = self.all();
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(Error::validation("id", format!("{} {} already exists", T::KIND, record.id())));
        }
        records.push(record.clone());
        self.save(&records)?;
        tracing::info!("Created {} {}", T::KIND, record.id());
        Ok(record)
    }

    /// Replace the stored record that has the same id.
    pub fn update(&self, record: T) -> Result<T> {
        let mut records = self.all();
        let slot = records
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| Error::not_found(T::KIND, record.id()))?;
        *slot = record.clone();
        self.save(&records)?;
        tracing::info!("Updated {} {}", T::KIND, record.id());
        Ok(record)
    }

    /// Remove the record with `id`, returning it.
    pub fn delete(&self, id: &T::Id) -> Result<T> {
        let records = self.all();
        let (removed, kept): (Vec<T>, Vec<T>) = records.into_iter().partition(|r| r.id() == id);
        let removed = removed
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(T::KIND, id))?;
        self.save(&kept)?;
        tracing::info!("Deleted {} {}", T::KIND, id);
        Ok(removed)
    }

    fn save(&self, records: &[T]) -> Result<()> {
        storage::save_json(self.storage, self.key, records)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::storage::MemoryStorage;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        text: String,
    }

    impl Record for Note {
        type Id = String;
        const KIND: &'static str = "note";

        fn id(&self) -> &String {
            &self.id
        }
    }

    fn note(id: &str, text: &str) -> Note {
        Note { id: id.to_string(), text: text.to_string() }
    }

    #[test]
    fn test_create_and_get() {
        let storage = MemoryStorage::new();
        let notes = Collection::<Note>::new(&storage, "notes");

        notes.create(note("1", "first")).unwrap();
        assert_eq!(notes.get(&"1".to_string()).unwrap().text, "first");
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn test_create_rejects_duplicate_id() {
        let storage = MemoryStorage::new();
        let notes = Collection::<Note>::new(&storage, "notes");

        notes.create(note("1", "first")).unwrap();
        let err = notes.create(note("1", "again")).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "id", .. }));
    }

    #[test]
    fn test_update_replaces_whole_record() {
        let storage = MemoryStorage::new();
        let notes = Collection::<Note>::new(&storage, "notes");

        notes.create(note("1", "first")).unwrap();
        notes.create(note("2", "second")).unwrap();
        notes.update(note("1", "edited")).unwrap();

        let all = notes.all();
        assert_eq!(all, vec![note("1", "edited"), note("2", "second")]);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let storage = MemoryStorage::new();
        let notes = Collection::<Note>::new(&storage, "notes");
        assert!(matches!(notes.update(note("9", "x")), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_delete_filters_record_out() {
        let storage = MemoryStorage::new();
        let notes = Collection::<Note>::new(&storage, "notes");

        notes.create(note("1", "first")).unwrap();
        notes.create(note("2", "second")).unwrap();

        let removed = notes.delete(&"1".to_string()).unwrap();
        assert_eq!(removed.text, "first");
        assert_eq!(notes.all(), vec![note("2", "second")]);
        assert!(notes.delete(&"1".to_string()).is_err());
    }
}
