//! Sermon archive under `church-sermons`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::collection::{Collection, Record};
use crate::constants::keys;
use crate::error::Result;
use crate::storage::Storage;
use crate::types::{MediaType, SermonId};
use crate::validation;

/// Metadata for one preached sermon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sermon {
    /// Unique id.
    pub id: SermonId,
    /// Title.
    pub title: String,
    /// Who preached it.
    pub preacher: String,
    /// Date preached.
    pub date: NaiveDate,
    /// Link to the recording.
    #[serde(default)]
    pub media_url: Option<String>,
    /// Recording format.
    #[serde(default)]
    pub media_type: MediaType,
    /// Running time as entered, e.g. `42:10`.
    #[serde(default)]
    pub duration: Option<String>,
    /// Series the sermon belongs to.
    #[serde(default)]
    pub series: Option<String>,
    /// Topic tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Summary.
    #[serde(default)]
    pub description: Option<String>,
}

impl Sermon {
    /// Create a sermon with a fresh id.
    pub fn new(title: impl Into<String>, preacher: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: SermonId::generate(),
            title: title.into(),
            preacher: preacher.into(),
            date,
            media_url: None,
            media_type: MediaType::Audio,
            duration: None,
            series: None,
            tags: Vec::new(),
            description: None,
        }
    }

    /// Check the form fields.
    pub fn validate(&self) -> Result<()> {
        validation::required("title", &self.title)?;
        validation::required("preacher", &self.preacher)
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

impl Record for Sermon {
    type Id = SermonId;
    const KIND: &'static str = "sermon";

    fn id(&self) -> &SermonId {
        &self.id
    }
}

/// Sermon archive.
pub struct SermonStore<'a> {
    records: Collection<'a, Sermon>,
}

impl<'a> SermonStore<'a> {
    /// Open the archive in `storage`.
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { records: Collection::new(storage, keys::SERMONS) }
    }

    /// All sermons, newest first.
    pub fn list(&self) -> Vec<Sermon> {
        newest_first(self.records.all())
    }

    /// Look up a sermon.
    pub fn get(&self, id: &SermonId) -> Result<Sermon> {
        self.records.get(id)
    }

    /// Validate and archive a sermon.
    pub fn add(&self, sermon: Sermon) -> Result<Sermon> {
        sermon.validate()?;
        self.records.create(sermon)
    }

    /// Validate and replace a sermon.
    pub fn update(&self, sermon: Sermon) -> Result<Sermon> {
        sermon.validate()?;
        self.records.update(sermon)
    }

    /// Remove a sermon.
    pub fn remove(&self, id: &SermonId) -> Result<Sermon> {
        self.records.delete(id)
    }

    /// Sermons in `series`, newest first.
    pub fn by_series(&self, series: &str) -> Vec<Sermon> {
        newest_first(self.records.filter(|s| {
            s.series.as_deref().is_some_and(|name| name.eq_ignore_ascii_case(series))
        }))
    }

    /// Sermons by `preacher`, newest first.
    pub fn by_preacher(&self, preacher: &str) -> Vec<Sermon> {
        newest_first(self.records.filter(|s| s.preacher.eq_ignore_ascii_case(preacher)))
    }

    /// Sermons tagged `tag`, newest first.
    pub fn by_tag(&self, tag: &str) -> Vec<Sermon> {
        newest_first(self.records.filter(|s| s.has_tag(tag)))
    }

    /// Every series name in use, sorted.
    pub fn series(&self) -> Vec<String> {
        self.records
            .all()
            .into_iter()
            .filter_map(|s| s.series)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn newest_first(mut sermons: Vec<Sermon>) -> Vec<Sermon> {
    sermons.sort_by(|a, b| b.date.cmp(&a.date));
    sermons
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::storage::MemoryStorage;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn seeded(storage: &MemoryStorage) -> SermonStore<'_> {
        let store = SermonStore::new(storage);

        let mut a = Sermon::new("Salt and Light", "Pastor Ann", date("2026-01-11"));
        a.series = Some("Sermon on the Mount".to_string());
        a.tags = vec!["discipleship".to_string()];
        let mut b = Sermon::new("The Beatitudes", "Pastor Ann", date("2026-01-04"));
        b.series = Some("Sermon on the Mount".to_string());
        let mut c = Sermon::new("Ruth and Naomi", "Elder Joe", date("2026-02-01"));
        c.series = Some("Ruth".to_string());
        c.tags = vec!["Discipleship".to_string(), "loyalty".to_string()];
        c.media_type = MediaType::Video;

        for s in [a, b, c] {
            store.add(s).unwrap();
        }
        store
    }

    #[test]
    fn test_list_newest_first() {
        let storage = MemoryStorage::new();
        let store = seeded(&storage);
        let titles: Vec<String> = store.list().into_iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Ruth and Naomi", "Salt and Light", "The Beatitudes"]);
    }

    #[test]
    fn test_filters() {
        let storage = MemoryStorage::new();
        let store = seeded(&storage);

        assert_eq!(store.by_series("sermon on the mount").len(), 2);
        assert_eq!(store.by_preacher("Elder Joe").len(), 1);
        assert_eq!(store.by_tag("discipleship").len(), 2);
        assert_eq!(store.series(), vec!["Ruth", "Sermon on the Mount"]);
    }

    #[test]
    fn test_requires_preacher() {
        let storage = MemoryStorage::new();
        let store = SermonStore::new(&storage);
        assert!(store.add(Sermon::new("Untitled", "", date("2026-01-01"))).is_err());
    }

    #[test]
    fn test_wire_format() {
        let mut sermon = Sermon::new("Grace", "Pastor Ann", date("2026-03-01"));
        sermon.media_url = Some("https://example.org/grace.mp3".to_string());
        let json = serde_json::to_value(&sermon).unwrap();
        assert_eq!(json["mediaUrl"], "https://example.org/grace.mp3");
        assert_eq!(json["mediaType"], "audio");
    }
}
