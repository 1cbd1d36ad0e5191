//! Event calendar under `church-events`.
//!
//! Events are split into upcoming and past by comparing their start against
//! the current local time. There is no timezone handling.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::collection::{Collection, Record};
use crate::constants::keys;
use crate::error::Result;
use crate::storage::Storage;
use crate::types::{EventId, EventType};
use crate::validation;

/// A scheduled church event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique id.
    pub id: EventId,
    /// Title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Day of the event.
    pub date: NaiveDate,
    /// Start time.
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    /// End time.
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    /// Where it happens.
    pub venue: String,
    /// Who runs it.
    #[serde(default)]
    pub organizer: Option<String>,
    /// Category.
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    /// Expected head count. Informational only.
    #[serde(default)]
    pub capacity: Option<u32>,
}

impl Event {
    /// Create an event with a fresh id.
    pub fn new(
        title: impl Into<String>,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        venue: impl Into<String>,
    ) -> Self {
        Self {
            id: EventId::generate(),
            title: title.into(),
            description: None,
            date,
            start_time,
            end_time,
            venue: venue.into(),
            organizer: None,
            event_type: EventType::Other,
            capacity: None,
        }
    }

    /// Local date and time the event starts.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    /// Check the form fields.
    pub fn validate(&self) -> Result<()> {
        validation::required("title", &self.title)?;
        validation::required("venue", &self.venue)?;
        validation::time_range(self.start_time, self.end_time)
    }
}

impl Record for Event {
    type Id = EventId;
    const KIND: &'static str = "event";

    fn id(&self) -> &EventId {
        &self.id
    }
}

/// Events starting at or after `now`, soonest first.
pub fn upcoming(events: &[Event], now: NaiveDateTime) -> Vec<Event> {
    let mut list: Vec<Event> = events.iter().filter(|e| e.starts_at() >= now).cloned().collect();
    list.sort_by_key(Event::starts_at);
    list
}

/// Events starting before `now`, most recent first.
pub fn past(events: &[Event], now: NaiveDateTime) -> Vec<Event> {
    let mut list: Vec<Event> = events.iter().filter(|e| e.starts_at() < now).cloned().collect();
    list.sort_by(|a, b| b.starts_at().cmp(&a.starts_at()));
    list
}

/// Current local wall-clock time.
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Event calendar.
pub struct EventStore<'a> {
    records: Collection<'a, Event>,
}

impl<'a> EventStore<'a> {
    /// Open the calendar in `storage`.
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { records: Collection::new(storage, keys::EVENTS) }
    }

    /// All events in stored order.
    pub fn list(&self) -> Vec<Event> {
        self.records.all()
    }

    /// Look up an event.
    pub fn get(&self, id: &EventId) -> Result<Event> {
        self.records.get(id)
    }

    /// Validate and schedule an event.
    pub fn add(&self, event: Event) -> Result<Event> {
        event.validate()?;
        self.records.create(event)
    }

    /// Validate and replace an event.
    pub fn update(&self, event: Event) -> Result<Event> {
        event.validate()?;
        self.records.update(event)
    }

    /// Remove an event.
    pub fn remove(&self, id: &EventId) -> Result<Event> {
        self.records.delete(id)
    }

    /// Events starting at or after `now`, soonest first.
    pub fn upcoming(&self, now: NaiveDateTime) -> Vec<Event> {
        upcoming(&self.list(), now)
    }

    /// Events starting before `now`, most recent first.
    pub fn past(&self, now: NaiveDateTime) -> Vec<Event> {
        past(&self.list(), now)
    }
}

/// `HH:MM` wire format for times.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        crate::validation::parse_time("time", &raw).map_err(serde::de::Error::custom)
    }
}
