//! Services and attendance records.
//!
//! Services live under `church-services`, attendance records under
//! `church-attendance`. The two are linked only by `(date, type)`.

pub mod stats;

pub use stats::{AttendanceStats, ServiceAttendance};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::collection::{Collection, Record};
use crate::constants::keys;
use crate::error::Result;
use crate::storage::Storage;
use crate::types::{AttendanceId, MemberId, ServiceId, ServiceType};
use crate::validation;

/// A scheduled congregational gathering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Unique id.
    pub id: ServiceId,
    /// Day of the service.
    pub date: NaiveDate,
    /// Kind of service.
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    /// Display name.
    pub name: String,
    /// Denormalized head count. Initialized to zero and never reconciled.
    #[serde(default)]
    pub total_present: u32,
    /// Denormalized membership size. Initialized to zero and never reconciled.
    #[serde(default)]
    pub total_members: u32,
}

impl Service {
    /// Create a service with a fresh id.
    pub fn new(date: NaiveDate, service_type: ServiceType, name: impl Into<String>) -> Self {
        Self {
            id: ServiceId::generate(),
            date,
            service_type,
            name: name.into(),
            total_present: 0,
            total_members: 0,
        }
    }
}

impl Record for Service {
    type Id = ServiceId;
    const KIND: &'static str = "service";

    fn id(&self) -> &ServiceId {
        &self.id
    }
}

/// Whether one member was at one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Unique id.
    pub id: AttendanceId,
    /// Member the record is about. Not checked against the directory.
    pub member_id: MemberId,
    /// Date of the service attended.
    pub service_date: NaiveDate,
    /// Type of the service attended.
    pub service_type: ServiceType,
    /// Present or absent.
    pub present: bool,
}

impl AttendanceRecord {
    /// Create a record with a fresh id.
    pub fn new(member_id: MemberId, service_date: NaiveDate, service_type: ServiceType, present: bool) -> Self {
        Self {
            id: AttendanceId::generate(),
            member_id,
            service_date,
            service_type,
            present,
        }
    }

    /// Whether this record belongs to `service`.
    pub fn matches(&self, service: &Service) -> bool {
        self.service_date == service.date && self.service_type == service.service_type
    }
}

impl Record for AttendanceRecord {
    type Id = AttendanceId;
    const KIND: &'static str = "attendance record";

    fn id(&self) -> &AttendanceId {
        &self.id
    }
}

/// Services and attendance records.
pub struct AttendanceStore<'a> {
    services: Collection<'a, Service>,
    records: Collection<'a, AttendanceRecord>,
}

impl<'a> AttendanceStore<'a> {
    /// Open both collections in `storage`.
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self {
            services: Collection::new(storage, keys::SERVICES),
            records: Collection::new(storage, keys::ATTENDANCE),
        }
    }

    /// All services in stored order.
    pub fn services(&self) -> Vec<Service> {
        self.services.all()
    }

    /// Look up a service.
    pub fn service(&self, id: &ServiceId) -> Result<Service> {
        self.services.get(id)
    }

    /// Add a service.
    pub fn add_service(&self, service: Service) -> Result<Service> {
        validation::required("name", &service.name)?;
        self.services.create(service)
    }

    /// Replace a service.
    pub fn update_service(&self, service: Service) -> Result<Service> {
        validation::required("name", &service.name)?;
        self.services.update(service)
    }

    /// Remove a service. Its attendance records are left in place.
    pub fn remove_service(&self, id: &ServiceId) -> Result<Service> {
        self.services.delete(id)
    }

    /// All attendance records in stored order.
    pub fn records(&self) -> Vec<AttendanceRecord> {
        self.records.all()
    }

    /// Records that belong to `service`.
    pub fn records_for(&self, service: &Service) -> Vec<AttendanceRecord> {
        self.records.filter(|r| r.matches(service))
    }

    /// Records for one member.
    pub fn records_for_member(&self, member_id: &MemberId) -> Vec<AttendanceRecord> {
        self.records.filter(|r| &r.member_id == member_id)
    }

    /// Mark a member present or absent at `service`.
    ///
    /// An existing record for the same member, date and type is replaced
    /// rather than duplicated.
    pub fn mark(&self, service: &Service, member_id: &MemberId, present: bool) -> Result<AttendanceRecord> {
        let existing = self
            .records
            .all()
            .into_iter()
            .find(|r| &r.member_id == member_id && r.matches(service));

        match existing {
            Some(mut record) => {
                record.present = present;
                self.records.update(record)
            }
            None => self.records.create(AttendanceRecord::new(
                member_id.clone(),
                service.date,
                service.service_type,
                present,
            )),
        }
    }

    /// Remove one attendance record.
    pub fn remove_record(&self, id: &AttendanceId) -> Result<AttendanceRecord> {
        self.records.delete(id)
    }

    /// Statistics for a congregation of `member_count`, covering the `recent` newest services.
    pub fn stats(&self, member_count: usize, recent: usize) -> AttendanceStats {
        stats::compute(member_count, &self.services(), &self.records(), recent)
    }

    /// Share of a member's records marked present.
    pub fn member_rate(&self, member_id: &MemberId) -> u32 {
        stats::member_rate(member_id, &self.records())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::storage::MemoryStorage;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_service_serializes_type_field() {
        let service = Service::new(date("2026-03-01"), ServiceType::Sunday, "Morning Worship");
        let json = serde_json::to_value(&service).unwrap();
        assert_eq!(json["type"], "sunday");
        assert_eq!(json["date"], "2026-03-01");
        assert_eq!(json["totalPresent"], 0);
    }

    #[test]
    fn test_mark_upserts_by_member_and_service() {
        let storage = MemoryStorage::new();
        let store = AttendanceStore::new(&storage);
        let service = store
            .add_service(Service::new(date("2026-03-01"), ServiceType::Sunday, "Morning Worship"))
            .unwrap();
        let ruth = MemberId::new("ruth");

        store.mark(&service, &ruth, false).unwrap();
        store.mark(&service, &ruth, true).unwrap();

        let records = store.records_for(&service);
        assert_eq!(records.len(), 1);
        assert!(records[0].present);
    }

    #[test]
    fn test_stats_through_store() {
        let storage = MemoryStorage::new();
        let store = AttendanceStore::new(&storage);
        let sunday = store
            .add_service(Service::new(date("2026-03-01"), ServiceType::Sunday, "Morning Worship"))
            .unwrap();
        store.mark(&sunday, &MemberId::new("a"), true).unwrap();
        store.mark(&sunday, &MemberId::new("b"), false).unwrap();

        let stats = store.stats(2, 5);
        assert_eq!(stats.average_attendance, 50);
        assert_eq!(stats.recent[0].recorded, 2);
        assert_eq!(store.member_rate(&MemberId::new("a")), 100);
    }

    #[test]
    fn test_service_requires_name() {
        let storage = MemoryStorage::new();
        let store = AttendanceStore::new(&storage);
        let service = Service::new(date("2026-03-01"), ServiceType::Special, " ");
        assert!(store.add_service(service).is_err());
    }
}
