//! Attendance aggregation.
//!
//! Pure functions over the full service and record lists. Records are tied to
//! a service by matching `(date, type)`, not by a stored reference.

use chrono::NaiveDate;
use serde::Serialize;

use super::{AttendanceRecord, Service};
use crate::types::{MemberId, ServiceId, ServiceType};

/// Headline attendance figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    /// Number of services on record.
    pub total_services: usize,
    /// Number of records marked present, across all services.
    pub present_count: usize,
    /// `present / (services * members)` as a whole percentage.
    pub average_attendance: u32,
    /// The most recent services, newest first.
    pub recent: Vec<ServiceAttendance>,
}

/// Attendance for one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAttendance {
    /// The service.
    pub service_id: ServiceId,
    /// Service date.
    pub date: NaiveDate,
    /// Service type.
    pub service_type: ServiceType,
    /// Display name.
    pub name: String,
    /// Records marked present.
    pub present: usize,
    /// Records taken, present or not.
    pub recorded: usize,
    /// `present / members` as a whole percentage.
    pub rate: u32,
}

/// Whole-number percentage `numer / denom`, rounded half up. Zero when `denom` is zero.
pub fn percent(numer: usize, denom: usize) -> u32 {
    if denom == 0 {
        return 0;
    }
    let numer = numer as u128;
    let denom = denom as u128;
    let rounded = (200 * numer + denom) / (2 * denom);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Average attendance across every service for a congregation of `member_count`.
pub fn average_attendance(member_count: usize, services: &[Service], records: &[AttendanceRecord]) -> u32 {
    let present = records.iter().filter(|r| r.present).count();
    percent(present, services.len().saturating_mul(member_count))
}

/// Attendance for one service, counted from records matching its date and type.
pub fn service_attendance(service: &Service, records: &[AttendanceRecord], member_count: usize) -> ServiceAttendance {
    let matching: Vec<&AttendanceRecord> = records.iter().filter(|r| r.matches(service)).collect();
    let present = matching.iter().filter(|r| r.present).count();

    ServiceAttendance {
        service_id: service.id.clone(),
        date: service.date,
        service_type: service.service_type,
        name: service.name.clone(),
        present,
        recorded: matching.len(),
        rate: percent(present, member_count),
    }
}

/// The `limit` most recent services, newest first, with their attendance.
pub fn recent_attendance(
    services: &[Service],
    records: &[AttendanceRecord],
    member_count: usize,
    limit: usize,
) -> Vec<ServiceAttendance> {
    let mut sorted: Vec<&Service> = services.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    sorted
        .into_iter()
        .take(limit)
        .map(|service| service_attendance(service, records, member_count))
        .collect()
}

/// Full statistics recomputed from scratch.
pub fn compute(
    member_count: usize,
    services: &[Service],
    records: &[AttendanceRecord],
    recent_limit: usize,
) -> AttendanceStats {
    AttendanceStats {
        total_services: services.len(),
        present_count: records.iter().filter(|r| r.present).count(),
        average_attendance: average_attendance(member_count, services, records),
        recent: recent_attendance(services, records, member_count, recent_limit),
    }
}

/// Share of a member's records marked present.
pub fn member_rate(member_id: &MemberId, records: &[AttendanceRecord]) -> u32 {
    let mine: Vec<&AttendanceRecord> = records.iter().filter(|r| &r.member_id == member_id).collect();
    percent(mine.iter().filter(|r| r.present).count(), mine.len())
}
