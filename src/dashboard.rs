//! Cross-store overview shown on the admin landing page.

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

use crate::attendance::{stats, AttendanceStore};
use crate::donations::{summary, DonationStore};
use crate::error::Result;
use crate::events::EventStore;
use crate::members::MemberStore;
use crate::sermons::SermonStore;
use crate::storage::Storage;
use crate::types::MemberStatus;

/// Headline numbers across every store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    /// Everyone in the directory.
    pub total_members: usize,
    /// Members with active standing.
    pub active_members: usize,
    /// Events that have not started yet.
    pub upcoming_events: usize,
    /// Sermons in the archive.
    pub sermons: usize,
    /// Giving dated in the current calendar month.
    pub donations_this_month: f64,
    /// Average attendance percentage across all services.
    pub average_attendance: u32,
}

/// Compute the overview as of `now` (local time).
pub fn overview(storage: &dyn Storage, now: NaiveDateTime) -> Result<Overview> {
    let members = MemberStore::new(storage).list();
    let attendance = AttendanceStore::new(storage);
    let today = now.date();

    let this_month: Vec<_> = DonationStore::new(storage)
        .list()
        .into_iter()
        .filter(|d| d.date.year() == today.year() && d.date.month() == today.month())
        .collect();

    Ok(Overview {
        total_members: members.len(),
        active_members: members.iter().filter(|m| m.status == MemberStatus::Active).count(),
        upcoming_events: EventStore::new(storage).upcoming(now).len(),
        sermons: SermonStore::new(storage).list().len(),
        donations_this_month: summary::grand_total(&this_month)?,
        average_attendance: stats::average_attendance(
            members.len(),
            &attendance.services(),
            &attendance.records(),
        ),
    })
}
