//! Donation records under `church-donations`.

pub mod summary;

pub use summary::{DonationSummary, DonorTotal, MonthlyTotal, TypeTotal};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::collection::{Collection, Record};
use crate::constants::keys;
use crate::error::Result;
use crate::storage::Storage;
use crate::types::{DonationId, DonationStatus, DonationType, MemberId, PaymentMethod};
use crate::validation;

/// A single gift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    /// Unique id.
    pub id: DonationId,
    /// Donor. Not checked against the directory.
    pub member_id: MemberId,
    /// Amount given.
    pub amount: f64,
    /// Reporting category.
    #[serde(rename = "type")]
    pub donation_type: DonationType,
    /// Date received.
    pub date: NaiveDate,
    /// Payment method.
    pub method: PaymentMethod,
    /// Processing state.
    #[serde(default)]
    pub status: DonationStatus,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Donation {
    /// Create a completed donation with a fresh id.
    pub fn new(
        member_id: MemberId,
        amount: f64,
        donation_type: DonationType,
        date: NaiveDate,
        method: PaymentMethod,
    ) -> Self {
        Self {
            id: DonationId::generate(),
            member_id,
            amount,
            donation_type,
            date,
            method,
            status: DonationStatus::Completed,
            notes: None,
        }
    }

    /// Check the form fields.
    pub fn validate(&self) -> Result<()> {
        validation::required("memberId", self.member_id.as_str())?;
        validation::positive_amount("amount", self.amount)
    }
}

impl Record for Donation {
    type Id = DonationId;
    const KIND: &'static str = "donation";

    fn id(&self) -> &DonationId {
        &self.id
    }
}

/// Donation ledger.
pub struct DonationStore<'a> {
    records: Collection<'a, Donation>,
}

impl<'a> DonationStore<'a> {
    /// Open the ledger in `storage`.
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { records: Collection::new(storage, keys::DONATIONS) }
    }

    /// All donations in stored order.
    pub fn list(&self) -> Vec<Donation> {
        self.records.all()
    }

    /// Look up a donation.
    pub fn get(&self, id: &DonationId) -> Result<Donation> {
        self.records.get(id)
    }

    /// Validate and record a donation.
    pub fn add(&self, donation: Donation) -> Result<Donation> {
        donation.validate()?;
        self.records.create(donation)
    }

    /// Validate and replace a donation.
    pub fn update(&self, donation: Donation) -> Result<Donation> {
        donation.validate()?;
        self.records.update(donation)
    }

    /// Remove a donation.
    pub fn remove(&self, id: &DonationId) -> Result<Donation> {
        self.records.delete(id)
    }

    /// Donations by one member, newest first.
    pub fn for_member(&self, member_id: &MemberId) -> Vec<Donation> {
        let mut donations = self.records.filter(|d| &d.member_id == member_id);
        donations.sort_by(|a, b| b.date.cmp(&a.date));
        donations
    }

    /// Donations dated within `from..=to`, oldest first.
    pub fn in_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<Donation> {
        let mut donations = self.records.filter(|d| d.date >= from && d.date <= to);
        donations.sort_by(|a, b| a.date.cmp(&b.date));
        donations
    }

    /// Giving report relative to `today`.
    pub fn summary(&self, today: NaiveDate) -> Result<DonationSummary> {
        summary::summarize(&self.list(), today)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::error::Error;
    use crate::storage::MemoryStorage;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn gift(member: &str, amount: f64, day: &str) -> Donation {
        Donation::new(MemberId::new(member), amount, DonationType::Tithe, date(day), PaymentMethod::Online)
    }

    #[test]
    fn test_add_rejects_non_positive_amount() {
        let storage = MemoryStorage::new();
        let store = DonationStore::new(&storage);

        let err = store.add(gift("a", 0.0, "2026-03-01")).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "amount", .. }));
        assert!(store.add(gift("a", -5.0, "2026-03-01")).is_err());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_add_rejects_amounts_totals_cannot_hold() {
        let storage = MemoryStorage::new();
        let store = DonationStore::new(&storage);

        assert!(store.add(gift("a", 0.004, "2026-03-01")).is_err());
        assert!(store.add(gift("a", 5e28, "2026-03-01")).is_err());
        assert!(store.add(gift("a", 1e30, "2026-03-01")).is_err());
        assert!(store.list().is_empty());
        assert_eq!(store.summary(date("2026-03-31")).unwrap().grand_total, 0.0);
    }

    #[test]
    fn test_wire_format() {
        let donation = gift("a", 12.5, "2026-03-01");
        let json = serde_json::to_value(&donation).unwrap();
        assert_eq!(json["memberId"], "a");
        assert_eq!(json["type"], "tithe");
        assert_eq!(json["method"], "online");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["amount"], 12.5);
    }

    #[test]
    fn test_for_member_and_range() {
        let storage = MemoryStorage::new();
        let store = DonationStore::new(&storage);
        store.add(gift("a", 10.0, "2026-01-01")).unwrap();
        store.add(gift("a", 20.0, "2026-03-01")).unwrap();
        store.add(gift("b", 30.0, "2026-02-01")).unwrap();

        let mine = store.for_member(&MemberId::new("a"));
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].amount, 20.0);

        let feb_on = store.in_range(date("2026-02-01"), date("2026-03-01"));
        assert_eq!(feb_on.len(), 2);
        assert_eq!(feb_on[0].member_id, MemberId::new("b"));
    }

    #[test]
    fn test_summary_through_store() {
        let storage = MemoryStorage::new();
        let store = DonationStore::new(&storage);
        store.add(gift("a", 10.0, "2026-03-01")).unwrap();
        store.add(gift("b", 30.0, "2026-03-02")).unwrap();

        let summary = store.summary(date("2026-03-31")).unwrap();
        assert_eq!(summary.grand_total, 40.0);
        assert_eq!(summary.top_donors[0].member_id, MemberId::new("b"));
        assert_eq!(summary.monthly.last().unwrap().total, 40.0);
    }
}
