//! Donation reporting: totals by type, trailing monthly breakdown, top donors.
//!
//! Amounts are stored as `f64`, rounded to cents as they are read and summed
//! as `Decimal`. Every category total is then a whole number of cents, so the
//! per-type totals always add up to the grand total.

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::HashMap;

use super::Donation;
use crate::constants::{money, reports};
use crate::error::{Error, Result};
use crate::types::{DonationType, MemberId};

#[inline]
fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(money::DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert f64 to Decimal for calculation, rounded to cents
#[inline]
pub fn to_decimal(value: f64) -> Result<Decimal> {
    Decimal::from_f64(value)
        .map(round_cents)
        .ok_or_else(|| Error::validation("amount", format!("{value} cannot be represented as money")))
}

/// Convert Decimal back to f64 for display, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_cents(value).to_f64().unwrap_or_default()
}

fn add(total: Decimal, amount: f64) -> Result<Decimal> {
    total
        .checked_add(to_decimal(amount)?)
        .ok_or_else(|| Error::Msg(format!("donation total overflowed adding {amount}")))
}

/// Total for one donation category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeTotal {
    /// The category.
    #[serde(rename = "type")]
    pub donation_type: DonationType,
    /// Sum of amounts in the category.
    pub total: f64,
}

/// Total for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Short label such as `Mar 2026`.
    pub label: String,
    /// Sum of amounts dated in the month.
    pub total: f64,
}

/// Lifetime giving for one member.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorTotal {
    /// The donor.
    pub member_id: MemberId,
    /// Sum of the member's donations.
    pub total: f64,
    /// Number of donations.
    pub count: usize,
}

/// Everything the giving report shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationSummary {
    /// Sum of every donation.
    pub grand_total: f64,
    /// Number of donations.
    pub count: usize,
    /// One entry per category, in category order, zero totals included.
    pub by_type: Vec<TypeTotal>,
    /// Trailing months, oldest first, ending with the reference month.
    pub monthly: Vec<MonthlyTotal>,
    /// Largest donors, highest first.
    pub top_donors: Vec<DonorTotal>,
}

impl DonationSummary {
    /// Total for a single category.
    pub fn total_for(&self, donation_type: DonationType) -> f64 {
        self.by_type
            .iter()
            .find(|t| t.donation_type == donation_type)
            .map_or(0.0, |t| t.total)
    }
}

fn sum<'a>(mut donations: impl Iterator<Item = &'a Donation>) -> Result<Decimal> {
    donations.try_fold(Decimal::ZERO, |total, d| add(total, d.amount))
}

/// Sum of all amounts.
pub fn grand_total(donations: &[Donation]) -> Result<f64> {
    sum(donations.iter()).map(to_f64)
}

/// Totals for every category, in category order.
pub fn totals_by_type(donations: &[Donation]) -> Result<Vec<TypeTotal>> {
    DonationType::all()
        .iter()
        .map(|&donation_type| {
            let total = sum(donations.iter().filter(|d| d.donation_type == donation_type))?;
            Ok(TypeTotal { donation_type, total: to_f64(total) })
        })
        .collect()
}

/// The `count` calendar months ending with the month of `reference`, oldest first.
pub fn trailing_months(reference: NaiveDate, count: u32) -> Vec<(i32, u32)> {
    let mut months = Vec::new();
    let (mut year, mut month) = (reference.year(), reference.month());
    for _ in 0..count {
        months.push((year, month));
        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
    }
    months.reverse();
    months
}

/// Totals for the trailing `months` calendar months ending with `reference`'s month.
pub fn monthly_breakdown(donations: &[Donation], reference: NaiveDate, months: u32) -> Result<Vec<MonthlyTotal>> {
    trailing_months(reference, months)
        .into_iter()
        .map(|(year, month)| {
            let total = sum(donations
                .iter()
                .filter(|d| d.date.year() == year && d.date.month() == month))?;
            let label = NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%b %Y").to_string())
                .unwrap_or_default();
            Ok(MonthlyTotal { year, month, label, total: to_f64(total) })
        })
        .collect()
}

/// Members ranked by total giving, highest first, at most `limit`.
///
/// Ties are broken by member id so the order is stable.
pub fn top_donors(donations: &[Donation], limit: usize) -> Result<Vec<DonorTotal>> {
    let mut by_member: HashMap<&MemberId, (Decimal, usize)> = HashMap::new();
    for donation in donations {
        let entry = by_member.entry(&donation.member_id).or_insert((Decimal::ZERO, 0));
        entry.0 = add(entry.0, donation.amount)?;
        entry.1 += 1;
    }

    let mut ranked: Vec<(&MemberId, Decimal, usize)> =
        by_member.into_iter().map(|(id, (total, count))| (id, total, count)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    Ok(ranked
        .into_iter()
        .take(limit)
        .map(|(member_id, total, count)| DonorTotal {
            member_id: member_id.clone(),
            total: to_f64(total),
            count,
        })
        .collect())
}

/// Build the full report relative to `today`.
///
/// Fails if a stored amount is not representable or the totals overflow.
pub fn summarize(donations: &[Donation], today: NaiveDate) -> Result<DonationSummary> {
    Ok(DonationSummary {
        grand_total: grand_total(donations)?,
        count: donations.len(),
        by_type: totals_by_type(donations)?,
        monthly: monthly_breakdown(donations, today, reports::MONTHLY_WINDOW)?,
        top_donors: top_donors(donations, reports::TOP_DONORS)?,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::types::PaymentMethod;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn gift(member: &str, amount: f64, kind: DonationType, day: &str) -> Donation {
        Donation::new(MemberId::new(member), amount, kind, date(day), PaymentMethod::Cash)
    }

    fn sample() -> Vec<Donation> {
        vec![
            gift("a", 100.0, DonationType::Tithe, "2026-03-01"),
            gift("b", 25.5, DonationType::Offering, "2026-03-01"),
            gift("c", 0.1, DonationType::Offering, "2026-02-15"),
            gift("c", 0.2, DonationType::Missions, "2026-02-15"),
            gift("d", 500.0, DonationType::Building, "2025-12-24"),
            gift("e", 40.0, DonationType::Pledge, "2025-09-30"),
            gift("f", 15.0, DonationType::Other, "2026-01-10"),
            gift("g", 60.0, DonationType::Tithe, "2026-03-08"),
            gift("a", 10.0, DonationType::Offering, "2026-03-15"),
        ]
    }

    #[test]
    fn test_totals_by_type_sum_to_grand_total() {
        let donations = sample();
        let by_type = totals_by_type(&donations).unwrap();
        assert_eq!(by_type.len(), DonationType::all().len());

        let summed: Decimal = by_type.iter().map(|t| to_decimal(t.total).unwrap()).sum();
        assert_eq!(summed, to_decimal(grand_total(&donations).unwrap()).unwrap());
        assert_eq!(grand_total(&donations).unwrap(), 750.8);
    }

    #[test]
    fn test_sub_cent_amounts_keep_totals_consistent() {
        // Stored documents can carry amounts that never went through validation
        let donations = vec![
            gift("a", 0.004, DonationType::Tithe, "2026-03-01"),
            gift("b", 0.004, DonationType::Offering, "2026-03-01"),
            gift("c", 0.006, DonationType::Offering, "2026-03-01"),
        ];
        let grand = grand_total(&donations).unwrap();
        let summed: Decimal = totals_by_type(&donations)
            .unwrap()
            .iter()
            .map(|t| to_decimal(t.total).unwrap())
            .sum();
        assert_eq!(summed, to_decimal(grand).unwrap());
        assert_eq!(grand, 0.01);
    }

    #[test]
    fn test_overflowing_totals_are_an_error() {
        let donations = vec![
            gift("a", 5e28, DonationType::Tithe, "2026-03-01"),
            gift("a", 5e28, DonationType::Tithe, "2026-03-02"),
        ];
        assert!(grand_total(&donations).is_err());
        assert!(top_donors(&donations, 5).is_err());
        assert!(summarize(&donations, date("2026-03-20")).is_err());
    }

    #[test]
    fn test_unrepresentable_amount_is_not_counted_as_zero() {
        let donations = vec![gift("a", 1e30, DonationType::Tithe, "2026-03-01")];
        assert!(matches!(grand_total(&donations), Err(Error::Validation { field: "amount", .. })));
    }

    #[test]
    fn test_cents_do_not_drift() {
        let donations = vec![
            gift("c", 0.1, DonationType::Offering, "2026-02-15"),
            gift("c", 0.2, DonationType::Offering, "2026-02-15"),
        ];
        assert_eq!(grand_total(&donations).unwrap(), 0.3);
    }

    #[test]
    fn test_top_donors_sorted_and_capped() {
        let donors = top_donors(&sample(), reports::TOP_DONORS).unwrap();
        assert_eq!(donors.len(), 5);
        assert!(donors.windows(2).all(|w| w[0].total >= w[1].total));
        assert_eq!(donors[0].member_id, MemberId::new("d"));
        assert_eq!(donors[1].member_id, MemberId::new("a"));
        assert_eq!(donors[1].total, 110.0);
        assert_eq!(donors[1].count, 2);
    }

    #[test]
    fn test_top_donor_ties_break_by_id() {
        let donations = vec![
            gift("zed", 10.0, DonationType::Tithe, "2026-03-01"),
            gift("amy", 10.0, DonationType::Tithe, "2026-03-01"),
        ];
        let donors = top_donors(&donations, 5).unwrap();
        assert_eq!(donors[0].member_id, MemberId::new("amy"));
    }

    #[test]
    fn test_trailing_months_cross_year() {
        let months = trailing_months(date("2026-02-10"), 6);
        assert_eq!(
            months,
            vec![(2025, 9), (2025, 10), (2025, 11), (2025, 12), (2026, 1), (2026, 2)]
        );
    }

    #[test]
    fn test_monthly_breakdown() {
        let monthly = monthly_breakdown(&sample(), date("2026-03-20"), 6).unwrap();
        assert_eq!(monthly.len(), 6);
        assert_eq!(monthly[0].label, "Oct 2025");
        assert_eq!(monthly[5].label, "Mar 2026");
        assert_eq!(monthly[5].total, 195.5);
        assert_eq!(monthly[4].total, 0.3);
        assert_eq!(monthly[2].total, 500.0);
        // September falls outside the window
        assert!(monthly.iter().all(|m| m.month != 9));
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[], date("2026-03-20")).unwrap();
        assert_eq!(summary.grand_total, 0.0);
        assert_eq!(summary.count, 0);
        assert!(summary.top_donors.is_empty());
        assert_eq!(summary.monthly.len(), 6);
        assert_eq!(summary.total_for(DonationType::Tithe), 0.0);
    }
}
