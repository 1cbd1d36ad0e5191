//! Member directory.
//!
//! Stores member records under `church-members` and provides directory
//! search: exact substring matches win outright, then a fuzzy match over
//! full names with a minimum quality threshold.

use chrono::NaiveDate;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::collection::{Collection, Record};
use crate::constants::{keys, search};
use crate::error::Result;
use crate::storage::Storage;
use crate::types::{MemberId, MemberStatus};
use crate::validation;

/// One entry in a member's own attendance history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberAttendance {
    /// Service date.
    pub date: NaiveDate,
    /// Whether the member was there.
    pub present: bool,
}

/// A person in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique id.
    pub id: MemberId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// Birthday, if known.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Date the person joined.
    pub join_date: NaiveDate,
    /// Membership standing.
    #[serde(default)]
    pub status: MemberStatus,
    /// Small groups and ministries, in the order they were added.
    #[serde(default)]
    pub groups: Vec<String>,
    /// Per-member attendance history. Not kept in sync with the attendance store.
    #[serde(default)]
    pub attendance: Vec<MemberAttendance>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Member {
    /// Create an active member with a fresh id and no contact details.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, join_date: NaiveDate) -> Self {
        Self {
            id: MemberId::generate(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            phone: None,
            address: None,
            date_of_birth: None,
            join_date,
            status: MemberStatus::Active,
            groups: Vec::new(),
            attendance: Vec::new(),
            notes: None,
        }
    }

    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Add the member to a group, keeping order and skipping duplicates.
    pub fn join_group(&mut self, group: impl Into<String>) {
        let group = group.into();
        if !self.groups.iter().any(|g| g.eq_ignore_ascii_case(&group)) {
            self.groups.push(group);
        }
    }

    /// Check the form fields.
    pub fn validate(&self) -> Result<()> {
        validation::required("firstName", &self.first_name)?;
        validation::required("lastName", &self.last_name)?;
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            validation::email("email", email)?;
        }
        Ok(())
    }
}

impl Record for Member {
    type Id = MemberId;
    const KIND: &'static str = "member";

    fn id(&self) -> &MemberId {
        &self.id
    }
}

/// Member directory backed by `church-members`.
pub struct MemberStore<'a> {
    records: Collection<'a, Member>,
}

impl<'a> MemberStore<'a> {
    /// Open the directory in `storage`.
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { records: Collection::new(storage, keys::MEMBERS) }
    }

    /// All members in stored order.
    pub fn list(&self) -> Vec<Member> {
        self.records.all()
    }

    /// Number of members.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Look up a member.
    pub fn get(&self, id: &MemberId) -> Result<Member> {
        self.records.get(id)
    }

    /// Validate and add a member.
    pub fn add(&self, member: Member) -> Result<Member> {
        member.validate()?;
        self.records.create(member)
    }

    /// Validate and replace a member.
    pub fn update(&self, member: Member) -> Result<Member> {
        member.validate()?;
        self.records.update(member)
    }

    /// Remove a member.
    pub fn remove(&self, id: &MemberId) -> Result<Member> {
        self.records.delete(id)
    }

    /// Members with the given standing.
    pub fn by_status(&self, status: MemberStatus) -> Vec<Member> {
        self.records.filter(|m| m.status == status)
    }

    /// Members belonging to `group` (case-insensitive).
    pub fn in_group(&self, group: &str) -> Vec<Member> {
        self.records.filter(|m| m.groups.iter().any(|g| g.eq_ignore_ascii_case(group)))
    }

    /// Every group name in use, sorted.
    pub fn groups(&self) -> Vec<String> {
        self.list()
            .into_iter()
            .flat_map(|m| m.groups)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Search the directory by name or email.
    pub fn search(&self, query: &str) -> Vec<Member> {
        search_members(self.list(), query)
    }
}

/// Rank `members` against `query`.
///
/// Substring hits on name or email come first in stored order, followed by
/// fuzzy name matches ordered by score.
pub fn search_members(members: Vec<Member>, query: &str) -> Vec<Member> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    let query_lower = query.to_lowercase();

    let (exact, rest): (Vec<Member>, Vec<Member>) = members.into_iter().partition(|m| {
        m.full_name().to_lowercase().contains(&query_lower)
            || m.email.as_deref().is_some_and(|e| e.to_lowercase().contains(&query_lower))
    });

    let matcher = SkimMatcherV2::default();
    let mut fuzzy: Vec<(i64, Member)> = rest
        .into_iter()
        .filter_map(|m| {
            let score = matcher.fuzzy_match(&m.full_name(), query)?;
            (score >= search::MIN_FUZZY_SCORE).then_some((score, m))
        })
        .collect();
    fuzzy.sort_by(|a, b| b.0.cmp(&a.0));

    exact
        .into_iter()
        .chain(fuzzy.into_iter().map(|(_, m)| m))
        .take(search::MAX_SEARCH_RESULTS)
        .collect()
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

    fn member(first: &str, last: &str) -> Member {
        Member::new(first, last, date("2024-01-07"))
    }

    #[test]
    fn test_add_requires_names() {
        let storage = MemoryStorage::new();
        let store = MemberStore::new(&storage);

        let err = store.add(member("", "Smith")).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "firstName", .. }));
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_add_rejects_bad_email() {
        let storage = MemoryStorage::new();
        let store = MemberStore::new(&storage);

        let mut m = member("Ruth", "Moab");
        m.email = Some("ruth-at-moab".to_string());
        assert!(store.add(m).is_err());
    }

    #[test]
    fn test_update_replaces_member() {
        let storage = MemoryStorage::new();
        let store = MemberStore::new(&storage);

        let mut m = store.add(member("Ruth", "Moab")).unwrap();
        m.status = MemberStatus::Inactive;
        store.update(m.clone()).unwrap();

        assert_eq!(store.get(&m.id).unwrap().status, MemberStatus::Inactive);
        assert_eq!(store.by_status(MemberStatus::Active).len(), 0);
    }

    #[test]
    fn test_groups_are_ordered_and_deduplicated() {
        let mut m = member("Ruth", "Moab");
        m.join_group("Choir");
        m.join_group("Youth");
        m.join_group("choir");
        assert_eq!(m.groups, vec!["Choir", "Youth"]);
    }

    #[test]
    fn test_distinct_groups_and_membership() {
        let storage = MemoryStorage::new();
        let store = MemberStore::new(&storage);

        let mut a = member("Ruth", "Moab");
        a.join_group("Choir");
        let mut b = member("Boaz", "Bethlehem");
        b.join_group("Ushers");
        b.join_group("Choir");
        store.add(a).unwrap();
        store.add(b).unwrap();

        assert_eq!(store.groups(), vec!["Choir", "Ushers"]);
        assert_eq!(store.in_group("choir").len(), 2);
        assert_eq!(store.in_group("Ushers").len(), 1);
    }

    #[test]
    fn test_search_substring_then_fuzzy() {
        let mut ruth = member("Ruth", "Moab");
        ruth.email = Some("ruth@example.org".to_string());
        let members = vec![member("Naomi", "Ephrath"), ruth, member("Boaz", "Bethlehem")];

        let hits = search_members(members.clone(), "ruth");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].first_name, "Ruth");

        let hits = search_members(members.clone(), "example.org");
        assert_eq!(hits[0].first_name, "Ruth");

        assert!(search_members(members, "   ").is_empty());
    }

    #[test]
    fn test_remove_missing_member() {
        let storage = MemoryStorage::new();
        let store = MemberStore::new(&storage);
        assert!(matches!(store.remove(&MemberId::new("nope")), Err(Error::NotFound { .. })));
    }
}
