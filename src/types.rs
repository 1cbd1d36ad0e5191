//! Core type definitions for compile-time safety.
//!
//! Newtype wrappers around string identifiers prevent accidental mixing of
//! different ID types, and the category enums pin the vocabularies used for
//! reporting breakdowns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an id from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Create a fresh random id.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Get the inner string value.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Member directory identifier.
    MemberId
);
define_id!(
    /// Scheduled service identifier.
    ServiceId
);
define_id!(
    /// Attendance record identifier.
    AttendanceId
);
define_id!(
    /// Donation record identifier.
    DonationId
);
define_id!(
    /// Event identifier.
    EventId
);
define_id!(
    /// Sermon identifier.
    SermonId
);

/// Implements `name()`, `all()`, `Display` and `FromStr` for a unit-only enum.
macro_rules! labelled_enum {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            /// Returns all variants in display order.
            #[must_use]
            pub const fn all() -> &'static [Self] {
                &[$(Self::$variant),+]
            }

            /// Returns the stored (lowercase) name of this variant.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.name())
            }
        }

        impl FromStr for $name {
            type Err = crate::error::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                Self::all()
                    .iter()
                    .copied()
                    .find(|v| v.name() == wanted)
                    .ok_or_else(|| crate::error::Error::Msg(format!(
                        "unknown {} '{}', expected one of: {}",
                        stringify!($name),
                        s,
                        Self::all().iter().map(|v| v.name()).collect::<Vec<_>>().join(", "),
                    )))
            }
        }
    };
}

/// Membership standing of a person in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    /// Regular attending member.
    #[default]
    Active,
    /// Member who no longer attends.
    Inactive,
    /// Guest, not yet a member.
    Visitor,
}

labelled_enum!(MemberStatus {
    Active => "active",
    Inactive => "inactive",
    Visitor => "visitor",
});

/// Kind of congregational gathering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    /// Sunday worship.
    #[default]
    Sunday,
    /// Midweek service.
    Wednesday,
    /// Holiday or one-off service.
    Special,
}

labelled_enum!(ServiceType {
    Sunday => "sunday",
    Wednesday => "wednesday",
    Special => "special",
});

/// Donation category used for reporting breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationType {
    /// Tenth of income.
    #[default]
    Tithe,
    /// Freewill offering.
    Offering,
    /// Payment against a pledge.
    Pledge,
    /// Building fund.
    Building,
    /// Missions fund.
    Missions,
    /// Anything else.
    Other,
}

labelled_enum!(DonationType {
    Tithe => "tithe",
    Offering => "offering",
    Pledge => "pledge",
    Building => "building",
    Missions => "missions",
    Other => "other",
});

/// How a donation was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash in the plate.
    #[default]
    Cash,
    /// Paper check.
    Check,
    /// Card terminal.
    Card,
    /// Online giving.
    Online,
    /// Anything else.
    Other,
}

labelled_enum!(PaymentMethod {
    Cash => "cash",
    Check => "check",
    Card => "card",
    Online => "online",
    Other => "other",
});

/// Processing state of a donation. Recorded only; nothing transitions it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    /// Funds received.
    #[default]
    Completed,
    /// Awaiting clearance.
    Pending,
    /// Payment did not go through.
    Failed,
}

labelled_enum!(DonationStatus {
    Completed => "completed",
    Pending => "pending",
    Failed => "failed",
});

/// Event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// Worship service.
    Service,
    /// Committee or board meeting.
    Meeting,
    /// Community outreach.
    Outreach,
    /// Social gathering.
    Fellowship,
    /// Youth ministry.
    Youth,
    /// Anything else.
    #[default]
    Other,
}

labelled_enum!(EventType {
    Service => "service",
    Meeting => "meeting",
    Outreach => "outreach",
    Fellowship => "fellowship",
    Youth => "youth",
    Other => "other",
});

/// Sermon recording format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Audio recording.
    #[default]
    Audio,
    /// Video recording.
    Video,
}

labelled_enum!(MediaType {
    Audio => "audio",
    Video => "video",
});

/// Account role. Ordered so that `Admin > Staff > Member`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular member account.
    #[default]
    Member,
    /// Church staff.
    Staff,
    /// Full administrative access.
    Admin,
}

labelled_enum!(Role {
    Member => "member",
    Staff => "staff",
    Admin => "admin",
});

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(MemberId::generate(), MemberId::generate());
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = DonationId::new("d-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"d-1\"");
    }

    #[test]
    fn test_enum_parse_is_case_insensitive() {
        assert_eq!("Tithe".parse::<DonationType>().unwrap(), DonationType::Tithe);
        assert_eq!(" video ".parse::<MediaType>().unwrap(), MediaType::Video);
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_enum_wire_names_are_lowercase() {
        let json = serde_json::to_string(&ServiceType::Wednesday).unwrap();
        assert_eq!(json, "\"wednesday\"");
        let back: ServiceType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ServiceType::Wednesday);
    }

    #[test]
    fn test_role_ordering() {
        assert!(Role::Admin > Role::Staff);
        assert!(Role::Staff > Role::Member);
    }

    #[test]
    fn test_all_donation_types_listed() {
        assert_eq!(DonationType::all().len(), 6);
    }
}
