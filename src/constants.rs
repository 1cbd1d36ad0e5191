//! Application constants.
//!
//! Centralizes storage keys and reporting limits.

/// Storage keys. These are the on-disk document names and must not change.
pub mod keys {
    /// Member directory.
    pub const MEMBERS: &str = "church-members";

    /// Scheduled events.
    pub const EVENTS: &str = "church-events";

    /// Donation records.
    pub const DONATIONS: &str = "church-donations";

    /// Sermon archive.
    pub const SERMONS: &str = "church-sermons";

    /// Attendance records.
    pub const ATTENDANCE: &str = "church-attendance";

    /// Service definitions.
    pub const SERVICES: &str = "church-services";

    /// Registered users.
    pub const USERS: &str = "church-users";

    /// Signed-in session.
    pub const CURRENT_USER: &str = "church-current-user";

    /// Prefix for per-email password reset codes.
    pub const OTP_PREFIX: &str = "church-otp-";

    /// Storage key holding the reset code for `email`.
    pub fn otp(email: &str) -> String {
        format!("{OTP_PREFIX}{email}")
    }
}

/// Reporting constants.
pub mod reports {
    /// Number of most recent services shown in attendance stats.
    pub const DEFAULT_RECENT_SERVICES: usize = 5;

    /// Number of donors in the top donors list.
    pub const TOP_DONORS: usize = 5;

    /// Trailing calendar months in the monthly donation breakdown.
    pub const MONTHLY_WINDOW: u32 = 6;
}

/// Money constants.
pub mod money {
    /// Decimal places kept for amounts and totals.
    pub const DECIMAL_PLACES: u32 = 2;

    /// Largest single donation amount accepted.
    pub const MAX_AMOUNT: f64 = 1_000_000_000.0;
}

/// Account constants.
pub mod auth {
    /// Number of digits in a password reset code.
    pub const OTP_DIGITS: u32 = 6;

    /// Default reset code lifetime in minutes.
    pub const DEFAULT_OTP_TTL_MINUTES: i64 = 10;

    /// Longest accepted reset code lifetime in minutes (one week).
    pub const MAX_OTP_TTL_MINUTES: i64 = 7 * 24 * 60;

    /// Minimum accepted password length.
    pub const MIN_PASSWORD_LEN: usize = 6;
}

/// Directory search constants.
pub mod search {
    /// Minimum fuzzy score for a directory match.
    pub const MIN_FUZZY_SCORE: i64 = 40;

    /// Maximum number of search results returned.
    pub const MAX_SEARCH_RESULTS: usize = 20;
}
