//! One-time password reset codes, stored per email under `church-otp-<email>`.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::auth::OTP_DIGITS;
use crate::error::{Error, Result};

/// A pending reset code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneTimeCode {
    /// The numeric code.
    pub code: String,
    /// When the code stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl OneTimeCode {
    /// Issue a fresh random code valid for `ttl` from `now`.
    pub fn issue(now: DateTime<Utc>, ttl: Duration) -> Result<Self> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| Error::auth(format!("reset code lifetime of {ttl} is too long")))?;
        Ok(Self { code: generate_code(), expires_at })
    }

    /// Whether the code has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether `candidate` matches and the code is still live at `now`.
    pub fn accepts(&self, candidate: &str, now: DateTime<Utc>) -> bool {
        !self.is_expired(now) && self.code == candidate.trim()
    }
}

/// Random code with exactly [`OTP_DIGITS`] digits (no leading zero).
pub fn generate_code() -> String {
    let low = 10_u32.pow(OTP_DIGITS - 1);
    let code: u32 = rand::thread_rng().gen_range(low..low * 10);
    code.to_string()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_accepts_until_expiry() {
        let now = Utc::now();
        let otp = OneTimeCode::issue(now, Duration::minutes(10)).unwrap();

        assert!(otp.accepts(&otp.code, now));
        assert!(otp.accepts(&format!(" {} ", otp.code), now + Duration::minutes(9)));
        assert!(!otp.accepts(&otp.code, now + Duration::minutes(10)));
        assert!(!otp.accepts("000000", now));
    }

    #[test]
    fn test_issue_with_oversized_lifetime_is_an_error() {
        let ttl = Duration::try_minutes(1_000_000_000_000).unwrap();
        assert!(OneTimeCode::issue(Utc::now(), ttl).is_err());
        assert!(OneTimeCode::issue(Utc::now(), Duration::MAX).is_err());
    }
}
