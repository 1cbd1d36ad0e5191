//! Accounts, sessions and role gating.
//!
//! Users are a flat list under `church-users`; the signed-in session is a
//! single document under `church-current-user`. Passwords are stored as
//! Argon2 hashes. Password reset issues a numeric one-time code that is
//! handed back to the caller rather than mailed.

pub mod otp;
pub mod password;

pub use otp::OneTimeCode;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::{Collection, Record};
use crate::constants::{auth, keys};
use crate::error::{Error, Result};
use crate::storage::{self, Storage};
use crate::types::Role;
use crate::validation;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Login email, stored trimmed and lowercased.
    pub email: String,
    /// Argon2 PHC hash of the password.
    pub password_hash: String,
    /// Access level.
    pub role: Role,
    /// Display name.
    pub name: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl Record for User {
    type Id = String;
    const KIND: &'static str = "user";

    fn id(&self) -> &String {
        &self.email
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Account email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Access level at login time.
    pub role: Role,
    /// When the session started.
    pub logged_in_at: DateTime<Utc>,
}

/// Canonical form used for storage and comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Account operations over a storage backend.
pub struct AuthService<'a> {
    storage: &'a dyn Storage,
    users: Collection<'a, User>,
    otp_ttl: Duration,
}

impl<'a> AuthService<'a> {
    /// Open the account store with the default reset-code lifetime.
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self::with_otp_ttl(storage, Duration::minutes(auth::DEFAULT_OTP_TTL_MINUTES))
    }

    /// Open the account store with a custom reset-code lifetime.
    pub fn with_otp_ttl(storage: &'a dyn Storage, otp_ttl: Duration) -> Self {
        Self { storage, users: Collection::new(storage, keys::USERS), otp_ttl }
    }

    /// All accounts.
    pub fn users(&self) -> Vec<User> {
        self.users.all()
    }

    fn find(&self, email: &str) -> Option<User> {
        let email = normalize_email(email);
        self.users.all().into_iter().find(|u| u.email == email)
    }

    /// Register a new account.
    ///
    /// The very first account becomes an administrator; every later one is a
    /// plain member until an administrator changes its role. An account list
    /// that exists but cannot be read does not count as empty here, so a
    /// corrupt `church-users` document never hands out administrator access.
    pub fn signup(&self, name: &str, email: &str, password: &str) -> Result<User> {
        validation::required("name", name)?;
        validation::email("email", email)?;
        check_password(password)?;

        let email = normalize_email(email);
        if self.find(&email).is_some() {
            return Err(Error::validation("email", format!("an account for {email} already exists")));
        }

        let role = if self.users.is_empty() && !self.users_unreadable() { Role::Admin } else { Role::Member };
        let user = User {
            email,
            password_hash: password::hash_password(password)?,
            role,
            name: name.trim().to_string(),
            created_at: Utc::now(),
        };
        let user = self.users.create(user)?;
        tracing::info!("Registered {} as {}", user.email, user.role);
        Ok(user)
    }

    fn users_unreadable(&self) -> bool {
        let unreadable = storage::load_json::<Vec<User>>(self.storage, keys::USERS).is_err();
        if unreadable {
            tracing::warn!("Account list is unreadable, new accounts start as {}", Role::Member);
        }
        unreadable
    }

    /// Check credentials and start a session.
    pub fn login(&self, email: &str, password: &str) -> Result<Session> {
        let user = self
            .find(email)
            .filter(|u| password::verify_password(password, &u.password_hash))
            .ok_or_else(|| {
                tracing::warn!("Failed login for {}", normalize_email(email));
                Error::auth("invalid email or password")
            })?;

        let session = Session {
            email: user.email,
            name: user.name,
            role: user.role,
            logged_in_at: Utc::now(),
        };
        storage::save_json(self.storage, keys::CURRENT_USER, &session)?;
        tracing::info!("{} signed in", session.email);
        Ok(session)
    }

    /// End the current session, if any.
    pub fn logout(&self) -> Result<()> {
        self.storage.remove(keys::CURRENT_USER)
    }

    /// The signed-in user, if any. A corrupt session document reads as signed out.
    pub fn current_user(&self) -> Option<Session> {
        match storage::load_json::<Session>(self.storage, keys::CURRENT_USER) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Ignoring unreadable session: {e}");
                None
            }
        }
    }

    /// The current session, provided the account's role is at least `min`.
    ///
    /// The role is read from the account list, not the session, so a role
    /// change applies without signing out.
    pub fn require_role(&self, min: Role) -> Result<Session> {
        let session = self.current_user().ok_or_else(|| Error::auth("not signed in"))?;
        let role = self
            .find(&session.email)
            .map(|u| u.role)
            .ok_or_else(|| Error::auth(format!("account {} no longer exists", session.email)))?;
        if role < min {
            return Err(Error::auth(format!("{} requires {min} access, signed in as {role}", session.email)));
        }
        Ok(Session { role, ..session })
    }

    /// Change an account's role. Requires an administrator session.
    pub fn set_role(&self, email: &str, role: Role) -> Result<User> {
        self.require_role(Role::Admin)?;
        let mut user = self
            .find(email)
            .ok_or_else(|| Error::not_found(User::KIND, normalize_email(email)))?;
        user.role = role;
        self.users.update(user)
    }

    /// Issue a reset code for `email` and return it.
    pub fn forgot_password(&self, email: &str) -> Result<String> {
        self.forgot_password_at(email, Utc::now())
    }

    /// [`Self::forgot_password`] with an explicit clock.
    pub fn forgot_password_at(&self, email: &str, now: DateTime<Utc>) -> Result<String> {
        let user = self
            .find(email)
            .ok_or_else(|| Error::not_found(User::KIND, normalize_email(email)))?;

        let code = OneTimeCode::issue(now, self.otp_ttl)?;
        storage::save_json(self.storage, &keys::otp(&user.email), &code)?;
        tracing::info!("Issued reset code for {} (expires {})", user.email, code.expires_at);
        Ok(code.code)
    }

    /// Set a new password using a reset code. The code is consumed on success.
    pub fn reset_password(&self, email: &str, code: &str, new_password: &str) -> Result<()> {
        self.reset_password_at(email, code, new_password, Utc::now())
    }

    /// [`Self::reset_password`] with an explicit clock.
    pub fn reset_password_at(&self, email: &str, code: &str, new_password: &str, now: DateTime<Utc>) -> Result<()> {
        check_password(new_password)?;
        let email = normalize_email(email);
        let key = keys::otp(&email);

        let pending = storage::load_json::<OneTimeCode>(self.storage, &key)?
            .ok_or_else(|| Error::auth("no reset code was requested"))?;
        if pending.is_expired(now) {
            self.storage.remove(&key)?;
            return Err(Error::auth("reset code has expired"));
        }
        if !pending.accepts(code, now) {
            return Err(Error::auth("reset code does not match"));
        }

        let mut user = self.find(&email).ok_or_else(|| Error::not_found(User::KIND, &email))?;
        user.password_hash = password::hash_password(new_password)?;
        self.users.update(user)?;
        self.storage.remove(&key)?;
        tracing::info!("Password reset for {email}");
        Ok(())
    }
}

fn check_password(password: &str) -> Result<()> {
    if password.chars().count() < auth::MIN_PASSWORD_LEN {
        return Err(Error::validation(
            "password",
            format!("must be at least {} characters", auth::MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}
