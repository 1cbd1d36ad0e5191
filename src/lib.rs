//! `Congregate` - church management for small congregations.
//!
//! This crate keeps a member directory, service attendance, donations, an
//! event calendar and a sermon archive, persisted as JSON documents under
//! fixed storage keys, with a small role-gated account layer on top.

// Re-export public modules for use in integration tests and as a library
pub mod attendance;
pub mod auth;
pub mod collection;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod donations;
pub mod error;
pub mod events;
pub mod members;
pub mod sermons;
pub mod storage;
pub mod types;
pub mod validation;
