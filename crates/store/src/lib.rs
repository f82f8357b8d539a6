//! The settings store: where live configuration comes from.
//!
//! A [`SettingsSource`] fetches the raw document, [`bootstrap`] turns the
//! first fetch into a snapshot and keeps it fresh in the background, and
//! [`SnapshotHandle`] is the cheap read side handed to request handlers.
//!
//! Startup is strict and refresh is forgiving: the process refuses to come
//! up without a usable document, but once running it rides out store
//! outages on the last-known-good snapshot.

pub mod source;
pub mod watcher;

pub use source::{FileSettingsSource, HttpSettingsSource, SettingsSource, source_from_config};
pub use watcher::{SnapshotHandle, Store, bootstrap};
