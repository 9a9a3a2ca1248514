//! Local persistence for console preferences.
//!
//! Holds the last-edited source text and the cosmetic editor preferences
//! (font size, theme) as one JSON document on disk. Plain key-to-value
//! storage: no migrations beyond a version check, no invariants.

mod error;
mod paths;
mod schema;
mod store;

pub use error::PrefsStoreError;
pub use paths::{prefs_file, prefs_root};
pub use schema::{Prefs, PREFS_VERSION};
pub use store::PrefsStore;
