// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! medreceita-storage: local persistence of doctor details, style and logo
//! history.
//!
//! Three keyed text slots live behind the [`KeyValueStore`] port. The desktop
//! app uses [`SqliteStore`]; tests use [`MemoryStore`].

pub mod prefs;
pub mod store;

pub use prefs::{DOCTOR_KEY, LOGO_HISTORY_KEY, Preferences, STYLE_KEY};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
