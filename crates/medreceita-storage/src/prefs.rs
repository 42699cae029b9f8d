// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The three persisted preference slots with read-repair.
//
// Reads never fail: a missing slot, a store error or text that does not
// parse yields the documented default and a warning. Writes go straight to
// the store.

use std::sync::Arc;

use medreceita_core::error::{MedReceitaError, Result};
use medreceita_core::style::PrescriptionStyle;
use medreceita_core::types::{DoctorInfo, LogoHistory};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::store::KeyValueStore;

pub const DOCTOR_KEY: &str = "prescription-doctor-info";
pub const STYLE_KEY: &str = "prescription-style";
pub const LOGO_HISTORY_KEY: &str = "prescription-logo-history";

/// Typed access to the preference slots.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load_doctor(&self) -> DoctorInfo {
        self.load_or_default::<DoctorInfo>(DOCTOR_KEY).normalized()
    }

    pub fn save_doctor(&self, doctor: &DoctorInfo) -> Result<()> {
        self.save(DOCTOR_KEY, doctor)
    }

    pub fn load_style(&self) -> PrescriptionStyle {
        self.load_or_default(STYLE_KEY)
    }

    pub fn save_style(&self, style: &PrescriptionStyle) -> Result<()> {
        self.save(STYLE_KEY, style)
    }

    pub fn load_logo_history(&self) -> LogoHistory {
        self.load_or_default(LOGO_HISTORY_KEY)
    }

    pub fn save_logo_history(&self, history: &LogoHistory) -> Result<()> {
        self.save(LOGO_HISTORY_KEY, history)
    }

    /// Strict read: `Ok(None)` for a missing slot, `PersistenceRead` for a
    /// slot that cannot be read or parsed.
    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(text) = self
            .store
            .get(key)
            .map_err(|e| MedReceitaError::PersistenceRead {
                key: key.to_string(),
                reason: e.to_string(),
            })?
        else {
            return Ok(None);
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| MedReceitaError::PersistenceRead {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    #[instrument(skip(self))]
    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!("slot empty, using default");
                T::default()
            }
            Err(e) => {
                warn!(error = %e, "slot unreadable, using default");
                T::default()
            }
        }
    }

    #[instrument(skip(self, value))]
    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.store.set(key, &text)
    }
}
