// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the prescription pad generator.
//
// All entities are plain values. Editors never mutate them in place: every
// `with_*` method consumes the old value and returns the replacement.

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Uppercase a two-letter region code and drop anything past two characters.
pub fn normalize_region(value: &str) -> String {
    value.trim().to_uppercase().chars().take(2).collect()
}

// ---------------------------------------------------------------------------
// Doctor
// ---------------------------------------------------------------------------

/// Issuing physician, shown in every header and signature block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DoctorInfo {
    pub name: String,
    /// Medical council licence number.
    pub crm: String,
    /// Region that issued the licence (two letters).
    pub uf: String,
    pub specialty: String,
    pub address: String,
    pub city: String,
    /// Region of the practice address (two letters).
    pub state: String,
    pub phone: String,
    pub email: String,
}

/// Editable fields of [`DoctorInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorField {
    Name,
    Crm,
    Uf,
    Specialty,
    Address,
    City,
    State,
    Phone,
    Email,
}

impl DoctorInfo {
    /// Return a copy with one field replaced. Region codes are normalised.
    pub fn with_field(self, field: DoctorField, value: &str) -> Self {
        let value = value.to_string();
        match field {
            DoctorField::Name => Self { name: value, ..self },
            DoctorField::Crm => Self { crm: value, ..self },
            DoctorField::Uf => Self {
                uf: normalize_region(&value),
                ..self
            },
            DoctorField::Specialty => Self {
                specialty: value,
                ..self
            },
            DoctorField::Address => Self {
                address: value,
                ..self
            },
            DoctorField::City => Self { city: value, ..self },
            DoctorField::State => Self {
                state: normalize_region(&value),
                ..self
            },
            DoctorField::Phone => Self { phone: value, ..self },
            DoctorField::Email => Self { email: value, ..self },
        }
    }

    /// Normalise region codes on a value that was replaced wholesale.
    pub fn normalized(self) -> Self {
        Self {
            uf: normalize_region(&self.uf),
            state: normalize_region(&self.state),
            ..self
        }
    }
}

// ---------------------------------------------------------------------------
// Patient / prescription
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatientInfo {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientField {
    Name,
    Address,
}

/// Patient, free-text prescription body and issue date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrescriptionData {
    pub patient: PatientInfo,
    pub prescription: String,
    /// ISO date (`YYYY-MM-DD`), may be empty.
    pub date: String,
}

impl Default for PrescriptionData {
    fn default() -> Self {
        Self {
            patient: PatientInfo::default(),
            prescription: String::new(),
            date: today(),
        }
    }
}

impl PrescriptionData {
    pub fn with_patient_field(self, field: PatientField, value: &str) -> Self {
        let patient = match field {
            PatientField::Name => PatientInfo {
                name: value.to_string(),
                ..self.patient
            },
            PatientField::Address => PatientInfo {
                address: value.to_string(),
                ..self.patient
            },
        };
        Self { patient, ..self }
    }

    pub fn with_prescription(self, text: &str) -> Self {
        Self {
            prescription: text.to_string(),
            ..self
        }
    }

    pub fn with_date(self, date: &str) -> Self {
        Self {
            date: date.trim().to_string(),
            ..self
        }
    }
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

// ---------------------------------------------------------------------------
// Buyer (controlled prescriptions only)
// ---------------------------------------------------------------------------

/// Purchaser identification, filled in at the pharmacy counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuyerInfo {
    pub name: String,
    /// Identity document number.
    pub rg: String,
    /// Authority that issued the identity document.
    pub orgao_emissor: String,
    pub address: String,
    pub city: String,
    pub uf: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuyerField {
    Name,
    Rg,
    OrgaoEmissor,
    Address,
    City,
    Uf,
    Phone,
}

impl BuyerInfo {
    pub fn with_field(self, field: BuyerField, value: &str) -> Self {
        let value = value.to_string();
        match field {
            BuyerField::Name => Self { name: value, ..self },
            BuyerField::Rg => Self { rg: value, ..self },
            BuyerField::OrgaoEmissor => Self {
                orgao_emissor: value,
                ..self
            },
            BuyerField::Address => Self {
                address: value,
                ..self
            },
            BuyerField::City => Self { city: value, ..self },
            BuyerField::Uf => Self {
                uf: normalize_region(&value),
                ..self
            },
            BuyerField::Phone => Self { phone: value, ..self },
        }
    }
}

// ---------------------------------------------------------------------------
// Document type / paper
// ---------------------------------------------------------------------------

/// Which template is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrescriptionType {
    /// Single-page portrait prescription.
    #[default]
    Simple,
    /// Dual-copy landscape prescription for controlled medication.
    Special,
}

impl PrescriptionType {
    pub fn orientation(&self) -> Orientation {
        match self {
            Self::Simple => Orientation::Portrait,
            Self::Special => Orientation::Landscape,
        }
    }

    /// Short label for the preview badge.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Simple => "A4 Retrato",
            Self::Special => "A4 Paisagem (2 vias)",
        }
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
}

impl PaperSize {
    /// Portrait dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
        }
    }

    /// CSS `@page size` keyword.
    pub fn css_keyword(&self) -> &'static str {
        match self {
            Self::A4 => "A4",
        }
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn css_keyword(&self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }

    /// Orient a portrait (width, height) pair.
    pub fn apply(&self, (w, h): (u32, u32)) -> (u32, u32) {
        match self {
            Self::Portrait => (w.min(h), w.max(h)),
            Self::Landscape => (w.max(h), w.min(h)),
        }
    }
}

// ---------------------------------------------------------------------------
// Logo history
// ---------------------------------------------------------------------------

/// A logo the user uploaded or generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoHistoryItem {
    pub id: String,
    /// Displayable image (data URL).
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// RFC 3339 timestamp.
    pub created_at: String,
    pub is_uploaded: bool,
}

impl LogoHistoryItem {
    pub fn uploaded(url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            prompt: None,
            created_at: Utc::now().to_rfc3339(),
            is_uploaded: true,
        }
    }

    pub fn generated(url: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            prompt: Some(prompt.into()),
            created_at: Utc::now().to_rfc3339(),
            is_uploaded: false,
        }
    }

    /// Caption for the history grid: "Upload" or the first 15 characters of
    /// the prompt.
    pub fn caption(&self) -> String {
        if self.is_uploaded {
            return "Upload".into();
        }
        let prompt = self.prompt.as_deref().unwrap_or_default();
        let head: String = prompt.chars().take(15).collect();
        format!("{head}...")
    }
}

/// Ordered, append-only list of logos. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogoHistory(Vec<LogoHistoryItem>);

impl LogoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: LogoHistoryItem) {
        self.0.push(item);
    }

    /// Remove the item with `id`. Returns the removed item if it existed.
    pub fn remove(&mut self, id: &str) -> Option<LogoHistoryItem> {
        let index = self.0.iter().position(|item| item.id == id)?;
        Some(self.0.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&LogoHistoryItem> {
        self.0.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[LogoHistoryItem] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<LogoHistoryItem>> for LogoHistory {
    fn from(items: Vec<LogoHistoryItem>) -> Self {
        Self(items)
    }
}

// ---------------------------------------------------------------------------
// Logo assets at the generation boundary
// ---------------------------------------------------------------------------

/// Where raster logo bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterSource {
    /// Encoded image bytes (PNG, JPEG, ...).
    Bytes(Vec<u8>),
    /// A `data:` URL carrying base64 image bytes.
    DataUrl(String),
}

/// A logo as produced by a generator or upload, before normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoAsset {
    Raster(RasterSource),
    /// Inline SVG markup.
    Vector(String),
}

/// Whether `bytes` hold SVG markup, optionally behind a BOM, an XML
/// declaration or comments.
pub fn is_svg_markup(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    if text.starts_with("<svg") {
        return true;
    }
    (text.starts_with("<?xml") || text.starts_with("<!--") || text.starts_with("<!DOCTYPE svg"))
        && text.contains("<svg")
}
