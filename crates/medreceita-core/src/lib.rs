// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// MedReceita: Core types, style model and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod style;
pub mod types;
pub mod upload;

pub use config::AppConfig;
pub use error::{ErrorCategory, MedReceitaError, Result};
pub use style::*;
pub use types::*;
pub use upload::{UploadCandidate, mime_from_extension, validate_upload};
