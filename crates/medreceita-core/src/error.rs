// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for MedReceita.

use thiserror::Error;

/// Top-level error type for all MedReceita operations.
#[derive(Debug, Error)]
pub enum MedReceitaError {
    // -- Validation errors --
    #[error("unsupported upload type: {0}")]
    UnsupportedUpload(String),

    #[error("upload too large: {size} bytes (limit {limit})")]
    UploadTooLarge { size: u64, limit: u64 },

    #[error("logo prompt is empty")]
    EmptyPrompt,

    // -- Image errors --
    #[error("image could not be loaded: {0}")]
    Load(String),

    #[error("raster surface unavailable: {0}")]
    RenderContext(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Logo service errors --
    #[error("logo service rate limit exceeded")]
    RateLimited,

    #[error("logo service requires payment")]
    PaymentRequired,

    #[error("logo service failed: {0}")]
    RemoteService(String),

    // -- Storage / persistence --
    #[error("stored value for {key} is unreadable: {reason}")]
    PersistenceRead { key: String, reason: String },

    #[error("database error: {0}")]
    Database(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Output --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Session --
    #[error("{0} already in progress")]
    Busy(&'static str),
}

/// Coarse failure classes. Every class is recoverable; they differ only in
/// how the session reacts and whether the user is told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad upload or prompt. Notice shown, no state mutation.
    Validation,
    /// Image failed to load or decode. Notice shown, busy state reset.
    Decode,
    /// Logo service failure. Notice shown, no retry.
    RemoteService,
    /// Corrupt or missing stored value. Replaced by a default silently.
    PersistenceRead,
    /// Output, storage write or platform failure.
    Platform,
}

impl MedReceitaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedUpload(_)
            | Self::UploadTooLarge { .. }
            | Self::EmptyPrompt
            | Self::Busy(_) => ErrorCategory::Validation,
            Self::Load(_) | Self::RenderContext(_) | Self::ImageError(_) => ErrorCategory::Decode,
            Self::RateLimited | Self::PaymentRequired | Self::RemoteService(_) => {
                ErrorCategory::RemoteService
            }
            Self::PersistenceRead { .. } | Self::Serialization(_) => {
                ErrorCategory::PersistenceRead
            }
            Self::Database(_)
            | Self::Io(_)
            | Self::PdfError(_)
            | Self::Bridge(_)
            | Self::PlatformUnavailable => ErrorCategory::Platform,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MedReceitaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_errors_are_validation() {
        let err = MedReceitaError::UploadTooLarge {
            size: 6 * 1024 * 1024,
            limit: 5 * 1024 * 1024,
        };
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(
            MedReceitaError::UnsupportedUpload("text/plain".into()).category(),
            ErrorCategory::Validation
        );
    }

    #[test]
    fn remote_statuses_share_a_category() {
        for err in [
            MedReceitaError::RateLimited,
            MedReceitaError::PaymentRequired,
            MedReceitaError::RemoteService("500".into()),
        ] {
            assert_eq!(err.category(), ErrorCategory::RemoteService);
        }
    }
}
