// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Logo upload validation.

use crate::error::{MedReceitaError, Result};

/// A file the user picked as a logo, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub name: String,
    /// Declared MIME type.
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadCandidate {
    /// Build a candidate from a picked file, inferring the declared type from
    /// the file extension.
    pub fn from_file_name(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let ext = name.rsplit_once('.').map(|(_, e)| e).unwrap_or_default();
        Self {
            mime_type: mime_from_extension(ext).to_string(),
            name,
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn validate(&self, limit: u64) -> Result<()> {
        validate_upload(&self.mime_type, self.size(), limit)
    }
}

/// Reject anything that is not declared as an image, or is larger than
/// `limit` bytes. A file of exactly `limit` bytes is accepted.
pub fn validate_upload(mime_type: &str, size: u64, limit: u64) -> Result<()> {
    if !mime_type.trim().to_ascii_lowercase().starts_with("image/") {
        return Err(MedReceitaError::UnsupportedUpload(mime_type.to_string()));
    }
    if size > limit {
        return Err(MedReceitaError::UploadTooLarge { size, limit });
    }
    Ok(())
}

/// Declared type for a file extension.
pub fn mime_from_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    #[test]
    fn text_files_are_rejected() {
        let err = validate_upload("text/plain", 100, 5 * MIB).unwrap_err();
        assert!(matches!(err, MedReceitaError::UnsupportedUpload(m) if m == "text/plain"));
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(validate_upload("image/png", 5 * MIB, 5 * MIB).is_ok());
        assert!(validate_upload("image/png", 4 * MIB, 5 * MIB).is_ok());
        let err = validate_upload("image/png", 6 * MIB, 5 * MIB).unwrap_err();
        assert!(matches!(err, MedReceitaError::UploadTooLarge { size, .. } if size == 6 * MIB));
    }

    #[test]
    fn candidate_infers_type_from_name() {
        let candidate = UploadCandidate::from_file_name("logo.JPG", vec![0; 10]);
        assert_eq!(candidate.mime_type, "image/jpeg");
        assert!(candidate.validate(5 * MIB).is_ok());

        let notes = UploadCandidate::from_file_name("notes.txt", vec![0; 10]);
        assert!(notes.validate(5 * MIB).is_err());

        let bare = UploadCandidate::from_file_name("logo", vec![]);
        assert_eq!(bare.mime_type, "application/octet-stream");
    }
}
