// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `data:` URL encoding and decoding.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use medreceita_core::error::{MedReceitaError, Result};

/// A decoded `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    pub fn is_svg(&self) -> bool {
        self.mime_type.eq_ignore_ascii_case("image/svg+xml")
    }
}

/// Encode bytes as a base64 `data:` URL.
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// Decode a `data:` URL. Non-base64 payloads are taken as literal text.
pub fn decode(url: &str) -> Result<DataUrl> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| MedReceitaError::Load("not a data URL".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| MedReceitaError::Load("data URL has no payload".into()))?;

    let mut params = header.split(';');
    let mime_type = match params.next() {
        Some(m) if !m.is_empty() => m.to_ascii_lowercase(),
        _ => "text/plain".to_string(),
    };
    let is_base64 = params.any(|p| p.eq_ignore_ascii_case("base64"));

    let bytes = if is_base64 {
        STANDARD
            .decode(payload.trim())
            .map_err(|e| MedReceitaError::Load(format!("invalid base64 payload: {e}")))?
    } else {
        payload.as_bytes().to_vec()
    };

    Ok(DataUrl { mime_type, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_and_decodes_png_url() {
        let url = encode("image/png", &[1, 2, 3]);
        assert_eq!(url, "data:image/png;base64,AQID");
        let decoded = decode(&url).unwrap();
        assert_eq!(decoded.mime_type, "image/png");
        assert_eq!(decoded.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn literal_svg_payload_is_kept() {
        let decoded = decode("data:image/svg+xml;utf8,<svg/>").unwrap();
        assert!(decoded.is_svg());
        assert_eq!(decoded.bytes, b"<svg/>");
    }

    #[test]
    fn rejects_non_data_urls_and_bad_base64() {
        assert!(matches!(
            decode("https://example.com/logo.png"),
            Err(MedReceitaError::Load(_))
        ));
        assert!(matches!(
            decode("data:image/png;base64,***"),
            Err(MedReceitaError::Load(_))
        ));
        assert!(decode("data:image/png;base64").is_err());
    }
}
