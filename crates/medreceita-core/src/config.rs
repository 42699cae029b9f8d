// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`AppConfig::logo_service_url`].
pub const ENV_LOGO_URL: &str = "MEDRECEITA_LOGO_URL";
/// Environment variable overriding [`AppConfig::logo_service_token`].
pub const ENV_LOGO_TOKEN: &str = "MEDRECEITA_LOGO_TOKEN";

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Endpoint of the logo-generation service. When unset, logos are drawn
    /// by the built-in vector generator.
    pub logo_service_url: Option<String>,
    /// Bearer token sent to the logo-generation service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_service_token: Option<String>,
    /// Channel value at or above which a pixel counts as background (0-255).
    pub background_threshold: u8,
    /// Largest accepted logo upload, in bytes.
    pub max_upload_bytes: u64,
    /// How long the print page-size override stays applied after the print
    /// dialog is opened.
    pub print_restore_delay_ms: u64,
    /// Timeout for a single logo-generation request.
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logo_service_url: None,
            logo_service_token: None,
            background_threshold: 240,
            max_upload_bytes: 5 * 1024 * 1024,
            print_restore_delay_ms: 1000,
            request_timeout_secs: 60,
        }
    }
}

impl AppConfig {
    /// Apply overrides from a variable lookup (normally `std::env::var`).
    /// Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_LOGO_URL).filter(|v| !v.trim().is_empty()) {
            self.logo_service_url = Some(url);
        }
        if let Some(token) = lookup(ENV_LOGO_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.logo_service_token = Some(token);
        }
        self
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_upload_and_threshold_rules() {
        let config = AppConfig::default();
        assert_eq!(config.background_threshold, 240);
        assert_eq!(config.max_upload_bytes, 5_242_880);
        assert!(config.logo_service_url.is_none());
    }

    #[test]
    fn overrides_replace_endpoint_and_skip_blank_values() {
        let config = AppConfig::default().with_overrides(|key| match key {
            ENV_LOGO_URL => Some("https://logos.example/generate".into()),
            ENV_LOGO_TOKEN => Some("  ".into()),
            _ => None,
        });
        assert_eq!(
            config.logo_service_url.as_deref(),
            Some("https://logos.example/generate")
        );
        assert!(config.logo_service_token.is_none());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"background_threshold": 250}"#)
            .expect("partial config should parse");
        assert_eq!(config.background_threshold, 250);
        assert_eq!(config.print_restore_delay_ms, 1000);
    }
}
