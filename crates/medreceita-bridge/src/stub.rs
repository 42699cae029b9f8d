// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop builds. Every capability reports
// `PlatformUnavailable` so callers take their desktop fallback.

use medreceita_core::error::{MedReceitaError, Result};

use crate::traits::*;

pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl NativePrint for StubBridge {
    fn can_print_natively(&self) -> bool {
        false
    }

    fn show_print_dialog(&self, document: &[u8], mime_type: &str) -> Result<()> {
        tracing::debug!(bytes = document.len(), mime_type, "no native print dialog on this platform");
        Err(MedReceitaError::PlatformUnavailable)
    }
}

impl NativeFilePicker for StubBridge {
    fn pick_file(&self, _mime_types: &[&str]) -> Result<Option<String>> {
        tracing::debug!("no native file picker on this platform");
        Err(MedReceitaError::PlatformUnavailable)
    }

    fn read_picked_file(&self, _path: &str) -> Result<Vec<u8>> {
        Err(MedReceitaError::PlatformUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_reports_every_capability_unavailable() {
        let bridge = crate::platform_bridge();
        assert_eq!(bridge.platform_name(), "Desktop (stub)");
        assert!(!bridge.can_print_natively());
        assert!(matches!(
            bridge.show_print_dialog(b"%PDF-1.7", "application/pdf"),
            Err(MedReceitaError::PlatformUnavailable)
        ));
        assert!(matches!(
            bridge.pick_file(&["image/*"]),
            Err(MedReceitaError::PlatformUnavailable)
        ));
        assert!(matches!(
            bridge.read_picked_file("/tmp/logo.png"),
            Err(MedReceitaError::PlatformUnavailable)
        ));
    }
}
