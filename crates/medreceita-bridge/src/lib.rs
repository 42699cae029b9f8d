// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// MedReceita: native platform capabilities.
//
// The app asks the bridge first and falls back to its desktop path (webview
// print, `rfd` file dialog) when a capability reports `PlatformUnavailable`.

pub mod stub;
pub mod traits;

pub use traits::{NativeFilePicker, NativePrint, PlatformBridge};

/// The bridge for the running platform.
pub fn platform_bridge() -> Box<dyn PlatformBridge> {
    // Desktop builds have no native print or picker integration of their own.
    Box::new(stub::StubBridge)
}
