// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.

use medreceita_core::error::Result;

/// Every native capability the app can use.
pub trait PlatformBridge: NativePrint + NativeFilePicker + Send + Sync {
    /// Human-readable platform name.
    fn platform_name(&self) -> &str;
}

/// Send documents to the OS-level print dialog.
pub trait NativePrint {
    /// Whether [`NativePrint::show_print_dialog`] can succeed here. Callers
    /// check this before preparing a document.
    fn can_print_natively(&self) -> bool;

    /// Open the native print dialog for the given document bytes.
    /// Returns Ok(()) if the dialog was presented (user may still cancel).
    fn show_print_dialog(&self, document: &[u8], mime_type: &str) -> Result<()>;
}

/// Pick files from the device storage.
pub trait NativeFilePicker {
    /// Show a file picker filtered to the given MIME types.
    /// Returns the file path chosen, or None if cancelled.
    fn pick_file(&self, mime_types: &[&str]) -> Result<Option<String>>;

    /// Read the bytes of a previously picked file.
    fn read_picked_file(&self, path: &str) -> Result<Vec<u8>>;
}
