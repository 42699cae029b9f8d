// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print surface backed by the Dioxus webview.

use dioxus::document;
use medreceita_core::error::Result;
use medreceita_print::{PRINT_SCRIPT, PrintSurface, inject_page_style_script, remove_page_style_script};

/// Runs the print sequence as scripts in the webview that shows the preview.
/// Must be used from inside a Dioxus component scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebviewPrintSurface;

impl PrintSurface for WebviewPrintSurface {
    fn apply_page_style(&self, css: &str) -> Result<()> {
        document::eval(&inject_page_style_script(css));
        Ok(())
    }

    fn open_print_dialog(&self) -> Result<()> {
        tracing::debug!("opening webview print dialog");
        document::eval(PRINT_SCRIPT);
        Ok(())
    }

    fn clear_page_style(&self) -> Result<()> {
        document::eval(&remove_page_style_script());
        Ok(())
    }
}
