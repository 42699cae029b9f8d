// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The print sequence: force the page size, open the platform print dialog,
// then drop the override again shortly afterwards.

use std::time::Duration;

use medreceita_core::error::Result;
use tracing::{info, instrument, warn};

use crate::page::PageSetup;

/// `id` of the temporary `<style>` element holding the `@page` rule.
pub const PAGE_STYLE_ELEMENT_ID: &str = "medreceita-print-page-style";

/// Opens the browser/webview print dialog for the current document.
pub const PRINT_SCRIPT: &str = "window.print();";

/// Where the print sequence runs. The desktop app implements this over the
/// webview; tests use a recording fake.
pub trait PrintSurface {
    /// Install `css` as a temporary page-size override.
    fn apply_page_style(&self, css: &str) -> Result<()>;
    fn open_print_dialog(&self) -> Result<()>;
    /// Remove the override installed by [`PrintSurface::apply_page_style`].
    fn clear_page_style(&self) -> Result<()>;
}

/// Run the print sequence. The page-size override is always cleared, even
/// when the dialog cannot be opened; that error is returned afterwards.
#[instrument(skip(surface), fields(orientation = ?setup.orientation))]
pub async fn print_document(
    surface: &impl PrintSurface,
    setup: &PageSetup,
    restore_after: Duration,
) -> Result<()> {
    surface.apply_page_style(&setup.css())?;

    let opened = surface.open_print_dialog();
    match &opened {
        Ok(()) => {
            info!("print dialog opened");
            tokio::time::sleep(restore_after).await;
        }
        Err(e) => warn!(error = %e, "print dialog failed to open"),
    }

    let cleared = surface.clear_page_style();
    if let Err(e) = &cleared {
        warn!(error = %e, "page style override could not be removed");
    }
    opened?;
    cleared
}

/// JavaScript that installs (or replaces) the `@page` override.
pub fn inject_page_style_script(css: &str) -> String {
    // A JSON string literal is also a valid JS string literal.
    let css_literal = serde_json::Value::String(css.to_string()).to_string();
    format!(
        "(function() {{\
         var el = document.getElementById('{PAGE_STYLE_ELEMENT_ID}');\
         if (!el) {{ el = document.createElement('style'); el.id = '{PAGE_STYLE_ELEMENT_ID}'; document.head.appendChild(el); }}\
         el.textContent = {css_literal};\
         }})();"
    )
}

/// JavaScript that removes the `@page` override if present.
pub fn remove_page_style_script() -> String {
    format!(
        "(function() {{\
         var el = document.getElementById('{PAGE_STYLE_ELEMENT_ID}');\
         if (el) {{ el.remove(); }}\
         }})();"
    )
}
