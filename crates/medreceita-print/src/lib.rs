// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// MedReceita Print: page-size override and the print sequence. The actual
// print dialog is reached through a `PrintSurface` supplied by the app (the
// desktop webview) so the sequence itself can be tested without a display.

pub mod job;
pub mod page;

pub use job::{PRINT_SCRIPT, PrintSurface, inject_page_style_script, print_document, remove_page_style_script};
pub use page::PageSetup;
