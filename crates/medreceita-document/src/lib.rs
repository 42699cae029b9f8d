// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// medreceita-document: Prescription rendering for MedReceita.
//
// Provides logo image processing (background removal, data URLs), the simple
// and dual-copy prescription layouts with their HTML preview, and a PDF writer
// for print-ready output.

pub mod image;
pub mod layout;
pub mod pdf;

// Re-export the primary entry points so callers can use `medreceita_document::render` etc.
pub use crate::image::asset::normalize_logo;
pub use crate::image::background::remove_background;
pub use crate::image::processor::{ImageProcessor, remove_background_from_data_url};
pub use crate::layout::model::RenderedDocument;
pub use crate::layout::{PRESCRIPTION_CSS, render, render_html};
pub use crate::pdf::writer::PdfWriter;
