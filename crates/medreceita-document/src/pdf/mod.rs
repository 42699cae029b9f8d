// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: print-ready output for rendered prescriptions.

pub mod color;
pub mod writer;

pub use writer::PdfWriter;
