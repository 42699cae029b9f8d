// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page setup for printing a prescription.

use medreceita_core::types::{Orientation, PaperSize, PrescriptionType};
use serde::{Deserialize, Serialize};

/// Paper, orientation and margins applied while printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSetup {
    pub paper: PaperSize,
    pub orientation: Orientation,
    pub margin_mm: u32,
}

impl PageSetup {
    /// A4 with zero margins; portrait for simple, landscape for special.
    pub fn for_type(kind: PrescriptionType) -> Self {
        Self {
            paper: PaperSize::A4,
            orientation: kind.orientation(),
            margin_mm: 0,
        }
    }

    /// Page size in millimetres, width first.
    pub fn dimensions_mm(&self) -> (u32, u32) {
        self.orientation.apply(self.paper.dimensions_mm())
    }

    /// The `@page` rule that forces this setup in the print dialog.
    pub fn css(&self) -> String {
        let margin = if self.margin_mm == 0 {
            "0".to_string()
        } else {
            format!("{}mm", self.margin_mm)
        };
        format!(
            "@page {{ size: {} {}; margin: {margin}; }}",
            self.paper.css_keyword(),
            self.orientation.css_keyword()
        )
    }
}
