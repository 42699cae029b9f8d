// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout module: simple and dual-copy prescription layouts.

pub mod date;
pub mod html;
pub mod model;
pub mod simple;
pub mod special;
pub mod visuals;

use medreceita_core::style::PrescriptionStyle;
use medreceita_core::types::{BuyerInfo, DoctorInfo, PrescriptionData, PrescriptionType};

pub use date::format_date;
pub use html::{PRESCRIPTION_CSS, render_html};
pub use model::RenderedDocument;

/// Render the layout for `kind`. Buyer details are used only by the
/// dual-copy layout; a missing buyer prints blank lines.
pub fn render(
    kind: PrescriptionType,
    doctor: &DoctorInfo,
    prescription: &PrescriptionData,
    style: &PrescriptionStyle,
    buyer: Option<&BuyerInfo>,
) -> RenderedDocument {
    match kind {
        PrescriptionType::Simple => simple::render(doctor, prescription, style),
        PrescriptionType::Special => {
            let blank = BuyerInfo::default();
            special::render(doctor, prescription, style, buyer.unwrap_or(&blank))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medreceita_core::types::BuyerField;

    #[test]
    fn dispatches_on_type() {
        let doctor = DoctorInfo::default();
        let data = PrescriptionData::default();
        let style = PrescriptionStyle::default();
        let buyer = BuyerInfo::default().with_field(BuyerField::Name, "Carla");

        let simple = render(PrescriptionType::Simple, &doctor, &data, &style, Some(&buyer));
        assert_eq!(simple.panels.len(), 1);
        assert!(!simple.texts().iter().any(|t| t.contains("Carla")));

        let special = render(PrescriptionType::Special, &doctor, &data, &style, Some(&buyer));
        assert_eq!(special.panels.len(), 2);
        assert!(special.texts().contains(&"Nome: Carla".to_string()));

        let blank = render(PrescriptionType::Special, &doctor, &data, &style, None);
        assert!(blank.texts().contains(&"Nome: ________________".to_string()));
    }
}
