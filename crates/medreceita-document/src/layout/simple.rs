// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-page portrait prescription.

use medreceita_core::style::PrescriptionStyle;
use medreceita_core::types::{DoctorInfo, PrescriptionData, PrescriptionType};
use tracing::{debug, instrument};

use super::date::format_date;
use super::model::{
    BlendMode, Block, Field, LogoMark, PageGeometry, Panel, PanelSlot, RenderedDocument, Surface,
    Typography, or_blank, place_logo,
};
use super::visuals::{Align, header_align};

pub const PAGE_PADDING_MM: f32 = 15.0;
pub const DOCTOR_PLACEHOLDER: &str = "Nome do Médico";
pub const BODY_TITLE: &str = "RECEITUÁRIO";
pub const BODY_PLACEHOLDER: &str = "Prescrição médica...";

#[instrument(skip_all)]
pub fn render(
    doctor: &DoctorInfo,
    prescription: &PrescriptionData,
    style: &PrescriptionStyle,
) -> RenderedDocument {
    let kind = PrescriptionType::Simple;
    let page = PageGeometry::for_type(kind);
    let (header_logo, watermark) = place_logo(style.resolved_logo(kind), BlendMode::Multiply);

    let blocks = vec![
        header(doctor, style, header_logo),
        patient(prescription),
        Block::Body {
            title: BODY_TITLE.into(),
            title_align: Align::Center,
            boxed: false,
            text: or_blank(&prescription.prescription, BODY_PLACEHOLDER),
        },
        Block::SignatureFooter {
            place_date: format!("{}, {}", doctor.city, format_date(&prescription.date)),
            name: doctor.name.clone(),
            license: format!("CRM: {}/{}", doctor.crm, doctor.uf),
        },
    ];
    debug!(blocks = blocks.len(), "simple layout composed");

    RenderedDocument {
        kind,
        page,
        surface: Surface::from_style(style),
        panels: vec![PanelSlot {
            x_mm: 0.0,
            width_mm: page.width_mm,
            padding_mm: PAGE_PADDING_MM,
            typography: Typography::FULL_PAGE,
            divider_right: false,
            panel: Panel {
                via: None,
                watermark,
                blocks,
            },
        }],
        cut_line: None,
    }
}

fn header(doctor: &DoctorInfo, style: &PrescriptionStyle, logo: Option<LogoMark>) -> Block {
    let mut lines = vec![format!(
        "CRM: {}/{}",
        or_blank(&doctor.crm, "______"),
        or_blank(&doctor.uf, "__")
    )];
    if !doctor.address.is_empty() {
        lines.push(doctor.address.clone());
    }
    if !doctor.city.is_empty() {
        lines.push(format!("{} - {}", doctor.city, doctor.state));
    }
    if !doctor.phone.is_empty() {
        lines.push(format!("Tel: {}", doctor.phone));
    }

    Block::Header {
        align: header_align(style.effective_header_position()),
        logo,
        title: or_blank(&doctor.name, DOCTOR_PLACEHOLDER),
        subtitle: Some(doctor.specialty.clone()).filter(|s| !s.is_empty()),
        lines,
    }
}

fn patient(prescription: &PrescriptionData) -> Block {
    let mut rows = vec![vec![Field::underlined(
        "Paciente:",
        prescription.patient.name.clone(),
    )]];
    if !prescription.patient.address.is_empty() {
        rows.push(vec![Field::underlined(
            "Endereço:",
            prescription.patient.address.clone(),
        )]);
    }
    Block::Section {
        title: None,
        boxed: false,
        muted: false,
        logo: None,
        rows,
        caption: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medreceita_core::style::{HeaderPosition, LogoPosition, StyleEdit};
    use medreceita_core::types::{DoctorField, PatientField};

    fn ana() -> DoctorInfo {
        DoctorInfo::default()
            .with_field(DoctorField::Name, "Dr. Ana Souza")
            .with_field(DoctorField::Crm, "55512")
            .with_field(DoctorField::Uf, "sp")
            .with_field(DoctorField::City, "Campinas")
            .with_field(DoctorField::State, "sp")
    }

    fn header_lines(doc: &RenderedDocument) -> (String, Vec<String>, Align, Option<LogoMark>) {
        match &doc.panels[0].panel.blocks[0] {
            Block::Header {
                title,
                lines,
                align,
                logo,
                ..
            } => (title.clone(), lines.clone(), *align, logo.clone()),
            other => panic!("expected header, got {other:?}"),
        }
    }

    #[test]
    fn header_shows_normalised_licence() {
        let doc = render(&ana(), &PrescriptionData::default(), &PrescriptionStyle::default());
        let (title, lines, align, _) = header_lines(&doc);
        assert_eq!(title, "Dr. Ana Souza");
        assert_eq!(lines[0], "CRM: 55512/SP");
        assert_eq!(lines[1], "Campinas - SP");
        assert_eq!(align, Align::Center);
    }

    #[test]
    fn blank_doctor_gets_placeholders() {
        let doc = render(
            &DoctorInfo::default(),
            &PrescriptionData::default(),
            &PrescriptionStyle::default(),
        );
        let (title, lines, _, _) = header_lines(&doc);
        assert_eq!(title, DOCTOR_PLACEHOLDER);
        assert_eq!(lines, vec!["CRM: ______/__".to_string()]);
    }

    #[test]
    fn footer_date_formatting() {
        let data = PrescriptionData::default().with_date("2024-03-05");
        let doc = render(&ana(), &data, &PrescriptionStyle::default());
        assert!(doc.texts().contains(&"Campinas, 05/03/2024".to_string()));

        let data = PrescriptionData::default().with_date("");
        let doc = render(&ana(), &data, &PrescriptionStyle::default());
        match doc.panels[0].panel.blocks.last() {
            Some(Block::SignatureFooter { place_date, license, .. }) => {
                assert_eq!(place_date, "Campinas, ");
                assert_eq!(license, "CRM: 55512/SP");
            }
            other => panic!("expected footer, got {other:?}"),
        }
    }

    #[test]
    fn body_keeps_line_breaks_or_shows_placeholder() {
        let doc = render(&ana(), &PrescriptionData::default(), &PrescriptionStyle::default());
        assert!(doc.texts().contains(&BODY_PLACEHOLDER.to_string()));

        let text = "1) Amoxicilina 500mg\n   Tomar 1 cápsula 8/8h";
        let data = PrescriptionData::default().with_prescription(text);
        let doc = render(&ana(), &data, &PrescriptionStyle::default());
        assert!(doc.texts().contains(&text.to_string()));
    }

    #[test]
    fn patient_address_row_only_when_present() {
        let data = PrescriptionData::default().with_patient_field(PatientField::Name, "Maria");
        let doc = render(&ana(), &data, &PrescriptionStyle::default());
        match &doc.panels[0].panel.blocks[1] {
            Block::Section { rows, .. } => assert_eq!(rows.len(), 1),
            other => panic!("expected section, got {other:?}"),
        }
    }

    #[test]
    fn watermark_is_full_size_with_multiply_blend() {
        let style = PrescriptionStyle::default()
            .apply(StyleEdit::Logo(Some("data:image/png;base64,AAAA".into())))
            .apply(StyleEdit::LogoPosition(Some(LogoPosition::Watermark)))
            .apply(StyleEdit::HeaderPosition(Some(HeaderPosition::Right)));
        let doc = render(&ana(), &PrescriptionData::default(), &style);

        let watermark = doc.panels[0].panel.watermark.clone().unwrap();
        assert_eq!(watermark.size_px, 250.0);
        assert_eq!(watermark.blend, BlendMode::Multiply);
        let (_, _, align, logo) = header_lines(&doc);
        assert!(logo.is_none());
        assert_eq!(align, Align::Right);
    }

    #[test]
    fn header_logo_defaults_to_sixty_pixels() {
        let style = PrescriptionStyle::default()
            .apply(StyleEdit::Logo(Some("data:image/png;base64,AAAA".into())));
        let doc = render(&ana(), &PrescriptionData::default(), &style);
        let (_, _, _, logo) = header_lines(&doc);
        assert_eq!(logo.unwrap().size_px, 60.0);
        assert!(doc.panels[0].panel.watermark.is_none());
    }

    #[test]
    fn page_is_a4_portrait() {
        let doc = render(&ana(), &PrescriptionData::default(), &PrescriptionStyle::default());
        assert_eq!((doc.page.width_mm, doc.page.height_mm), (210.0, 297.0));
        assert!(doc.cut_line.is_none());
    }
}
