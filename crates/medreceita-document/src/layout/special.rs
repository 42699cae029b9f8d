// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dual-copy landscape prescription for controlled medication.
//
// The page holds two half-width copies of one sub-layout separated by a cut
// line. Both copies are built from the same block list; only the via label
// differs.

use medreceita_core::style::PrescriptionStyle;
use medreceita_core::types::{BuyerInfo, DoctorInfo, PrescriptionData, PrescriptionType};
use tracing::{debug, instrument};

use super::date::{BLANK_DATE, format_date_or_blank};
use super::model::{
    BlendMode, Block, CutLine, Field, LogoMark, PageGeometry, Panel, PanelSlot, RenderedDocument,
    Surface, Typography, or_blank, place_logo,
};
use super::visuals::Align;

pub const PANEL_PADDING_MM: f32 = 6.0;
pub const BANNER: &str = "RECEITUÁRIO DE CONTROLE ESPECIAL";
pub const PHARMACY_VIA: &str = "1ª Via - Farmácia";
pub const PATIENT_VIA: &str = "2ª Via - Paciente";
pub const CUT_LABEL: &str = "✂ Recortar";

#[instrument(skip_all)]
pub fn render(
    doctor: &DoctorInfo,
    prescription: &PrescriptionData,
    style: &PrescriptionStyle,
    buyer: &BuyerInfo,
) -> RenderedDocument {
    let kind = PrescriptionType::Special;
    let page = PageGeometry::for_type(kind);
    let half = page.width_mm / 2.0;

    let (header_logo, watermark) = place_logo(style.resolved_logo(kind), BlendMode::Normal);
    let blocks = single_copy(doctor, prescription, buyer, header_logo);
    debug!(blocks = blocks.len(), "dual-copy layout composed");

    let slot = |x_mm: f32, via: &str, divider_right: bool| PanelSlot {
        x_mm,
        width_mm: half,
        padding_mm: PANEL_PADDING_MM,
        typography: Typography::HALF_PAGE,
        divider_right,
        panel: Panel {
            via: Some(via.to_string()),
            watermark: watermark.clone(),
            blocks: blocks.clone(),
        },
    };

    RenderedDocument {
        kind,
        page,
        surface: Surface::from_style(style),
        panels: vec![slot(0.0, PHARMACY_VIA, true), slot(half, PATIENT_VIA, false)],
        cut_line: Some(CutLine {
            x_mm: half,
            label: CUT_LABEL.into(),
        }),
    }
}

fn single_copy(
    doctor: &DoctorInfo,
    prescription: &PrescriptionData,
    buyer: &BuyerInfo,
    logo: Option<LogoMark>,
) -> Vec<Block> {
    vec![
        Block::Banner {
            text: BANNER.into(),
        },
        Block::ViaLabel,
        issuer(doctor, logo),
        Block::Section {
            title: None,
            boxed: false,
            muted: false,
            logo: None,
            rows: vec![
                vec![Field::underlined("Paciente:", prescription.patient.name.clone())],
                vec![Field::underlined("Endereço:", prescription.patient.address.clone())],
            ],
            caption: None,
        },
        Block::Body {
            title: "Prescrição:".into(),
            title_align: Align::Left,
            boxed: true,
            text: prescription.prescription.clone(),
        },
        Block::DateSignature {
            date: format!("Data: {}", format_date_or_blank(&prescription.date)),
            caption: "Carimbo / Assinatura".into(),
        },
        Block::Columns(vec![buyer_box(buyer), supplier_box()]),
    ]
}

fn issuer(doctor: &DoctorInfo, logo: Option<LogoMark>) -> Block {
    Block::Section {
        title: Some("IDENTIFICAÇÃO DO EMITENTE".into()),
        boxed: true,
        muted: false,
        logo,
        rows: vec![
            vec![Field::new("Nome:", or_blank(&doctor.name, "_________________"))],
            vec![
                Field::new("CRM:", or_blank(&doctor.crm, "______")),
                Field::new("UF:", or_blank(&doctor.uf, "__")),
            ],
            vec![Field::new(
                "Endereço:",
                or_blank(&doctor.address, "_________________"),
            )],
            vec![
                Field::new("Cidade:", or_blank(&doctor.city, "_________")),
                Field::new("UF:", or_blank(&doctor.state, "__")),
            ],
            vec![Field::new("Fone:", or_blank(&doctor.phone, "_____________"))],
        ],
        caption: None,
    }
}

fn buyer_box(buyer: &BuyerInfo) -> Block {
    Block::Section {
        title: Some("IDENTIFICAÇÃO DO COMPRADOR".into()),
        boxed: true,
        muted: false,
        logo: None,
        rows: vec![
            vec![Field::new("Nome:", or_blank(&buyer.name, "________________"))],
            vec![
                Field::new("Ident.:", or_blank(&buyer.rg, "_______")),
                Field::new("Órg. Emissor:", or_blank(&buyer.orgao_emissor, "_____")),
            ],
            vec![Field::new(
                "Endereço:",
                or_blank(&buyer.address, "_______________"),
            )],
            vec![
                Field::new("Cidade:", or_blank(&buyer.city, "_______")),
                Field::new("UF:", or_blank(&buyer.uf, "__")),
            ],
            vec![Field::new("Fone:", or_blank(&buyer.phone, "____________"))],
        ],
        caption: None,
    }
}

fn supplier_box() -> Block {
    Block::Section {
        title: Some("IDENTIFICAÇÃO DO FORNECEDOR".into()),
        boxed: true,
        muted: true,
        logo: None,
        rows: vec![
            vec![Field::new("Nome:", "________________")],
            vec![],
            vec![],
            vec![Field::new("Data:", BLANK_DATE)],
        ],
        caption: Some("Assinatura do Farmacêutico".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medreceita_core::style::{LogoPosition, StyleEdit};
    use medreceita_core::types::{BuyerField, DoctorField, PatientField};

    fn filled() -> (DoctorInfo, PrescriptionData, BuyerInfo) {
        let doctor = DoctorInfo::default()
            .with_field(DoctorField::Name, "Dr. Ana Souza")
            .with_field(DoctorField::Crm, "55512")
            .with_field(DoctorField::Uf, "sp");
        let data = PrescriptionData::default()
            .with_patient_field(PatientField::Name, "João Lima")
            .with_prescription("Clonazepam 2mg\n1 comprimido à noite")
            .with_date("2024-03-05");
        let buyer = BuyerInfo::default()
            .with_field(BuyerField::Name, "Carla Lima")
            .with_field(BuyerField::Uf, "rj");
        (doctor, data, buyer)
    }

    #[test]
    fn copies_differ_only_in_via_label() {
        let (doctor, data, buyer) = filled();
        let style = PrescriptionStyle::default()
            .apply(StyleEdit::Logo(Some("data:image/png;base64,AAAA".into())));
        let doc = render(&doctor, &data, &style, &buyer);

        assert_eq!(doc.panels.len(), 2);
        let mut first = doc.panels[0].panel.clone();
        let mut second = doc.panels[1].panel.clone();
        assert_eq!(first.via.as_deref(), Some(PHARMACY_VIA));
        assert_eq!(second.via.as_deref(), Some(PATIENT_VIA));
        first.via = None;
        second.via = None;
        assert_eq!(first, second);
    }

    #[test]
    fn halves_split_a_landscape_page() {
        let (doctor, data, buyer) = filled();
        let doc = render(&doctor, &data, &PrescriptionStyle::default(), &buyer);
        assert_eq!((doc.page.width_mm, doc.page.height_mm), (297.0, 210.0));
        assert_eq!(doc.panels[1].x_mm, 148.5);
        let cut = doc.cut_line.as_ref().unwrap();
        assert_eq!(cut.x_mm, 148.5);
        assert_eq!(cut.label, CUT_LABEL);
        assert!(doc.panels[0].divider_right);
    }

    #[test]
    fn blank_fields_get_placeholder_lines() {
        let doc = render(
            &DoctorInfo::default(),
            &PrescriptionData::default().with_date(""),
            &PrescriptionStyle::default(),
            &BuyerInfo::default(),
        );
        let texts = doc.texts();
        assert!(texts.contains(&"Nome: _________________".to_string()));
        assert!(texts.contains(&"Ident.: _______".to_string()));
        assert!(texts.contains(&"Data: ___/___/______".to_string()));
        assert!(texts.contains(&"Assinatura do Farmacêutico".to_string()));
    }

    #[test]
    fn filled_values_and_date_are_shown() {
        let (doctor, data, buyer) = filled();
        let texts = render(&doctor, &data, &PrescriptionStyle::default(), &buyer).texts();
        assert!(texts.contains(&"CRM: 55512".to_string()));
        assert!(texts.contains(&"UF: SP".to_string()));
        assert!(texts.contains(&"UF: RJ".to_string()));
        assert!(texts.contains(&"Data: 05/03/2024".to_string()));
        assert!(texts.contains(&"Nome: Carla Lima".to_string()));
    }

    #[test]
    fn logo_sizes_are_halved() {
        let (doctor, data, buyer) = filled();
        let style = PrescriptionStyle::default()
            .apply(StyleEdit::Logo(Some("data:image/png;base64,AAAA".into())))
            .apply(StyleEdit::LogoPosition(Some(LogoPosition::Watermark)));
        let doc = render(&doctor, &data, &style, &buyer);
        let watermark = doc.panels[0].panel.watermark.as_ref().unwrap();
        assert_eq!(watermark.size_px, 125.0);
        assert_eq!(watermark.blend, BlendMode::Normal);

        let style = style.apply(StyleEdit::LogoPosition(None));
        let doc = render(&doctor, &data, &style, &buyer);
        match &doc.panels[0].panel.blocks[2] {
            Block::Section { logo, .. } => assert_eq!(logo.as_ref().unwrap().size_px, 30.0),
            other => panic!("expected issuer section, got {other:?}"),
        }
    }
}
