// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Prescription page: patient, date and the free-text prescription. Buyer
// fields appear only for the controlled (dual-copy) layout. Nothing here is
// persisted.

use dioxus::prelude::*;

use medreceita_core::types::{BuyerField, PatientField, PrescriptionType};

use super::form::{Section, TextArea, TextField};
use crate::state::AppState;

#[component]
pub fn Prescription() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let (data, buyer, kind) = {
        let s = state.read();
        (
            s.session.prescription().clone(),
            s.session.buyer().clone(),
            s.session.prescription_type(),
        )
    };

    rsx! {
        div { style: "max-width: 640px; margin: 0 auto;",
            h1 { "Receita" }

            Section { title: "Paciente",
                TextField {
                    label: "Nome do paciente",
                    value: data.patient.name,
                    on_input: move |v: String| state.write().session.edit_patient(PatientField::Name, &v),
                }
                TextField {
                    label: "Endereço do paciente",
                    value: data.patient.address,
                    on_input: move |v: String| state.write().session.edit_patient(PatientField::Address, &v),
                }
                label { style: "display: block; margin-bottom: 12px;",
                    span { style: "display: block; font-size: 13px; color: #555; margin-bottom: 4px;", "Data" }
                    input {
                        r#type: "date",
                        style: "padding: 8px; border: 1px solid #ccc; border-radius: 6px;",
                        value: "{data.date}",
                        onchange: move |evt| state.write().session.edit_date(&evt.value()),
                    }
                }
            }

            Section { title: "Prescrição",
                TextArea {
                    label: "Medicamentos e orientações",
                    value: data.prescription,
                    rows: 12,
                    placeholder: "1. Medicamento 500mg ........ 1 caixa\n   Tomar 1 comprimido de 8/8 horas por 7 dias.",
                    on_input: move |v: String| state.write().session.edit_prescription_text(&v),
                }
            }

            if kind == PrescriptionType::Special {
                Section { title: "Identificação do Comprador",
                    p { style: "color: #666; font-size: 13px; margin-top: 0;",
                        "Opcional. Campos vazios saem em branco para preenchimento na farmácia."
                    }
                    BuyerInput { label: "Nome", field: BuyerField::Name, value: buyer.name }
                    div { style: "display: grid; grid-template-columns: 1fr 1fr; gap: 12px;",
                        BuyerInput { label: "RG", field: BuyerField::Rg, value: buyer.rg }
                        BuyerInput { label: "Órgão emissor", field: BuyerField::OrgaoEmissor, value: buyer.orgao_emissor }
                    }
                    BuyerInput { label: "Endereço", field: BuyerField::Address, value: buyer.address }
                    div { style: "display: grid; grid-template-columns: 2fr 1fr 2fr; gap: 12px;",
                        BuyerInput { label: "Cidade", field: BuyerField::City, value: buyer.city }
                        BuyerInput { label: "UF", field: BuyerField::Uf, value: buyer.uf }
                        BuyerInput { label: "Telefone", field: BuyerField::Phone, value: buyer.phone }
                    }
                }
            }
        }
    }
}

#[component]
fn BuyerInput(label: &'static str, field: BuyerField, value: String) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    rsx! {
        TextField {
            label,
            value,
            on_input: move |v: String| state.write().session.edit_buyer(field, &v),
        }
    }
}
