// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Doctor page: identity and practice details. Every keystroke is saved.

use dioxus::prelude::*;

use medreceita_core::types::DoctorField;

use super::form::{Section, TextField};
use crate::state::AppState;

#[component]
pub fn Doctor() -> Element {
    let state = use_context::<Signal<AppState>>();
    let doctor = state.read().session.doctor().clone();

    rsx! {
        div { style: "max-width: 640px; margin: 0 auto;",
            h1 { "Dados do Médico" }
            p { style: "color: #666;", "Estas informações ficam salvas neste computador." }

            Section { title: "Identificação",
                DoctorInput { label: "Nome completo", field: DoctorField::Name, value: doctor.name, placeholder: "Dr. João da Silva" }
                div { style: "display: grid; grid-template-columns: 2fr 1fr; gap: 12px;",
                    DoctorInput { label: "CRM", field: DoctorField::Crm, value: doctor.crm, placeholder: "123456" }
                    DoctorInput { label: "UF do CRM", field: DoctorField::Uf, value: doctor.uf, placeholder: "SP" }
                }
                DoctorInput { label: "Especialidade", field: DoctorField::Specialty, value: doctor.specialty, placeholder: "Clínica Geral" }
            }

            Section { title: "Consultório",
                DoctorInput { label: "Endereço", field: DoctorField::Address, value: doctor.address }
                div { style: "display: grid; grid-template-columns: 2fr 1fr; gap: 12px;",
                    DoctorInput { label: "Cidade", field: DoctorField::City, value: doctor.city }
                    DoctorInput { label: "Estado", field: DoctorField::State, value: doctor.state, placeholder: "SP" }
                }
                div { style: "display: grid; grid-template-columns: 1fr 1fr; gap: 12px;",
                    DoctorInput { label: "Telefone", field: DoctorField::Phone, value: doctor.phone, placeholder: "(11) 99999-9999" }
                    DoctorInput { label: "E-mail", field: DoctorField::Email, value: doctor.email }
                }
            }
        }
    }
}

#[component]
fn DoctorInput(
    label: &'static str,
    field: DoctorField,
    value: String,
    #[props(default)]
    placeholder: &'static str,
) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    rsx! {
        TextField {
            label,
            value,
            placeholder,
            on_input: move |v: String| state.write().session.edit_doctor(field, &v),
        }
    }
}
