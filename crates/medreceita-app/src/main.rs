// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// MedReceita: prescription pad generator.
//
// Entry point. Initialises logging, backend services, app state, and launches
// the Dioxus UI.

mod pages;
mod services;
mod session;
mod state;

use dioxus::prelude::*;

use pages::doctor::Doctor;
use pages::notices::Notices;
use pages::prescription::Prescription;
use pages::preview::Preview;
use pages::style::Style;

use services::app_services::AppServices;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("MedReceita starting");

    dioxus::launch(app);
}

/// Top-level route enum.
#[derive(Debug, Clone, Routable, PartialEq)]
enum Route {
    #[layout(TabLayout)]
    #[route("/")]
    Doctor {},
    #[route("/receita")]
    Prescription {},
    #[route("/estilo")]
    Style {},
    #[route("/visualizar")]
    Preview {},
}

/// Root component.
fn app() -> Element {
    let svc = use_hook(|| match AppServices::init() {
        Ok(s) => {
            tracing::info!("backend services initialised");
            Some(s)
        }
        Err(e) => {
            tracing::error!(error = %e, "persistent storage failed, using in-memory fallback");
            match AppServices::fallback() {
                Ok(s) => Some(s),
                Err(e) => {
                    tracing::error!(error = %e, "fallback services failed");
                    None
                }
            }
        }
    });

    let Some(svc) = svc else {
        return rsx! {
            div { style: "padding: 32px; font-family: system-ui, sans-serif;",
                h1 { "MedReceita" }
                p { "Não foi possível iniciar o aplicativo. Verifique a configuração e tente novamente." }
            }
        };
    };

    // Provide services and state as context for all pages
    use_context_provider(|| svc.clone());
    use_context_provider(|| Signal::new(state::AppState::new(&svc)));

    rsx! {
        Router::<Route> {}
    }
}

/// Persistent tab layout wrapping all pages.
#[component]
fn TabLayout() -> Element {
    let state = use_context::<Signal<state::AppState>>();
    let kind = state.read().session.prescription_type();

    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; height: 100vh; font-family: system-ui, -apple-system, sans-serif;",

            header {
                style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 16px; border-bottom: 1px solid #e0e0e0;",
                strong { style: "font-size: 18px;", "MedReceita" }
                TypeToggle {}
                span { style: "font-size: 12px; color: #666;", "{kind.label()}" }
            }

            Notices {}

            // Page content
            div { class: "page-content",
                style: "flex: 1; overflow-y: auto; padding: 16px;",
                Outlet::<Route> {}
            }

            // Bottom tab bar
            nav { class: "tab-bar",
                style: "display: flex; justify-content: space-around; padding: 8px 0; border-top: 1px solid #e0e0e0; background: #fafafa;",
                TabButton { to: Route::Doctor {}, label: "Médico", icon: "M" }
                TabButton { to: Route::Prescription {}, label: "Receita", icon: "R" }
                TabButton { to: Route::Style {}, label: "Estilo", icon: "E" }
                TabButton { to: Route::Preview {}, label: "Visualizar", icon: "V" }
            }
        }
    }
}

/// Switch between the simple and the dual-copy controlled layout.
#[component]
fn TypeToggle() -> Element {
    use medreceita_core::types::PrescriptionType;

    let mut state = use_context::<Signal<state::AppState>>();
    let current = state.read().session.prescription_type();

    let button_style = |active: bool| {
        if active {
            "padding: 6px 12px; border: 1px solid #007aff; background: #007aff; color: white; font-size: 13px;"
        } else {
            "padding: 6px 12px; border: 1px solid #ccc; background: white; color: #333; font-size: 13px;"
        }
    };

    rsx! {
        div { style: "display: flex;",
            button {
                style: button_style(current == PrescriptionType::Simple),
                onclick: move |_| state.write().session.set_prescription_type(PrescriptionType::Simple),
                "Receita Simples"
            }
            button {
                style: button_style(current == PrescriptionType::Special),
                onclick: move |_| state.write().session.set_prescription_type(PrescriptionType::Special),
                "Controle Especial"
            }
        }
    }
}

#[component]
fn TabButton(to: Route, label: &'static str, icon: &'static str) -> Element {
    rsx! {
        Link { to: to,
            style: "display: flex; flex-direction: column; align-items: center; text-decoration: none; color: #333; font-size: 12px;",
            span { style: "font-size: 20px;", "{icon}" }
            span { "{label}" }
        }
    }
}
