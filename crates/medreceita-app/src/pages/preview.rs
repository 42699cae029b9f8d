// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preview page: the rendered prescription at print size, plus print and PDF
// export. Printing uses the platform dialog where the bridge has one and
// otherwise the webview's own print with a temporary `@page` override.

use std::path::PathBuf;
use std::time::Duration;

use dioxus::prelude::*;

use medreceita_bridge::NativePrint;
use medreceita_core::error::MedReceitaError;
use medreceita_document::{PRESCRIPTION_CSS, render_html};
use medreceita_print::print_document;

use crate::services::app_services::AppServices;
use crate::services::print_surface::WebviewPrintSurface;
use crate::state::{AppState, OutputStage};

/// Hides the app chrome so only the page reaches the printer.
const PRINT_CHROME_CSS: &str = r#"
@media print {
  header, nav, .no-print { display: none !important; }
  .page-content { padding: 0 !important; overflow: visible !important; }
  .preview-frame { padding: 0 !important; background: none !important; overflow: visible !important; }
  .preview-frame .prescription-page { box-shadow: none !important; }
}
"#;

#[component]
pub fn Preview() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    let (html, label, stage, last_export) = {
        let s = state.read();
        let doc = s.session.render();
        (
            render_html(&doc),
            doc.kind.label(),
            s.output,
            s.last_export.clone(),
        )
    };
    let busy = stage != OutputStage::Idle;

    rsx! {
        style { {PRESCRIPTION_CSS} }
        style { {PRINT_CHROME_CSS} }

        div { class: "no-print",
            style: "display: flex; justify-content: space-between; align-items: center; margin-bottom: 12px; gap: 8px;",
            div {
                h1 { style: "margin: 0;", "Visualizar" }
                span { style: "font-size: 12px; color: #666;", "{label}" }
            }
            div { style: "display: flex; gap: 8px;",
                button {
                    style: "padding: 10px 20px; border-radius: 8px; border: 1px solid #007aff; color: #007aff; background: white; font-size: 15px;",
                    disabled: busy,
                    onclick: {
                        let svc = svc.clone();
                        move |_| {
                            let default_name = format!("receita-{}.pdf", chrono::Local::now().format("%Y-%m-%d"));
                            let Some(path) = choose_pdf_path(&default_name) else {
                                return;
                            };
                            let doc = state.read().session.render();
                            state.write().output = OutputStage::Exporting;
                            let svc = svc.clone();
                            spawn(async move {
                                let result = svc.export_pdf(doc, path.clone()).await;
                                let mut s = state.write();
                                s.output = OutputStage::Idle;
                                match result {
                                    Ok(()) => s.last_export = Some(path.display().to_string()),
                                    Err(e) => {
                                        tracing::error!(error = %e, "PDF export failed");
                                        s.session.report(&e);
                                    }
                                }
                            });
                        }
                    },
                    "Salvar PDF"
                }
                button {
                    style: "padding: 10px 20px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 15px;",
                    disabled: busy,
                    onclick: {
                        let svc = svc.clone();
                        move |_| {
                            let native = svc.bridge().can_print_natively();
                            let (doc, setup) = {
                                let s = state.read();
                                (native.then(|| s.session.render()), s.session.page_setup())
                            };
                            let restore = Duration::from_millis(svc.config().print_restore_delay_ms);
                            state.write().output = OutputStage::Printing;
                            let svc = svc.clone();
                            spawn(async move {
                                let native_result = match doc {
                                    Some(doc) => svc.print_pdf_natively(doc).await,
                                    None => Err(MedReceitaError::PlatformUnavailable),
                                };
                                let result = match native_result {
                                    Err(MedReceitaError::PlatformUnavailable) => {
                                        print_document(&WebviewPrintSurface, &setup, restore).await
                                    }
                                    other => other,
                                };
                                let mut s = state.write();
                                s.output = OutputStage::Idle;
                                match result {
                                    Ok(()) => s.session.print_ready(),
                                    Err(e) => {
                                        tracing::error!(error = %e, "printing failed");
                                        s.session.report(&e);
                                    }
                                }
                            });
                        }
                    },
                    "Imprimir"
                }
            }
        }

        if busy {
            p { class: "no-print", style: "color: #007aff; font-size: 14px;", "{stage.message()}" }
        }
        if let Some(path) = last_export {
            p { class: "no-print", style: "color: #155724; font-size: 13px;", "PDF salvo em {path}" }
        }

        div { class: "preview-frame",
            style: "overflow: auto; padding: 16px; background: #e5e7eb; border-radius: 8px;",
            div { style: "width: fit-content; margin: 0 auto; box-shadow: 0 2px 12px rgba(0,0,0,0.15);",
                dangerous_inner_html: "{html}",
            }
        }
    }
}

#[cfg(not(any(target_os = "ios", target_os = "android")))]
fn choose_pdf_path(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("PDF", &["pdf"])
        .set_file_name(default_name)
        .save_file()
}

#[cfg(any(target_os = "ios", target_os = "android"))]
fn choose_pdf_path(default_name: &str) -> Option<PathBuf> {
    Some(crate::services::data_dir::data_dir().join(default_name))
}
