// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state: the editing session plus UI-only flags, shared
// with every page through a `Signal<AppState>` context.

use crate::services::app_services::AppServices;
use crate::session::PrescriptionSession;

/// Output actions that run in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStage {
    Idle,
    Printing,
    Exporting,
}

impl OutputStage {
    /// Progress text for the preview page.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Printing => "Abrindo a janela de impressão...",
            Self::Exporting => "Gerando o PDF...",
        }
    }
}

/// Shared state accessible to all pages via `use_context`.
pub struct AppState {
    pub session: PrescriptionSession,
    /// Text in the logo prompt box. Kept here so it survives tab switches.
    pub logo_prompt: String,
    pub output: OutputStage,
    /// Path of the last exported PDF.
    pub last_export: Option<String>,
}

impl AppState {
    /// Create initial state from the backend services.
    pub fn new(svc: &AppServices) -> Self {
        Self {
            session: svc.open_session(),
            logo_prompt: String::new(),
            output: OutputStage::Idle,
            last_export: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.output != OutputStage::Idle
    }
}
