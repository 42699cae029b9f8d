// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable notices for the person filling in the prescription pad.
//
// Every technical error is mapped to a short pt-BR message with a suggestion.
// Severity drives how (and whether) the UI presents it.

use crate::error::MedReceitaError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Service busy or unreachable. The user may trigger it again.
    Transient,
    /// User must do something (pick another file, add credits, type a prompt).
    ActionRequired,
    /// The input itself is unusable.
    Permanent,
    /// Recovered internally, never shown (unreadable stored preferences).
    Silent,
}

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Short summary (shown as the toast title).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether triggering the same action again may succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

impl HumanError {
    /// Whether the notice should be surfaced at all.
    pub fn is_visible(&self) -> bool {
        self.severity != Severity::Silent
    }
}

/// Convert a `MedReceitaError` into a `HumanError`.
pub fn humanize_error(err: &MedReceitaError) -> HumanError {
    match err {
        // -- Validation --
        MedReceitaError::UnsupportedUpload(_) => HumanError {
            message: "Por favor, selecione uma imagem válida".into(),
            suggestion: "Escolha um arquivo PNG, JPEG, GIF ou WEBP.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        MedReceitaError::UploadTooLarge { limit, .. } => HumanError {
            message: format!("A imagem deve ter no máximo {}MB", limit / (1024 * 1024)),
            suggestion: "Reduza a imagem ou escolha outro arquivo.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        MedReceitaError::EmptyPrompt => HumanError {
            message: "Descreva o logo desejado".into(),
            suggestion: "Digite uma descrição, por exemplo: Caduceu minimalista.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        MedReceitaError::Busy(_) => HumanError {
            message: "Aguarde a operação em andamento".into(),
            suggestion: "O logo anterior ainda está sendo processado.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Image --
        MedReceitaError::Load(_) | MedReceitaError::RenderContext(_) => HumanError {
            message: "Erro ao processar a imagem".into(),
            suggestion: "A imagem pode estar corrompida. Tente salvá-la como PNG ou JPEG.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        MedReceitaError::ImageError(_) => HumanError {
            message: "Erro ao carregar a imagem".into(),
            suggestion: "Tente novamente com outro arquivo.".into(),
            retriable: true,
            severity: Severity::Permanent,
        },

        // -- Logo service --
        MedReceitaError::RateLimited => HumanError {
            message: "Limite de requisições excedido".into(),
            suggestion: "Aguarde alguns instantes e tente novamente.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        MedReceitaError::PaymentRequired => HumanError {
            message: "Créditos insuficientes para gerar logos".into(),
            suggestion: "Adicione créditos ao serviço de geração e tente novamente.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        MedReceitaError::RemoteService(_) => HumanError {
            message: "Erro ao gerar logo".into(),
            suggestion: "Tente novamente ou faça upload de uma imagem.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Persistence --
        MedReceitaError::PersistenceRead { .. } | MedReceitaError::Serialization(_) => {
            HumanError {
                message: "Preferências salvas ilegíveis".into(),
                suggestion: "Os valores padrão foram restaurados.".into(),
                retriable: false,
                severity: Severity::Silent,
            }
        }

        MedReceitaError::Database(_) => HumanError {
            message: "Não foi possível salvar as preferências".into(),
            suggestion: "Feche e abra o aplicativo novamente.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        MedReceitaError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Sem permissão para acessar o arquivo".into(),
                    suggestion: "Escolha outra pasta ou verifique as permissões.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "Erro ao ler ou gravar o arquivo".into(),
                    suggestion: "Tente novamente. Verifique se há espaço em disco.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        // -- Output / platform --
        MedReceitaError::PdfError(_) => HumanError {
            message: "Erro ao gerar o PDF".into(),
            suggestion: "Tente imprimir diretamente pela visualização.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        MedReceitaError::Bridge(_) => HumanError {
            message: "Um recurso do dispositivo falhou".into(),
            suggestion: "Reinicie o aplicativo e tente novamente.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        MedReceitaError::PlatformUnavailable => HumanError {
            message: "Recurso indisponível neste dispositivo".into(),
            suggestion: "Exporte o PDF e imprima a partir de outro programa.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}
