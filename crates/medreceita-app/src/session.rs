// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The editing session: working copies of every entity, the logo flows and the
// notices shown to the user.
//
// Every edit replaces the whole value (`with_field` builders) instead of
// mutating it in place. Doctor info, style and logo history are written back
// to preferences on every change; prescription and buyer data are not stored.

use medreceita_core::error::{MedReceitaError, Result};
use medreceita_core::human_errors::{Severity, humanize_error};
use medreceita_core::types::{
    BuyerField, BuyerInfo, DoctorField, DoctorInfo, LogoAsset, LogoHistory, LogoHistoryItem,
    PatientField, PrescriptionData, PrescriptionType, RasterSource,
};
use medreceita_core::upload::UploadCandidate;
use medreceita_core::{AppConfig, PrescriptionStyle, StyleEdit};
use medreceita_document::{RenderedDocument, normalize_logo};
use medreceita_logo::LogoRequest;
use medreceita_print::PageSetup;
use medreceita_storage::Preferences;
use tracing::{debug, info, instrument, warn};

pub const LOGO_UPLOADED: &str = "Logo carregado com sucesso!";
pub const LOGO_GENERATED: &str = "Logo gerado com sucesso!";
pub const LOGO_SELECTED: &str = "Logo selecionado!";
pub const READY_TO_PRINT: &str = "Receita pronta para impressão!";

/// Visible notices; posting past this drops the oldest.
pub const MAX_NOTICES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A dismissible message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub detail: Option<String>,
}

impl Notice {
    pub fn success(message: &str) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.to_string(),
            detail: None,
        }
    }

    /// The user-facing notice for `err`, or `None` when the error is
    /// recovered silently.
    pub fn from_error(err: &MedReceitaError) -> Option<Self> {
        let human = humanize_error(err);
        if human.severity == Severity::Silent {
            return None;
        }
        Some(Self {
            kind: NoticeKind::Error,
            message: human.message,
            detail: Some(human.suggestion),
        })
    }
}

/// Turn an uploaded file into a logo asset. SVG files are kept as markup;
/// everything else goes through the raster path.
pub fn asset_from_upload(candidate: UploadCandidate) -> Result<LogoAsset> {
    if candidate.mime_type.eq_ignore_ascii_case("image/svg+xml") {
        let markup = String::from_utf8(candidate.bytes)
            .map_err(|_| MedReceitaError::Load("SVG file is not valid UTF-8".into()))?;
        return Ok(LogoAsset::Vector(markup));
    }
    Ok(LogoAsset::Raster(RasterSource::Bytes(candidate.bytes)))
}

/// Decode, strip the background and normalise an uploaded logo.
pub fn process_upload(candidate: UploadCandidate, threshold: u8) -> Result<String> {
    normalize_logo(asset_from_upload(candidate)?, threshold)
}

pub struct PrescriptionSession {
    preferences: Preferences,
    config: AppConfig,
    doctor: DoctorInfo,
    prescription: PrescriptionData,
    buyer: BuyerInfo,
    style: PrescriptionStyle,
    kind: PrescriptionType,
    history: LogoHistory,
    uploading: bool,
    generating: bool,
    notices: Vec<Notice>,
}

impl PrescriptionSession {
    /// Start a session. Stored slots are read once, here.
    #[instrument(skip_all)]
    pub fn open(preferences: Preferences, config: AppConfig) -> Self {
        let doctor = preferences.load_doctor();
        let style = preferences.load_style();
        let history = preferences.load_logo_history();
        info!(history = history.len(), "prescription session opened");
        Self {
            preferences,
            config,
            doctor,
            prescription: PrescriptionData::default(),
            buyer: BuyerInfo::default(),
            style,
            kind: PrescriptionType::default(),
            history,
            uploading: false,
            generating: false,
            notices: Vec::new(),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn doctor(&self) -> &DoctorInfo {
        &self.doctor
    }

    pub fn prescription(&self) -> &PrescriptionData {
        &self.prescription
    }

    pub fn buyer(&self) -> &BuyerInfo {
        &self.buyer
    }

    pub fn style(&self) -> &PrescriptionStyle {
        &self.style
    }

    pub fn prescription_type(&self) -> PrescriptionType {
        self.kind
    }

    pub fn history(&self) -> &LogoHistory {
        &self.history
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn dismiss_notice(&mut self, index: usize) {
        if index < self.notices.len() {
            self.notices.remove(index);
        }
    }

    // -- Edits ----------------------------------------------------------------

    pub fn edit_doctor(&mut self, field: DoctorField, value: &str) {
        self.doctor = self.doctor.clone().with_field(field, value);
        let saved = self.preferences.save_doctor(&self.doctor);
        self.report_save(saved);
    }

    pub fn edit_patient(&mut self, field: PatientField, value: &str) {
        self.prescription = self.prescription.clone().with_patient_field(field, value);
    }

    pub fn edit_prescription_text(&mut self, text: &str) {
        self.prescription = self.prescription.clone().with_prescription(text);
    }

    pub fn edit_date(&mut self, date: &str) {
        self.prescription = self.prescription.clone().with_date(date);
    }

    pub fn edit_buyer(&mut self, field: BuyerField, value: &str) {
        self.buyer = self.buyer.clone().with_field(field, value);
    }

    pub fn edit_style(&mut self, edit: StyleEdit) {
        self.style = self.style.clone().apply(edit);
        let saved = self.preferences.save_style(&self.style);
        self.report_save(saved);
    }

    pub fn set_prescription_type(&mut self, kind: PrescriptionType) {
        debug!(?kind, "prescription type changed");
        self.kind = kind;
    }

    // -- Logo flows -----------------------------------------------------------

    /// Validate an upload and mark the upload as running. Rejections leave
    /// every other piece of state untouched.
    pub fn begin_upload(&mut self, candidate: &UploadCandidate) -> Result<()> {
        if self.uploading {
            return Err(self.reject(MedReceitaError::Busy("upload")));
        }
        if let Err(e) = candidate.validate(self.config.max_upload_bytes) {
            warn!(name = %candidate.name, error = %e, "upload rejected");
            return Err(self.reject(e));
        }
        self.uploading = true;
        Ok(())
    }

    /// Complete an upload started with [`Self::begin_upload`].
    pub fn finish_upload(&mut self, result: Result<String>) {
        self.uploading = false;
        match result {
            Ok(url) => {
                self.history.push(LogoHistoryItem::uploaded(url.clone()));
                self.save_history();
                self.edit_style(StyleEdit::Logo(Some(url)));
                self.post(Notice::success(LOGO_UPLOADED));
            }
            Err(e) => {
                warn!(error = %e, "uploaded logo could not be processed");
                self.report(&e);
            }
        }
    }

    /// Mark generation as running and build the request for the generator.
    pub fn begin_generation(&mut self, prompt: &str) -> Result<LogoRequest> {
        if self.generating {
            return Err(self.reject(MedReceitaError::Busy("logo generation")));
        }
        let request = match LogoRequest::new(prompt, &self.style.primary_color) {
            Ok(request) => request,
            Err(e) => return Err(self.reject(e)),
        };
        self.generating = true;
        Ok(request)
    }

    /// Complete a generation started with [`Self::begin_generation`].
    /// `result` is the normalised logo.
    pub fn finish_generation(&mut self, prompt: &str, result: Result<String>) {
        self.generating = false;
        match result {
            Ok(url) => {
                self.history
                    .push(LogoHistoryItem::generated(url.clone(), prompt.trim()));
                self.save_history();
                self.edit_style(StyleEdit::Logo(Some(url)));
                self.post(Notice::success(LOGO_GENERATED));
            }
            Err(e) => {
                warn!(error = %e, "logo generation failed");
                self.report(&e);
            }
        }
    }

    /// Use a logo from the history. Returns false for unknown ids.
    pub fn select_logo(&mut self, id: &str) -> bool {
        let Some(url) = self.history.get(id).map(|item| item.url.clone()) else {
            return false;
        };
        self.edit_style(StyleEdit::Logo(Some(url)));
        self.post(Notice::success(LOGO_SELECTED));
        true
    }

    /// Drop a history entry. The current logo is left as it is.
    pub fn remove_logo(&mut self, id: &str) -> bool {
        if self.history.remove(id).is_none() {
            return false;
        }
        self.save_history();
        true
    }

    pub fn clear_logo(&mut self) {
        self.edit_style(StyleEdit::Logo(None));
    }

    // -- Output ---------------------------------------------------------------

    /// The active layout. Buyer details only reach the dual-copy variant.
    pub fn render(&self) -> RenderedDocument {
        let buyer = match self.kind {
            PrescriptionType::Special => Some(&self.buyer),
            PrescriptionType::Simple => None,
        };
        medreceita_document::render(self.kind, &self.doctor, &self.prescription, &self.style, buyer)
    }

    pub fn page_setup(&self) -> PageSetup {
        PageSetup::for_type(self.kind)
    }

    /// Record that the print dialog was opened.
    pub fn print_ready(&mut self) {
        self.post(Notice::success(READY_TO_PRINT));
    }

    /// Post a notice for an error raised outside the session (print, export).
    pub fn report(&mut self, err: &MedReceitaError) {
        if let Some(notice) = Notice::from_error(err) {
            self.post(notice);
        }
    }

    // -- Internals ------------------------------------------------------------

    fn post(&mut self, notice: Notice) {
        if self.notices.len() >= MAX_NOTICES {
            self.notices.drain(..=self.notices.len() - MAX_NOTICES);
        }
        self.notices.push(notice);
    }

    fn reject(&mut self, err: MedReceitaError) -> MedReceitaError {
        self.report(&err);
        err
    }

    fn save_history(&mut self) {
        let saved = self.preferences.save_logo_history(&self.history);
        self.report_save(saved);
    }

    fn report_save(&mut self, saved: Result<()>) {
        if let Err(e) = saved {
            warn!(error = %e, "preference write failed");
            self.report(&e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medreceita_core::LogoPosition;
    use medreceita_storage::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    const MIB: usize = 1024 * 1024;

    fn session() -> (PrescriptionSession, Preferences) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let prefs = Preferences::new(store);
        (
            PrescriptionSession::open(prefs.clone(), AppConfig::default()),
            prefs,
        )
    }

    fn upload(mime: &str, size: usize) -> UploadCandidate {
        UploadCandidate {
            name: "logo".into(),
            mime_type: mime.into(),
            bytes: vec![0; size],
        }
    }

    fn png_data_url() -> String {
        "data:image/png;base64,iVBORw0KGgo=".into()
    }

    #[test]
    fn text_upload_is_rejected_without_state_change() {
        let (mut s, _) = session();
        s.edit_style(StyleEdit::Logo(Some(png_data_url())));
        let style_before = s.style().clone();

        let result = s.begin_upload(&upload("text/plain", 10));
        assert!(matches!(result, Err(MedReceitaError::UnsupportedUpload(_))));
        assert!(!s.is_uploading());
        assert_eq!(s.style(), &style_before);
        assert!(s.history().is_empty());
        assert_eq!(s.notices().len(), 1);
        assert_eq!(s.notices()[0].kind, NoticeKind::Error);
    }

    #[test]
    fn size_limit_applies_to_images() {
        let (mut s, _) = session();
        assert!(matches!(
            s.begin_upload(&upload("image/png", 6 * MIB)),
            Err(MedReceitaError::UploadTooLarge { .. })
        ));
        assert!(!s.is_uploading());

        assert!(s.begin_upload(&upload("image/png", 4 * MIB)).is_ok());
        assert!(s.is_uploading());
    }

    #[test]
    fn second_upload_while_busy_is_rejected() {
        let (mut s, _) = session();
        s.begin_upload(&upload("image/png", 10)).unwrap();
        assert!(matches!(
            s.begin_upload(&upload("image/png", 10)),
            Err(MedReceitaError::Busy(_))
        ));
        s.finish_upload(Ok(png_data_url()));
        assert!(!s.is_uploading());
        assert!(s.begin_upload(&upload("image/png", 10)).is_ok());
    }

    #[test]
    fn finished_upload_sets_logo_and_history() {
        let (mut s, prefs) = session();
        s.begin_upload(&upload("image/png", 10)).unwrap();
        s.finish_upload(Ok(png_data_url()));

        assert_eq!(s.style().logo.as_deref(), Some(png_data_url().as_str()));
        assert_eq!(s.history().len(), 1);
        assert!(s.history().items()[0].is_uploaded);
        assert_eq!(s.notices().last().map(|n| n.message.as_str()), Some(LOGO_UPLOADED));

        assert_eq!(prefs.load_logo_history().len(), 1);
        assert_eq!(prefs.load_style().logo, Some(png_data_url()));
    }

    #[test]
    fn failed_upload_resets_busy_and_keeps_logo() {
        let (mut s, _) = session();
        s.begin_upload(&upload("image/png", 10)).unwrap();
        s.finish_upload(Err(MedReceitaError::Load("bad png".into())));
        assert!(!s.is_uploading());
        assert_eq!(s.style().logo, None);
        assert!(s.history().is_empty());
        assert_eq!(s.notices().last().map(|n| n.kind), Some(NoticeKind::Error));
    }

    #[test]
    fn generation_carries_the_primary_colour() {
        let (mut s, _) = session();
        s.edit_style(StyleEdit::PrimaryColor("#0f766e".into()));
        let request = s.begin_generation("  caduceu ").unwrap();
        assert_eq!(request.prompt, "caduceu");
        assert_eq!(request.primary_color, "#0f766e");
        assert!(s.is_generating());
        assert!(matches!(s.begin_generation("cruz"), Err(MedReceitaError::Busy(_))));

        s.finish_generation("caduceu", Ok(png_data_url()));
        assert!(!s.is_generating());
        let item = &s.history().items()[0];
        assert!(!item.is_uploaded);
        assert_eq!(item.prompt.as_deref(), Some("caduceu"));
        assert_eq!(s.notices().last().map(|n| n.message.as_str()), Some(LOGO_GENERATED));
    }

    #[test]
    fn blank_prompt_and_remote_failures_post_notices() {
        let (mut s, _) = session();
        assert!(matches!(s.begin_generation("  "), Err(MedReceitaError::EmptyPrompt)));
        assert!(!s.is_generating());

        s.begin_generation("cruz").unwrap();
        s.finish_generation("cruz", Err(MedReceitaError::RateLimited));
        assert!(!s.is_generating());
        assert!(s.history().is_empty());
        let messages: Vec<_> = s.notices().iter().map(|n| n.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Descreva o logo desejado", "Limite de requisições excedido"]
        );
    }

    #[test]
    fn history_selection_and_removal() {
        let (mut s, _) = session();
        s.begin_upload(&upload("image/png", 10)).unwrap();
        s.finish_upload(Ok("data:image/png;base64,AAAA".into()));
        s.begin_upload(&upload("image/png", 10)).unwrap();
        s.finish_upload(Ok(png_data_url()));
        let first = s.history().items()[0].id.clone();

        assert!(s.select_logo(&first));
        assert_eq!(s.style().logo.as_deref(), Some("data:image/png;base64,AAAA"));
        assert!(!s.select_logo("missing"));

        assert!(s.remove_logo(&first));
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.style().logo.as_deref(), Some("data:image/png;base64,AAAA"));

        s.clear_logo();
        assert_eq!(s.style().logo, None);
    }

    #[test]
    fn doctor_and_style_survive_reopening() {
        let (mut s, prefs) = session();
        s.edit_doctor(DoctorField::Uf, "sp");
        s.edit_style(StyleEdit::LogoPosition(Some(LogoPosition::Watermark)));
        s.edit_patient(PatientField::Name, "João");

        let reopened = PrescriptionSession::open(prefs, AppConfig::default());
        assert_eq!(reopened.doctor().uf, "SP");
        assert_eq!(reopened.style().logo_position, Some(LogoPosition::Watermark));
        assert_eq!(reopened.prescription().patient.name, "");
    }

    #[test]
    fn render_follows_the_active_type() {
        let (mut s, _) = session();
        s.edit_doctor(DoctorField::Crm, "55512");
        s.edit_doctor(DoctorField::Uf, "sp");
        s.edit_buyer(BuyerField::Name, "Carla");

        let simple = s.render();
        assert_eq!(simple.panels.len(), 1);
        assert!(simple.texts().contains(&"CRM: 55512/SP".to_string()));
        assert!(s.page_setup().css().contains("portrait"));

        s.set_prescription_type(PrescriptionType::Special);
        let special = s.render();
        assert_eq!(special.panels.len(), 2);
        assert!(special.texts().contains(&"Nome: Carla".to_string()));
        assert!(s.page_setup().css().contains("landscape"));
    }

    #[test]
    fn notices_can_be_dismissed() {
        let (mut s, _) = session();
        s.print_ready();
        s.report(&MedReceitaError::PersistenceRead {
            key: "prescription-style".into(),
            reason: "bad json".into(),
        });
        assert_eq!(s.notices().len(), 1);
        assert_eq!(s.notices()[0].message, READY_TO_PRINT);
        s.dismiss_notice(5);
        s.dismiss_notice(0);
        assert!(s.notices().is_empty());
    }

    #[test]
    fn notices_are_capped_oldest_first() {
        let (mut s, _) = session();
        s.print_ready();
        for _ in 0..10 {
            s.report(&MedReceitaError::RateLimited);
        }
        s.select_logo("missing");
        s.begin_generation(" ").unwrap_err();

        assert_eq!(s.notices().len(), MAX_NOTICES);
        assert!(s.notices().iter().all(|n| n.message != READY_TO_PRINT));
        assert_eq!(
            s.notices().last().map(|n| n.message.as_str()),
            Some("Descreva o logo desejado")
        );
    }

    #[test]
    fn svg_uploads_stay_vector() {
        // White fills are not keyed out of vector logos.
        let markup = r##"<svg xmlns="http://www.w3.org/2000/svg"><rect width="4" height="4" fill="#ffffff"/></svg>"##;
        let candidate = UploadCandidate {
            name: "logo.svg".into(),
            mime_type: "image/svg+xml".into(),
            bytes: markup.as_bytes().to_vec(),
        };
        let url = process_upload(candidate, 240).unwrap();
        let decoded = medreceita_document::image::data_url::decode(&url).unwrap();
        assert!(decoded.is_svg());
        assert_eq!(decoded.bytes, markup.as_bytes());

        let broken = UploadCandidate {
            name: "logo.png".into(),
            mime_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        };
        assert!(matches!(process_upload(broken, 240), Err(MedReceitaError::Load(_))));
    }
}
