// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer. Opens preferences, loads the config, picks the logo
// generator, and wraps the slow operations (image processing, logo
// generation, PDF export) in async-friendly methods for the Dioxus UI.
//
// Image work runs on the blocking pool so the webview stays responsive.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use medreceita_bridge::{NativePrint, PlatformBridge};
use medreceita_core::AppConfig;
use medreceita_core::error::{MedReceitaError, Result};
use medreceita_core::upload::UploadCandidate;
use medreceita_document::{PdfWriter, RenderedDocument, normalize_logo};
use medreceita_logo::{ConfiguredGenerator, LogoGenerator, LogoRequest};
use medreceita_storage::{KeyValueStore, MemoryStore, Preferences, SqliteStore};
use tracing::{info, instrument, warn};

use super::data_dir;
use crate::session::{PrescriptionSession, process_upload};

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
///
/// All fields are cheaply cloneable (Arc-wrapped) so that the struct can be
/// passed into closures and async blocks without lifetime issues.
#[derive(Clone)]
pub struct AppServices {
    preferences: Preferences,
    config: Arc<AppConfig>,
    generator: Arc<ConfiguredGenerator>,
    bridge: Arc<dyn PlatformBridge>,
}

impl AppServices {
    /// Initialise all services. Call once at app startup.
    pub fn init() -> Result<Self> {
        let dir = data_dir::data_dir();
        info!(path = %dir.display(), "initialising app services");

        let store = SqliteStore::open(dir.join("preferences.db"))?;
        Self::with_store(Arc::new(store), dir)
    }

    /// Services backed by an in-memory store, used when the database cannot
    /// be opened. Preferences then last only for this run.
    pub fn fallback() -> Result<Self> {
        Self::with_store(Arc::new(MemoryStore::new()), data_dir::data_dir())
    }

    fn with_store(store: Arc<dyn KeyValueStore>, dir: PathBuf) -> Result<Self> {
        Self::with_bridge(store, &dir, Arc::from(medreceita_bridge::platform_bridge()))
    }

    fn with_bridge(
        store: Arc<dyn KeyValueStore>,
        dir: &Path,
        bridge: Arc<dyn PlatformBridge>,
    ) -> Result<Self> {
        let config = load_config(dir).with_env_overrides();
        let generator = ConfiguredGenerator::from_config(&config)?;
        info!(platform = bridge.platform_name(), "platform bridge selected");
        Ok(Self {
            preferences: Preferences::new(store),
            config: Arc::new(config),
            generator: Arc::new(generator),
            bridge,
        })
    }

    /// Start the editing session from stored preferences.
    pub fn open_session(&self) -> PrescriptionSession {
        PrescriptionSession::open(self.preferences.clone(), (*self.config).clone())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn bridge(&self) -> &dyn PlatformBridge {
        self.bridge.as_ref()
    }

    // -- Logos ----------------------------------------------------------------

    /// Strip the background of an uploaded logo.
    #[instrument(skip(self, candidate), fields(name = %candidate.name, bytes = candidate.bytes.len()))]
    pub async fn process_upload(&self, candidate: UploadCandidate) -> Result<String> {
        let threshold = self.config.background_threshold;
        tokio::task::spawn_blocking(move || process_upload(candidate, threshold))
            .await
            .map_err(|e| MedReceitaError::RenderContext(format!("image worker failed: {e}")))?
    }

    /// Generate a logo and normalise it for the style model.
    #[instrument(skip(self, request))]
    pub async fn generate_logo(&self, request: LogoRequest) -> Result<String> {
        let asset = self.generator.generate(&request).await?;
        let threshold = self.config.background_threshold;
        tokio::task::spawn_blocking(move || normalize_logo(asset, threshold))
            .await
            .map_err(|e| MedReceitaError::RenderContext(format!("image worker failed: {e}")))?
    }

    // -- PDF ------------------------------------------------------------------

    async fn render_pdf(&self, writer: PdfWriter, doc: RenderedDocument) -> Result<Vec<u8>> {
        tokio::task::spawn_blocking(move || writer.render(&doc))
            .await
            .map_err(|e| MedReceitaError::PdfError(format!("PDF worker failed: {e}")))?
    }

    /// Write the PDF to `path`, titled after the file name.
    pub async fn export_pdf(&self, doc: RenderedDocument, path: PathBuf) -> Result<()> {
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = self.render_pdf(PdfWriter::new().with_title(title), doc).await?;
        std::fs::write(&path, bytes)?;
        info!(path = %path.display(), "prescription PDF exported");
        Ok(())
    }

    /// Hand the PDF to the platform print dialog, where there is one.
    /// Nothing is rendered when the platform has no dialog.
    pub async fn print_pdf_natively(&self, doc: RenderedDocument) -> Result<()> {
        if !self.bridge.can_print_natively() {
            return Err(MedReceitaError::PlatformUnavailable);
        }
        let bytes = self.render_pdf(PdfWriter::new(), doc).await?;
        self.bridge.show_print_dialog(&bytes, "application/pdf")
    }
}

// -- Config file persistence -------------------------------------------------

const CONFIG_FILE: &str = "config.json";

/// Read `config.json`; a missing or unreadable file yields the defaults.
fn load_config(data_dir: &Path) -> AppConfig {
    let path = data_dir.join(CONFIG_FILE);
    let Ok(data) = std::fs::read_to_string(&path) else {
        return AppConfig::default();
    };
    serde_json::from_str(&data).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "config file unreadable, using defaults");
        AppConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use medreceita_bridge::NativeFilePicker;
    use std::sync::Mutex;

    #[test]
    fn config_file_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config(dir.path()).background_threshold, 240);

        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        assert_eq!(load_config(dir.path()).max_upload_bytes, 5 * 1024 * 1024);

        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"background_threshold": 230, "logo_service_url": "http://localhost:54321/generate-logo"}"#,
        )
        .unwrap();
        let config = load_config(dir.path());
        assert_eq!(config.background_threshold, 230);
        assert_eq!(
            config.logo_service_url.as_deref(),
            Some("http://localhost:54321/generate-logo")
        );
    }

    #[tokio::test]
    async fn offline_generation_yields_an_svg_logo() {
        let dir = tempfile::tempdir().unwrap();
        let services =
            AppServices::with_store(Arc::new(MemoryStore::new()), dir.path().to_path_buf()).unwrap();
        let mut session = services.open_session();

        let request = session.begin_generation("cruz").unwrap();
        let result = if services.generator.is_remote() {
            // An endpoint from the environment; keep the test offline.
            medreceita_logo::SvgLogoGenerator
                .generate(&request)
                .await
                .and_then(|asset| normalize_logo(asset, 240))
        } else {
            services.generate_logo(request).await
        };
        session.finish_generation("cruz", result);

        let logo = session.style().logo.clone().unwrap();
        assert!(logo.starts_with("data:image/svg+xml;base64,"));
    }

    #[tokio::test]
    async fn exported_pdf_lands_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let services =
            AppServices::with_store(Arc::new(MemoryStore::new()), dir.path().to_path_buf()).unwrap();
        let session = services.open_session();
        let path = dir.path().join("receita.pdf");

        services.export_pdf(session.render(), path.clone()).await.unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        assert!(matches!(
            services.print_pdf_natively(session.render()).await,
            Err(MedReceitaError::PlatformUnavailable)
        ));
    }

    #[derive(Default)]
    struct RecordingBridge {
        printed: Mutex<Vec<(usize, String)>>,
    }

    impl PlatformBridge for RecordingBridge {
        fn platform_name(&self) -> &str {
            "recording"
        }
    }

    impl NativePrint for RecordingBridge {
        fn can_print_natively(&self) -> bool {
            true
        }

        fn show_print_dialog(&self, document: &[u8], mime_type: &str) -> Result<()> {
            assert!(document.starts_with(b"%PDF"));
            self.printed
                .lock()
                .unwrap()
                .push((document.len(), mime_type.to_string()));
            Ok(())
        }
    }

    impl NativeFilePicker for RecordingBridge {
        fn pick_file(&self, _mime_types: &[&str]) -> Result<Option<String>> {
            Ok(None)
        }

        fn read_picked_file(&self, _path: &str) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn native_print_receives_the_rendered_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = Arc::new(RecordingBridge::default());
        let services =
            AppServices::with_bridge(Arc::new(MemoryStore::new()), dir.path(), bridge.clone())
                .unwrap();

        services
            .print_pdf_natively(services.open_session().render())
            .await
            .unwrap();
        let printed = bridge.printed.lock().unwrap().clone();
        assert_eq!(printed.len(), 1);
        assert_eq!(printed[0].1, "application/pdf");
    }
}
