// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP client for the remote logo-generation service.
//
// The service takes `{prompt, primaryColor}` and answers with one of:
//   - `{imageUrl}`  raster logo, inline `data:` URL or an http(s) link
//   - `{svg}`       inline vector markup
//   - `{error}`     failure detail, usually with a non-2xx status
//
// 429 and 402 are reported as their own error kinds so the user notice can
// tell them apart.

use std::time::Duration;

use medreceita_core::error::{MedReceitaError, Result};
use medreceita_core::types::{LogoAsset, RasterSource, is_svg_markup};
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::generator::{LogoGenerator, LogoRequest};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ServiceResponse {
    image_url: Option<String>,
    svg: Option<String>,
    error: Option<String>,
}

/// A successful reply, before any follow-up download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceReply {
    /// The logo is in the reply itself.
    Inline(LogoAsset),
    /// The reply points at an image that still has to be downloaded.
    Fetch(String),
}

/// Classify a service response by status code and body.
pub fn interpret_response(status: u16, body: &str) -> Result<ServiceReply> {
    match status {
        429 => return Err(MedReceitaError::RateLimited),
        402 => return Err(MedReceitaError::PaymentRequired),
        _ => {}
    }

    let parsed = serde_json::from_str::<ServiceResponse>(body);
    if !(200..300).contains(&status) {
        let detail = parsed
            .ok()
            .and_then(|r| r.error)
            .unwrap_or_else(|| format!("HTTP {status}"));
        return Err(MedReceitaError::RemoteService(detail));
    }

    let response = parsed.map_err(|e| {
        MedReceitaError::RemoteService(format!("unreadable service response: {e}"))
    })?;
    if let Some(detail) = response.error {
        return Err(MedReceitaError::RemoteService(detail));
    }
    if let Some(url) = response.image_url.filter(|u| !u.trim().is_empty()) {
        let url = url.trim().to_string();
        if url.starts_with("data:") {
            return Ok(ServiceReply::Inline(LogoAsset::Raster(RasterSource::DataUrl(
                url,
            ))));
        }
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(ServiceReply::Fetch(url));
        }
        return Err(MedReceitaError::RemoteService(format!(
            "unsupported image URL scheme: {}",
            url.chars().take(16).collect::<String>()
        )));
    }
    if let Some(svg) = response.svg.filter(|s| !s.trim().is_empty()) {
        return Ok(ServiceReply::Inline(LogoAsset::Vector(svg)));
    }
    Err(MedReceitaError::RemoteService("no image in response".into()))
}

/// Talks to the logo service over HTTP.
pub struct RemoteLogoGenerator {
    client: reqwest::Client,
    endpoint: String,
    /// Bearer token. Never logged.
    token: Option<String>,
}

impl RemoteLogoGenerator {
    pub fn new(endpoint: &str, token: Option<String>, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .map_err(|e| MedReceitaError::RemoteService(format!("HTTP client setup: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Download a linked logo. SVG replies, announced by content type or
    /// recognised from the markup, come back as vector assets.
    async fn fetch_image(&self, url: &str) -> Result<LogoAsset> {
        debug!("downloading generated logo");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MedReceitaError::Load(format!("logo download failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(MedReceitaError::Load(format!(
                "logo download failed: HTTP {}",
                status.as_u16()
            )));
        }
        let declared_svg = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim().to_ascii_lowercase().starts_with("image/svg+xml"));
        let bytes = response
            .bytes()
            .await
            .map_err(|e| MedReceitaError::Load(format!("logo download interrupted: {e}")))?
            .to_vec();

        if declared_svg || is_svg_markup(&bytes) {
            let markup = String::from_utf8(bytes)
                .map_err(|_| MedReceitaError::Load("downloaded SVG is not UTF-8".into()))?;
            return Ok(LogoAsset::Vector(markup));
        }
        Ok(LogoAsset::Raster(RasterSource::Bytes(bytes)))
    }
}

impl LogoGenerator for RemoteLogoGenerator {
    #[instrument(skip(self, request), fields(endpoint = %self.endpoint, prompt_len = request.prompt.len()))]
    async fn generate(&self, request: &LogoRequest) -> Result<LogoAsset> {
        let mut call = self.client.post(&self.endpoint).json(request);
        if let Some(token) = &self.token {
            call = call.bearer_auth(token);
        }

        let response = call.send().await.map_err(|e| {
            error!(error = %e, "logo service unreachable");
            MedReceitaError::RemoteService(format!("service unreachable: {e}"))
        })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| MedReceitaError::RemoteService(format!("reading response: {e}")))?;

        match interpret_response(status, &body) {
            Ok(ServiceReply::Inline(asset)) => {
                info!(status, "logo generated");
                Ok(asset)
            }
            Ok(ServiceReply::Fetch(url)) => {
                let asset = self.fetch_image(&url).await?;
                let vector = matches!(asset, LogoAsset::Vector(_));
                info!(status, vector, "logo generated and downloaded");
                Ok(asset)
            }
            Err(e) => {
                warn!(status, error = %e, "logo service refused the request");
                Err(e)
            }
        }
    }
}
