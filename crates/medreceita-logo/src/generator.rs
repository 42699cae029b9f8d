// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Logo generation port.

use std::future::Future;

use medreceita_core::config::AppConfig;
use medreceita_core::error::{MedReceitaError, Result};
use medreceita_core::types::LogoAsset;
use serde::Serialize;
use tracing::info;

use crate::offline::SvgLogoGenerator;
use crate::remote::RemoteLogoGenerator;

/// What the user asked for. Serialises to the service's request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoRequest {
    pub prompt: String,
    pub primary_color: String,
}

impl LogoRequest {
    /// Build a request, rejecting blank prompts before anything is sent.
    pub fn new(prompt: &str, primary_color: &str) -> Result<Self> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(MedReceitaError::EmptyPrompt);
        }
        Ok(Self {
            prompt: prompt.to_string(),
            primary_color: primary_color.trim().to_string(),
        })
    }
}

/// Produces a logo asset from a request. Implementations make one attempt
/// and never retry.
pub trait LogoGenerator: Send + Sync {
    fn generate(&self, request: &LogoRequest) -> impl Future<Output = Result<LogoAsset>> + Send;
}

/// The generator selected by configuration: the remote service when an
/// endpoint is configured, otherwise the offline templates.
pub enum ConfiguredGenerator {
    Remote(RemoteLogoGenerator),
    Offline(SvgLogoGenerator),
}

impl ConfiguredGenerator {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        match config
            .logo_service_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
        {
            Some(url) => {
                info!(endpoint = %url, "using remote logo service");
                Ok(Self::Remote(RemoteLogoGenerator::new(
                    url,
                    config.logo_service_token.clone(),
                    config.request_timeout_secs,
                )?))
            }
            None => {
                info!("no logo service configured, using offline templates");
                Ok(Self::Offline(SvgLogoGenerator))
            }
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl LogoGenerator for ConfiguredGenerator {
    async fn generate(&self, request: &LogoRequest) -> Result<LogoAsset> {
        match self {
            Self::Remote(remote) => remote.generate(request).await,
            Self::Offline(offline) => offline.generate(request).await,
        }
    }
}
