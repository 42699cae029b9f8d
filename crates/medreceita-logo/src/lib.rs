// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// medreceita-logo: Logo generation for MedReceita.
//
// A `LogoGenerator` turns a text prompt and a primary colour into a
// `LogoAsset`. The remote generator talks to an HTTP service; the offline
// generator draws one of a few vector templates locally.

pub mod generator;
pub mod offline;
pub mod remote;

pub use generator::{ConfiguredGenerator, LogoGenerator, LogoRequest};
pub use offline::{LogoTemplate, SvgLogoGenerator};
pub use remote::{RemoteLogoGenerator, ServiceReply, interpret_response};
