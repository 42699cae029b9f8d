// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module: background removal, data URLs and logo normalisation.

pub mod asset;
pub mod background;
pub mod data_url;
pub mod processor;

pub use asset::normalize_logo;
pub use background::{DEFAULT_THRESHOLD, remove_background};
pub use processor::{ImageProcessor, remove_background_from_data_url};
