// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

pub mod doctor;
pub mod form;
pub mod notices;
pub mod prescription;
pub mod preview;
pub mod style;
