// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Prescription date formatting (day/month/year).

use chrono::{DateTime, NaiveDate};

/// Placeholder printed on the dual-copy form when no date is set.
pub const BLANK_DATE: &str = "___/___/______";

/// Format an ISO date (or RFC 3339 timestamp) as `DD/MM/YYYY`.
///
/// Empty input yields an empty string. Input that is neither form is
/// returned verbatim.
pub fn format_date(date: &str) -> String {
    let date = date.trim();
    if date.is_empty() {
        return String::new();
    }
    if let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return day.format("%d/%m/%Y").to_string();
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(date) {
        return stamp.date_naive().format("%d/%m/%Y").to_string();
    }
    date.to_string()
}

/// Like [`format_date`], but an empty date prints the blank placeholder.
pub fn format_date_or_blank(date: &str) -> String {
    match format_date(date) {
        s if s.is_empty() => BLANK_DATE.to_string(),
        s => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_date_is_day_month_year() {
        assert_eq!(format_date("2024-03-05"), "05/03/2024");
    }

    #[test]
    fn empty_date_is_empty() {
        assert_eq!(format_date(""), "");
        assert_eq!(format_date_or_blank("  "), BLANK_DATE);
    }

    #[test]
    fn timestamps_keep_their_own_calendar_day() {
        assert_eq!(format_date("2024-12-31T23:30:00-03:00"), "31/12/2024");
    }

    #[test]
    fn unparseable_dates_are_shown_verbatim() {
        assert_eq!(format_date("amanhã"), "amanhã");
        assert_eq!(format_date("2024-02-30"), "2024-02-30");
    }
}
