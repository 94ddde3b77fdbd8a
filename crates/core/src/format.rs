//! Display formatting for dates and fill ratios.

use chrono::Datelike;

use crate::model::{ExperienceRecord, parse_date};

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Shown in place of an end date for the current position.
pub const ONGOING_LABEL: &str = "Actualmente";

/// `"2024-01"` → `"enero de 2024"`. Unparseable input is returned unchanged.
pub fn format_month_year(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => format!("{} de {}", MONTHS[date.month0() as usize], date.year()),
        None => raw.to_string(),
    }
}

/// `"enero de 2020 - marzo de 2022"`, or `"... - Actualmente"` when ongoing.
pub fn format_date_range(record: &ExperienceRecord) -> String {
    let end = match record.end_date.as_deref() {
        Some(end) if !end.trim().is_empty() => format_month_year(end),
        _ => ONGOING_LABEL.to_string(),
    };
    format!("{} - {end}", format_month_year(&record.start_date))
}

/// A ratio clamped to [0, 1] as a CSS percentage.
pub fn percentage(value: f64) -> String {
    let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    format!("{}%", value * 100.0)
}
