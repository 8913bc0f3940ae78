//! Date display conversion used by date-formatted table columns.
//!
//! Formats are written with the tokens `yyyy`, `yy`, `MM`, `dd`, `HH`, `mm` and `ss`; anything
//! else is literal. `"yyyy-MM-dd"` → `"dd/MM/yyyy"` turns `2024-05-25` into `25/05/2024`.

use chrono::NaiveDate;
use chrono::NaiveDateTime;
use std::fmt::Write;

/// Converts a raw field value from its storage format into its display format.
pub trait DateFormatter: Send + Sync {
    fn convert(&self, raw: &str, field_format: &str, display_format: &str) -> String;
}

/// Default [`DateFormatter`] backed by `chrono`.
///
/// Values that do not parse with `field_format` are returned unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct PatternDateFormatter;

impl DateFormatter for PatternDateFormatter {
    fn convert(&self, raw: &str, field_format: &str, display_format: &str) -> String {
        convert_date_format(raw, field_format, display_format)
    }
}

pub fn convert_date_format(raw: &str, field_format: &str, display_format: &str) -> String {
    let raw_trimmed = raw.trim();
    if raw_trimmed.is_empty() {
        return String::new();
    }
    let parse_fmt = to_strftime(field_format);
    let display_fmt = to_strftime(display_format);

    let parsed = NaiveDateTime::parse_from_str(raw_trimmed, &parse_fmt).ok().or_else(|| {
        NaiveDate::parse_from_str(raw_trimmed, &parse_fmt)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    });
    let Some(dt) = parsed else {
        return raw.to_string();
    };

    let mut out = String::new();
    if write!(out, "{}", dt.format(&display_fmt)).is_err() {
        return raw.to_string();
    }
    out
}

/// Translates a `yyyy-MM-dd` style pattern into a `chrono` strftime string.
pub fn to_strftime(pattern: &str) -> String {
    const TOKENS: [(&str, &str); 7] = [
        ("yyyy", "%Y"),
        ("yy", "%y"),
        ("MM", "%m"),
        ("dd", "%d"),
        ("HH", "%H"),
        ("mm", "%M"),
        ("ss", "%S"),
    ];

    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;
    'outer: while !rest.is_empty() {
        for (token, spec) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(spec);
                rest = tail;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            if ch == '%' {
                out.push_str("%%");
            } else {
                out.push(ch);
            }
        }
        rest = chars.as_str();
    }
    out
}
