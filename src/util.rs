// Number, date and display helpers.
//
// Workbook exports mix decimal commas, dot thousands separators, currency
// symbols and accounting negatives. Everything numeric goes through the
// normalizer here so the rest of the code can work with plain `f64`.
use crate::types::RawValue;
use chrono::{NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};
use serde::Deserialize;

/// Which cleanup pipeline a textual amount goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NumberMode {
    /// Parenthesized negatives, junk stripping and per-value separator detection.
    #[default]
    Strict,
    /// Drop every `.`, turn `,` into `.`.
    SwapOnly,
}

/// A normalized column plus the count of text values that could not be
/// read and were replaced by zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedColumn {
    pub values: Vec<f64>,
    pub zeroed: usize,
}

fn is_missing_token(s: &str) -> bool {
    matches!(s, "" | "None" | "nan" | "NaN")
}

/// Normalize one raw value. Returns `None` when non-missing text could not
/// be parsed; [`normalize_column`] turns that into zero.
pub fn try_normalize(value: &RawValue, mode: NumberMode) -> Option<f64> {
    match value {
        RawValue::Number(n) if n.is_nan() => Some(0.0),
        RawValue::Number(n) => Some(*n),
        RawValue::Missing | RawValue::Date(_) => Some(0.0),
        RawValue::Text(s) => match mode {
            NumberMode::Strict => parse_strict(s),
            NumberMode::SwapOnly => parse_swap_only(s),
        },
    }
}

/// Same-length numeric column; never fails.
pub fn normalize_column(values: &[RawValue], mode: NumberMode) -> NormalizedColumn {
    let mut out = NormalizedColumn {
        values: Vec::with_capacity(values.len()),
        zeroed: 0,
    };
    for v in values {
        match try_normalize(v, mode) {
            Some(n) => out.values.push(n),
            None => {
                out.zeroed += 1;
                out.values.push(0.0);
            }
        }
    }
    out
}

fn parse_strict(raw: &str) -> Option<f64> {
    let s = raw.replace('\u{a0}', " ");
    let s = s.trim();
    if is_missing_token(s) {
        return Some(0.0);
    }

    let s = match s.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        Some(inner) => format!("-{}", inner),
        None => s.to_string(),
    };

    let kept: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    let has_dot = kept.contains('.');
    let has_comma = kept.contains(',');
    let cleaned = if has_dot && has_comma {
        kept.replace('.', "").replace(',', ".")
    } else if has_comma {
        kept.replace(',', ".")
    } else {
        kept
    };

    cleaned.parse::<f64>().ok()
}

fn parse_swap_only(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if is_missing_token(s) {
        return Some(0.0);
    }
    let cleaned: String = s
        .replace('.', "")
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();
    cleaned.parse::<f64>().ok()
}

/// Trimmed text, or `None` for blanks and the `nan` placeholder.
pub fn clean_text(value: &RawValue) -> Option<String> {
    let s = match value {
        RawValue::Text(s) => s.replace('\u{a0}', " ").trim().to_string(),
        RawValue::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{}", *n as i64),
        RawValue::Number(n) => n.to_string(),
        RawValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        RawValue::Missing => return None,
    };
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(s)
    }
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d.%m.%Y %H:%M:%S"];

/// Parse a date cell; unreadable values become `None` rather than errors.
pub fn parse_date_safe(value: &RawValue) -> Option<NaiveDate> {
    let s = match value {
        RawValue::Date(d) => return Some(*d),
        RawValue::Text(s) => s.trim(),
        _ => return None,
    };
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
}

/// Whole-euro amount with dot grouping, e.g. `1.234.567`.
pub fn format_money(n: f64) -> String {
    let rounded = n.round();
    let int_val = rounded.abs() as i64;
    let grouped = int_val.to_formatted_string(&Locale::de);
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Percentage with two decimals and a decimal comma, e.g. `12,50%`.
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.2}%", ratio).replace('.', ",")
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::de)
}
