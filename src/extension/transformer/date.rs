//! Date transformers
//!
//! Normalized dates are ISO 8601 calendar dates (`YYYY-MM-DD`).

use chrono::{Datelike, NaiveDate};
use std::fmt::Write;

use crate::core::transformer::{DataTransformer, TransformationFailed};
use crate::core::Data;

const ISO_FORMAT: &str = "%Y-%m-%d";

fn parse_iso(value: &str) -> Result<NaiveDate, TransformationFailed> {
    NaiveDate::parse_from_str(value, ISO_FORMAT)
        .map_err(|e| TransformationFailed::new(format!("\"{value}\" is not a valid date: {e}")))
}

fn format_date(date: NaiveDate, format: &str) -> Result<String, TransformationFailed> {
    let mut out = String::new();
    write!(out, "{}", date.format(format))
        .map_err(|_| TransformationFailed::new(format!("invalid date format \"{format}\"")))?;
    Ok(out)
}

/// ISO dates ↔ strings in a display format (chrono `strftime` syntax)
#[derive(Debug, Clone)]
pub struct DateStringTransformer {
    format: String,
}

impl DateStringTransformer {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl Default for DateStringTransformer {
    fn default() -> Self {
        Self::new(ISO_FORMAT)
    }
}

impl DataTransformer for DateStringTransformer {
    fn transform(&self, value: Data) -> Result<Data, TransformationFailed> {
        match value {
            Data::Null => Ok(Data::String(String::new())),
            Data::String(s) => Ok(Data::String(format_date(parse_iso(&s)?, &self.format)?)),
            other => Err(TransformationFailed::expected("string", &other)),
        }
    }

    fn reverse_transform(&self, value: Data) -> Result<Data, TransformationFailed> {
        match value {
            Data::Null => Ok(Data::Null),
            Data::String(s) if s.trim().is_empty() => Ok(Data::Null),
            Data::String(s) => {
                let date = NaiveDate::parse_from_str(s.trim(), &self.format).map_err(|e| {
                    TransformationFailed::new(format!(
                        "\"{s}\" does not match the format \"{}\": {e}",
                        self.format
                    ))
                })?;
                Ok(Data::String(format_date(date, ISO_FORMAT)?))
            }
            other => Err(TransformationFailed::expected("string", &other)),
        }
    }
}

/// ISO dates ↔ `{"year", "month", "day"}` objects
#[derive(Debug, Clone, Copy, Default)]
pub struct DateToPartsTransformer;

const PARTS: [&str; 3] = ["year", "month", "day"];

fn part(map: &serde_json::Map<String, Data>, key: &str) -> Result<Option<i64>, TransformationFailed> {
    match map.get(key) {
        None | Some(Data::Null) => Ok(None),
        Some(Data::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| TransformationFailed::new(format!("the {key} must be an integer"))),
        Some(Data::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Data::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| TransformationFailed::new(format!("the {key} \"{s}\" is not an integer"))),
        Some(other) => Err(TransformationFailed::expected("integer", other)),
    }
}

impl DataTransformer for DateToPartsTransformer {
    fn transform(&self, value: Data) -> Result<Data, TransformationFailed> {
        match value {
            Data::Null => Ok(serde_json::json!({"year": null, "month": null, "day": null})),
            Data::String(s) => {
                let date = parse_iso(&s)?;
                Ok(serde_json::json!({
                    "year": date.year(),
                    "month": date.month(),
                    "day": date.day(),
                }))
            }
            other => Err(TransformationFailed::expected("string", &other)),
        }
    }

    fn reverse_transform(&self, value: Data) -> Result<Data, TransformationFailed> {
        let map = match value {
            Data::Null => return Ok(Data::Null),
            Data::Object(map) => map,
            other => return Err(TransformationFailed::expected("object", &other)),
        };

        let mut parts = [None; 3];
        for (slot, key) in parts.iter_mut().zip(PARTS) {
            *slot = part(&map, key)?;
        }
        match parts {
            [None, None, None] => Ok(Data::Null),
            [Some(year), Some(month), Some(day)] => {
                let date = i32::try_from(year)
                    .ok()
                    .zip(u32::try_from(month).ok())
                    .zip(u32::try_from(day).ok())
                    .and_then(|((y, m), d)| NaiveDate::from_ymd_opt(y, m, d))
                    .ok_or_else(|| {
                        TransformationFailed::new(format!("{year}-{month}-{day} is not a valid date"))
                    })?;
                Ok(Data::String(format_date(date, ISO_FORMAT)?))
            }
            _ => Err(TransformationFailed::new(
                "the fields year, month and day must be all empty or all filled",
            )),
        }
    }
}
