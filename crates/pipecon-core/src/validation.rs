//! Validation of free-text form input.
//!
//! Numeric fields arrive as text from the console. A value that does not
//! parse, or falls outside the field's range, rejects the whole action
//! before any slot is touched.

use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{PipeconError, Result};

/// Returns the lines of `text` that contain something other than whitespace.
///
/// Lines are returned as typed, without trimming.
pub fn non_blank_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a single numeric field and checks it against an inclusive range.
pub fn parse_bounded<T>(field: &str, input: &str, range: RangeInclusive<T>) -> Result<T>
where
    T: FromStr + PartialOrd + Display + Copy,
{
    let trimmed = input.trim();
    let value = trimmed.parse::<T>().map_err(|_| {
        PipeconError::validation(field, format!("'{trimmed}' is not a valid number"))
    })?;
    check_range(field, value, range)
}

/// Checks an already-typed value against an inclusive range.
pub fn check_range<T>(field: &str, value: T, range: RangeInclusive<T>) -> Result<T>
where
    T: PartialOrd + Display + Copy,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(PipeconError::validation(
            field,
            format!(
                "{value} is outside {}..={}",
                range.start(),
                range.end()
            ),
        ))
    }
}

/// Parses one weight per non-blank line.
///
/// Any line that is not a finite number rejects the whole list; the error
/// names the 1-based line in the original text.
pub fn parse_weights(field: &str, text: &str) -> Result<Vec<f64>> {
    let mut weights = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let weight = trimmed.parse::<f64>().map_err(|_| {
            PipeconError::validation(
                field,
                format!("line {} is not a number: '{trimmed}'", index + 1),
            )
        })?;
        if !weight.is_finite() {
            return Err(PipeconError::validation(
                field,
                format!("line {} is not a finite number: '{trimmed}'", index + 1),
            ));
        }
        weights.push(weight);
    }
    Ok(weights)
}
