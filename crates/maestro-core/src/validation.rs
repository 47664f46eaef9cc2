//! User input checks shared by the booking workflow and the CLI.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid date format: {input:?} (expected YYYY-MM-DD)")]
    InvalidDate { input: String },
    #[error("invalid number of seats: {input:?}")]
    InvalidSeats { input: String },
}

/// Accepts exactly `DDDD-DD-DD` with ASCII digits.
///
/// Only the shape is checked: `2024-13-45` passes.
pub fn parse_date(input: &str) -> Result<&str, ValidationError> {
    let bytes = input.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if shaped {
        Ok(input)
    } else {
        Err(ValidationError::InvalidDate {
            input: input.to_string(),
        })
    }
}

/// Parses a seat count; must be an integer strictly greater than zero.
/// Surrounding whitespace is ignored.
pub fn parse_seats(input: &str) -> Result<u32, ValidationError> {
    let invalid = || ValidationError::InvalidSeats {
        input: input.to_string(),
    };
    let value: i64 = input.trim().parse().map_err(|_| invalid())?;
    if value <= 0 {
        return Err(invalid());
    }
    u32::try_from(value).map_err(|_| invalid())
}

pub fn validate_date(input: &str) -> bool {
    parse_date(input).is_ok()
}

pub fn validate_seats(input: &str) -> bool {
    parse_seats(input).is_ok()
}
