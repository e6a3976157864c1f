//! Parser for the pipe delimited text published by the rate feed.
//!
//! A response carries a header with the quoted unit amount followed by one
//! data line per fixing date, oldest first:
//!
//! ```text
//! Currency: USD|Amount: 1
//! Date|Rate
//! 01.01.2024|22.500
//! 02.01.2024|22.750
//! ```
//!
//! The unit amount may also appear as a bare `Amount` column header whose value
//! sits in the same column of the following line.

use crate::core::error::ParseError;
use rust_decimal::Decimal;
use std::str::FromStr;

const AMOUNT_MARKER: &str = "Amount";

/// Parses a feed body into the most recent rate for a single unit of the
/// quoted currency.
pub fn parse_rate(text: &str) -> Result<Decimal, ParseError> {
    // Empty cells are kept so column positions line up across lines
    let lines: Vec<Vec<&str>> = text
        .split('\n')
        .map(|line| line.split('|').map(str::trim).collect::<Vec<_>>())
        .filter(|fields| fields.iter().any(|field| !field.is_empty()))
        .collect();

    let Some(last_field) = lines
        .last()
        .and_then(|fields| fields.iter().rev().find(|field| !field.is_empty()))
        .copied()
    else {
        return Err(ParseError::Empty);
    };

    let markers: Vec<(usize, usize)> = lines
        .iter()
        .enumerate()
        .flat_map(|(line_idx, fields)| {
            fields
                .iter()
                .enumerate()
                .filter(|(_, field)| field.contains(AMOUNT_MARKER))
                .map(move |(field_idx, _)| (line_idx, field_idx))
        })
        .collect();

    let (line_idx, field_idx) = match markers.as_slice() {
        [] => return Err(ParseError::MissingAmount),
        [position] => *position,
        all => return Err(ParseError::DuplicateAmount(all.len())),
    };

    let units = unit_amount(&lines, line_idx, field_idx)?;

    let value = Decimal::from_str(last_field)
        .map_err(|_| ParseError::InvalidValue(last_field.to_string()))?;
    if value <= Decimal::ZERO {
        return Err(ParseError::NonPositiveValue(last_field.to_string()));
    }

    // Past 28 decimal places the quotient rounds away to nothing
    match value.checked_div(Decimal::from(units)) {
        Some(rate) if rate > Decimal::ZERO => Ok(rate),
        _ => Err(ParseError::RateUnderflow(last_field.to_string())),
    }
}

fn unit_amount(lines: &[Vec<&str>], line_idx: usize, field_idx: usize) -> Result<u32, ParseError> {
    let line = &lines[line_idx];
    let field = line[field_idx];

    // `Amount: 100`, `Amount|100`, or an `Amount` column header
    let token = if let Some((_, tail)) = field.rsplit_once(':') {
        tail.trim()
    } else if let Some(next) = line[field_idx + 1..]
        .iter()
        .find(|next| !next.is_empty())
        .copied()
        .filter(|next| next.parse::<u32>().is_ok())
    {
        next
    } else {
        lines
            .get(line_idx + 1)
            .and_then(|row| row.get(field_idx))
            .copied()
            .filter(|cell| !cell.is_empty())
            .ok_or_else(|| ParseError::InvalidUnitAmount(field.to_string()))?
    };

    match token.parse::<u32>() {
        Ok(0) => Err(ParseError::ZeroUnitAmount),
        Ok(units) => Ok(units),
        Err(_) => Err(ParseError::InvalidUnitAmount(token.to_string())),
    }
}
