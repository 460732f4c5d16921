//! CSV parser for mileage/weight rate charts.
//!
//! Turns raw chart text into a validated [`RateChart`]. Every failure is a
//! [`QuoteError::MalformedChart`] naming the offending line, field or column.

use std::borrow::Cow;
use std::collections::HashMap;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::chart::{OVER_COLUMN_NAME, RateChart, RateRow, WeightColumn};
use crate::error::{QuoteError, Result};

const MILES_START: &str = "miles_start";
const MILES_END: &str = "miles_end";

/// Splits one CSV line into trimmed cells.
///
/// Cells may be wrapped in double quotes to hold commas, and `""` inside a
/// quoted cell is a literal quote. Whitespace around a quoted cell is
/// dropped. Newlines inside quotes are not supported.
pub fn parse_line(line: &str) -> Result<Vec<String>> {
    let line = strip_space_before_quotes(line);
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    let has_record = rdr
        .read_record(&mut record)
        .map_err(|e| QuoteError::malformed(format!("unreadable CSV line: {e}")))?;

    if !has_record {
        // blank line still yields one empty cell
        return Ok(vec![String::new()]);
    }

    Ok(record.iter().map(str::to_string).collect())
}

/// Removes whitespace between a delimiter and an opening quote, so the CSV
/// reader sees the quote as the first byte of the field.
fn strip_space_before_quotes(line: &str) -> Cow<'_, str> {
    if !line.contains('"') {
        return Cow::Borrowed(line);
    }

    let mut out = String::with_capacity(line.len());
    let mut pending = String::new();
    let mut in_quotes = false;
    let mut field_start = true;

    for ch in line.chars() {
        if field_start && !in_quotes && ch.is_whitespace() {
            pending.push(ch);
            continue;
        }

        if field_start && ch == '"' {
            pending.clear();
        } else {
            out.push_str(&pending);
            pending.clear();
        }
        out.push(ch);

        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                field_start = true;
                continue;
            }
            _ => {}
        }
        field_start = false;
    }
    out.push_str(&pending);

    Cow::Owned(out)
}

/// Parses chart text into a normalized [`RateChart`].
///
/// Blank lines are ignored. Line numbers in error messages count the
/// remaining lines, with the header as line 1.
///
/// # Errors
///
/// Returns [`QuoteError::MalformedChart`] if the text has no data rows, the
/// header is wrong, a row has the wrong number of cells, a required number
/// does not parse, a row's bounds are inverted, or the column set lacks the
/// catch-all column or any numeric weight column.
pub fn parse_chart(text: &str) -> Result<RateChart> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < 2 {
        return Err(QuoteError::malformed(
            "CSV must include a header row and at least one data row",
        ));
    }

    let header = parse_line(lines[0])?;
    if header.len() < 3 {
        return Err(QuoteError::malformed("CSV header is missing required columns"));
    }

    if header[0] != MILES_START || header[1] != MILES_END {
        return Err(QuoteError::malformed(format!(
            "CSV must start with columns: {MILES_START},{MILES_END}"
        )));
    }

    let columns: Vec<WeightColumn> = header[2..]
        .iter()
        .map(|label| WeightColumn::from_label(label))
        .collect();
    debug!(columns = columns.len(), "Parsed chart header");

    let rows = lines[1..]
        .iter()
        .enumerate()
        .map(|(index, line)| parse_row(index + 2, line, header.len(), &columns))
        .collect::<Result<Vec<_>>>()?;

    let chart = normalize(rows, columns)?;
    info!(
        rows = chart.rows.len(),
        weight_columns = chart.numeric_columns.len(),
        "Rate chart parsed"
    );
    Ok(chart)
}

fn parse_row(
    line_no: usize,
    line: &str,
    expected: usize,
    columns: &[WeightColumn],
) -> Result<RateRow> {
    let cells = parse_line(line)?;

    if cells.len() != expected {
        return Err(QuoteError::malformed(format!(
            "row {line_no} has {} columns, expected {expected}",
            cells.len()
        )));
    }

    let miles_start = parse_number(&cells[0], &format!("row {line_no} {MILES_START}"))?;
    let miles_end = parse_number(&cells[1], &format!("row {line_no} {MILES_END}"))?;

    if miles_start > miles_end {
        return Err(QuoteError::malformed(format!(
            "row {line_no} has {MILES_START} > {MILES_END} ({miles_start} > {miles_end})"
        )));
    }

    let mut rates = HashMap::with_capacity(columns.len());
    for (col, cell) in columns.iter().zip(&cells[2..]) {
        let rate = parse_number(cell, &format!("row {line_no} column \"{}\"", col.label))?;
        rates.insert(col.label.clone(), rate);
    }

    Ok(RateRow {
        miles_start,
        miles_end,
        rates,
    })
}

/// Parses a required non-negative number.
fn parse_number(cell: &str, context: &str) -> Result<f64> {
    let value = cell
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            QuoteError::malformed(format!("invalid numeric value for {context}: \"{cell}\""))
        })?;

    if value < 0.0 {
        return Err(QuoteError::malformed(format!(
            "negative value for {context}: \"{cell}\""
        )));
    }

    Ok(value)
}

fn normalize(mut rows: Vec<RateRow>, columns: Vec<WeightColumn>) -> Result<RateChart> {
    if rows.is_empty() {
        return Err(QuoteError::malformed("rate chart has no data rows"));
    }

    let over_column = columns
        .iter()
        .find(|col| col.label == OVER_COLUMN_NAME)
        .map(|col| col.label.clone())
        .ok_or_else(|| {
            QuoteError::malformed(format!(
                "missing required weight column: \"{OVER_COLUMN_NAME}\""
            ))
        })?;

    let mut numeric_columns: Vec<WeightColumn> =
        columns.into_iter().filter(|col| col.weight.is_some()).collect();
    if numeric_columns.is_empty() {
        return Err(QuoteError::malformed("rate chart has no numeric weight columns"));
    }
    numeric_columns.sort_by_key(|col| col.weight);

    // stable: rows sharing a start keep their source order
    rows.sort_by(|a, b| a.miles_start.total_cmp(&b.miles_start));

    Ok(RateChart {
        rows,
        numeric_columns,
        over_column,
    })
}
