//! Normalized rate chart and the row/column selection rules.

use std::collections::HashMap;

use serde::Serialize;

/// Label of the catch-all column used for weights above every numeric bracket.
pub const OVER_COLUMN_NAME: &str = "12000 and over";

/// One weight bracket of the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeightColumn {
    pub label: String,
    /// Weight ceiling parsed from the label; `None` for the catch-all column.
    pub weight: Option<i64>,
}

impl WeightColumn {
    pub fn from_label(label: &str) -> Self {
        Self {
            label: label.to_string(),
            weight: label.parse::<i64>().ok(),
        }
    }
}

/// One mileage bracket, inclusive on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRow {
    pub miles_start: f64,
    pub miles_end: f64,
    pub rates: HashMap<String, f64>,
}

impl RateRow {
    pub fn contains(&self, miles: f64) -> bool {
        miles >= self.miles_start && miles <= self.miles_end
    }

    pub fn rate(&self, label: &str) -> Option<f64> {
        self.rates.get(label).copied()
    }
}

/// Immutable, validated rate table. Built by [`crate::parser::parse_chart`].
///
/// Rows are sorted ascending by `miles_start`, numeric columns ascending by
/// weight, and every row holds a rate for every column.
#[derive(Debug, Clone, PartialEq)]
pub struct RateChart {
    pub(crate) rows: Vec<RateRow>,
    pub(crate) numeric_columns: Vec<WeightColumn>,
    pub(crate) over_column: String,
}

impl RateChart {
    pub fn rows(&self) -> &[RateRow] {
        &self.rows
    }

    pub fn numeric_columns(&self) -> &[WeightColumn] {
        &self.numeric_columns
    }

    pub fn over_column(&self) -> &str {
        &self.over_column
    }

    /// Selects the mileage row for `miles`.
    ///
    /// At or below the first row's start the first row wins, at or above the
    /// last row's end the last row wins. In between, the first row whose range
    /// contains `miles`; a gap in coverage falls back to the last row.
    pub fn row_for_miles(&self, miles: f64) -> &RateRow {
        let (first, last) = match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => unreachable!("rate chart always has at least one row"),
        };

        if miles <= first.miles_start {
            return first;
        }

        if miles >= last.miles_end {
            return last;
        }

        match self.rows.iter().find(|row| row.contains(miles)) {
            Some(row) => row,
            None => {
                tracing::warn!(miles, "No mileage row covers distance, using last row");
                last
            }
        }
    }

    /// Selects the column label for `weight`: the lightest numeric bracket
    /// whose ceiling is at least `weight`, else the catch-all column.
    pub fn column_for_weight(&self, weight: f64) -> &str {
        self.numeric_columns
            .iter()
            .find(|col| col.weight.is_some_and(|w| weight <= w as f64))
            .map(|col| col.label.as_str())
            .unwrap_or(&self.over_column)
    }

    /// Summary of the chart's coverage, for reporting.
    pub fn summary(&self) -> ChartSummary {
        ChartSummary {
            rows: self.rows.len(),
            miles_min: self.rows.first().map_or(0.0, |r| r.miles_start),
            miles_max: self
                .rows
                .iter()
                .map(|r| r.miles_end)
                .fold(0.0, f64::max),
            weight_brackets: self
                .numeric_columns
                .iter()
                .filter_map(|c| c.weight)
                .collect(),
            over_column: self.over_column.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSummary {
    pub rows: usize,
    pub miles_min: f64,
    pub miles_max: f64,
    pub weight_brackets: Vec<i64>,
    pub over_column: String,
}
