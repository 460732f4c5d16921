//! Rate lookups and quote pricing against a cached rate chart.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::cache::ChartCache;
use crate::chart::RateChart;
use crate::config::EngineConfig;
use crate::error::{QuoteError, Result};
use crate::input::QuoteInput;
use crate::parser::parse_chart;
use crate::source::{ChartSource, FileSource};
use crate::utility::round_to_cents;

/// Priced shipment: per-mile rate and total cost, both in cents precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub per_mile_rate: f64,
    pub total_cost: f64,
}

/// Answers rate and quote queries, loading charts through `S` on first use.
#[derive(Debug)]
pub struct RateEngine<S = FileSource> {
    source: S,
    cache: ChartCache,
    default_chart: PathBuf,
}

impl RateEngine<FileSource> {
    /// Engine reading charts from disk, defaulting to `config.default_chart`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(FileSource::new(), config.default_chart.clone())
    }
}

impl<S: ChartSource> RateEngine<S> {
    pub fn new(source: S, default_chart: impl Into<PathBuf>) -> Self {
        Self {
            source,
            cache: ChartCache::new(),
            default_chart: default_chart.into(),
        }
    }

    pub fn default_chart(&self) -> &Path {
        &self.default_chart
    }

    /// The chart for `source` (the default chart when `None`), built on first use.
    #[tracing::instrument(skip(self))]
    pub fn chart(&self, source: Option<&Path>) -> Result<Arc<RateChart>> {
        let key = self.key(source);
        self.cache.get_or_build(key, || self.load(key))
    }

    /// Re-reads and re-parses `source`, replacing its cached chart.
    #[tracing::instrument(skip(self))]
    pub fn reload(&self, source: Option<&Path>) -> Result<Arc<RateChart>> {
        let key = self.key(source);
        self.cache.rebuild(key, || self.load(key))
    }

    /// Drops the cached chart for `source`. Returns whether one was cached.
    pub fn invalidate(&self, source: Option<&Path>) -> bool {
        self.cache.invalidate(self.key(source))
    }

    /// Per-mile rate for a numeric `miles`/`weight` pair.
    ///
    /// # Errors
    ///
    /// Input errors ([`QuoteError::InvalidInputType`],
    /// [`QuoteError::InvalidInputRange`]) are reported before the chart is
    /// touched; chart errors propagate unchanged.
    pub fn per_mile_rate(&self, miles: f64, weight: f64, source: Option<&Path>) -> Result<f64> {
        let input = QuoteInput::new(miles, weight)?;
        self.rate_for(&input, source)
    }

    /// Full quote for a numeric `miles`/`weight` pair.
    ///
    /// The total is computed from the already rounded rate and rounded again.
    pub fn quote(&self, miles: f64, weight: f64, source: Option<&Path>) -> Result<Quote> {
        let input = QuoteInput::new(miles, weight)?;
        self.quote_for(&input, source)
    }

    pub fn rate_for(&self, input: &QuoteInput, source: Option<&Path>) -> Result<f64> {
        let chart = self.chart(source)?;
        let row = chart.row_for_miles(input.miles());
        let column = chart.column_for_weight(input.weight());

        let rate = row.rate(column).ok_or_else(|| {
            QuoteError::malformed(format!(
                "row {}-{} has no rate for column \"{column}\"",
                row.miles_start, row.miles_end
            ))
        })?;

        debug!(
            miles = input.miles(),
            weight = input.weight(),
            row_start = row.miles_start,
            column,
            rate,
            "Rate selected"
        );
        Ok(round_to_cents(rate))
    }

    pub fn quote_for(&self, input: &QuoteInput, source: Option<&Path>) -> Result<Quote> {
        let per_mile_rate = self.rate_for(input, source)?;
        let total_cost = round_to_cents(per_mile_rate * input.hundredweight());

        Ok(Quote {
            per_mile_rate,
            total_cost,
        })
    }

    fn key<'a>(&'a self, source: Option<&'a Path>) -> &'a Path {
        source.unwrap_or(self.default_chart.as_path())
    }

    fn load(&self, path: &Path) -> Result<RateChart> {
        let text = self.source.read(path)?;
        parse_chart(&text)
    }
}
