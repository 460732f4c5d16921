use std::path::PathBuf;

/// Chart file used when neither `--chart` nor `RATE_CHART_PATH` is given.
pub const DEFAULT_CHART_FILE: &str = "mileage_weight_rate_chart.csv";

/// Environment variable naming the default chart file.
pub const CHART_PATH_VAR: &str = "RATE_CHART_PATH";

/// Engine settings resolved by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Chart loaded when a lookup names no explicit source.
    pub default_chart: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_chart: PathBuf::from(DEFAULT_CHART_FILE),
        }
    }
}

impl EngineConfig {
    /// Reads `RATE_CHART_PATH`, falling back to [`DEFAULT_CHART_FILE`] in the
    /// working directory.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(CHART_PATH_VAR).filter(|v| !v.trim().is_empty()) {
            Some(path) => Self {
                default_chart: PathBuf::from(path.trim()),
            },
            None => Self::default(),
        }
    }

    /// Overrides the default chart when `chart` is set.
    pub fn with_chart(mut self, chart: Option<PathBuf>) -> Self {
        if let Some(chart) = chart {
            self.default_chart = chart;
        }
        self
    }
}
