pub mod cache;
pub mod chart;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod output;
pub mod parser;
pub mod source;
pub mod utility;

pub use chart::{OVER_COLUMN_NAME, RateChart, RateRow, WeightColumn};
pub use config::EngineConfig;
pub use engine::{Quote, RateEngine};
pub use error::{ErrorKind, QuoteError};
pub use input::QuoteInput;
