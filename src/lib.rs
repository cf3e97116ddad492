pub mod alert;
pub mod analyzer;
pub mod candle_series;
pub mod engine;
pub mod error;
pub mod indicator;
pub mod model;
pub mod monitor;

/// 설정 로더
pub mod config_loader;

#[cfg(test)]
pub(crate) mod test_utils;

pub use candle_series::CandleSeries;
pub use engine::{EngineConfig, Evaluation, SignalEngine, evaluate};
pub use error::{SignalError, SignalResult};
pub use model::{Candle, ChainMetrics, OhlcvCandle, Regime};
