use thiserror::Error;

use crate::aggregate::InsufficientDataError;
use crate::endtime::EndTimeError;
use crate::models::bar::UnknownFieldError;
use crate::models::barsize::BarSizeError;
use crate::window::WindowError;

/// The unified error type for the `historical_sma` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Calendar construction or config loading failed.
    #[error("Calendar configuration error: {0}")]
    Config(#[from] exchange_calendar::ConfigError),

    /// The bar-size text did not match the accepted grammar.
    #[error("Bar size error: {0}")]
    BarSize(#[from] BarSizeError),

    /// The end instant was rejected (future, foreign zone, DST edge).
    #[error("End instant error: {0}")]
    EndTime(#[from] EndTimeError),

    /// Window resolution could not find enough trading time.
    #[error("Window resolution error: {0}")]
    Window(#[from] WindowError),

    /// The source delivered fewer bars than the aggregation needs.
    #[error("Aggregation error: {0}")]
    InsufficientData(#[from] InsufficientDataError),

    /// The requested OHLC field is not one of the recognized keys.
    #[error("Aggregation error: {0}")]
    UnknownField(#[from] UnknownFieldError),
}
