//! Market Module - Price history and ticker suggestions from the stock backend
//!
//! Plain GETs beside the forecast endpoint. They skip the orchestrator: no
//! request state and no health gate, one backend call each.

pub mod types;

pub use types::{parse_history, parse_popular, PopularStock, PriceHistory, PricePoint};

use serde_json::Value;

use crate::error::{ExtractionError, PredictionError};
use crate::logic::backend::{reported_error, Backend};
use crate::logic::features::normalize_symbol;

pub const HISTORY_PATH: &str = "/api/historical";
pub const POPULAR_PATH: &str = "/api/stocks/popular";

/// Window fetched alongside a forecast
pub const DEFAULT_HISTORY_PERIOD: &str = "3mo";

/// Windows the history endpoint understands
pub const HISTORY_PERIODS: &[&str] =
    &["1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max"];

/// Daily prices for `symbol` over `period`
pub async fn fetch_history(
    backend: &dyn Backend,
    symbol: &str,
    period: &str,
) -> Result<PriceHistory, PredictionError> {
    let symbol = normalize_symbol(symbol).map_err(|e| PredictionError::ValidationFailed(vec![e]))?;
    let period = period.trim().to_ascii_lowercase();
    if !HISTORY_PERIODS.contains(&period.as_str()) {
        return Err(PredictionError::ValidationFailed(vec![ExtractionError::InvalidPeriod(period)]));
    }

    let path = format!("{}/{}", HISTORY_PATH, symbol);
    let body = checked(backend.fetch(&path, &[("period", period.as_str())]).await?)?;
    let history = parse_history(&body, &period)?;

    log::debug!("{} history: {} days over {}", history.symbol, history.points.len(), period);
    Ok(history)
}

/// Tickers the backend suggests
pub async fn fetch_popular(backend: &dyn Backend) -> Result<Vec<PopularStock>, PredictionError> {
    let body = checked(backend.fetch(POPULAR_PATH, &[]).await?)?;
    Ok(parse_popular(&body)?)
}

fn checked(body: Value) -> Result<Value, PredictionError> {
    match reported_error(&body) {
        Some(message) => Err(PredictionError::BackendReportedError(message)),
        None => Ok(body),
    }
}
