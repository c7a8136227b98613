//! Market data records and their response shapes

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::NormalizationError;
use crate::logic::normalize::{array, integer, number, string};

/// One trading day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: String,
    pub period: String,
    /// Oldest first, as the backend sends them
    pub points: Vec<PricePoint>,
}

impl PriceHistory {
    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Close-to-close change over the period, as a fraction of the first close
    pub fn change_ratio(&self) -> Option<f64> {
        let first = self.points.first()?.close;
        let last = self.points.last()?.close;
        if first == 0.0 {
            return None;
        }
        Some((last - first) / first)
    }
}

/// Suggested ticker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularStock {
    pub symbol: String,
    pub name: String,
}

/// `{symbol, data: [{date, open, high, low, close, volume}]}`
pub fn parse_history(body: &Value, period: &str) -> Result<PriceHistory, NormalizationError> {
    let symbol = string(body, "symbol")?;
    let points = array(body, "data")?
        .iter()
        .enumerate()
        .map(|(i, entry)| price_point(entry).map_err(|e| e.within(&format!("data[{}]", i))))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PriceHistory { symbol, period: period.to_string(), points })
}

fn price_point(entry: &Value) -> Result<PricePoint, NormalizationError> {
    let volume = integer(entry, "volume")?;
    if volume < 0 {
        return Err(NormalizationError::OutOfRange { field: "volume".into(), value: volume as f64 });
    }

    Ok(PricePoint {
        date: string(entry, "date")?,
        open: number(entry, "open")?,
        high: number(entry, "high")?,
        low: number(entry, "low")?,
        close: number(entry, "close")?,
        volume: volume as u64,
    })
}

/// `[{symbol, name}]`
pub fn parse_popular(body: &Value) -> Result<Vec<PopularStock>, NormalizationError> {
    let entries = body.as_array().ok_or(NormalizationError::WrongType {
        field: "stocks".into(),
        expected: "array",
    })?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| popular_stock(entry).map_err(|e| e.within(&format!("stocks[{}]", i))))
        .collect()
}

fn popular_stock(entry: &Value) -> Result<PopularStock, NormalizationError> {
    Ok(PopularStock { symbol: string(entry, "symbol")?, name: string(entry, "name")? })
}
