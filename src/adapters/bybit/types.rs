//! Bybit v5 wire types

use serde::{Deserialize, Serialize};

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::types::Candle;

/// Envelope shared by every v5 response
///
/// `result` is kept raw because failed calls return `{}` instead of the
/// endpoint's result shape.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(rename = "retCode")]
    pub ret_code: i64,
    #[serde(rename = "retMsg", default)]
    pub ret_msg: String,
    #[serde(default)]
    pub result: serde_json::Value,
}

impl ApiEnvelope {
    /// Check retCode and decode `result` into the endpoint type
    pub fn into_result<T: for<'de> Deserialize<'de>>(self) -> ExchangeResult<T> {
        if self.ret_code != 0 {
            return Err(ExchangeError::from_ret_code(self.ret_code, self.ret_msg));
        }
        serde_json::from_value(self.result)
            .map_err(|e| ExchangeError::InvalidResponse(format!("Unexpected result shape: {}", e)))
    }
}

/// `GET /v5/market/kline` result
#[derive(Debug, Deserialize)]
pub struct KlineResult {
    /// Rows of [startTime, open, high, low, close, volume, turnover], newest first
    pub list: Vec<Vec<String>>,
}

impl KlineResult {
    /// Parse rows and return them oldest first
    pub fn into_candles(self) -> ExchangeResult<Vec<Candle>> {
        let mut candles = self
            .list
            .iter()
            .map(|row| parse_kline_row(row))
            .collect::<ExchangeResult<Vec<_>>>()?;
        candles.sort_by_key(|c| c.timestamp);
        Ok(candles)
    }
}

fn parse_kline_row(row: &[String]) -> ExchangeResult<Candle> {
    if row.len() < 7 {
        return Err(ExchangeError::InvalidResponse(format!(
            "Kline row has {} fields, expected 7",
            row.len()
        )));
    }

    let num = |idx: usize, name: &str| -> ExchangeResult<f64> {
        row[idx].parse::<f64>().map_err(|_| {
            ExchangeError::InvalidResponse(format!(
                "Kline {} is not a number: '{}'",
                name, row[idx]
            ))
        })
    };

    let timestamp = row[0].parse::<u64>().map_err(|_| {
        ExchangeError::InvalidResponse(format!("Kline startTime is not an integer: '{}'", row[0]))
    })?;

    Ok(Candle {
        timestamp,
        open: num(1, "open")?,
        high: num(2, "high")?,
        low: num(3, "low")?,
        close: num(4, "close")?,
        volume: num(5, "volume")?,
        turnover: num(6, "turnover")?,
    })
}

/// `POST /v5/order/create` body
#[derive(Debug, Serialize)]
pub struct OrderCreateBody<'a> {
    pub category: &'a str,
    pub symbol: &'a str,
    pub side: &'a str,
    #[serde(rename = "orderType")]
    pub order_type: &'a str,
    pub qty: String,
    #[serde(rename = "timeInForce")]
    pub time_in_force: &'a str,
    #[serde(rename = "orderLinkId")]
    pub order_link_id: &'a str,
}

/// `POST /v5/order/create` result
#[derive(Debug, Deserialize)]
pub struct OrderCreateResult {
    #[serde(rename = "orderId")]
    pub order_id: String,
}
