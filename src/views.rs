//! Presentation-side derivations: chart series with moving averages and
//! heatmap tiles.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::views::{FULL_INTENSITY_PCT, SMA_FAST, SMA_SLOW};
use crate::market::{Candle, Stock};

/// Trailing simple moving average of closes, aligned with `candles`.
///
/// The first `period - 1` entries are `None`. A zero period yields all `None`.
pub fn sma<'a, I>(candles: I, period: usize) -> Vec<Option<f64>>
where
    I: IntoIterator<Item = &'a Candle>,
{
    let closes: Vec<f64> = candles.into_iter().map(|c| c.close).collect();
    if period == 0 {
        return vec![None; closes.len()];
    }

    let mut out = Vec::with_capacity(closes.len());
    let mut window_sum = 0.0;
    for (i, close) in closes.iter().enumerate() {
        window_sum += close;
        if i >= period {
            window_sum -= closes[i - period];
        }
        out.push((i + 1 >= period).then(|| window_sum / period as f64));
    }
    out
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub sma5: Option<f64>,
    pub sma20: Option<f64>,
}

/// Detail chart for one stock, oldest candle first.
pub fn chart_series(stock: &Stock) -> Vec<ChartPoint> {
    let fast = sma(&stock.candles, SMA_FAST);
    let slow = sma(&stock.candles, SMA_SLOW);

    stock
        .candles
        .iter()
        .zip(fast)
        .zip(slow)
        .map(|((c, sma5), sma20)| ChartPoint {
            time: c.time,
            open: c.open,
            high: c.high,
            low: c.low,
            close: c.close,
            volume: c.volume,
            sma5,
            sma20,
        })
        .collect()
}

/// Color strength in `[0, 1]`; saturates at a 4% move either way.
pub fn heatmap_intensity(change_percent: f64) -> f64 {
    if change_percent.is_nan() {
        return 0.0;
    }
    (change_percent.abs() / FULL_INTENSITY_PCT).min(1.0)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapTile {
    pub symbol: String,
    pub sector: String,
    pub change_percent: f64,
    pub positive: bool,
    pub intensity: f64,
}

pub fn heatmap(stocks: &[Stock]) -> Vec<HeatmapTile> {
    stocks
        .iter()
        .map(|s| HeatmapTile {
            symbol: s.symbol.clone(),
            sector: s.sector.clone(),
            change_percent: s.change_percent,
            positive: s.is_up(),
            intensity: heatmap_intensity(s.change_percent),
        })
        .collect()
}
