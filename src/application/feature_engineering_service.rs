use crate::domain::errors::InferenceError;
use crate::domain::market::{Bar, BarSeries};
use crate::domain::ml::feature_registry::{FAST_MA_WINDOW, SLOW_MA_WINDOW};
use crate::domain::ml::{FeatureRow, FeatureVector};
use anyhow::anyhow;
use ta::indicators::SimpleMovingAverage;
use ta::{Next, Reset};

/// Turns a bar series into the price model's feature vector.
///
/// Moving averages are trailing: the value at bar `i` uses closes `i - n + 1 ..= i` only.
/// Rows whose windows are not yet full are dropped, so the first 199 bars of a series never
/// produce a row.
#[derive(Clone)]
pub struct TechnicalFeatureEngineeringService {
    sma_50: SimpleMovingAverage,
    sma_200: SimpleMovingAverage,
}

impl TechnicalFeatureEngineeringService {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            sma_50: SimpleMovingAverage::new(FAST_MA_WINDOW)
                .map_err(|e| anyhow!("invalid MA_50 window: {:?}", e))?,
            sma_200: SimpleMovingAverage::new(SLOW_MA_WINDOW)
                .map_err(|e| anyhow!("invalid MA_200 window: {:?}", e))?,
        })
    }

    /// Every fully-windowed row of the series, oldest first.
    ///
    /// A non-finite close restarts both windows; a row with any non-finite field is skipped.
    pub fn rolling_features(&self, series: &BarSeries) -> Vec<FeatureRow> {
        let mut sma_50 = self.sma_50.clone();
        let mut sma_200 = self.sma_200.clone();
        sma_50.reset();
        sma_200.reset();

        let mut streak = 0usize;
        let mut rows = Vec::with_capacity(series.len().saturating_sub(SLOW_MA_WINDOW - 1));

        for bar in series.bars() {
            if !bar.close.is_finite() {
                sma_50.reset();
                sma_200.reset();
                streak = 0;
                continue;
            }

            let ma_50 = sma_50.next(bar.close);
            let ma_200 = sma_200.next(bar.close);
            streak += 1;

            if streak < SLOW_MA_WINDOW {
                continue;
            }

            let row = to_row(bar, ma_50, ma_200);
            if is_finite_row(&row) {
                rows.push(row);
            }
        }

        rows
    }

    /// Feature vector of the last complete row, in `FEATURE_NAMES` order.
    pub fn compute_features(&self, series: &BarSeries) -> Result<FeatureVector, InferenceError> {
        if series.len() < SLOW_MA_WINDOW {
            return Err(InferenceError::InsufficientHistory {
                required: SLOW_MA_WINDOW,
                available: series.len(),
            });
        }

        self.rolling_features(series)
            .last()
            .map(FeatureVector::from)
            .ok_or_else(|| InferenceError::InsufficientHistory {
                required: SLOW_MA_WINDOW,
                available: longest_finite_run(series),
            })
    }
}

/// Length of the longest run of consecutive finite closes, the history a window can actually use.
fn longest_finite_run(series: &BarSeries) -> usize {
    series
        .closes()
        .fold((0usize, 0usize), |(longest, run), close| {
            let run = if close.is_finite() { run + 1 } else { 0 };
            (longest.max(run), run)
        })
        .0
}

fn to_row(bar: &Bar, ma_50: f64, ma_200: f64) -> FeatureRow {
    FeatureRow {
        timestamp: bar.timestamp,
        open: bar.open,
        high: bar.high,
        low: bar.low,
        volume: bar.volume,
        ma_50,
        ma_200,
    }
}

fn is_finite_row(row: &FeatureRow) -> bool {
    [row.open, row.high, row.low, row.volume, row.ma_50, row.ma_200]
        .iter()
        .all(|v| v.is_finite())
}
