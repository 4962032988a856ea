use serde::{Deserialize, Serialize};

/// Probability above which the image model's output is read as a buy.
/// The comparison is strict: exactly 0.5 is a sell.
pub const BUY_PROBABILITY_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
}

impl Signal {
    pub fn from_probability(probability_buy: f64) -> Self {
        if probability_buy > BUY_PROBABILITY_THRESHOLD {
            Signal::Buy
        } else {
            Signal::Sell
        }
    }
}

/// Raw output of the signal predictor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalOutput {
    pub probability_buy: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalResult {
    pub signal: Signal,
    pub take_profit: f64,
    pub stop_loss: f64,
}

impl From<SignalOutput> for SignalResult {
    fn from(output: SignalOutput) -> Self {
        Self {
            signal: Signal::from_probability(output.probability_buy),
            take_profit: output.take_profit,
            stop_loss: output.stop_loss,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    pub predicted_price: f64,
}
