/// Ordered list of feature names.
/// This order MUST match exactly the column order the scaler and price model were fit on.
/// Any change here is a breaking change for every artifact in `MODEL_DIR`.
pub const FEATURE_NAMES: &[&str] = &["open", "high", "low", "volume", "ma_50", "ma_200"];

pub const FEATURE_DIM: usize = 6;

pub const FAST_MA_WINDOW: usize = 50;
pub const SLOW_MA_WINDOW: usize = 200;

/// One fully-windowed observation: a bar plus its trailing moving averages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
    pub ma_50: f64,
    pub ma_200: f64,
}

/// Fixed-order numeric input to the scaler and price predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<&FeatureRow> for FeatureVector {
    fn from(row: &FeatureRow) -> Self {
        Self(vec![
            row.open, row.high, row.low, row.volume, row.ma_50, row.ma_200,
        ])
    }
}

/// Checks that an artifact's recorded column names match [`FEATURE_NAMES`].
pub fn matches_registry<S: AsRef<str>>(names: &[S]) -> bool {
    names.len() == FEATURE_NAMES.len()
        && names
            .iter()
            .zip(FEATURE_NAMES)
            .all(|(a, b)| a.as_ref() == *b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_vector_length() {
        let row = FeatureRow {
            timestamp: 0,
            open: 1.0,
            high: 2.0,
            low: 0.5,
            volume: 100.0,
            ma_50: 1.1,
            ma_200: 1.2,
        };
        let vec = FeatureVector::from(&row);
        assert_eq!(vec.len(), FEATURE_NAMES.len());
        assert_eq!(vec.len(), FEATURE_DIM);
    }

    #[test]
    fn test_feature_order() {
        let row = FeatureRow {
            timestamp: 0,
            open: 1.0,
            high: 2.0,
            low: 3.0,
            volume: 4.0,
            ma_50: 5.0,
            ma_200: 6.0,
        };
        // close is deliberately absent: it is the regression target
        assert_eq!(
            FeatureVector::from(&row).as_slice(),
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
        );
    }

    #[test]
    fn test_registry_match() {
        assert!(matches_registry(FEATURE_NAMES));
        assert!(!matches_registry(&["high", "open", "low", "volume", "ma_50", "ma_200"]));
        assert!(!matches_registry(&["open", "high", "low", "volume", "ma_50"]));
    }
}
