use marketlens::application::ml::InferenceModels;
use marketlens::application::ml::image_preprocessor::ImagePreprocessor;
use marketlens::application::ml::scaler::StandardScaler;
use marketlens::application::system::Application;
use marketlens::config::Config;
use marketlens::infrastructure::mock::{LinearPricePredictor, MockSignalPredictor};
use std::sync::Arc;

#[test]
fn test_scaler_dimension_must_match_features() {
    let result = InferenceModels::new(
        Arc::new(StandardScaler::new(vec![0.0; 5], vec![1.0; 5]).unwrap()),
        Arc::new(LinearPricePredictor::new(vec![1.0; 5], 0.0)),
        Arc::new(MockSignalPredictor::brightness()),
        ImagePreprocessor::default(),
    );
    let err = result.err().unwrap();
    assert!(err.to_string().contains("expects 5 features"));
}

#[tokio::test]
async fn test_missing_artifacts_abort_build() {
    let dir = std::env::temp_dir().join(format!("marketlens_empty_{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let model_dir = dir.to_string_lossy().to_string();

    let config = Config::from_lookup(move |key| match key {
        "MODEL_DIR" => Some(model_dir.clone()),
        "GATEWAY_PORT" => Some("0".to_string()),
        _ => None,
    })
    .unwrap();

    let err = Application::build(config).await.err().unwrap();
    assert!(format!("{:#}", err).contains("Scaler artifact"));
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_invalid_config_is_rejected() {
    let result = Config::from_lookup(|key| match key {
        "MARKET_DATA_MODE" => Some("yahoo".to_string()),
        _ => None,
    });
    assert!(result.is_err());
}
