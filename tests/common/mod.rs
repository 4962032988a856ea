#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use marketlens::application::ml::InferenceModels;
use marketlens::application::ml::image_preprocessor::ImagePreprocessor;
use marketlens::application::ml::scaler::StandardScaler;
use marketlens::application::system::{Application, GatewayHandle};
use marketlens::config::Config;
use marketlens::domain::market::Bar;
use marketlens::infrastructure::mock::{
    LinearPricePredictor, MockMarketDataService, MockSignalPredictor,
};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub const MEAN: [f64; 6] = [100.0, 101.0, 99.0, 3.0e6, 100.0, 100.0];
pub const SCALE: [f64; 6] = [20.0, 20.0, 20.0, 1.0e6, 20.0, 20.0];
pub const WEIGHTS: [f64; 6] = [0.4, 0.1, 0.1, 0.05, 0.25, 0.1];
pub const BIAS: f64 = 100.0;

pub fn models() -> InferenceModels {
    InferenceModels::new(
        Arc::new(StandardScaler::new(MEAN.to_vec(), SCALE.to_vec()).unwrap()),
        Arc::new(LinearPricePredictor::new(WEIGHTS.to_vec(), BIAS)),
        Arc::new(MockSignalPredictor::brightness()),
        ImagePreprocessor::default(),
    )
    .unwrap()
}

/// Price the gateway should produce for `bars`, computed without the feature service.
pub fn reference_price(bars: &[Bar]) -> f64 {
    let last = bars.last().unwrap();
    let n = bars.len();
    let mean_close = |w: usize| bars[n - w..].iter().map(|b| b.close).sum::<f64>() / w as f64;
    let features = [
        last.open,
        last.high,
        last.low,
        last.volume,
        mean_close(50),
        mean_close(200),
    ];
    features
        .iter()
        .zip(MEAN.iter().zip(SCALE.iter()))
        .map(|(x, (m, s))| (x - m) / s)
        .zip(WEIGHTS.iter())
        .map(|(z, w)| z * w)
        .sum::<f64>()
        + BIAS
}

pub async fn start_gateway(market: MockMarketDataService) -> GatewayHandle {
    let config = Config::from_lookup(|key| match key {
        "GATEWAY_PORT" => Some("0".to_string()),
        "OBSERVABILITY_ENABLED" => Some("false".to_string()),
        _ => None,
    })
    .unwrap();

    Application::with_components(config, Arc::new(models()), Arc::new(market))
        .unwrap()
        .start()
        .await
        .unwrap()
}

pub async fn connect(handle: &GatewayHandle) -> Client {
    let (ws, _) = connect_async(format!("ws://{}", handle.local_addr))
        .await
        .unwrap();
    ws
}

pub async fn send_json(client: &mut Client, json: String) {
    client.send(Message::Text(json.into())).await.unwrap();
}

pub async fn fetch(client: &mut Client, ticker: &str) {
    send_json(
        client,
        format!(r#"{{"event":"fetch_data","data":{{"ticker":"{}"}}}}"#, ticker),
    )
    .await;
}

pub async fn upload(client: &mut Client, image: &[u8]) {
    let payload = serde_json::json!({"event": "upload_image", "data": {"image": image}});
    send_json(client, payload.to_string()).await;
}

/// Next JSON event from the gateway, skipping control frames.
pub async fn next_event(client: &mut Client) -> serde_json::Value {
    loop {
        match client.next().await {
            Some(Ok(Message::Text(text))) => return serde_json::from_str(text.as_str()).unwrap(),
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
            other => panic!("expected a text frame, got {:?}", other),
        }
    }
}

pub fn png(color: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(200, 120, image::Rgb(color));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}
