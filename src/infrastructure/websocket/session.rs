use crate::application::gateway::events::BAD_REQUEST;
use crate::application::gateway::{InboundEvent, InferenceGateway, OutboundEvent};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Time the writer gets to flush queued responses after the client goes away.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Serves one client connection until it closes.
///
/// Three tasks per session: this reader, a worker that answers events strictly in arrival
/// order, and a writer that owns the sink. When the client disconnects the worker is aborted,
/// which cancels any fetch still in flight; its result is never sent.
pub async fn run_session<S>(
    gateway: Arc<InferenceGateway>,
    ws: WebSocketStream<S>,
    outbound_buffer: usize,
) where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let session_id = Uuid::new_v4();
    let metrics = gateway.metrics().clone();
    metrics.session_opened();
    info!("Session {} opened", session_id);

    let (mut sink, mut stream) = ws.split();
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(outbound_buffer);
    let (work_tx, mut work_rx) = mpsc::channel::<Message>(outbound_buffer);

    let mut writer = tokio::spawn(async move {
        while let Some(message) = out_rx.recv().await {
            if let Err(e) = sink.send(message).await {
                debug!("Session {} writer stopped: {}", session_id, e);
                return;
            }
        }
        let _ = sink.close().await;
    });

    let worker_gateway = gateway.clone();
    let worker = tokio::spawn(async move {
        while let Some(frame) = work_rx.recv().await {
            let response = match decode_frame(frame) {
                Ok(event) => {
                    debug!("Session {} <- {}", session_id, event.name());
                    worker_gateway.handle(event).await
                }
                Err(response) => {
                    worker_gateway.metrics().inc_requests("unknown", BAD_REQUEST);
                    response
                }
            };
            let text = response.to_json();
            if out_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(message @ (Message::Text(_) | Message::Binary(_))) => {
                if work_tx.send(message).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(frame)) => {
                debug!("Session {} close frame: {:?}", session_id, frame);
                break;
            }
            // Pings are answered by tungstenite itself on the next read.
            Ok(_) => {}
            Err(e) => {
                warn!("Session {} read error: {}", session_id, e);
                break;
            }
        }
    }

    worker.abort();
    drop(work_tx);
    if tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut writer)
        .await
        .is_err()
    {
        writer.abort();
    }

    metrics.session_closed();
    info!("Session {} closed", session_id);
}

/// Text frames carry the JSON envelope; a binary frame is a raw `upload_image`.
fn decode_frame(frame: Message) -> Result<InboundEvent, OutboundEvent> {
    match frame {
        Message::Text(text) => InboundEvent::from_json(text.as_str())
            .map_err(|e| OutboundEvent::bad_request(format!("unrecognized event: {}", e))),
        Message::Binary(bytes) => Ok(InboundEvent::UploadImage {
            image: bytes.to_vec(),
        }),
        other => Err(OutboundEvent::bad_request(format!(
            "unsupported frame: {:?}",
            other
        ))),
    }
}
