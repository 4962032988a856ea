use crate::application::gateway::InferenceGateway;
use crate::application::ml::InferenceModels;
use crate::config::Config;
use crate::domain::ports::MarketDataService;
use crate::infrastructure::factory::ServiceFactory;
use crate::infrastructure::observability::Metrics;
use crate::infrastructure::websocket::WebSocketServer;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

pub struct Application {
    pub config: Config,
    pub models: Arc<InferenceModels>,
    pub market_service: Arc<dyn MarketDataService>,
    pub metrics: Metrics,
}

/// A running gateway. Dropping it without calling [`GatewayHandle::shutdown`] leaves the
/// server running until the runtime stops.
pub struct GatewayHandle {
    pub local_addr: SocketAddr,
    pub metrics: Metrics,
    shutdown_tx: watch::Sender<bool>,
    server: JoinHandle<()>,
}

impl GatewayHandle {
    /// Stops accepting connections and waits for the accept loop to exit.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(true);
        self.server.await.context("Server task panicked")
    }
}

impl Application {
    /// Loads every model artifact and connects the configured market data source.
    /// Any missing or malformed artifact fails here, before a port is bound.
    pub async fn build(config: Config) -> Result<Self> {
        info!(
            "Building Marketlens gateway (market data: {:?}, models: {:?})...",
            config.market_data.mode, config.models.model_dir
        );

        let models_config = config.models.clone();
        let models = tokio::task::spawn_blocking(move || InferenceModels::load(&models_config))
            .await
            .context("Model loading task panicked")??;

        let market_service = ServiceFactory::create_market_data(&config.market_data)?;
        Self::with_components(config, Arc::new(models), market_service)
    }

    /// Assembles the application from already-built parts.
    pub fn with_components(
        config: Config,
        models: Arc<InferenceModels>,
        market_service: Arc<dyn MarketDataService>,
    ) -> Result<Self> {
        Ok(Self {
            config,
            models,
            market_service,
            metrics: Metrics::new()?,
        })
    }

    pub async fn start(self) -> Result<GatewayHandle> {
        let gateway = Arc::new(InferenceGateway::new(
            self.models.clone(),
            self.market_service.clone(),
            self.config.market_data.lookback(),
            self.metrics.clone(),
        ));

        let server = WebSocketServer::bind(
            &self.config.server.socket_address(),
            gateway,
            self.config.server.outbound_buffer,
        )
        .await?;
        let local_addr = server.local_addr()?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let server = tokio::spawn(server.serve(shutdown_rx));

        info!("Marketlens gateway ready on ws://{}", local_addr);
        Ok(GatewayHandle {
            local_addr,
            metrics: self.metrics,
            shutdown_tx,
            server,
        })
    }
}
