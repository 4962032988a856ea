pub mod alpaca;
pub mod csv_market_data;
pub mod factory;
pub mod mock;
pub mod observability;
pub mod websocket;
