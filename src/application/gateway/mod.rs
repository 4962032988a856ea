pub mod events;
pub mod gateway;

pub use events::{InboundEvent, OutboundEvent};
pub use gateway::InferenceGateway;
