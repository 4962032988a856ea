// Market data domain
pub mod market;

// Model input/output contracts
pub mod ml;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
