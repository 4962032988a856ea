pub mod feature_engineering_service;
pub mod gateway;
pub mod ml;
pub mod system;
