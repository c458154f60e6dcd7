//! Core library for the HouseHub seller/agent marketplace.
//!
//! The interesting logic lives in [`marketplace`]: the case lifecycle state
//! machine, showing coordination, offer intake, and the deterministic offer
//! scoring and ranking engine. Configuration, telemetry, and the HTTP error
//! boundary live alongside it so the API service stays thin.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
