//! System orchestration, configuration, startup, and shutdown logic.

pub mod basket_system;
pub mod config;
pub mod telemetry;

pub use basket_system::*;
pub use config::*;
pub use telemetry::*;
