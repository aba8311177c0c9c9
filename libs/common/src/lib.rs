//! Common Library
//!
//! Error type, logging setup and figment-based configuration loading shared
//! by the inverter monitor crates.

pub mod config;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use config::{load_config, load_config_from_file};
pub use error::{Error, Result};
pub use logging::{init_logging, LogConfig, LogConfigBuilder, LogFormat};
