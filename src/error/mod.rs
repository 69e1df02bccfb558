pub mod config;
pub mod hub;
pub mod logging;

pub use config::ConfigError;
pub use hub::{FaultCause, HubError, ListenerFailure, ListenerFault};
pub use logging::LoggingError;
