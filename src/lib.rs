/// Settings loading for the hub (defaults, file, environment).
pub mod config;
/// Error types: registration, delivery failures, configuration, logging.
pub mod error;
/// Notification hub: state, listener registry, broadcast.
pub mod hub;
/// Flexible logging (formatting, filters, sinks).
pub mod logging;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Settings.
pub use config::HubSettings;
/// Operation errors.
pub use error::{ConfigError, FaultCause, HubError, ListenerFailure, ListenerFault, LoggingError};
/// Hub, listeners and the process-wide cell.
pub use hub::{
    listener_fn, DeliveryPolicy, DuplicatePolicy, HubBuilder, HubCell, HubStatsSnapshot, Listener,
    ListenerError, ListenerId, NotificationHub,
};
/// Logging setup.
pub use logging::{init_logging, LoggingConfig, LoggingHandle};
/// Stack-based errors shared across the workspace.
pub use statehub_error::{ErrorExt, HubResult, ResultExt, StackError, StatusCode};
