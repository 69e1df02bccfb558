//! Логирование на базе `tracing`.
//!
//! - [`config`]: настройки уровней, консоли и файла;
//! - `filters`: сборка `EnvFilter` (с приоритетом `RUST_LOG`);
//! - `formatter`: fmt-слои compact/pretty/json;
//! - [`sinks`]: консольный и файловый (ежедневная ротация) вывод;
//! - [`handle`]: guard фонового writer'а.
//!
//! Сам hub только эмитит события через `tracing` и не зависит от того,
//! установлен ли подписчик.

pub mod config;
mod filters;
mod formatter;
pub mod handle;
pub mod sinks;

pub use config::{ConsoleConfig, FileConfig, LogFormat, LoggingConfig};
pub use filters::build_filter;
pub use handle::LoggingHandle;
use once_cell::sync::OnceCell;
use tracing_subscriber::{
    layer::{Layer as LayerTrait, SubscriberExt},
    registry::Registry,
    util::SubscriberInitExt,
};

use crate::error::LoggingError;

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Устанавливает глобальный подписчик `tracing` по конфигурации.
///
/// Вызывается один раз на процесс. Повторный вызов, как и вызов после
/// установки чужого подписчика, возвращает
/// [`LoggingError::AlreadyInitialized`].
pub fn init_logging(mut config: LoggingConfig) -> Result<LoggingHandle, LoggingError> {
    if INITIALIZED.get().is_some() {
        return Err(LoggingError::AlreadyInitialized);
    }

    config.apply_env_overrides();
    config.validate()?;
    config.ensure_log_dir()?;

    let env_filter = filters::build_filter(&config)?;
    let mut layers: Vec<Box<dyn LayerTrait<Registry> + Send + Sync>> = Vec::new();

    if config.console.enabled {
        layers.push(sinks::console::layer(&config.console));
    }

    let file_guard = if config.file.enabled {
        let (file_layer, guard) = sinks::file::layer(&config.log_dir, &config.file);
        layers.push(file_layer);
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;
    let _ = INITIALIZED.set(());

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        log_dir = %config.log_dir.display(),
        console_enabled = config.console.enabled,
        file_enabled = config.file.enabled,
        "logging initialized"
    );

    Ok(LoggingHandle::new(file_guard))
}

pub fn is_initialized() -> bool {
    INITIALIZED.get().is_some()
}
