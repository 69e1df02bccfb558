use std::{env, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::LoggingError;

/// Формат вывода событий.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Настройки консольного вывода.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_thread_ids: bool,
}

/// Настройки файлового вывода (ежедневная ротация).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FileConfig {
    pub enabled: bool,
    pub format: LogFormat,
    /// Префикс имени файла; к нему добавляется дата
    pub file_name: String,
}

/// Конфигурация логирования.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Базовый уровень (`trace`, `debug`, `info`, `warn`, `error`)
    pub level: String,
    /// Дополнительные директивы `EnvFilter`, например `statehub::hub=trace`
    pub directives: Vec<String>,
    pub log_dir: PathBuf,
    pub console: ConsoleConfig,
    pub file: FileConfig,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(LoggingError::InvalidFilter {
                directive: other.to_string(),
                reason: "unknown log format".to_string(),
            }),
        }
    }
}

impl LoggingConfig {
    /// Применяет `STATEHUB_LOG_LEVEL`, `STATEHUB_LOG_DIR` и
    /// `STATEHUB_LOG_FORMAT`, если они заданы.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("STATEHUB_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(dir) = env::var("STATEHUB_LOG_DIR") {
            self.log_dir = PathBuf::from(dir);
        }
        if let Some(format) = env::var("STATEHUB_LOG_FORMAT")
            .ok()
            .and_then(|f| f.parse().ok())
        {
            self.console.format = format;
        }
    }

    /// Директива для `EnvFilter`: уровень и дополнительные директивы через
    /// запятую.
    pub fn build_filter_directive(&self) -> String {
        std::iter::once(self.level.as_str())
            .chain(self.directives.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn validate(&self) -> Result<(), LoggingError> {
        let directive = self.build_filter_directive();
        EnvFilter::try_new(&directive).map_err(|e| LoggingError::InvalidFilter {
            directive,
            reason: e.to_string(),
        })?;
        Ok(())
    }

    pub fn ensure_log_dir(&self) -> Result<(), LoggingError> {
        if self.file.enabled {
            std::fs::create_dir_all(&self.log_dir)?;
        }
        Ok(())
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: LogFormat::Compact,
            with_ansi: true,
            with_target: true,
            with_thread_ids: false,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            format: LogFormat::Json,
            file_name: "statehub.log".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directives: Vec::new(),
            log_dir: PathBuf::from("logs"),
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
        }
    }
}
