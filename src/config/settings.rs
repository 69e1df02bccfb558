use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    hub::{DeliveryPolicy, DuplicatePolicy},
};

/// Имя hub по умолчанию.
pub const DEFAULT_HUB_NAME: &str = "hub";

/// Префикс переменных окружения (`STATEHUB__DUPLICATE_POLICY=allow`).
pub const ENV_PREFIX: &str = "STATEHUB";

/// Настройки [`NotificationHub`](crate::NotificationHub).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubSettings {
    /// Имя hub в логах
    pub name: String,
    /// Реакция на повторную регистрацию
    pub duplicate_policy: DuplicatePolicy,
    /// Реакция на отказ слушателя
    pub delivery_policy: DeliveryPolicy,
    /// Перехватывать паники слушателей
    pub catch_panics: bool,
}

impl HubSettings {
    /// Значения по умолчанию + переменные окружения с префиксом `STATEHUB`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(None)
    }

    /// Как [`load`](Self::load), но с файлом между умолчаниями и
    /// окружением. Формат определяется по расширению.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::build(Some(path.as_ref()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "name",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn build(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // Добавляем значения по умолчанию
            .set_default("name", DEFAULT_HUB_NAME)?
            .set_default("duplicate_policy", "reject")?
            .set_default("delivery_policy", "isolate")?
            .set_default("catch_panics", true)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let cfg = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: HubSettings = cfg.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_HUB_NAME.to_string(),
            duplicate_policy: DuplicatePolicy::default(),
            delivery_policy: DeliveryPolicy::default(),
            catch_panics: true,
        }
    }
}
