pub mod settings;

pub use settings::{HubSettings, DEFAULT_HUB_NAME, ENV_PREFIX};
