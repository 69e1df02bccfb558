use tracing_subscriber::{layer::Layer as LayerTrait, registry::LookupSpan};

use crate::logging::{
    config::ConsoleConfig,
    formatter::{self, LayerOptions},
};

/// Консольный слой (stdout) по настройкам `console`.
pub fn layer<S>(config: &ConsoleConfig) -> Box<dyn LayerTrait<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    formatter::build_layer(
        config.format,
        std::io::stdout,
        LayerOptions {
            with_ansi: config.with_ansi,
            with_target: config.with_target,
            with_thread_ids: config.with_thread_ids,
        },
    )
}
