use std::path::Path;

use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{layer::Layer as LayerTrait, registry::LookupSpan};

use crate::logging::{
    config::FileConfig,
    formatter::{self, LayerOptions},
};

/// Файловый слой с ежедневной ротацией в `log_dir`.
///
/// Запись идёт через фоновый поток `tracing-appender`; возвращаемый
/// `WorkerGuard` нужно держать живым, иначе хвост буфера потеряется.
pub fn layer<S>(
    log_dir: &Path,
    config: &FileConfig,
) -> (Box<dyn LayerTrait<S> + Send + Sync>, WorkerGuard)
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let appender = rolling::daily(log_dir, &config.file_name);
    let (writer, guard) = non_blocking(appender);

    let layer = formatter::build_layer(
        config.format,
        writer,
        LayerOptions {
            with_ansi: false,
            with_target: true,
            with_thread_ids: false,
        },
    );

    (layer, guard)
}
