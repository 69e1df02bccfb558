use tracing_subscriber::{
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::Layer as LayerTrait,
    registry::LookupSpan,
};

use crate::logging::config::LogFormat;

/// Опции fmt-слоя, общие для консоли и файла.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LayerOptions {
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_thread_ids: bool,
}

/// Строит fmt-слой в заданном формате поверх `writer`.
///
/// Возвращаем boxed trait-объект, чтобы стереть конкретный тип формата
/// (json/pretty/compact).
pub(crate) fn build_layer<S, W>(
    format: LogFormat,
    writer: W,
    opts: LayerOptions,
) -> Box<dyn LayerTrait<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(opts.with_ansi)
        .with_target(opts.with_target)
        .with_thread_names(opts.with_thread_ids)
        .with_thread_ids(opts.with_thread_ids);

    match format {
        LogFormat::Json => Box::new(
            layer
                .event_format(fmt::format().json().with_current_span(true))
                .fmt_fields(fmt::format::JsonFields::new()),
        ),
        LogFormat::Pretty => Box::new(
            layer
                .event_format(fmt::format().pretty())
                .with_span_events(FmtSpan::CLOSE),
        ),
        LogFormat::Compact => Box::new(layer.event_format(fmt::format().compact())),
    }
}
