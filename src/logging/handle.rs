use std::fmt;

use tracing_appender::non_blocking::WorkerGuard;

/// Handle, удерживающий фоновые writer'ы логирования.
///
/// Пока handle жив, файловый sink пишет в фоне. При `shutdown` или drop
/// guard сбрасывает оставшийся буфер на диск.
pub struct LoggingHandle {
    file_guard: Option<WorkerGuard>,
}

impl LoggingHandle {
    pub(crate) fn new(file_guard: Option<WorkerGuard>) -> Self {
        Self { file_guard }
    }

    pub fn has_file_sink(&self) -> bool {
        self.file_guard.is_some()
    }

    /// Явное завершение: сбрасывает буфер файлового sink и ждёт фоновый
    /// поток.
    pub fn shutdown(mut self) {
        if let Some(guard) = self.file_guard.take() {
            tracing::info!("logging shutdown, flushing file sink");
            drop(guard);
        }
    }
}

impl fmt::Debug for LoggingHandle {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("LoggingHandle")
            .field("file_sink", &self.has_file_sink())
            .finish()
    }
}
