use std::{any::Any, error::Error};

use crate::StatusCode;

/// Общий интерфейс ошибок workspace.
///
/// Трейт object-safe: [`StackError`](crate::StackError) хранит корневую
/// ошибку как `dyn ErrorExt`.
pub trait ErrorExt: Error + Send + Sync + 'static {
    /// По умолчанию [`StatusCode::Internal`].
    fn status_code(&self) -> StatusCode {
        StatusCode::Internal
    }

    /// Нужен для downcast из `dyn ErrorExt`.
    fn as_any(&self) -> &dyn Any;
}
