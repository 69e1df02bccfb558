use std::{any::Any, fmt};

use statehub_error::{ErrorExt, StatusCode};
use thiserror::Error;

use crate::hub::{ListenerError, ListenerId};

/// Ошибки операций hub.
#[derive(Debug, Error)]
pub enum HubError {
    /// Слушатель уже зарегистрирован, а политика запрещает дубликаты.
    #[error("listener '{name}' ({listener}) is already registered")]
    DuplicateRegistration { listener: ListenerId, name: String },

    /// Один или несколько слушателей не справились с уведомлением.
    #[error(transparent)]
    ListenerFailure(#[from] ListenerFailure),

    #[error("shared hub is already initialized")]
    AlreadyInitialized,

    #[error("shared hub is not initialized")]
    NotInitialized,
}

/// Причина отказа конкретного слушателя.
#[derive(Debug)]
pub enum FaultCause {
    /// `notify` вернул ошибку.
    Failed(ListenerError),
    /// `notify` запаниковал; хранится текст паники.
    Panicked(String),
}

/// Отказ одного слушателя в рамках рассылки.
#[derive(Debug)]
pub struct ListenerFault {
    pub listener: ListenerId,
    pub name: String,
    pub cause: FaultCause,
}

/// Сводный отчёт об отказах слушателей за одну рассылку.
///
/// Возвращается из `set_state` только после того, как все слушатели
/// снимка были опрошены (или после первого отказа при `FailFast`).
#[derive(Debug)]
pub struct ListenerFailure {
    attempted: usize,
    failures: Vec<ListenerFault>,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl ListenerFailure {
    pub(crate) fn new(
        attempted: usize,
        failures: Vec<ListenerFault>,
    ) -> Self {
        Self {
            attempted,
            failures,
        }
    }

    /// Сколько слушателей было вызвано в этой рассылке.
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn failures(&self) -> &[ListenerFault] {
        &self.failures
    }

    pub fn failed_ids(&self) -> Vec<ListenerId> {
        self.failures.iter().map(|f| f.listener).collect()
    }

    pub fn into_failures(self) -> Vec<ListenerFault> {
        self.failures
    }

    /// Все отказы являются паниками.
    pub fn all_panicked(&self) -> bool {
        !self.failures.is_empty()
            && self
                .failures
                .iter()
                .all(|f| matches!(f.cause, FaultCause::Panicked(_)))
    }
}

impl ListenerFault {
    pub fn is_panic(&self) -> bool {
        matches!(self.cause, FaultCause::Panicked(_))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl fmt::Display for FaultCause {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            FaultCause::Failed(err) => write!(f, "failed: {err}"),
            FaultCause::Panicked(msg) => write!(f, "panicked: {msg}"),
        }
    }
}

impl fmt::Display for ListenerFault {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "'{}' ({}) {}", self.name, self.listener, self.cause)
    }
}

impl fmt::Display for ListenerFailure {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{} of {} listener(s) failed",
            self.failures.len(),
            self.attempted
        )?;
        for (i, fault) in self.failures.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{fault}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ListenerFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        // Цепочка источников однозначна только при единственном отказе.
        match self.failures.as_slice() {
            [ListenerFault {
                cause: FaultCause::Failed(err),
                ..
            }] => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl ErrorExt for HubError {
    fn status_code(&self) -> StatusCode {
        match self {
            HubError::DuplicateRegistration { .. } => StatusCode::AlreadyExists,
            HubError::ListenerFailure(failure) if failure.all_panicked() => {
                StatusCode::ListenerPanicked
            }
            HubError::ListenerFailure(_) => StatusCode::ListenerFailed,
            HubError::AlreadyInitialized => StatusCode::AlreadyInitialized,
            HubError::NotInitialized => StatusCode::NotInitialized,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
