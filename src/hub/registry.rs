use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Listener, ListenerId};

/// Политика повторной регистрации одного и того же слушателя.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Повторная регистрация возвращает `DuplicateRegistration`.
    #[default]
    Reject,
    /// Повторная регистрация молча игнорируется.
    Ignore,
    /// Дубликат добавляется в конец и получает уведомление на каждую запись.
    Allow,
}

/// Результат попытки вставки в реестр.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Insertion {
    Added,
    Ignored,
    Rejected,
}

/// Упорядоченный список зарегистрированных слушателей.
///
/// Порядок вставки совпадает с порядком доставки. Не синхронизирован:
/// доступ идёт только под мьютексом hub.
pub(crate) struct Registry<S> {
    entries: Vec<Arc<dyn Listener<S>>>,
}

impl<S> Registry<S> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(
        &mut self,
        listener: Arc<dyn Listener<S>>,
        policy: DuplicatePolicy,
    ) -> Insertion {
        if policy != DuplicatePolicy::Allow && self.contains(ListenerId::of(&listener)) {
            return match policy {
                DuplicatePolicy::Ignore => Insertion::Ignored,
                _ => Insertion::Rejected,
            };
        }
        self.entries.push(listener);
        Insertion::Added
    }

    /// Удаляет первое вхождение `id`. Возвращает `false`, если его не было.
    pub fn remove(
        &mut self,
        id: ListenerId,
    ) -> bool {
        match self.position(id) {
            Some(idx) => {
                // `remove`, а не `swap_remove`: порядок доставки сохраняется.
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(
        &self,
        id: ListenerId,
    ) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn ids(&self) -> Vec<ListenerId> {
        self.entries.iter().map(ListenerId::of).collect()
    }

    /// Копия реестра на текущий момент (только инкременты счётчиков `Arc`).
    pub fn snapshot(&self) -> Vec<Arc<dyn Listener<S>>> {
        self.entries.clone()
    }

    fn position(
        &self,
        id: ListenerId,
    ) -> Option<usize> {
        self.entries.iter().position(|l| ListenerId::of(l) == id)
    }
}
