use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::NotificationHub;
use crate::error::HubError;

/// Ленивая ячейка для hub, общего на весь процесс.
///
/// Конструктор `const`, поэтому ячейку можно объявить как `static`.
/// Инициализация выполняется под мьютексом ровно один раз, даже если
/// `get_or_init` вызывают из нескольких потоков одновременно. Сам hub
/// передаётся дальше явно как `Arc<NotificationHub<S>>`.
///
/// ```ignore
/// static ORDERS: HubCell<u64> = HubCell::new();
///
/// let hub = ORDERS.get_or_init(|| NotificationHub::new(0));
/// ```
pub struct HubCell<S> {
    slot: Mutex<Option<Arc<NotificationHub<S>>>>,
}

impl<S> HubCell<S> {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Возвращает hub, создавая его через `init` при первом обращении.
    pub fn get_or_init<F>(
        &self,
        init: F,
    ) -> Arc<NotificationHub<S>>
    where
        F: FnOnce() -> NotificationHub<S>,
    {
        let mut slot = self.slot.lock();
        match slot.as_ref() {
            Some(hub) => Arc::clone(hub),
            None => {
                let hub = Arc::new(init());
                debug!(hub = hub.name(), "shared hub initialized");
                *slot = Some(Arc::clone(&hub));
                hub
            }
        }
    }

    /// Кладёт готовый hub в пустую ячейку.
    pub fn init(
        &self,
        hub: NotificationHub<S>,
    ) -> Result<Arc<NotificationHub<S>>, HubError> {
        let mut slot = self.slot.lock();
        if slot.is_some() {
            return Err(HubError::AlreadyInitialized);
        }
        let hub = Arc::new(hub);
        debug!(hub = hub.name(), "shared hub initialized");
        *slot = Some(Arc::clone(&hub));
        Ok(hub)
    }

    pub fn get(&self) -> Result<Arc<NotificationHub<S>>, HubError> {
        self.slot.lock().clone().ok_or(HubError::NotInitialized)
    }

    /// Освобождает ячейку. Уже выданные `Arc` остаются рабочими.
    pub fn take(&self) -> Option<Arc<NotificationHub<S>>> {
        self.slot.lock().take()
    }

    pub fn is_initialized(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl<S> Default for HubCell<S> {
    fn default() -> Self {
        Self::new()
    }
}
