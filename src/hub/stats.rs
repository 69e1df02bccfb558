use std::sync::atomic::{AtomicU64, Ordering};

/// Счётчики активности hub.
///
/// Обновляются без блокировок и только растут.
#[derive(Debug, Default)]
pub struct HubStats {
    /// Кол-во замен состояния (`set_state` / `update_state`)
    state_changes: AtomicU64,
    /// Кол-во выполненных рассылок
    broadcasts: AtomicU64,
    /// Кол-во успешных вызовов `notify`
    deliveries: AtomicU64,
    /// Кол-во неудачных вызовов `notify` (ошибка или паника)
    failures: AtomicU64,
}

/// Снимок [`HubStats`] на момент чтения.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HubStatsSnapshot {
    pub state_changes: u64,
    pub broadcasts: u64,
    pub deliveries: u64,
    pub failures: u64,
}

impl HubStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_state_change(&self) {
        self.state_changes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_broadcast(&self) {
        self.broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivery(&self) {
        self.deliveries.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> HubStatsSnapshot {
        HubStatsSnapshot {
            state_changes: self.state_changes.load(Ordering::Relaxed),
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}
