use std::{
    any::Any,
    fmt, mem,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use statehub_error::ErrorExt;
use tracing::{debug, debug_span, error, trace, warn};

use super::{
    registry::{Insertion, Registry},
    DuplicatePolicy, HubStats, HubStatsSnapshot, Listener, ListenerId,
};
use crate::{
    config::HubSettings,
    error::{FaultCause, HubError, ListenerFailure, ListenerFault},
};

/// Что делать, если слушатель вернул ошибку или запаниковал.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPolicy {
    /// Доставить всем слушателям снимка и вернуть сводный отчёт.
    #[default]
    Isolate,
    /// Остановить рассылку на первом отказе.
    FailFast,
}

/// Состояние и реестр под одним мьютексом.
struct HubInner<S> {
    state: Arc<S>,
    registry: Registry<S>,
}

/// Hub состояния с синхронной рассылкой уведомлений.
///
/// Держит одно значение `S` и реестр слушателей. Каждое изменение
/// состояния сопровождается ровно одной рассылкой по снимку реестра,
/// снятому в той же критической секции, что и замена состояния.
/// Мьютекс отпускается до вызова слушателей, поэтому слушатель может
/// обращаться к hub (например, отписать себя) без взаимоблокировки.
pub struct NotificationHub<S> {
    name: String,
    inner: Mutex<HubInner<S>>,
    duplicate_policy: DuplicatePolicy,
    delivery_policy: DeliveryPolicy,
    catch_panics: bool,
    stats: HubStats,
}

/// Пошаговая сборка [`NotificationHub`].
#[derive(Debug)]
pub struct HubBuilder<S> {
    initial: S,
    name: String,
    duplicate_policy: DuplicatePolicy,
    delivery_policy: DeliveryPolicy,
    catch_panics: bool,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<S> NotificationHub<S> {
    /// Создаёт hub с настройками по умолчанию.
    pub fn new(initial: S) -> Self {
        Self::builder(initial).build()
    }

    pub fn builder(initial: S) -> HubBuilder<S> {
        HubBuilder::new(initial)
    }

    pub fn with_settings(
        initial: S,
        settings: &HubSettings,
    ) -> Self {
        Self::builder(initial).settings(settings).build()
    }

    /// Добавляет слушателя в конец реестра.
    ///
    /// Поведение при повторной регистрации задаётся [`DuplicatePolicy`].
    pub fn register(
        &self,
        listener: Arc<dyn Listener<S>>,
    ) -> Result<(), HubError> {
        let id = ListenerId::of(&listener);
        let (outcome, len) = {
            let mut inner = self.inner.lock();
            let outcome = inner
                .registry
                .insert(Arc::clone(&listener), self.duplicate_policy);
            (outcome, inner.registry.len())
        };

        match outcome {
            Insertion::Added => {
                debug!(hub = %self.name, listener = %id, name = listener.name(), listeners = len, "listener registered");
                Ok(())
            }
            Insertion::Ignored => {
                debug!(hub = %self.name, listener = %id, name = listener.name(), "duplicate registration ignored");
                Ok(())
            }
            Insertion::Rejected => Err(HubError::DuplicateRegistration {
                listener: id,
                name: listener.name().to_string(),
            }),
        }
    }

    /// Удаляет первое вхождение слушателя.
    ///
    /// Возвращает `true`, если слушатель был найден. Отсутствие слушателя
    /// ошибкой не считается.
    pub fn unregister(
        &self,
        listener: &Arc<dyn Listener<S>>,
    ) -> bool {
        self.unregister_id(ListenerId::of(listener))
    }

    pub fn unregister_id(
        &self,
        id: ListenerId,
    ) -> bool {
        let (removed, len) = {
            let mut inner = self.inner.lock();
            let removed = inner.registry.remove(id);
            (removed, inner.registry.len())
        };
        if removed {
            debug!(hub = %self.name, listener = %id, listeners = len, "listener unregistered");
        }
        removed
    }

    /// Заменяет состояние и рассылает его всем слушателям снимка.
    ///
    /// Возвращает управление только после того, как каждый слушатель снимка
    /// был вызван (при `FailFast` до первого отказа). Состояние не
    /// откатывается, даже если слушатели вернули ошибки.
    pub fn set_state(
        &self,
        new_state: S,
    ) -> Result<(), HubError> {
        let state = Arc::new(new_state);
        let (previous, snapshot) = {
            let mut inner = self.inner.lock();
            let previous = mem::replace(&mut inner.state, Arc::clone(&state));
            (previous, inner.registry.snapshot())
        };
        // Старое значение может оказаться последней ссылкой: его `Drop`
        // выполняется уже без мьютекса.
        drop(previous);
        self.stats.record_state_change();
        self.broadcast(&state, snapshot)
    }

    /// Вычисляет новое состояние из текущего и рассылает его.
    ///
    /// `f` выполняется под мьютексом hub, поэтому два конкурентных вызова
    /// не теряют обновлений друг друга. Из `f` нельзя обращаться к этому же
    /// hub.
    pub fn update_state<F>(
        &self,
        f: F,
    ) -> Result<(), HubError>
    where
        F: FnOnce(&S) -> S,
    {
        let (state, previous, snapshot) = {
            let mut inner = self.inner.lock();
            let state = Arc::new(f(&*inner.state));
            let previous = mem::replace(&mut inner.state, Arc::clone(&state));
            (state, previous, inner.registry.snapshot())
        };
        drop(previous);
        self.stats.record_state_change();
        self.broadcast(&state, snapshot)
    }

    /// Текущее состояние без копирования значения.
    pub fn state(&self) -> Arc<S> {
        Arc::clone(&self.inner.lock().state)
    }

    /// Текущее состояние.
    pub fn current_state(&self) -> S
    where
        S: Clone,
    {
        S::clone(&self.state())
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().registry.len()
    }

    pub fn is_registered(
        &self,
        listener: &Arc<dyn Listener<S>>,
    ) -> bool {
        self.inner.lock().registry.contains(ListenerId::of(listener))
    }

    /// Идентификаторы слушателей в порядке доставки.
    pub fn listener_ids(&self) -> Vec<ListenerId> {
        self.inner.lock().registry.ids()
    }

    pub fn stats(&self) -> HubStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }

    pub fn delivery_policy(&self) -> DeliveryPolicy {
        self.delivery_policy
    }

    /// Одна рассылка по снимку. Вызывается без удержания мьютекса.
    fn broadcast(
        &self,
        state: &S,
        snapshot: Vec<Arc<dyn Listener<S>>>,
    ) -> Result<(), HubError> {
        let span = debug_span!("broadcast", hub = %self.name, listeners = snapshot.len());
        let _enter = span.enter();
        self.stats.record_broadcast();

        let mut attempted = 0;
        let mut failures = Vec::new();

        for listener in &snapshot {
            attempted += 1;
            let id = ListenerId::of(listener);

            match self.deliver(listener.as_ref(), state) {
                Ok(()) => {
                    self.stats.record_delivery();
                    trace!(listener = %id, name = listener.name(), "delivered");
                }
                Err(cause) => {
                    self.stats.record_failure();
                    warn!(hub = %self.name, listener = %id, name = listener.name(), %cause, "listener failed");
                    failures.push(ListenerFault {
                        listener: id,
                        name: listener.name().to_string(),
                        cause,
                    });
                    if self.delivery_policy == DeliveryPolicy::FailFast {
                        break;
                    }
                }
            }
        }

        if failures.is_empty() {
            return Ok(());
        }

        let failed = failures.len();
        let err = HubError::from(ListenerFailure::new(attempted, failures));
        error!(
            hub = %self.name,
            status = %err.status_code(),
            failed,
            attempted,
            "broadcast finished with listener failures"
        );
        Err(err)
    }

    fn deliver(
        &self,
        listener: &dyn Listener<S>,
        state: &S,
    ) -> Result<(), FaultCause> {
        if !self.catch_panics {
            return listener.notify(state).map_err(FaultCause::Failed);
        }
        match panic::catch_unwind(AssertUnwindSafe(|| listener.notify(state))) {
            Ok(result) => result.map_err(FaultCause::Failed),
            Err(payload) => Err(FaultCause::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

impl<S> HubBuilder<S> {
    pub fn new(initial: S) -> Self {
        let defaults = HubSettings::default();
        Self {
            initial,
            name: defaults.name,
            duplicate_policy: defaults.duplicate_policy,
            delivery_policy: defaults.delivery_policy,
            catch_panics: defaults.catch_panics,
        }
    }

    pub fn name(
        mut self,
        name: impl Into<String>,
    ) -> Self {
        self.name = name.into();
        self
    }

    pub fn duplicate_policy(
        mut self,
        policy: DuplicatePolicy,
    ) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn delivery_policy(
        mut self,
        policy: DeliveryPolicy,
    ) -> Self {
        self.delivery_policy = policy;
        self
    }

    /// Перехватывать ли паники слушателей (по умолчанию `true`).
    ///
    /// При `false` паника проходит сквозь `set_state`; мьютекс к этому
    /// моменту уже отпущен, и hub остаётся рабочим.
    pub fn catch_panics(
        mut self,
        catch: bool,
    ) -> Self {
        self.catch_panics = catch;
        self
    }

    pub fn settings(
        self,
        settings: &HubSettings,
    ) -> Self {
        self.name(settings.name.clone())
            .duplicate_policy(settings.duplicate_policy)
            .delivery_policy(settings.delivery_policy)
            .catch_panics(settings.catch_panics)
    }

    pub fn build(self) -> NotificationHub<S> {
        NotificationHub {
            name: self.name,
            inner: Mutex::new(HubInner {
                state: Arc::new(self.initial),
                registry: Registry::new(),
            }),
            duplicate_policy: self.duplicate_policy,
            delivery_policy: self.delivery_policy,
            catch_panics: self.catch_panics,
            stats: HubStats::new(),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl<S: Default> Default for NotificationHub<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> fmt::Debug for NotificationHub<S> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("NotificationHub")
            .field("name", &self.name)
            .field("listeners", &self.listener_count())
            .field("duplicate_policy", &self.duplicate_policy)
            .field("delivery_policy", &self.delivery_policy)
            .field("catch_panics", &self.catch_panics)
            .finish_non_exhaustive()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
