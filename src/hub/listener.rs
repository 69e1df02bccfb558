use std::{fmt, marker::PhantomData, sync::Arc};

/// Ошибка, которую слушатель возвращает из `notify`.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Получатель уведомлений об изменении состояния hub.
///
/// Слушатель получает новое состояние прямо в `notify` и не обращается к
/// hub повторно. Идентичность слушателя определяется его `Arc`-аллокацией
/// (см. [`ListenerId`]).
pub trait Listener<S>: Send + Sync {
    /// Вызывается один раз на каждую рассылку, в которую попал слушатель.
    fn notify(
        &self,
        state: &S,
    ) -> Result<(), ListenerError>;

    /// Имя для логов и отчётов об ошибках.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Идентичность слушателя: адрес его разделяемой аллокации.
///
/// Два `Arc` считаются одним слушателем тогда и только тогда, когда они
/// указывают на одну и ту же аллокацию.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(usize);

impl ListenerId {
    pub fn of<S>(listener: &Arc<dyn Listener<S>>) -> Self {
        Self(Arc::as_ptr(listener) as *const () as usize)
    }

    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "listener#{:x}", self.0)
    }
}

/// Слушатель на основе замыкания.
pub struct FnListener<S, F> {
    name: String,
    callback: F,
    _state: PhantomData<fn(&S)>,
}

impl<S, F> FnListener<S, F>
where
    F: Fn(&S) -> Result<(), ListenerError> + Send + Sync,
{
    pub fn new(
        name: impl Into<String>,
        callback: F,
    ) -> Self {
        Self {
            name: name.into(),
            callback,
            _state: PhantomData,
        }
    }
}

impl<S, F> Listener<S> for FnListener<S, F>
where
    F: Fn(&S) -> Result<(), ListenerError> + Send + Sync,
{
    fn notify(
        &self,
        state: &S,
    ) -> Result<(), ListenerError> {
        (self.callback)(state)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<S, F> fmt::Debug for FnListener<S, F> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("FnListener")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Создаёт именованного слушателя из замыкания, готового к регистрации.
pub fn listener_fn<S, F>(
    name: impl Into<String>,
    callback: F,
) -> Arc<dyn Listener<S>>
where
    S: 'static,
    F: Fn(&S) -> Result<(), ListenerError> + Send + Sync + 'static,
{
    Arc::new(FnListener::new(name, callback))
}
