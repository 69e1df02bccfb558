//! Hub состояния с рассылкой уведомлений слушателям.
//!
//! - `hub`: [`NotificationHub`], его сборщик и политика доставки.
//! - `listener`: трейт [`Listener`], идентичность [`ListenerId`] и слушатели
//!   на замыканиях.
//! - `registry` (приватный): упорядоченный реестр слушателей и политика
//!   дубликатов.
//! - `shared`: [`HubCell`] для hub, общего на весь процесс.
//! - `stats`: счётчики активности.

#[allow(clippy::module_inception)]
pub mod hub;
pub mod listener;
mod registry;
pub mod shared;
pub mod stats;

pub use hub::{DeliveryPolicy, HubBuilder, NotificationHub};
pub use listener::{listener_fn, FnListener, Listener, ListenerError, ListenerId};
pub use registry::DuplicatePolicy;
pub use shared::HubCell;
pub use stats::{HubStats, HubStatsSnapshot};
