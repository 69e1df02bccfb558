use std::fmt;

/// Код статуса ошибки hub.
///
/// Диапазоны: `1xxx` внутренние, `2xxx` реестр, `3xxx` доставка,
/// `4xxx` общий hub, `5xxx` конфигурация и IO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    Internal = 1000,

    AlreadyExists = 2000,

    ListenerFailed = 3000,
    ListenerPanicked = 3001,

    AlreadyInitialized = 4000,
    NotInitialized = 4001,

    InvalidConfig = 5000,
    Io = 5001,
}

impl StatusCode {
    pub const fn code(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}
