mod ext;
mod result;
mod stack;
mod status_code;

pub use ext::ErrorExt;
pub use result::ResultExt;
pub use stack::{ErrorContext, StackError};
pub use status_code::StatusCode;

pub type HubResult<T> = Result<T, StackError>;
