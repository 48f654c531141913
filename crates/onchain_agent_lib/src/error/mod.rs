mod bag;
mod custom;
mod fetch;
mod wrapped;

pub use bag::ErrorBag;
pub use custom::CustomError;
pub use fetch::FetchError;
pub use wrapped::AgentError;

/// Export macros for creating errors
mod macros;
