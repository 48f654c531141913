use std::fmt::{Display, Formatter};

use super::{ErrorBag, FetchError};
use crate::utils::ConversionError;

/// Application level error carrying the place it was created.
#[derive(Debug)]
pub struct AgentError {
    pub inner: ErrorBag,
    pub location: String,
}

impl AgentError {
    pub fn new(inner: ErrorBag, file: &str, line: u32) -> Self {
        Self {
            inner,
            location: format!("{file}:{line}"),
        }
    }
}

impl Display for AgentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::error::Error for AgentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.inner)
    }
}

impl From<FetchError> for AgentError {
    fn from(err: FetchError) -> Self {
        AgentError::new(ErrorBag::FetchError(err), file!(), line!())
    }
}

impl From<ConversionError> for AgentError {
    fn from(err: ConversionError) -> Self {
        AgentError::new(ErrorBag::ConversionError(err), file!(), line!())
    }
}
