use thiserror::Error;

use super::{CustomError, FetchError};
use crate::utils::ConversionError;

#[derive(Debug, Error)]
pub enum ErrorBag {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse toml: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("{0}")]
    ConversionError(#[from] ConversionError),
    #[error("{0}")]
    FetchError(#[from] FetchError),
    #[error("Hex conversion error: {0}")]
    HexError(#[from] hex::FromHexError),
    #[error("Secret key error: {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
    #[error("{0}")]
    CustomError(#[from] CustomError),
}
