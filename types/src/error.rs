//! Errors raised while constructing or parsing the fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("invalid symbol '{0}'")]
    InvalidSymbol(String),

    #[error("invalid asset '{0}'")]
    InvalidAsset(String),

    #[error("asset amount overflow")]
    AmountOverflow,
}
