use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("unknown token {0}")]
    UnknownToken(String),

    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    #[error("transfer rejected: {0}")]
    Rejected(String),
}
