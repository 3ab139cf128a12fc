use fundgov_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("database '{0}' is missing")]
    MissingDatabase(&'static str),

    #[error("database schema version {found} is newer than supported version {supported}")]
    SchemaTooNew { found: u32, supported: u32 },

    #[error("database schema version {found} needs migration to {supported}; open it read-write first")]
    SchemaOutdated { found: u32, supported: u32 },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("environment still has {0} open store handle(s)")]
    EnvironmentInUse(usize),
}

impl From<heed::Error> for LmdbError {
    fn from(e: heed::Error) -> Self {
        LmdbError::Heed(e.to_string())
    }
}

impl From<std::io::Error> for LmdbError {
    fn from(e: std::io::Error) -> Self {
        LmdbError::Io(e.to_string())
    }
}

impl From<LmdbError> for StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::Serialization(msg) => StoreError::Serialization(msg),
            LmdbError::MissingDatabase(_)
            | LmdbError::SchemaTooNew { .. }
            | LmdbError::SchemaOutdated { .. } => StoreError::Corruption(e.to_string()),
            LmdbError::Heed(_) | LmdbError::Io(_) | LmdbError::EnvironmentInUse(_) => {
                StoreError::Backend(e.to_string())
            }
        }
    }
}
