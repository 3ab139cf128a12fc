use crate::disbursement::DeliveryReport;
use crate::proposal::ProposalStatus;
use fundgov_ledger::LedgerError;
use fundgov_store::StoreError;
use fundgov_types::{Asset, Name, Symbol, Timestamp, TypesError};
use thiserror::Error;

/// Broad category of a [`GovernanceError`], for callers that only need to
/// know what kind of rejection happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong or missing authenticated identity.
    Authorization,
    /// Malformed input: wrong denomination, amount mismatch, duplicate, bad memo.
    Validation,
    /// The proposal's current state forbids the operation.
    State,
    /// A referenced proposal or ballot does not exist.
    NotFound,
    /// Zero supply or overflow while aggregating weights.
    Arithmetic,
    /// The backing store failed or returned undecodable data.
    Storage,
    /// The token ledger could not answer or refused an instruction.
    Ledger,
    /// Engine configuration could not be loaded.
    Config,
}

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("missing authority of {required}")]
    Unauthorized { required: Name },

    #[error("invalid {field} symbol: expected {expected}, found {found}")]
    InvalidSymbol {
        field: &'static str,
        expected: Symbol,
        found: Symbol,
    },

    #[error("vote threshold {0}% is above 100%")]
    InvalidThreshold(u8),

    #[error("name {0} already in use")]
    NameInUse(Name),

    #[error("not enough balance: need {required}, have {available}")]
    InsufficientBalance { required: Asset, available: Asset },

    #[error("invalid quantity: listing fee is {expected}, received {received}")]
    FeeMismatch { expected: Asset, received: Asset },

    #[error("invalid memo: {0:?}")]
    InvalidMemo(String),

    #[error("{voter} already voted on {proposal}")]
    AlreadyVoted { voter: Name, proposal: Name },

    #[error(transparent)]
    InvalidName(#[from] TypesError),

    #[error("cannot {action} proposal {proposal} in status {status}")]
    InvalidStatus {
        proposal: Name,
        status: ProposalStatus,
        action: &'static str,
    },

    #[error("illegal transition {from} -> {to}")]
    IllegalTransition {
        from: ProposalStatus,
        to: ProposalStatus,
    },

    #[error("voting period for {proposal} ended at {expires_on}")]
    VotingClosed { proposal: Name, expires_on: Timestamp },

    #[error("voting period for {proposal} is not over until {expires_on}")]
    VotingStillOpen { proposal: Name, expires_on: Timestamp },

    #[error("proposal {0} not found")]
    ProposalNotFound(Name),

    #[error("ballot of {voter} on {proposal} not found")]
    BallotNotFound { proposal: Name, voter: Name },

    #[error("no disbursement queued for {0}")]
    DisbursementNotFound(Name),

    #[error("disbursement for {0} is already pending")]
    DisbursementPending(Name),

    /// A store failure stopped delivery before `proposal` was sent. That
    /// intent is still pending; `report` holds what happened before it.
    #[error("delivery stopped before sending {proposal}: {source}")]
    DeliveryInterrupted {
        proposal: Name,
        report: DeliveryReport,
        source: Box<GovernanceError>,
    },

    /// The ledger refused `proposal` and the intent could not be put back
    /// to pending, so it is stored as delivered although nothing was sent.
    #[error("ledger refused {proposal} ({refusal}) and it could not be requeued: {source}")]
    DeliveryStranded {
        proposal: Name,
        refusal: LedgerError,
        report: DeliveryReport,
        source: Box<GovernanceError>,
    },

    #[error("total supply is zero, cannot evaluate threshold")]
    ZeroSupply,

    #[error("arithmetic overflow while {0}")]
    Overflow(&'static str),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("config error: {0}")]
    Config(String),
}

impl GovernanceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::InvalidSymbol { .. }
            | Self::InvalidThreshold(_)
            | Self::NameInUse(_)
            | Self::InsufficientBalance { .. }
            | Self::FeeMismatch { .. }
            | Self::InvalidMemo(_)
            | Self::AlreadyVoted { .. }
            | Self::InvalidName(_) => ErrorKind::Validation,
            Self::InvalidStatus { .. }
            | Self::IllegalTransition { .. }
            | Self::VotingClosed { .. }
            | Self::VotingStillOpen { .. }
            | Self::DisbursementPending(_) => ErrorKind::State,
            Self::ProposalNotFound(_)
            | Self::BallotNotFound { .. }
            | Self::DisbursementNotFound(_) => ErrorKind::NotFound,
            Self::ZeroSupply | Self::Overflow(_) => ErrorKind::Arithmetic,
            Self::Store(_)
            | Self::Codec(_)
            | Self::DeliveryInterrupted { .. }
            | Self::DeliveryStranded { .. } => ErrorKind::Storage,
            Self::Ledger(_) => ErrorKind::Ledger,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

pub type Result<T> = std::result::Result<T, GovernanceError>;
