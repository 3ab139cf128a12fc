//! Caller authentication context.
//!
//! Signature checking happens in the transport layer. By the time an
//! operation reaches the engine, the caller's proven identities are carried
//! in an [`AuthContext`]. Operations name the identity they need and the
//! context fails closed when it is absent.

use crate::error::{GovernanceError, Result};
use fundgov_types::Name;
use std::collections::BTreeSet;

/// The set of identities that authenticated the current call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthContext {
    signers: BTreeSet<Name>,
}

impl AuthContext {
    /// A context with no authenticated identity. Every check fails.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A context authenticated as a single identity.
    pub fn signed_by(signer: &Name) -> Self {
        Self {
            signers: BTreeSet::from([signer.clone()]),
        }
    }

    /// Add another authenticated identity.
    pub fn with(mut self, signer: &Name) -> Self {
        self.signers.insert(signer.clone());
        self
    }

    pub fn has(&self, account: &Name) -> bool {
        self.signers.contains(account)
    }

    /// Fail with [`GovernanceError::Unauthorized`] unless `account` signed.
    pub fn require(&self, account: &Name) -> Result<()> {
        if self.has(account) {
            Ok(())
        } else {
            Err(GovernanceError::Unauthorized {
                required: account.clone(),
            })
        }
    }
}
