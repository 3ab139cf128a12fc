//! Typed, read-only view over a [`GovernanceStore`].
//!
//! Needs no ledger, so operator tooling can inspect a store directly.

use crate::ballot::{Ballot, BallotBox};
use crate::codec::decode;
use crate::config::EngineConfig;
use crate::disbursement::DisbursementIntent;
use crate::error::{GovernanceError, Result};
use crate::proposal::{Proposal, ProposalStatus};
use fundgov_store::GovernanceStore;
use fundgov_types::{GovernanceParams, Name};

pub struct GovernanceReader<'a, S: ?Sized> {
    store: &'a S,
    config: &'a EngineConfig,
}

impl<'a, S: GovernanceStore + ?Sized> GovernanceReader<'a, S> {
    pub fn new(store: &'a S, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    /// The stored parameters, or the unconfigured default if none were set.
    pub fn params(&self) -> Result<GovernanceParams> {
        match self.store.get_params()? {
            Some(bytes) => decode(&bytes),
            None => Ok(GovernanceParams::unconfigured(
                &self.config.governance_account,
                &self.config.token,
            )),
        }
    }

    pub fn find_proposal(&self, name: &Name) -> Result<Option<Proposal>> {
        self.store
            .get_proposal(name)?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    pub fn proposal(&self, name: &Name) -> Result<Proposal> {
        self.find_proposal(name)?
            .ok_or_else(|| GovernanceError::ProposalNotFound(name.clone()))
    }

    /// All proposals ordered by name, optionally only those in `status`.
    pub fn proposals(&self, status: Option<ProposalStatus>) -> Result<Vec<Proposal>> {
        let mut out = Vec::new();
        for bytes in self.store.list_proposals()? {
            let proposal: Proposal = decode(&bytes)?;
            if status.map_or(true, |s| proposal.status == s) {
                out.push(proposal);
            }
        }
        Ok(out)
    }

    pub fn ballot(&self, proposal: &Name, voter: &Name) -> Result<Ballot> {
        match self.store.get_ballot(proposal, voter)? {
            Some(bytes) => decode(&bytes),
            None => Err(GovernanceError::BallotNotFound {
                proposal: proposal.clone(),
                voter: voter.clone(),
            }),
        }
    }

    /// Ballots of an existing proposal, ordered by voter.
    pub fn ballots(&self, proposal: &Name) -> Result<Vec<Ballot>> {
        self.proposal(proposal)?;
        self.load_ballots(proposal)
    }

    pub fn ballot_box(&self, proposal: &Name) -> Result<BallotBox> {
        Ok(BallotBox::from_ballots(
            proposal.clone(),
            self.load_ballots(proposal)?,
        ))
    }

    pub fn disbursement(&self, proposal: &Name) -> Result<Option<DisbursementIntent>> {
        self.store
            .get_disbursement(proposal)?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    pub fn disbursements(&self) -> Result<Vec<DisbursementIntent>> {
        self.store
            .list_disbursements()?
            .iter()
            .map(|bytes| decode(bytes))
            .collect()
    }

    pub fn pending_disbursements(&self) -> Result<Vec<DisbursementIntent>> {
        Ok(self
            .disbursements()?
            .into_iter()
            .filter(DisbursementIntent::is_pending)
            .collect())
    }

    fn load_ballots(&self, proposal: &Name) -> Result<Vec<Ballot>> {
        self.store
            .get_ballots(proposal)?
            .iter()
            .map(|bytes| decode(bytes))
            .collect()
    }
}
