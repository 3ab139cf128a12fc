//! Governance engine: every operation that changes governance state.
//!
//! Operations run one at a time. Each one reads what it needs, validates,
//! stages all of its writes in a single [`GovernanceBatch`] and commits that
//! batch once. A failure anywhere before the commit leaves the store exactly
//! as it was; events are only queued after a successful commit.

use crate::auth::AuthContext;
use crate::ballot::{Ballot, BallotBox, VoteDirection, WeightPolicy};
use crate::codec::encode;
use crate::config::EngineConfig;
use crate::disbursement::{DeliveryReport, DeliveryStatus, DisbursementIntent};
use crate::error::{GovernanceError, Result};
use crate::events::GovernanceEvent;
use crate::memo::{PaymentMemo, PaymentOutcome};
use crate::params;
use crate::proposal::{NewProposal, Proposal, ProposalStatus};
use crate::reader::GovernanceReader;
use crate::tally::{self, TallyOutcome, VoteTotals};
use fundgov_ledger::TokenLedger;
use fundgov_store::{GovernanceBatch, GovernanceStore};
use fundgov_types::{Asset, GovernanceParams, Name, Timestamp};
use tracing::{debug, error, info, warn};

pub struct GovernanceEngine<S, L> {
    store: S,
    ledger: L,
    config: EngineConfig,
    /// Events for the caller to process, in commit order.
    pending_events: Vec<GovernanceEvent>,
}

impl<S: GovernanceStore, L: TokenLedger> GovernanceEngine<S, L> {
    pub fn new(store: S, ledger: L, config: EngineConfig) -> Self {
        Self {
            store,
            ledger,
            config,
            pending_events: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn reader(&self) -> GovernanceReader<'_, S> {
        GovernanceReader::new(&self.store, &self.config)
    }

    // ── Parameters ─────────────────────────────────────────────────────

    /// Replace the parameter record. Requires the governance account.
    pub fn set_params(&mut self, auth: &AuthContext, params: GovernanceParams) -> Result<()> {
        self.apply_set_params(auth, params)
            .inspect_err(|e| rejected("set_params", e))
    }

    fn apply_set_params(&mut self, auth: &AuthContext, new: GovernanceParams) -> Result<()> {
        auth.require(&self.config.governance_account)?;
        params::validate(&new, &self.config.token)?;

        let mut batch = GovernanceBatch::new();
        batch.put_params(encode(&new)?);
        self.store.commit(batch)?;

        info!(
            approver = %new.approver,
            funding_account = %new.funding_account,
            vote_threshold = new.vote_threshold,
            voting_period_days = new.voting_period_days,
            listing_fee = %new.listing_fee,
            "governance parameters updated"
        );
        self.pending_events.push(GovernanceEvent::ParamsUpdated);
        Ok(())
    }

    /// The current parameters. Never fails for lack of configuration.
    pub fn params(&self) -> Result<GovernanceParams> {
        self.reader().params()
    }

    // ── Proposal registry ──────────────────────────────────────────────

    /// Register a new draft proposal. Requires the creator.
    pub fn create(&mut self, auth: &AuthContext, new: NewProposal, now: Timestamp) -> Result<Proposal> {
        self.apply_create(auth, new, now)
            .inspect_err(|e| rejected("create", e))
    }

    fn apply_create(&mut self, auth: &AuthContext, new: NewProposal, now: Timestamp) -> Result<Proposal> {
        auth.require(&new.creator)?;
        params::ensure_symbol("amount", &new.amount, &self.config.token)?;

        // An outbox entry outlives an administrative removal and is keyed by
        // the same name, so it keeps the name reserved.
        if self.store.get_proposal(&new.name)?.is_some()
            || self.store.get_disbursement(&new.name)?.is_some()
        {
            return Err(GovernanceError::NameInUse(new.name));
        }

        let params = self.params()?;
        let balance = self.balance(&new.creator)?;
        if balance.amount < params.minimum_proposer_balance.amount {
            return Err(GovernanceError::InsufficientBalance {
                required: params.minimum_proposer_balance,
                available: balance,
            });
        }

        let proposal = Proposal::draft(new, now);
        let mut batch = GovernanceBatch::new();
        batch.put_proposal(&proposal.name, encode(&proposal)?);
        self.store.commit(batch)?;

        info!(
            proposal = %proposal.name,
            creator = %proposal.creator,
            amount = %proposal.amount,
            "proposal created"
        );
        self.pending_events.push(GovernanceEvent::ProposalCreated {
            proposal: proposal.name.clone(),
            creator: proposal.creator.clone(),
        });
        Ok(proposal)
    }

    /// Handle an incoming transfer notification from the ledger.
    ///
    /// Transfers not addressed to the governance account, or sent by it, are
    /// ignored. Otherwise the memo decides: a listing fee activates its
    /// proposal, donations and funding are accepted, anything else fails.
    pub fn on_value_received(
        &mut self,
        from: &Name,
        to: &Name,
        quantity: &Asset,
        memo: &str,
        now: Timestamp,
    ) -> Result<PaymentOutcome> {
        self.apply_value_received(from, to, quantity, memo, now)
            .inspect_err(|e| rejected("on_value_received", e))
    }

    fn apply_value_received(
        &mut self,
        from: &Name,
        to: &Name,
        quantity: &Asset,
        memo: &str,
        now: Timestamp,
    ) -> Result<PaymentOutcome> {
        let account = &self.config.governance_account;
        if to != account || from == account {
            debug!(%from, %to, "transfer not for the governance account");
            return Ok(PaymentOutcome::Ignored);
        }

        match PaymentMemo::parse(memo)? {
            PaymentMemo::ProposalFee(name) => self.activate(&name, quantity, now),
            PaymentMemo::Donation => {
                info!(%from, %quantity, "donation received");
                self.pending_events.push(GovernanceEvent::FundsReceived {
                    from: from.clone(),
                    quantity: quantity.clone(),
                });
                Ok(PaymentOutcome::Donation)
            }
            PaymentMemo::Funding => {
                info!(%from, %quantity, "funding received");
                self.pending_events.push(GovernanceEvent::FundsReceived {
                    from: from.clone(),
                    quantity: quantity.clone(),
                });
                Ok(PaymentOutcome::Funding)
            }
        }
    }

    fn activate(&mut self, name: &Name, paid: &Asset, now: Timestamp) -> Result<PaymentOutcome> {
        let mut proposal = self.reader().proposal(name)?;
        proposal.ensure_status(ProposalStatus::Draft, "activate")?;

        let params = self.params()?;
        if *paid != params.listing_fee {
            return Err(GovernanceError::FeeMismatch {
                expected: params.listing_fee,
                received: paid.clone(),
            });
        }
        proposal.activate(&params, now)?;

        let mut batch = GovernanceBatch::new();
        batch.put_proposal(&proposal.name, encode(&proposal)?);
        self.store.commit(batch)?;

        info!(
            proposal = %proposal.name,
            expires_on = %proposal.expires_on,
            "proposal activated"
        );
        self.pending_events.push(GovernanceEvent::ProposalActivated {
            proposal: proposal.name.clone(),
            expires_on: proposal.expires_on,
        });
        Ok(PaymentOutcome::Activated {
            proposal: proposal.name,
            expires_on: proposal.expires_on,
        })
    }

    /// Close voting on an expired proposal and apply the tally verdict.
    /// Requires the approver.
    pub fn finalize(&mut self, auth: &AuthContext, name: &Name, now: Timestamp) -> Result<TallyOutcome> {
        self.apply_finalize(auth, name, now)
            .inspect_err(|e| rejected("finalize", e))
    }

    fn apply_finalize(&mut self, auth: &AuthContext, name: &Name, now: Timestamp) -> Result<TallyOutcome> {
        let params = self.params()?;
        auth.require(&params.approver)?;

        let mut proposal = self.reader().proposal(name)?;
        proposal.ensure_voting_closed(now)?;

        let (ballots, changed) = self.weigh_ballots(name)?;
        let totals = ballots.totals()?;
        let supply = self.ledger.total_supply(&self.config.token)?;
        let outcome = tally::evaluate(totals, supply.amount, params.vote_threshold)?;

        proposal.record_totals(totals);
        proposal.transition(outcome.verdict)?;

        let mut batch = GovernanceBatch::new();
        batch.put_proposal(&proposal.name, encode(&proposal)?);
        stage_ballots(&mut batch, &ballots, &changed)?;
        self.store.commit(batch)?;

        info!(
            proposal = %proposal.name,
            status = %proposal.status,
            votes_for = totals.votes_for,
            votes_against = totals.votes_against,
            total_supply = outcome.total_supply,
            participation_bps = outcome.participation_bps,
            "proposal finalized"
        );
        self.pending_events.push(GovernanceEvent::ProposalFinalized {
            proposal: proposal.name,
            outcome,
        });
        Ok(outcome)
    }

    /// Fund a succeeded proposal. Requires the approver.
    ///
    /// The status change and the outbox entry are written together; the
    /// ledger is not contacted here. See [`Self::deliver_disbursements`].
    pub fn approve(&mut self, auth: &AuthContext, name: &Name, now: Timestamp) -> Result<DisbursementIntent> {
        self.apply_approve(auth, name, now)
            .inspect_err(|e| rejected("approve", e))
    }

    fn apply_approve(&mut self, auth: &AuthContext, name: &Name, now: Timestamp) -> Result<DisbursementIntent> {
        let params = self.params()?;
        auth.require(&params.approver)?;

        let mut proposal = self.reader().proposal(name)?;
        proposal.ensure_status(ProposalStatus::Succeeded, "approve")?;

        let intent = DisbursementIntent::for_proposal(&proposal, &params.funding_account, now);
        proposal.transition(ProposalStatus::Completed)?;

        let mut batch = GovernanceBatch::new();
        batch
            .put_proposal(&proposal.name, encode(&proposal)?)
            .put_disbursement(&proposal.name, encode(&intent)?);
        self.store.commit(batch)?;

        info!(
            proposal = %proposal.name,
            receiver = %proposal.receiver,
            amount = %proposal.amount,
            "proposal approved, disbursement queued"
        );
        self.pending_events.push(GovernanceEvent::ProposalApproved {
            proposal: proposal.name,
            amount: proposal.amount,
        });
        Ok(intent)
    }

    /// Decline to fund a succeeded proposal. Requires the approver.
    pub fn reject(&mut self, auth: &AuthContext, name: &Name) -> Result<()> {
        self.apply_reject(auth, name)
            .inspect_err(|e| rejected("reject", e))
    }

    fn apply_reject(&mut self, auth: &AuthContext, name: &Name) -> Result<()> {
        let params = self.params()?;
        auth.require(&params.approver)?;

        let mut proposal = self.reader().proposal(name)?;
        proposal.ensure_status(ProposalStatus::Succeeded, "reject")?;
        proposal.transition(ProposalStatus::Canceled)?;

        let mut batch = GovernanceBatch::new();
        batch.put_proposal(&proposal.name, encode(&proposal)?);
        self.store.commit(batch)?;

        info!(proposal = %proposal.name, "proposal rejected");
        self.pending_events
            .push(GovernanceEvent::ProposalRejected { proposal: proposal.name });
        Ok(())
    }

    /// Delete a proposal and its ballots. Requires the governance account.
    ///
    /// A queued disbursement for the proposal is kept.
    pub fn remove_proposal(&mut self, auth: &AuthContext, name: &Name) -> Result<Proposal> {
        self.apply_remove(auth, name)
            .inspect_err(|e| rejected("remove_proposal", e))
    }

    fn apply_remove(&mut self, auth: &AuthContext, name: &Name) -> Result<Proposal> {
        auth.require(&self.config.governance_account)?;
        let proposal = self.reader().proposal(name)?;

        let mut batch = GovernanceBatch::new();
        batch.delete_proposal(name).delete_ballots(name);
        self.store.commit(batch)?;

        warn!(proposal = %name, status = %proposal.status, "proposal removed");
        self.pending_events.push(GovernanceEvent::ProposalRemoved {
            proposal: name.clone(),
            status: proposal.status,
        });
        Ok(proposal)
    }

    // ── Ballot box ─────────────────────────────────────────────────────

    /// Cast `voter`'s one ballot on an open proposal. Requires the voter.
    ///
    /// The ballot weight is the voter's live balance, which must be
    /// positive.
    pub fn cast_vote(
        &mut self,
        auth: &AuthContext,
        voter: &Name,
        proposal: &Name,
        direction: VoteDirection,
        now: Timestamp,
    ) -> Result<Ballot> {
        self.apply_cast_vote(auth, voter, proposal, direction, now)
            .inspect_err(|e| rejected("cast_vote", e))
    }

    fn apply_cast_vote(
        &mut self,
        auth: &AuthContext,
        voter: &Name,
        name: &Name,
        direction: VoteDirection,
        now: Timestamp,
    ) -> Result<Ballot> {
        auth.require(voter)?;
        let proposal = self.reader().proposal(name)?;
        proposal.ensure_voting_open(now)?;

        let balance = self.balance(voter)?;
        if balance.is_zero() {
            return Err(GovernanceError::InsufficientBalance {
                required: Asset::new(1, self.config.token.clone()),
                available: balance,
            });
        }

        let mut ballots = self.reader().ballot_box(name)?;
        let ballot = ballots
            .cast(Ballot {
                voter: voter.clone(),
                direction,
                weight: balance.amount,
                cast_on: now,
            })?
            .clone();

        let mut batch = GovernanceBatch::new();
        batch.put_ballot(name, voter, encode(&ballot)?);
        self.store.commit(batch)?;

        info!(
            proposal = %name,
            %voter,
            %direction,
            weight = ballot.weight,
            "ballot cast"
        );
        self.pending_events.push(GovernanceEvent::BallotCast {
            proposal: name.clone(),
            voter: voter.clone(),
            direction,
            weight: ballot.weight,
        });
        Ok(ballot)
    }

    /// Recompute the running totals of an active proposal without changing
    /// its status. Needs no authority.
    pub fn refresh_tally(&mut self, name: &Name) -> Result<VoteTotals> {
        self.apply_refresh_tally(name)
            .inspect_err(|e| rejected("refresh_tally", e))
    }

    fn apply_refresh_tally(&mut self, name: &Name) -> Result<VoteTotals> {
        let mut proposal = self.reader().proposal(name)?;
        proposal.ensure_status(ProposalStatus::Active, "refresh tally of")?;

        let (ballots, changed) = self.weigh_ballots(name)?;
        let totals = ballots.totals()?;
        proposal.record_totals(totals);

        let mut batch = GovernanceBatch::new();
        batch.put_proposal(&proposal.name, encode(&proposal)?);
        stage_ballots(&mut batch, &ballots, &changed)?;
        self.store.commit(batch)?;

        debug!(
            proposal = %name,
            votes_for = totals.votes_for,
            votes_against = totals.votes_against,
            reweighed = changed.len(),
            "tally refreshed"
        );
        Ok(totals)
    }

    // ── Disbursement outbox ────────────────────────────────────────────

    /// Hand every pending disbursement to the ledger.
    ///
    /// Each intent is marked delivered before it is sent, so a crash between
    /// the two can lose a transfer but never repeat one. A transfer the
    /// ledger refuses is put back to pending and reported.
    ///
    /// A store failure stops the pass. The error names the intent it
    /// stopped at and carries the report so far; see
    /// [`GovernanceError::DeliveryStranded`] for the one case that leaves an
    /// unsent intent marked delivered.
    pub fn deliver_disbursements(&mut self, now: Timestamp) -> Result<DeliveryReport> {
        self.apply_deliver(now)
            .inspect_err(|e| rejected("deliver_disbursements", e))
    }

    fn apply_deliver(&mut self, now: Timestamp) -> Result<DeliveryReport> {
        let pending = self.reader().pending_disbursements()?;
        let mut report = DeliveryReport::default();

        for mut intent in pending {
            intent.mark_delivered(now);
            if let Err(e) = self.commit_intent(&intent) {
                return Err(GovernanceError::DeliveryInterrupted {
                    proposal: intent.proposal,
                    report,
                    source: Box::new(e),
                });
            }

            match self.ledger.transfer(&intent.instruction) {
                Ok(()) => {
                    info!(
                        proposal = %intent.proposal,
                        to = %intent.instruction.to,
                        quantity = %intent.instruction.quantity,
                        "disbursement delivered"
                    );
                    self.pending_events.push(GovernanceEvent::DisbursementDelivered {
                        proposal: intent.proposal.clone(),
                        amount: intent.instruction.quantity.clone(),
                    });
                    report.delivered.push(intent.proposal);
                }
                Err(refusal) => {
                    warn!(proposal = %intent.proposal, error = %refusal, "disbursement delivery failed");
                    intent.status = DeliveryStatus::Pending;
                    if let Err(e) = self.commit_intent(&intent) {
                        error!(
                            proposal = %intent.proposal,
                            %refusal,
                            error = %e,
                            "refused disbursement is stored as delivered"
                        );
                        return Err(GovernanceError::DeliveryStranded {
                            proposal: intent.proposal,
                            refusal,
                            report,
                            source: Box::new(e),
                        });
                    }
                    report.failed.push((intent.proposal, refusal.to_string()));
                }
            }
        }
        Ok(report)
    }

    /// Put a delivered disbursement back in the queue. Requires the
    /// governance account.
    ///
    /// Meant for an intent the operator knows was never paid, such as the
    /// one named by a [`GovernanceError::DeliveryStranded`].
    pub fn requeue_disbursement(&mut self, auth: &AuthContext, name: &Name) -> Result<DisbursementIntent> {
        self.apply_requeue(auth, name)
            .inspect_err(|e| rejected("requeue_disbursement", e))
    }

    fn apply_requeue(&mut self, auth: &AuthContext, name: &Name) -> Result<DisbursementIntent> {
        auth.require(&self.config.governance_account)?;
        let mut intent = self
            .reader()
            .disbursement(name)?
            .ok_or_else(|| GovernanceError::DisbursementNotFound(name.clone()))?;
        if intent.is_pending() {
            return Err(GovernanceError::DisbursementPending(name.clone()));
        }

        intent.status = DeliveryStatus::Pending;
        self.commit_intent(&intent)?;

        warn!(proposal = %name, "disbursement requeued");
        self.pending_events
            .push(GovernanceEvent::DisbursementRequeued { proposal: name.clone() });
        Ok(intent)
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn proposal(&self, name: &Name) -> Result<Proposal> {
        self.reader().proposal(name)
    }

    pub fn proposals(&self, status: Option<ProposalStatus>) -> Result<Vec<Proposal>> {
        self.reader().proposals(status)
    }

    pub fn ballots(&self, proposal: &Name) -> Result<Vec<Ballot>> {
        self.reader().ballots(proposal)
    }

    pub fn disbursements(&self) -> Result<Vec<DisbursementIntent>> {
        self.reader().disbursements()
    }

    pub fn pending_disbursements(&self) -> Result<Vec<DisbursementIntent>> {
        self.reader().pending_disbursements()
    }

    /// Take all queued events, leaving the queue empty.
    pub fn drain_events(&mut self) -> Vec<GovernanceEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ── Helpers ────────────────────────────────────────────────────────

    fn balance(&self, account: &Name) -> Result<Asset> {
        Ok(self.ledger.balance_of(account, &self.config.token)?)
    }

    /// Load a proposal's ballots with weights per the configured policy.
    /// Also returns the voters whose stored weight is now stale.
    fn weigh_ballots(&self, name: &Name) -> Result<(BallotBox, Vec<Name>)> {
        let mut ballots = self.reader().ballot_box(name)?;
        let changed = match self.config.weight_policy {
            WeightPolicy::SnapshotAtCast => Vec::new(),
            WeightPolicy::ResampleAtTally => {
                ballots.resample(|voter| Ok(self.balance(voter)?.amount))?
            }
        };
        Ok((ballots, changed))
    }

    fn commit_intent(&self, intent: &DisbursementIntent) -> Result<()> {
        let mut batch = GovernanceBatch::new();
        batch.put_disbursement(&intent.proposal, encode(intent)?);
        self.store.commit(batch)?;
        Ok(())
    }
}

fn stage_ballots(batch: &mut GovernanceBatch, ballots: &BallotBox, voters: &[Name]) -> Result<()> {
    for voter in voters {
        if let Some(ballot) = ballots.get(voter) {
            batch.put_ballot(ballots.proposal(), voter, encode(ballot)?);
        }
    }
    Ok(())
}

fn rejected(op: &'static str, err: &GovernanceError) {
    debug!(op, kind = ?err.kind(), error = %err, "operation rejected");
}
