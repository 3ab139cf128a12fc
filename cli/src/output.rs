//! Plain-text rendering of governance records.

use fundgov_governance::{Ballot, DeliveryStatus, DisbursementIntent, Proposal, ProposalStatus};
use fundgov_types::{GovernanceParams, Timestamp};
use fundgov_utils::format_duration;
use std::fmt::Write;

pub fn params(p: &GovernanceParams) -> String {
    format!(
        "funding account:     {}\n\
         approver:            {}\n\
         vote threshold:      {}%\n\
         voting period:       {} days\n\
         minimum balance:     {}\n\
         listing fee:         {}\n",
        p.funding_account,
        p.approver,
        p.vote_threshold,
        p.voting_period_days,
        p.minimum_proposer_balance,
        p.listing_fee,
    )
}

fn voting_window(p: &Proposal, now: Timestamp) -> String {
    match p.status {
        ProposalStatus::Draft => "awaiting fee".to_string(),
        ProposalStatus::Active if now < p.expires_on => {
            format!("closes in {}", format_duration(p.expires_on.remaining_from(now)))
        }
        ProposalStatus::Active => "closed, not finalized".to_string(),
        _ => format!("closed at {}", p.expires_on),
    }
}

pub fn proposal_list(proposals: &[Proposal], now: Timestamp) -> String {
    if proposals.is_empty() {
        return "no proposals\n".to_string();
    }
    let mut out = String::new();
    for p in proposals {
        let _ = writeln!(
            out,
            "{:<32} {:<10} {:>24}  {}",
            p.name,
            p.status,
            p.amount.to_string(),
            voting_window(p, now)
        );
    }
    out
}

pub fn proposal(p: &Proposal, now: Timestamp) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", p.name, p.status);
    let _ = writeln!(out, "title:    {}", p.title);
    let _ = writeln!(out, "creator:  {}", p.creator);
    let _ = writeln!(out, "receiver: {}", p.receiver);
    let _ = writeln!(out, "amount:   {}", p.amount);
    if !p.url.is_empty() {
        let _ = writeln!(out, "url:      {}", p.url);
    }
    let _ = writeln!(out, "created:  {}", p.created_on);
    let _ = writeln!(out, "voting:   {}", voting_window(p, now));
    let _ = writeln!(out, "votes:    {} for / {} against", p.votes_for, p.votes_against);
    if !p.detail.is_empty() {
        let _ = writeln!(out, "\n{}", p.detail);
    }
    out
}

pub fn ballots(ballots: &[Ballot]) -> String {
    if ballots.is_empty() {
        return "no ballots\n".to_string();
    }
    let mut out = String::new();
    for b in ballots {
        let _ = writeln!(out, "{:<32} {:<8} {:>24}", b.voter, b.direction, b.weight);
    }
    out
}

pub fn outbox(intents: &[DisbursementIntent]) -> String {
    if intents.is_empty() {
        return "outbox empty\n".to_string();
    }
    let mut out = String::new();
    for intent in intents {
        let status = match intent.status {
            DeliveryStatus::Pending => "pending".to_string(),
            DeliveryStatus::Delivered { at } => format!("delivered at {at}"),
        };
        let _ = writeln!(
            out,
            "{:<32} {} -> {} {}  {}",
            intent.proposal,
            intent.instruction.from,
            intent.instruction.to,
            intent.instruction.quantity,
            status
        );
    }
    out
}
