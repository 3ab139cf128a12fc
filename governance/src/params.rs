//! Validation of administrator-supplied governance parameters.

use crate::error::{GovernanceError, Result};
use fundgov_types::{Asset, GovernanceParams, Symbol};

/// Check a parameter record before it replaces the stored one.
///
/// Both monetary fields must be denominated in the supported token and the
/// threshold must be a percentage.
pub fn validate(params: &GovernanceParams, supported: &Symbol) -> Result<()> {
    ensure_symbol("minimum_proposer_balance", &params.minimum_proposer_balance, supported)?;
    ensure_symbol("listing_fee", &params.listing_fee, supported)?;
    if params.vote_threshold > GovernanceParams::MAX_VOTE_THRESHOLD {
        return Err(GovernanceError::InvalidThreshold(params.vote_threshold));
    }
    Ok(())
}

/// Fail with `InvalidSymbol` unless `asset` is denominated in `supported`.
pub fn ensure_symbol(field: &'static str, asset: &Asset, supported: &Symbol) -> Result<()> {
    if asset.is_denominated_in(supported) {
        Ok(())
    } else {
        Err(GovernanceError::InvalidSymbol {
            field,
            expected: supported.clone(),
            found: asset.symbol.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use fundgov_types::Name;

    fn xpr() -> Symbol {
        Symbol::new("XPR", 4).unwrap()
    }

    fn params() -> GovernanceParams {
        GovernanceParams {
            funding_account: Name::new("treasury").unwrap(),
            vote_threshold: 50,
            voting_period_days: 7,
            minimum_proposer_balance: Asset::new(1_000, xpr()),
            listing_fee: Asset::new(10_000, xpr()),
            approver: Name::new("council").unwrap(),
        }
    }

    #[test]
    fn accepts_supported_symbol() {
        assert!(validate(&params(), &xpr()).is_ok());
    }

    #[test]
    fn rejects_foreign_fee_symbol() {
        let mut p = params();
        p.listing_fee = Asset::new(10_000, Symbol::new("EOS", 4).unwrap());
        let err = validate(&p, &xpr()).unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidSymbol { field: "listing_fee", .. }));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn precision_is_part_of_the_symbol() {
        let mut p = params();
        p.minimum_proposer_balance = Asset::new(1_000, Symbol::new("XPR", 8).unwrap());
        assert!(matches!(
            validate(&p, &xpr()),
            Err(GovernanceError::InvalidSymbol {
                field: "minimum_proposer_balance",
                ..
            })
        ));
    }

    #[test]
    fn threshold_above_hundred_is_rejected() {
        let mut p = params();
        p.vote_threshold = 100;
        assert!(validate(&p, &xpr()).is_ok());
        p.vote_threshold = 101;
        assert!(matches!(
            validate(&p, &xpr()),
            Err(GovernanceError::InvalidThreshold(101))
        ));
    }
}
