//! Token symbols and asset amounts.
//!
//! Amounts are fixed-point integers (u128) counted in the token's smallest
//! unit. A [`Symbol`] carries the token code and its decimal precision, so
//! `Asset { amount: 100_000, symbol: 4,XPR }` is `10.0000 XPR`.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token denomination: an upper-case code plus a decimal precision.
///
/// Written as `"<precision>,<CODE>"`, e.g. `"4,XPR"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol {
    code: String,
    precision: u8,
}

impl Symbol {
    /// Largest supported precision. Keeps `10^precision` well inside u128.
    pub const MAX_PRECISION: u8 = 18;
    /// Maximum length of a symbol code.
    pub const MAX_CODE_LEN: usize = 7;

    pub fn new(code: impl Into<String>, precision: u8) -> Result<Self, TypesError> {
        let code = code.into();
        if code.is_empty()
            || code.len() > Self::MAX_CODE_LEN
            || !code.bytes().all(|b| b.is_ascii_uppercase())
            || precision > Self::MAX_PRECISION
        {
            return Err(TypesError::InvalidSymbol(format!("{precision},{code}")));
        }
        Ok(Self { code, precision })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Number of raw units in one whole token.
    pub fn unit(&self) -> u128 {
        10u128.pow(self.precision as u32)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}

impl FromStr for Symbol {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (precision, code) = s
            .split_once(',')
            .ok_or_else(|| TypesError::InvalidSymbol(s.to_string()))?;
        let precision = precision
            .trim()
            .parse::<u8>()
            .map_err(|_| TypesError::InvalidSymbol(s.to_string()))?;
        Self::new(code.trim(), precision)
    }
}

impl TryFrom<String> for Symbol {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.to_string()
    }
}

/// An amount of a specific token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    /// Raw units (smallest denomination).
    pub amount: u128,
    pub symbol: Symbol,
}

impl Asset {
    pub fn new(amount: u128, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }

    pub fn zero(symbol: Symbol) -> Self {
        Self { amount: 0, symbol }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Whether this asset is denominated in `symbol`.
    pub fn is_denominated_in(&self, symbol: &Symbol) -> bool {
        &self.symbol == symbol
    }

    /// Add two assets of the same symbol. Returns `None` on a symbol
    /// mismatch or overflow.
    pub fn checked_add(&self, other: &Asset) -> Option<Asset> {
        if self.symbol != other.symbol {
            return None;
        }
        self.amount
            .checked_add(other.amount)
            .map(|amount| Asset::new(amount, self.symbol.clone()))
    }

    /// Subtract `other` from this asset. Returns `None` on a symbol mismatch
    /// or underflow.
    pub fn checked_sub(&self, other: &Asset) -> Option<Asset> {
        if self.symbol != other.symbol {
            return None;
        }
        self.amount
            .checked_sub(other.amount)
            .map(|amount| Asset::new(amount, self.symbol.clone()))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = self.symbol.precision as usize;
        if precision == 0 {
            return write!(f, "{} {}", self.amount, self.symbol.code);
        }
        let unit = self.symbol.unit();
        write!(
            f,
            "{}.{:0>width$} {}",
            self.amount / unit,
            self.amount % unit,
            self.symbol.code,
            width = precision
        )
    }
}

/// Parses `"10.0000 XPR"`. The number of decimals sets the precision.
impl FromStr for Asset {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypesError::InvalidAsset(s.to_string());
        let mut parts = s.split_whitespace();
        let (number, code) = match (parts.next(), parts.next(), parts.next()) {
            (Some(number), Some(code), None) => (number, code),
            _ => return Err(invalid()),
        };

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if number.contains('.') && fraction.is_empty() {
            return Err(invalid());
        }
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let precision = u8::try_from(fraction.len()).map_err(|_| invalid())?;
        let symbol = Symbol::new(code, precision)?;

        let whole: u128 = whole.parse().map_err(|_| TypesError::AmountOverflow)?;
        let fraction: u128 = if fraction.is_empty() {
            0
        } else {
            fraction.parse().map_err(|_| TypesError::AmountOverflow)?
        };
        let amount = whole
            .checked_mul(symbol.unit())
            .and_then(|w| w.checked_add(fraction))
            .ok_or(TypesError::AmountOverflow)?;
        Ok(Asset::new(amount, symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xpr() -> Symbol {
        Symbol::new("XPR", 4).unwrap()
    }

    #[test]
    fn symbol_parse_and_display() {
        let symbol: Symbol = "4,XPR".parse().unwrap();
        assert_eq!(symbol, xpr());
        assert_eq!(symbol.to_string(), "4,XPR");
        assert_eq!(symbol.unit(), 10_000);
    }

    #[test]
    fn symbol_rejects_bad_codes() {
        assert!(Symbol::new("xpr", 4).is_err());
        assert!(Symbol::new("", 4).is_err());
        assert!(Symbol::new("TOOLONGX", 4).is_err());
        assert!(Symbol::new("XPR", 19).is_err());
        assert!("XPR".parse::<Symbol>().is_err());
    }

    #[test]
    fn asset_display_pads_fraction() {
        assert_eq!(Asset::new(100_000, xpr()).to_string(), "10.0000 XPR");
        assert_eq!(Asset::new(5, xpr()).to_string(), "0.0005 XPR");
        let whole = Symbol::new("VOTE", 0).unwrap();
        assert_eq!(Asset::new(42, whole).to_string(), "42 VOTE");
    }

    #[test]
    fn asset_parse() {
        let asset: Asset = "12.3400 XPR".parse().unwrap();
        assert_eq!(asset.amount, 123_400);
        assert_eq!(asset.symbol, xpr());

        let whole: Asset = "7 VOTE".parse().unwrap();
        assert_eq!(whole.amount, 7);
        assert_eq!(whole.symbol.precision(), 0);

        assert!("12.34".parse::<Asset>().is_err());
        assert!("12. XPR".parse::<Asset>().is_err());
        assert!("-1.0000 XPR".parse::<Asset>().is_err());
        assert!("1.0000 XPR extra".parse::<Asset>().is_err());
    }

    #[test]
    fn checked_math_requires_matching_symbol() {
        let a = Asset::new(10, xpr());
        let b = Asset::new(5, xpr());
        assert_eq!(a.checked_add(&b).unwrap().amount, 15);
        assert_eq!(a.checked_sub(&b).unwrap().amount, 5);
        assert!(b.checked_sub(&a).is_none());

        let other = Asset::new(5, Symbol::new("EOS", 4).unwrap());
        assert!(a.checked_add(&other).is_none());
    }
}
