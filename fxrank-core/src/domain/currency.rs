//! The closed set of supported currencies and directed pairs.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// A supported currency. Anything outside this set is rejected at parse time.
///
/// `Currency::ALL` fixes the iteration order (PLN, USD, EUR, GBP). Sorting
/// (`Ord`) follows the ISO code instead, so tables ordered by code come out
/// EUR, GBP, PLN, USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Pln,
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    /// Every supported currency, in stable iteration order.
    pub const ALL: [Currency; 4] = [Currency::Pln, Currency::Usd, Currency::Eur, Currency::Gbp];

    /// ISO 4217 code.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Pln => "PLN",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    /// Parse user or file input. Surrounding whitespace and case are ignored.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PLN" => Ok(Currency::Pln),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            _ => Err(ValidationError::UnsupportedCurrency {
                code: value.to_string(),
            }),
        }
    }

    /// All supported currencies except `base`, in stable order.
    pub fn targets_for(base: Currency) -> Vec<Currency> {
        Currency::ALL.into_iter().filter(|c| *c != base).collect()
    }

    /// Currencies the EUR-quoted feed must supply (everything but EUR).
    pub fn non_eur() -> Vec<Currency> {
        Currency::targets_for(Currency::Eur)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::parse(s)
    }
}

impl PartialOrd for Currency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Currency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code().cmp(other.code())
    }
}

/// A directed currency pair: the rate is `base` units per 1 `quote` unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pair {
    pub base: Currency,
    pub quote: Currency,
}

impl Pair {
    pub fn new(base: Currency, quote: Currency) -> Result<Self, ValidationError> {
        if base == quote {
            return Err(ValidationError::SameCurrency { currency: base });
        }
        Ok(Self { base, quote })
    }

    /// `"PLN/USD"` style code.
    pub fn code(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }

    /// Every directed pair of supported currencies, ordered by `(base, quote)` code.
    pub fn all() -> Vec<Pair> {
        let mut pairs = Vec::with_capacity(Currency::ALL.len() * (Currency::ALL.len() - 1));
        for base in Currency::ALL {
            for quote in Currency::ALL {
                if base != quote {
                    pairs.push(Pair { base, quote });
                }
            }
        }
        pairs.sort();
        pairs
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Currency::parse("pln").unwrap(), Currency::Pln);
        assert_eq!(Currency::parse(" UsD ").unwrap(), Currency::Usd);
        assert_eq!("gbp".parse::<Currency>().unwrap(), Currency::Gbp);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = Currency::parse("ABC").unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnsupportedCurrency {
                code: "ABC".into()
            }
        );
        assert!(err.to_string().contains("ABC"));
    }

    #[test]
    fn ordering_follows_code() {
        let mut all = Currency::ALL.to_vec();
        all.sort();
        assert_eq!(
            all,
            vec![Currency::Eur, Currency::Gbp, Currency::Pln, Currency::Usd]
        );
    }

    #[test]
    fn targets_exclude_base() {
        let targets = Currency::targets_for(Currency::Eur);
        assert_eq!(targets, vec![Currency::Pln, Currency::Usd, Currency::Gbp]);
    }

    #[test]
    fn serde_uses_iso_code() {
        let json = serde_json::to_string(&Currency::Gbp).unwrap();
        assert_eq!(json, "\"GBP\"");
        let back: Currency = serde_json::from_str("\"PLN\"").unwrap();
        assert_eq!(back, Currency::Pln);
    }

    #[test]
    fn pair_rejects_same_currency() {
        assert!(matches!(
            Pair::new(Currency::Pln, Currency::Pln),
            Err(ValidationError::SameCurrency { .. })
        ));
    }

    #[test]
    fn pair_code() {
        let pair = Pair::new(Currency::Pln, Currency::Usd).unwrap();
        assert_eq!(pair.code(), "PLN/USD");
        assert_eq!(pair.to_string(), "PLN/USD");
    }

    #[test]
    fn all_pairs_is_n_times_n_minus_one() {
        let pairs = Pair::all();
        assert_eq!(pairs.len(), 12);
        assert!(pairs.windows(2).all(|w| w[0] < w[1]));
    }
}
