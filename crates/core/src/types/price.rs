//! Type-safe price representation using decimal arithmetic.
//!
//! Prices carry a structured amount alongside their currency. Display strings
//! such as `"699 LE"` are derived from the amount and never parsed back for
//! arithmetic; [`Price::parse_label`] exists only to import legacy labels.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a price label.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The label is empty.
    #[error("price label cannot be empty")]
    Empty,
    /// The numeric part could not be parsed.
    #[error("invalid price amount: {0}")]
    InvalidAmount(String),
    /// The currency symbol is not recognized.
    #[error("unknown currency symbol: {0}")]
    UnknownCurrency(String),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., pounds, not piastres).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a whole-unit price in Egyptian pounds.
    #[must_use]
    pub fn egp(amount: i64) -> Self {
        Self::new(Decimal::from(amount), CurrencyCode::EGP)
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// The price of `quantity` units, saturating at the `Decimal` bounds.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self::new(
            self.amount.saturating_mul(Decimal::from(quantity)),
            self.currency_code,
        )
    }

    /// Parse a legacy display label like `"699 LE"` or `"$19.99"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the label is empty, has no parseable amount, or
    /// carries a currency symbol this crate does not know.
    pub fn parse_label(label: &str) -> Result<Self, PriceError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(PriceError::Empty);
        }

        let split = label
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| PriceError::InvalidAmount(label.to_string()))?;
        let (prefix, rest) = label.split_at(split);
        let end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, suffix) = rest.split_at(end);

        let amount = Decimal::from_str(number)
            .map_err(|_| PriceError::InvalidAmount(number.to_string()))?;

        let symbol = match (prefix.trim(), suffix.trim()) {
            ("", "") => return Ok(Self::new(amount, CurrencyCode::default())),
            (symbol, "") | ("", symbol) => symbol,
            (prefix, _) => return Err(PriceError::UnknownCurrency(prefix.to_string())),
        };

        CurrencyCode::from_symbol(symbol)
            .map(|currency| Self::new(amount, currency))
            .ok_or_else(|| PriceError::UnknownCurrency(symbol.to_string()))
    }

    /// Format for display (e.g., "699 LE", "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.currency_code {
            CurrencyCode::EGP => write!(f, "{} {}", self.amount.normalize(), self.currency_code.symbol()),
            CurrencyCode::USD | CurrencyCode::EUR => {
                write!(f, "{}{:.2}", self.currency_code.symbol(), self.amount)
            }
        }
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Egyptian pound, labelled "LE" on the storefront.
    #[default]
    EGP,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::EGP => "LE",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }

    /// ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EGP => "EGP",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "LE" | "EGP" | "E£" => Some(Self::EGP),
            "$" | "USD" => Some(Self::USD),
            "€" | "EUR" => Some(Self::EUR),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_egp() {
        assert_eq!(Price::egp(699).to_string(), "699 LE");
    }

    #[test]
    fn test_display_usd() {
        let price = Price::new(Decimal::new(1999, 2), CurrencyCode::USD);
        assert_eq!(price.display(), "$19.99");
    }

    #[test]
    fn test_times() {
        assert_eq!(Price::egp(500).times(2), Price::egp(1000));
        assert_eq!(Price::egp(500).times(0), Price::zero(CurrencyCode::EGP));
    }

    #[test]
    fn test_times_saturates() {
        let max = Price::new(Decimal::MAX, CurrencyCode::EGP);
        assert_eq!(max.times(2).amount, Decimal::MAX);
        assert_eq!(max.times(1).amount, Decimal::MAX);

        let min = Price::new(Decimal::MIN, CurrencyCode::EGP);
        assert_eq!(min.times(3).amount, Decimal::MIN);
    }

    #[test]
    fn test_parse_label_suffix_symbol() {
        assert_eq!(Price::parse_label("699 LE").unwrap(), Price::egp(699));
    }

    #[test]
    fn test_parse_label_prefix_symbol() {
        let price = Price::parse_label("$19.99").unwrap();
        assert_eq!(price, Price::new(Decimal::new(1999, 2), CurrencyCode::USD));
    }

    #[test]
    fn test_parse_label_bare_number_uses_default_currency() {
        assert_eq!(Price::parse_label("250").unwrap(), Price::egp(250));
    }

    #[test]
    fn test_parse_label_errors() {
        assert_eq!(Price::parse_label("   "), Err(PriceError::Empty));
        assert!(matches!(
            Price::parse_label("free"),
            Err(PriceError::InvalidAmount(_))
        ));
        assert!(matches!(
            Price::parse_label("699 ZZ"),
            Err(PriceError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn test_serde_keeps_structure() {
        let json = serde_json::to_value(Price::egp(699)).unwrap();
        assert_eq!(json["amount"], "699");
        assert_eq!(json["currency_code"], "EGP");
    }
}
