//! Payment methods offered at checkout.

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PaymentMethod`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid payment method: {0}")]
pub struct PaymentMethodError(pub String);

/// How the shopper intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Hosted PayPal buttons.
    #[default]
    #[serde(rename = "paypal")]
    PayPal,
    /// Manual Instapay bank transfer.
    Instapay,
    /// Manual Vodafone Cash wallet transfer.
    #[serde(rename = "vodafone")]
    VodafoneCash,
    /// Card payments (not yet offered).
    #[serde(rename = "visa")]
    Card,
}

impl PaymentMethod {
    /// Every method, in checkout display order.
    pub const ALL: [Self; 4] = [Self::PayPal, Self::Instapay, Self::VodafoneCash, Self::Card];

    /// Human-readable label for order summaries.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PayPal => "PayPal",
            Self::Instapay => "Instapay (manual transfer)",
            Self::VodafoneCash => "Vodafone Cash (manual transfer)",
            Self::Card => "Visa / Card (coming soon)",
        }
    }

    /// Manual transfers are confirmed with a transaction reference.
    #[must_use]
    pub const fn is_manual_transfer(&self) -> bool {
        matches!(self, Self::Instapay | Self::VodafoneCash)
    }

    /// Where the shopper sends a manual transfer.
    #[must_use]
    pub const fn transfer_destination(&self) -> Option<&'static str> {
        match self {
            Self::Instapay => Some("cbrd@bank"),
            Self::VodafoneCash => Some("0100 000 0000"),
            Self::PayPal | Self::Card => None,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PayPal => write!(f, "paypal"),
            Self::Instapay => write!(f, "instapay"),
            Self::VodafoneCash => write!(f, "vodafone"),
            Self::Card => write!(f, "visa"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = PaymentMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paypal" => Ok(Self::PayPal),
            "instapay" => Ok(Self::Instapay),
            "vodafone" => Ok(Self::VodafoneCash),
            "visa" => Ok(Self::Card),
            _ => Err(PaymentMethodError(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_display() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.to_string().parse::<PaymentMethod>().unwrap(), method);
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("\"{method}\""));
        }
    }

    #[test]
    fn test_manual_transfers() {
        assert!(PaymentMethod::Instapay.is_manual_transfer());
        assert!(PaymentMethod::VodafoneCash.is_manual_transfer());
        assert!(!PaymentMethod::PayPal.is_manual_transfer());
        assert!(PaymentMethod::Card.transfer_destination().is_none());
    }

    #[test]
    fn test_invalid() {
        assert!("cash".parse::<PaymentMethod>().is_err());
    }
}
