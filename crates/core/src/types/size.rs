//! Garment sizes offered by the storefront.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Size`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown size '{0}' (expected one of M, L, XL, 2XL)")]
pub struct SizeError(pub String);

/// A hoodie size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Size {
    M,
    L,
    XL,
    #[serde(rename = "2XL")]
    XXL,
}

impl Size {
    /// Every size, smallest first.
    pub const ALL: [Self; 4] = [Self::M, Self::L, Self::XL, Self::XXL];

    /// Label as shown on the size picker.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::M => "M",
            Self::L => "L",
            Self::XL => "XL",
            Self::XXL => "2XL",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Size {
    type Err = SizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "M" => Ok(Self::M),
            "L" => Ok(Self::L),
            "XL" => Ok(Self::XL),
            "2XL" | "XXL" => Ok(Self::XXL),
            _ => Err(SizeError(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sizes() {
        assert_eq!("m".parse::<Size>().unwrap(), Size::M);
        assert_eq!("2XL".parse::<Size>().unwrap(), Size::XXL);
        assert_eq!("xxl".parse::<Size>().unwrap(), Size::XXL);
        assert!("S".parse::<Size>().is_err());
    }

    #[test]
    fn test_serde_uses_storefront_labels() {
        assert_eq!(serde_json::to_string(&Size::XXL).unwrap(), "\"2XL\"");
        let size: Size = serde_json::from_str("\"XL\"").unwrap();
        assert_eq!(size, Size::XL);
    }

    #[test]
    fn test_display_matches_serde() {
        for size in Size::ALL {
            let json = serde_json::to_string(&size).unwrap();
            assert_eq!(json, format!("\"{size}\""));
        }
    }
}
