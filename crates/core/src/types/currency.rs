//! Supported currency codes and UI languages.
//!
//! Both sets are closed. Every lookup table in this crate is an exhaustive
//! `match` over these enums, so adding a variant does not compile until every
//! table has an entry for it.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CurrencyError;

/// ISO 4217 currency codes accepted by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Swedish krona, the base currency.
    #[default]
    SEK,
    /// United States dollar.
    USD,
}

impl CurrencyCode {
    /// The currency every exchange rate is expressed against.
    pub const BASE: Self = Self::SEK;

    /// Every supported code, in switcher display order.
    pub const ALL: [Self; 2] = [Self::SEK, Self::USD];

    /// Returns the ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::SEK => "SEK",
            Self::USD => "USD",
        }
    }

    /// Returns `true` for the base currency.
    #[must_use]
    pub const fn is_base(self) -> bool {
        matches!(self, Self::SEK)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SEK" => Ok(Self::SEK),
            "USD" => Ok(Self::USD),
            _ => Err(CurrencyError::InvalidCurrency(s.to_owned())),
        }
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = CurrencyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// UI languages with localized currency names.
///
/// `En` is the first supported language and the fallback for any tag that
/// is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
    Sv,
}

impl Language {
    /// Every supported language, default first.
    pub const ALL: [Self; 3] = [Self::En, Self::Ar, Self::Sv];

    /// Resolve a UI language tag such as `sv`, `sv-SE` or `ar_EG`.
    ///
    /// Only the primary subtag is considered. Unsupported tags resolve to
    /// [`Language::En`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match primary.as_str() {
            "ar" => Self::Ar,
            "sv" => Self::Sv,
            _ => Self::En,
        }
    }

    /// Returns the primary language subtag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
            Self::Sv => "sv",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported_codes() {
        assert_eq!("SEK".parse::<CurrencyCode>().unwrap(), CurrencyCode::SEK);
        assert_eq!("USD".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
    }

    #[test]
    fn test_parse_unknown_code() {
        let err = "EUR".parse::<CurrencyCode>().unwrap_err();
        assert_eq!(err, CurrencyError::InvalidCurrency("EUR".to_string()));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("sek".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_base_currency() {
        assert_eq!(CurrencyCode::BASE, CurrencyCode::SEK);
        assert_eq!(CurrencyCode::default(), CurrencyCode::BASE);
        assert!(CurrencyCode::SEK.is_base());
        assert!(!CurrencyCode::USD.is_base());
    }

    #[test]
    fn test_code_serializes_as_iso_string() {
        let json = serde_json::to_string(&CurrencyCode::USD).unwrap();
        assert_eq!(json, "\"USD\"");
    }

    #[test]
    fn test_language_from_tag() {
        assert_eq!(Language::from_tag("sv"), Language::Sv);
        assert_eq!(Language::from_tag("sv-SE"), Language::Sv);
        assert_eq!(Language::from_tag("ar_EG"), Language::Ar);
        assert_eq!(Language::from_tag("EN-us"), Language::En);
    }

    #[test]
    fn test_language_unknown_tag_falls_back_to_english() {
        assert_eq!(Language::from_tag("de"), Language::En);
        assert_eq!(Language::from_tag(""), Language::En);
    }
}
