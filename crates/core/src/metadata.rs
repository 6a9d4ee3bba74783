//! Currency symbols, localized names and switcher entries.

use serde::Serialize;

use crate::types::{CurrencyCode, Language};

/// Display symbol for a currency.
#[must_use]
pub const fn currency_symbol(code: CurrencyCode) -> &'static str {
    match code {
        CurrencyCode::SEK => "kr",
        CurrencyCode::USD => "$",
    }
}

/// Localized display name for a currency.
#[must_use]
pub const fn currency_name(code: CurrencyCode, language: Language) -> &'static str {
    match (code, language) {
        (CurrencyCode::SEK, Language::En) => "Swedish Krona",
        (CurrencyCode::SEK, Language::Ar) => "كرونة سويدية",
        (CurrencyCode::SEK, Language::Sv) => "Svensk krona",
        (CurrencyCode::USD, Language::En) => "US Dollar",
        (CurrencyCode::USD, Language::Ar) => "دولار أمريكي",
        (CurrencyCode::USD, Language::Sv) => "Amerikansk dollar",
    }
}

/// Localized name for a raw UI language tag, English when unsupported.
#[must_use]
pub fn currency_name_for_tag(code: CurrencyCode, tag: &str) -> &'static str {
    currency_name(code, Language::from_tag(tag))
}

/// Flag emoji shown next to a currency.
#[must_use]
pub const fn currency_flag(code: CurrencyCode) -> &'static str {
    match code {
        CurrencyCode::SEK => "🇸🇪",
        CurrencyCode::USD => "🇺🇸",
    }
}

/// Trigger label for the currency switcher, e.g. `kr SEK`.
#[must_use]
pub fn switcher_label(code: CurrencyCode) -> String {
    format!("{} {}", currency_symbol(code), code.code())
}

/// Compact switcher label for narrow layouts: just the symbol.
#[must_use]
pub const fn switcher_short_label(code: CurrencyCode) -> &'static str {
    currency_symbol(code)
}

/// One entry in the currency switcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyOption {
    pub code: CurrencyCode,
    pub symbol: String,
    pub name: String,
    pub flag: String,
    /// Whether this entry is the active selection.
    pub selected: bool,
}

/// Switcher entries for every supported currency, in display order.
#[must_use]
pub fn currency_options(language: Language, selected: CurrencyCode) -> Vec<CurrencyOption> {
    CurrencyCode::ALL
        .into_iter()
        .map(|code| CurrencyOption {
            code,
            symbol: currency_symbol(code).to_owned(),
            name: currency_name(code, language).to_owned(),
            flag: currency_flag(code).to_owned(),
            selected: code == selected,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        assert_eq!(currency_symbol(CurrencyCode::SEK), "kr");
        assert_eq!(currency_symbol(CurrencyCode::USD), "$");
    }

    #[test]
    fn test_every_name_is_non_empty() {
        for code in CurrencyCode::ALL {
            for language in Language::ALL {
                assert!(!currency_name(code, language).is_empty(), "{code}/{language}");
            }
        }
    }

    #[test]
    fn test_localized_names() {
        assert_eq!(currency_name(CurrencyCode::SEK, Language::Sv), "Svensk krona");
        assert_eq!(currency_name(CurrencyCode::USD, Language::En), "US Dollar");
        assert_eq!(currency_name(CurrencyCode::USD, Language::Ar), "دولار أمريكي");
    }

    #[test]
    fn test_unsupported_tag_falls_back_to_english() {
        assert_eq!(currency_name_for_tag(CurrencyCode::SEK, "de"), "Swedish Krona");
        assert_eq!(currency_name_for_tag(CurrencyCode::USD, "sv-SE"), "Amerikansk dollar");
    }

    #[test]
    fn test_switcher_label() {
        assert_eq!(switcher_label(CurrencyCode::SEK), "kr SEK");
        assert_eq!(switcher_label(CurrencyCode::USD), "$ USD");
        assert_eq!(switcher_short_label(CurrencyCode::SEK), "kr");
    }

    #[test]
    fn test_options_mark_selection() {
        let options = currency_options(Language::Sv, CurrencyCode::USD);
        assert_eq!(options.len(), CurrencyCode::ALL.len());

        let selected: Vec<_> = options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected.first().map(|o| o.code), Some(CurrencyCode::USD));
        assert_eq!(options.first().map(|o| o.name.as_str()), Some("Svensk krona"));
    }
}
