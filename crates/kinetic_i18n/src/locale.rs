//! Supported locales and their text direction

use crate::error::I18nError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Layout direction implied by a locale
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

/// A dashboard locale
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
    De,
    Ar,
}

impl Locale {
    pub const ALL: [Locale; 4] = [Locale::En, Locale::Fr, Locale::De, Locale::Ar];

    /// BCP 47 language tag
    pub fn tag(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
            Locale::De => "de",
            Locale::Ar => "ar",
        }
    }

    pub fn direction(self) -> TextDirection {
        match self {
            Locale::Ar => TextDirection::Rtl,
            _ => TextDirection::Ltr,
        }
    }

    /// Native display name, as shown in the language switcher
    pub fn native_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Fr => "Français",
            Locale::De => "Deutsch",
            Locale::Ar => "العربية",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    /// Accepts a bare language tag or a region-qualified one (`fr-CA`, `en_US`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let language = s
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Locale::ALL
            .into_iter()
            .find(|locale| locale.tag() == language)
            .ok_or_else(|| I18nError::UnknownLocale(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_region_qualified_tags() {
        assert_eq!("fr-CA".parse::<Locale>().unwrap(), Locale::Fr);
        assert_eq!("en_US".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("AR".parse::<Locale>().unwrap(), Locale::Ar);
        assert!("xx".parse::<Locale>().is_err());
        assert!("".parse::<Locale>().is_err());
    }

    #[test]
    fn test_only_arabic_is_rtl() {
        for locale in Locale::ALL {
            let expected = if locale == Locale::Ar {
                TextDirection::Rtl
            } else {
                TextDirection::Ltr
            };
            assert_eq!(locale.direction(), expected);
        }
    }
}
