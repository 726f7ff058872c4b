//! Message catalogs
//!
//! A catalog is a set of per-locale key→string tables. Lookups fall back to
//! the catalog's fallback locale, then to the key itself, so a missing
//! translation renders as its key instead of an empty label.
//!
//! Catalogs load from TOML with one table per locale tag:
//!
//! ```toml
//! [en]
//! "dashboard.headcount" = "Headcount"
//! "greeting" = "Welcome back, {name}"
//!
//! [fr]
//! "dashboard.headcount" = "Effectif"
//! ```

use crate::error::Result;
use crate::locale::Locale;
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct Catalog {
    fallback: Locale,
    tables: FxHashMap<Locale, FxHashMap<String, String>>,
}

impl Catalog {
    pub fn new(fallback: Locale) -> Self {
        Self {
            fallback,
            tables: FxHashMap::default(),
        }
    }

    /// Parse a TOML catalog document
    ///
    /// Unknown locale tables are skipped with a warning rather than rejected,
    /// so a catalog shipped ahead of a new locale still loads.
    pub fn from_toml_str(source: &str, fallback: Locale) -> Result<Self> {
        let raw: BTreeMap<String, BTreeMap<String, String>> = toml::from_str(source)?;
        let mut catalog = Self::new(fallback);
        for (tag, entries) in raw {
            match tag.parse::<Locale>() {
                Ok(locale) => {
                    for (key, value) in entries {
                        catalog.insert(locale, key, value);
                    }
                }
                Err(err) => tracing::warn!("skipping catalog table: {}", err),
            }
        }
        Ok(catalog)
    }

    pub fn fallback(&self) -> Locale {
        self.fallback
    }

    pub fn insert(&mut self, locale: Locale, key: impl Into<String>, value: impl Into<String>) {
        self.tables
            .entry(locale)
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Look up `key` without falling back to the key itself
    pub fn get(&self, locale: Locale, key: &str) -> Option<&str> {
        self.lookup(locale, key)
            .or_else(|| self.lookup(self.fallback, key))
    }

    fn lookup(&self, locale: Locale, key: &str) -> Option<&str> {
        self.tables
            .get(&locale)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }

    /// Translate `key`, falling back to the fallback locale, then to `key`
    pub fn translate<'a>(&'a self, locale: Locale, key: &'a str) -> &'a str {
        match self.get(locale, key) {
            Some(value) => value,
            None => {
                tracing::debug!("missing translation for '{}' ({})", key, locale);
                key
            }
        }
    }

    /// Translate and substitute `{name}` placeholders
    ///
    /// Placeholders without a matching argument are left in place.
    pub fn translate_with<'a>(
        &'a self,
        locale: Locale,
        key: &'a str,
        args: &[(&str, &str)],
    ) -> Cow<'a, str> {
        let template = self.translate(locale, key);
        if args.is_empty() || !template.contains('{') {
            return Cow::Borrowed(template);
        }

        let mut out = template.to_string();
        for (name, value) in args {
            out = out.replace(&format!("{{{}}}", name), value);
        }
        Cow::Owned(out)
    }

    /// Keys present for the fallback locale but missing for `locale`
    pub fn missing_keys(&self, locale: Locale) -> Vec<&str> {
        let Some(reference) = self.tables.get(&self.fallback) else {
            return Vec::new();
        };
        let mut missing: Vec<&str> = reference
            .keys()
            .filter(|key| self.lookup(locale, key).is_none())
            .map(String::as_str)
            .collect();
        missing.sort_unstable();
        missing
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Locale::En)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[en]
"dashboard.headcount" = "Headcount"
"dashboard.turnover" = "Turnover"
"greeting" = "Welcome back, {name}"

[fr]
"dashboard.headcount" = "Effectif"
"greeting" = "Bon retour, {name}"

[xx]
"ignored" = "ignored"
"#;

    #[test]
    fn test_lookup_with_fallbacks() {
        let catalog = Catalog::from_toml_str(SAMPLE, Locale::En).unwrap();
        assert_eq!(catalog.translate(Locale::Fr, "dashboard.headcount"), "Effectif");
        assert_eq!(catalog.translate(Locale::Fr, "dashboard.turnover"), "Turnover");
        assert_eq!(catalog.translate(Locale::De, "nope.missing"), "nope.missing");
    }

    #[test]
    fn test_placeholder_substitution() {
        let catalog = Catalog::from_toml_str(SAMPLE, Locale::En).unwrap();
        assert_eq!(
            catalog.translate_with(Locale::Fr, "greeting", &[("name", "Amina")]),
            "Bon retour, Amina"
        );
        assert_eq!(
            catalog.translate_with(Locale::En, "greeting", &[]),
            "Welcome back, {name}"
        );
    }

    #[test]
    fn test_missing_keys_report() {
        let catalog = Catalog::from_toml_str(SAMPLE, Locale::En).unwrap();
        assert_eq!(catalog.missing_keys(Locale::Fr), vec!["dashboard.turnover"]);
        assert!(catalog.missing_keys(Locale::En).is_empty());
    }

    #[test]
    fn test_malformed_catalog_is_rejected() {
        assert!(Catalog::from_toml_str("[en\nbroken", Locale::En).is_err());
    }
}
