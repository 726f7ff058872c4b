//! Locale-aware integer formatting
//!
//! Only what the dashboard displays: whole numbers with thousands grouping.

use crate::locale::Locale;

/// Group separator and digit set for a locale
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumberSymbols {
    pub group_separator: char,
    /// First digit of the locale's digit set ('0' for Latin digits)
    pub zero_digit: char,
}

impl NumberSymbols {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => Self {
                group_separator: ',',
                zero_digit: '0',
            },
            Locale::Fr => Self {
                group_separator: '\u{202F}',
                zero_digit: '0',
            },
            Locale::De => Self {
                group_separator: '.',
                zero_digit: '0',
            },
            Locale::Ar => Self {
                group_separator: '\u{066C}',
                zero_digit: '\u{0660}',
            },
        }
    }

    fn digit(&self, ascii: u8) -> char {
        let offset = u32::from(ascii - b'0');
        char::from_u32(u32::from(self.zero_digit) + offset).unwrap_or(char::from(ascii))
    }
}

/// Format `value` with the locale's grouping separator every three digits
pub fn format_integer(value: u64, locale: Locale) -> String {
    let symbols = NumberSymbols::for_locale(locale);
    let digits = value.to_string();
    let len = digits.len();

    let mut out = String::with_capacity(len + len / 3 * 3);
    for (i, ascii) in digits.bytes().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(symbols.group_separator);
        }
        out.push(symbols.digit(ascii));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_grouping() {
        assert_eq!(format_integer(0, Locale::En), "0");
        assert_eq!(format_integer(999, Locale::En), "999");
        assert_eq!(format_integer(1000, Locale::En), "1,000");
        assert_eq!(format_integer(1234567, Locale::En), "1,234,567");
    }

    #[test]
    fn test_european_separators() {
        assert_eq!(format_integer(1234567, Locale::De), "1.234.567");
        assert_eq!(format_integer(12500, Locale::Fr), "12\u{202F}500");
    }

    #[test]
    fn test_arabic_indic_digits() {
        assert_eq!(format_integer(1000, Locale::Ar), "١٬٠٠٠");
    }
}
