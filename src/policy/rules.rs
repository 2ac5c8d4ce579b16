use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;

use crate::error::{MaskCheckError, Result};
use super::table::MaskMode;

const MASK_CHAR: char = '*';

/// A value paired with the masking mode that produced it, plus the raw
/// value when the observing channel knows it. Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedField {
    pub mode: MaskMode,
    pub masked: String,
    pub raw: Option<String>,
}

impl MaskedField {
    pub fn observed(mode: MaskMode, masked: impl Into<String>) -> Self {
        Self {
            mode,
            masked: masked.into(),
            raw: None,
        }
    }

    pub fn with_raw(mode: MaskMode, masked: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            mode,
            masked: masked.into(),
            raw: Some(raw.into()),
        }
    }

    pub fn is_valid(&self) -> bool {
        is_valid_masking(&self.masked, self.mode, self.raw.as_deref())
    }

    /// The characters shown verbatim before the first masking character.
    pub fn visible_prefix(&self) -> &str {
        visible_prefix(&self.masked)
    }
}

/// Apply the deterministic masking transform for `mode` to a raw value.
///
/// Pure and total for well-formed input. A raw value that cannot satisfy
/// the mode's precondition (no `@` in an email, an unparseable date) is a
/// format error. A last name shorter than the reveal prefix is revealed in
/// full and terminated by exactly one `*`.
pub fn mask(raw: &str, mode: MaskMode) -> Result<String> {
    match mode {
        MaskMode::Full => {
            if raw.contains(MASK_CHAR) {
                Err(format_error(mode, raw, "unmasked field must not contain '*'"))
            } else {
                Ok(raw.to_string())
            }
        }
        MaskMode::PrefixReveal(n) => {
            if raw.trim().is_empty() {
                Err(format_error(mode, raw, "cannot mask an empty value"))
            } else {
                Ok(prefix_reveal(raw, n))
            }
        }
        MaskMode::PrefixRevealLocal(n) => {
            let (local, domain) = raw
                .split_once('@')
                .ok_or_else(|| format_error(mode, raw, "email has no '@'"))?;
            if local.is_empty() || domain.is_empty() {
                return Err(format_error(mode, raw, "email local part or domain is empty"));
            }
            Ok(format!("{}@{}", prefix_reveal(local, n), domain))
        }
        MaskMode::PrefixRevealDigits(n) => {
            let ds = digits(raw);
            if ds.is_empty() {
                Err(format_error(mode, raw, "phone has no digits"))
            } else {
                Ok(prefix_reveal(&ds, n))
            }
        }
        MaskMode::DayMask => {
            let date = parse_plain_date(raw)
                .ok_or_else(|| format_error(mode, raw, "expected dd/mm/yyyy"))?;
            Ok(format!("**/{:02}/{:04}", date.month(), date.year()))
        }
        MaskMode::Identifier => {
            if is_identifier(raw) {
                Ok(raw.to_string())
            } else {
                Err(format_error(mode, raw, "expected VP followed by 8 digits"))
            }
        }
        MaskMode::Date => {
            if plain_date_ok(raw) {
                Ok(raw.to_string())
            } else {
                Err(format_error(mode, raw, "expected dd/mm/yyyy with CE year"))
            }
        }
        MaskMode::Postcode => {
            if is_postcode(raw) {
                Ok(raw.to_string())
            } else {
                Err(format_error(mode, raw, "expected exactly 5 digits"))
            }
        }
    }
}

/// Check that `masked` is a valid masking under `mode`.
///
/// With `raw` supplied the expected mask is recomputed and compared
/// structurally (visible prefix, at least one masking character, domain
/// and format invariants). Without it only structural well-formedness is
/// checked.
pub fn is_valid_masking(masked: &str, mode: MaskMode, raw: Option<&str>) -> bool {
    match mode {
        MaskMode::Full => {
            !masked.is_empty()
                && !masked.contains(MASK_CHAR)
                && raw.map_or(true, |r| r.trim() == masked.trim())
        }
        MaskMode::Identifier => {
            is_identifier(masked) && raw.map_or(true, |r| r.trim() == masked.trim())
        }
        MaskMode::Date => plain_date_ok(masked) && raw.map_or(true, |r| r.trim() == masked.trim()),
        MaskMode::Postcode => is_postcode(masked) && raw.map_or(true, |r| r.trim() == masked.trim()),
        MaskMode::PrefixReveal(n) => {
            let Some(visible) = masked_shape(masked) else {
                return false;
            };
            if visible.chars().count() > n {
                return false;
            }
            raw.map_or(true, |r| ci_eq(visible, &reveal_expectation(r, n)))
        }
        MaskMode::PrefixRevealLocal(n) => {
            let Some((local, domain)) = masked.split_once('@') else {
                return false;
            };
            if domain.is_empty() || domain.contains(MASK_CHAR) {
                return false;
            }
            let Some(visible) = masked_shape(local) else {
                return false;
            };
            if visible.chars().count() > n {
                return false;
            }
            raw.map_or(true, |r| match r.split_once('@') {
                Some((raw_local, raw_domain)) => {
                    ci_eq(domain, raw_domain) && ci_eq(visible, &reveal_expectation(raw_local, n))
                }
                None => false,
            })
        }
        MaskMode::PrefixRevealDigits(n) => {
            // Formatting characters may be interspersed; the structure is
            // judged on digits and masking characters only.
            let stripped: String = masked
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == MASK_CHAR)
                .collect();
            let Some(visible) = masked_shape(&stripped) else {
                return false;
            };
            if visible.chars().count() > n {
                return false;
            }
            raw.map_or(true, |r| visible == reveal_expectation(&digits(r), n))
        }
        MaskMode::DayMask => match day_mask_parts(masked) {
            Some((month, year)) => raw.map_or(true, |r| match parse_plain_date(r) {
                Some(date) => date.month() == month && date.year() == year,
                None => false,
            }),
            None => false,
        },
    }
}

/// Month and year carried by a day-masked date (`**/MM/YYYY`).
pub fn day_mask_parts(masked: &str) -> Option<(u32, i32)> {
    let re = Regex::new(r"^\*\*/(\d{2})/(\d{4})$").ok()?;
    let caps = re.captures(masked.trim())?;
    let month: u32 = caps[1].parse().ok()?;
    let year: i32 = caps[2].parse().ok()?;
    if (1..=12).contains(&month) {
        Some((month, year))
    } else {
        None
    }
}

/// The digits of a value, formatting characters dropped.
pub fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// The characters shown verbatim before the first masking character.
pub fn visible_prefix(s: &str) -> &str {
    match s.find(MASK_CHAR) {
        Some(i) => &s[..i],
        None => s,
    }
}

pub fn is_identifier(s: &str) -> bool {
    Regex::new(r"^VP\d{8}$")
        .map(|re| re.is_match(s.trim()))
        .unwrap_or(false)
}

pub fn is_postcode(s: &str) -> bool {
    Regex::new(r"^\d{5}$")
        .map(|re| re.is_match(s.trim()))
        .unwrap_or(false)
}

/// dd/mm/yyyy, a real calendar date, common-era year no later than the
/// current year.
pub fn plain_date_ok(s: &str) -> bool {
    match parse_plain_date(s) {
        Some(date) => date.year() >= 1900 && date.year() <= Utc::now().date_naive().year(),
        None => false,
    }
}

pub fn parse_plain_date(s: &str) -> Option<NaiveDate> {
    let shape_ok = Regex::new(r"^\d{2}/\d{2}/\d{4}$")
        .map(|re| re.is_match(s.trim()))
        .unwrap_or(false);
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").ok()
}

fn format_error(mode: MaskMode, value: &str, reason: &str) -> MaskCheckError {
    MaskCheckError::Format {
        mode,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn prefix_reveal(raw: &str, n: usize) -> String {
    let visible: String = raw.chars().take(n).collect();
    let hidden = raw.chars().count().saturating_sub(n).max(1);
    format!("{}{}", visible, MASK_CHAR.to_string().repeat(hidden))
}

/// The verbatim prefix a well-formed mask of `raw` must expose: the first
/// `n` characters, or the whole value when it is shorter than `n`.
fn reveal_expectation(raw: &str, n: usize) -> String {
    raw.chars().take(n).collect()
}

/// Splits a masked value into its visible prefix, requiring at least one
/// masking character and nothing but masking characters after the prefix.
fn masked_shape(masked: &str) -> Option<&str> {
    let i = masked.find(MASK_CHAR)?;
    let (visible, tail) = masked.split_at(i);
    if visible.is_empty() || !tail.chars().all(|c| c == MASK_CHAR) {
        return None;
    }
    Some(visible)
}

fn ci_eq(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_last_name_prefix_reveal() {
        let masked = mask("Anderson", MaskMode::PrefixReveal(3)).unwrap();
        assert!(masked.starts_with("And"));
        assert!(masked.contains('*'));
        assert_eq!(masked, "And*****");
    }

    #[test]
    fn test_mask_short_last_name_reveals_all_with_single_star() {
        assert_eq!(mask("Li", MaskMode::PrefixReveal(3)).unwrap(), "Li*");
        assert_eq!(mask("Kim", MaskMode::PrefixReveal(3)).unwrap(), "Kim*");
    }

    #[test]
    fn test_mask_email_keeps_domain() {
        let masked = mask("foobar@bar.com", MaskMode::PrefixRevealLocal(3)).unwrap();
        assert_eq!(masked, "foo***@bar.com");
    }

    #[test]
    fn test_mask_email_without_at_fails() {
        assert!(mask("not-an-email", MaskMode::PrefixRevealLocal(3)).is_err());
    }

    #[test]
    fn test_mask_phone_canonical_digits() {
        let masked = mask("081-234-5678", MaskMode::PrefixRevealDigits(6)).unwrap();
        assert_eq!(masked, "081234****");
    }

    #[test]
    fn test_mask_day_mask() {
        assert_eq!(mask("25/03/1991", MaskMode::DayMask).unwrap(), "**/03/1991");
        assert!(mask("1991-03-25", MaskMode::DayMask).is_err());
    }

    #[test]
    fn test_mask_identifier_validates_format() {
        assert_eq!(mask("VP12345678", MaskMode::Identifier).unwrap(), "VP12345678");
        assert!(mask("VP1234567", MaskMode::Identifier).is_err());
        assert!(mask("XX12345678", MaskMode::Identifier).is_err());
    }

    #[test]
    fn test_is_valid_masking_structural_only() {
        assert!(is_valid_masking("And*****", MaskMode::PrefixReveal(3), None));
        assert!(is_valid_masking("foo***@bar.com", MaskMode::PrefixRevealLocal(3), None));
        assert!(is_valid_masking("081234****", MaskMode::PrefixRevealDigits(6), None));
        assert!(is_valid_masking("**/03/1991", MaskMode::DayMask, None));
        assert!(is_valid_masking("VP00000001", MaskMode::Identifier, None));

        // No masking character, stars in the middle, bad month.
        assert!(!is_valid_masking("Anderson", MaskMode::PrefixReveal(3), None));
        assert!(!is_valid_masking("An*ers**", MaskMode::PrefixReveal(3), None));
        assert!(!is_valid_masking("**/13/1991", MaskMode::DayMask, None));
    }

    #[test]
    fn test_is_valid_masking_against_raw() {
        assert!(is_valid_masking("And*****", MaskMode::PrefixReveal(3), Some("Anderson")));
        assert!(is_valid_masking("and***", MaskMode::PrefixReveal(3), Some("Anderson")));
        assert!(!is_valid_masking("Bnd*****", MaskMode::PrefixReveal(3), Some("Anderson")));

        assert!(is_valid_masking(
            "foo***@bar.com",
            MaskMode::PrefixRevealLocal(3),
            Some("foobar@bar.com")
        ));
        assert!(!is_valid_masking(
            "foo***@other.com",
            MaskMode::PrefixRevealLocal(3),
            Some("foobar@bar.com")
        ));

        assert!(is_valid_masking(
            "081234****",
            MaskMode::PrefixRevealDigits(6),
            Some("0812345678")
        ));
        assert!(!is_valid_masking(
            "999999****",
            MaskMode::PrefixRevealDigits(6),
            Some("0812345678")
        ));

        assert!(is_valid_masking("**/03/1991", MaskMode::DayMask, Some("25/03/1991")));
        assert!(!is_valid_masking("**/04/1991", MaskMode::DayMask, Some("25/03/1991")));
    }

    #[test]
    fn test_structural_check_caps_visible_prefix() {
        // A mask revealing more than the allowed prefix leaks data even
        // when its shape is otherwise well-formed.
        assert!(!is_valid_masking("Ander***", MaskMode::PrefixReveal(3), None));
        assert!(!is_valid_masking("jane.***@bar.com", MaskMode::PrefixRevealLocal(3), None));

        assert!(is_valid_masking("And*****", MaskMode::PrefixReveal(3), None));
        assert!(is_valid_masking("Lee*", MaskMode::PrefixReveal(3), None));
        assert!(is_valid_masking("jan***@bar.com", MaskMode::PrefixRevealLocal(3), None));
    }

    #[test]
    fn test_phone_mask_tolerates_interspersed_formatting() {
        assert!(is_valid_masking(
            "081-234-****",
            MaskMode::PrefixRevealDigits(6),
            Some("0812345678")
        ));
        // More than six visible digits is a policy violation.
        assert!(!is_valid_masking(
            "0812345***",
            MaskMode::PrefixRevealDigits(6),
            None
        ));
    }

    #[test]
    fn test_plain_date_rejects_future_year() {
        assert!(plain_date_ok("15/01/2024"));
        assert!(!plain_date_ok("15/01/2999"));
        assert!(!plain_date_ok("31/02/2024"));
        assert!(!plain_date_ok("2024-01-15"));
    }

    #[test]
    fn test_masked_field_round_trip() {
        let field = MaskedField::with_raw(MaskMode::PrefixReveal(3), "And*****", "Anderson");
        assert!(field.is_valid());
        assert_eq!(field.visible_prefix(), "And");
    }
}
