//! Transfer amount parsing
//!
//! The amount field is free text until submission. At the submission boundary
//! it becomes a [`ParsedAmount`]: either a number or a malformed input carried
//! as data. A malformed amount still has a float reading, taken from its
//! longest numeric prefix (`"12abc"` reads as 12). Malformed amounts are not rejected here; whether the gate
//! refuses them is decided by [`AmountPolicy`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Why an amount string could not be read as a number
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount '{0}' is not a number")]
    NotANumber(String),
    #[error("amount '{0}' is not finite")]
    NotFinite(String),
    #[error("amount '{0}' is negative")]
    Negative(String),
    #[error("amount '{text}' has more than {decimals} fractional digits")]
    TooPrecise { text: String, decimals: u8 },
    #[error("amount '{0}' overflows token units")]
    Overflow(String),
}

/// Amount text after parsing at the submission boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParsedAmount {
    /// `text` is the trimmed input, kept for exact base-unit conversion
    Valid { value: f64, text: String },
    Malformed { text: String, error: AmountError },
}

impl ParsedAmount {
    /// Parse decimal text. Surrounding whitespace is ignored; no bounds or
    /// sign check is applied.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return ParsedAmount::Malformed {
                text: text.to_string(),
                error: AmountError::Empty,
            };
        }
        // f64::from_str accepts "inf" and "NaN"; both are malformed here
        match f64::from_str(trimmed) {
            Ok(value) if value.is_finite() => ParsedAmount::Valid {
                value,
                text: trimmed.to_string(),
            },
            Ok(_) => ParsedAmount::Malformed {
                text: text.to_string(),
                error: AmountError::NotFinite(trimmed.to_string()),
            },
            Err(_) => ParsedAmount::Malformed {
                text: text.to_string(),
                error: AmountError::NotANumber(trimmed.to_string()),
            },
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ParsedAmount::Valid { .. })
    }

    /// The float handed to the transfer operation. Malformed input reads as
    /// its longest numeric prefix, so `"1,000"` is 1, `"Infinity"` is
    /// infinite and `"abc"` is NaN.
    pub fn as_f64(&self) -> f64 {
        match self {
            ParsedAmount::Valid { value, .. } => *value,
            ParsedAmount::Malformed { text, .. } => leading_float(text),
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            ParsedAmount::Valid { value, .. } => Some(*value),
            ParsedAmount::Malformed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&AmountError> {
        match self {
            ParsedAmount::Valid { .. } => None,
            ParsedAmount::Malformed { error, .. } => Some(error),
        }
    }

    /// Amount text as typed, trimmed when valid
    pub fn text(&self) -> &str {
        match self {
            ParsedAmount::Valid { text, .. } | ParsedAmount::Malformed { text, .. } => text,
        }
    }
}

/// Float reading of the longest numeric prefix of `text`, NaN when there is
/// none. Exponents count only when followed by a digit; the only spelled-out
/// value is `Infinity`.
fn leading_float(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let whole = digits_from(end);
    end += whole;
    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        if whole > 0 || fraction > 0 {
            end += 1 + fraction;
        }
    }
    if whole == 0 && fraction == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_digits = digits_from(exponent);
        if exponent_digits > 0 {
            end = exponent + exponent_digits;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

impl fmt::Display for ParsedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedAmount::Valid { value, .. } => write!(f, "{}", value),
            ParsedAmount::Malformed { text, .. } => write!(f, "<malformed: {:?}>", text),
        }
    }
}

/// What the submission gate does with malformed amount text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmountPolicy {
    /// Forward malformed amounts to the transfer operation as data
    #[default]
    PassThrough,
    /// Refuse submission when the amount is malformed
    Reject,
}

impl FromStr for AmountPolicy {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pass-through" | "passthrough" => Ok(AmountPolicy::PassThrough),
            "reject" => Ok(AmountPolicy::Reject),
            other => Err(eyre::eyre!(
                "Invalid amount policy '{}': expected pass-through or reject",
                other
            )),
        }
    }
}

/// Convert human-readable decimal text to raw token units without going
/// through floating point (e.g. `"12.5"` with 6 decimals is `12_500_000`).
pub fn to_base_units(text: &str, decimals: u8) -> Result<u128, AmountError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(AmountError::Negative(trimmed.to_string()));
    }
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(AmountError::NotANumber(trimmed.to_string()));
    }
    if fraction.len() > decimals as usize {
        return Err(AmountError::TooPrecise {
            text: trimmed.to_string(),
            decimals,
        });
    }

    let overflow = || AmountError::Overflow(trimmed.to_string());
    let scale = 10u128.checked_pow(decimals as u32).ok_or_else(overflow)?;
    let whole_units = if whole.is_empty() {
        0
    } else {
        whole.parse::<u128>().map_err(|_| overflow())?
    };
    let fraction_units = if fraction.is_empty() {
        0
    } else {
        let pad = 10u128.pow((decimals as usize - fraction.len()) as u32);
        fraction.parse::<u128>().map_err(|_| overflow())? * pad
    };

    whole_units
        .checked_mul(scale)
        .and_then(|w| w.checked_add(fraction_units))
        .ok_or_else(overflow)
}

/// Convert raw token units back to a display string, trimming trailing zeros
pub fn from_base_units(raw: u128, decimals: u8) -> Result<String, AmountError> {
    if decimals == 0 {
        return Ok(raw.to_string());
    }
    let scale = 10u128
        .checked_pow(decimals as u32)
        .ok_or_else(|| AmountError::Overflow(raw.to_string()))?;
    let whole = raw / scale;
    let fraction = raw % scale;
    if fraction == 0 {
        return Ok(whole.to_string());
    }
    let fraction = format!("{:0width$}", fraction, width = decimals as usize);
    Ok(format!("{}.{}", whole, fraction.trim_end_matches('0')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_amount() {
        assert_eq!(
            ParsedAmount::parse(" 12.5 "),
            ParsedAmount::Valid {
                value: 12.5,
                text: "12.5".to_string()
            }
        );
        assert_eq!(ParsedAmount::parse(" 5 ").as_f64(), 5.0);
    }

    #[test]
    fn test_parse_applies_no_bounds() {
        assert_eq!(ParsedAmount::parse("-3").value(), Some(-3.0));
        assert_eq!(ParsedAmount::parse("0").value(), Some(0.0));
    }

    #[test]
    fn test_parse_malformed_is_nan() {
        let parsed = ParsedAmount::parse("abc");
        assert!(!parsed.is_valid());
        assert!(parsed.as_f64().is_nan());
        assert_eq!(
            parsed.error(),
            Some(&AmountError::NotANumber("abc".to_string()))
        );
    }

    #[test]
    fn test_malformed_reads_numeric_prefix() {
        let parsed = ParsedAmount::parse("12abc");
        assert!(!parsed.is_valid());
        assert_eq!(parsed.text(), "12abc");
        assert_eq!(parsed.as_f64(), 12.0);

        assert_eq!(ParsedAmount::parse("1,000").as_f64(), 1.0);
        assert_eq!(ParsedAmount::parse("5px").as_f64(), 5.0);
        assert_eq!(ParsedAmount::parse("2.5e3x").as_f64(), 2500.0);
        assert_eq!(ParsedAmount::parse("7e").as_f64(), 7.0);
        assert_eq!(ParsedAmount::parse("-.5.5").as_f64(), -0.5);
        assert!(ParsedAmount::parse(".x").as_f64().is_nan());
        assert!(ParsedAmount::parse("inf").as_f64().is_nan());
        assert!(ParsedAmount::parse("NaN").as_f64().is_nan());
    }

    #[test]
    fn test_infinity_is_malformed_but_infinite() {
        let parsed = ParsedAmount::parse("Infinity");
        assert!(matches!(parsed.error(), Some(AmountError::NotFinite(_))));
        assert_eq!(parsed.as_f64(), f64::INFINITY);
        assert_eq!(ParsedAmount::parse("-Infinity").as_f64(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_valid_text_converts_without_float_loss() {
        let parsed = ParsedAmount::parse("9007199254740993");
        assert!(parsed.is_valid());
        assert_eq!(to_base_units(parsed.text(), 0), Ok(9_007_199_254_740_993));
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert!(matches!(
            ParsedAmount::parse("inf").error(),
            Some(AmountError::NotFinite(_))
        ));
        assert!(matches!(
            ParsedAmount::parse("NaN").error(),
            Some(AmountError::NotFinite(_))
        ));
    }

    #[test]
    fn test_parse_whitespace_only() {
        assert_eq!(ParsedAmount::parse("   ").error(), Some(&AmountError::Empty));
    }

    #[test]
    fn test_amount_policy_from_str() {
        assert_eq!("reject".parse::<AmountPolicy>().unwrap(), AmountPolicy::Reject);
        assert_eq!(
            "Pass-Through".parse::<AmountPolicy>().unwrap(),
            AmountPolicy::PassThrough
        );
        assert!("strict".parse::<AmountPolicy>().is_err());
    }

    #[test]
    fn test_to_base_units_usdc() {
        assert_eq!(to_base_units("12.5", 6), Ok(12_500_000));
        assert_eq!(to_base_units("100", 6), Ok(100_000_000));
        assert_eq!(to_base_units(".5", 6), Ok(500_000));
        assert_eq!(to_base_units("0.000001", 6), Ok(1));
    }

    #[test]
    fn test_to_base_units_rejects_bad_input() {
        assert_eq!(to_base_units("", 6), Err(AmountError::Empty));
        assert!(matches!(to_base_units("-1", 6), Err(AmountError::Negative(_))));
        assert!(matches!(to_base_units("1.2.3", 6), Err(AmountError::NotANumber(_))));
        assert!(matches!(to_base_units(".", 6), Err(AmountError::NotANumber(_))));
        assert!(matches!(
            to_base_units("0.0000001", 6),
            Err(AmountError::TooPrecise { decimals: 6, .. })
        ));
        assert!(matches!(
            to_base_units("340282366920938463463374607431768211455", 6),
            Err(AmountError::Overflow(_))
        ));
    }

    #[test]
    fn test_from_base_units() {
        assert_eq!(from_base_units(12_500_000, 6).unwrap(), "12.5");
        assert_eq!(from_base_units(100_000_000, 6).unwrap(), "100");
        assert_eq!(from_base_units(1, 6).unwrap(), "0.000001");
        assert_eq!(from_base_units(42, 0).unwrap(), "42");
    }

    #[test]
    fn test_from_base_units_rejects_oversized_decimals() {
        assert!(from_base_units(1, 38).is_ok());
        assert_eq!(
            from_base_units(1, 39),
            Err(AmountError::Overflow("1".to_string()))
        );
    }
}
