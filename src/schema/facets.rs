//! XSD constraining facets
//!
//! Facets constrain simple-type restrictions. Each facet knows how to check
//! a lexical value; the compiler and the simple-type model apply them in
//! declared order and stop at the first violation.

use crate::error::{Error, InvalidSchema, Result};
use regex::Regex;
use rust_decimal::Decimal;

/// White space handling modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhiteSpace {
    /// Preserve all white space
    Preserve,
    /// Replace tabs and newlines with spaces
    Replace,
    /// Replace, then collapse runs and trim
    Collapse,
}

impl WhiteSpace {
    /// Parse from the facet value
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "preserve" => Ok(WhiteSpace::Preserve),
            "replace" => Ok(WhiteSpace::Replace),
            "collapse" => Ok(WhiteSpace::Collapse),
            _ => Err(Error::Value(format!(
                "Invalid whiteSpace value: '{}'. Must be 'preserve', 'replace', or 'collapse'",
                s
            ))),
        }
    }

    /// Normalize a string according to this mode
    pub fn normalize(&self, s: &str) -> String {
        match self {
            WhiteSpace::Preserve => s.to_string(),
            WhiteSpace::Replace => s.replace(['\t', '\n', '\r'], " "),
            WhiteSpace::Collapse => {
                let replaced = s.replace(['\t', '\n', '\r'], " ");
                replaced.split_whitespace().collect::<Vec<_>>().join(" ")
            }
        }
    }
}

/// A single constraining facet
#[derive(Debug, Clone)]
pub enum Facet {
    /// Exact length of the value
    Length(u32),
    /// Minimum length
    MinLength(u32),
    /// Maximum length
    MaxLength(u32),
    /// Regular expression the whole value must match
    Pattern(String),
    /// The value must be one of these literals
    Enumeration(Vec<String>),
    /// Inclusive lower bound
    MinInclusive(Decimal),
    /// Inclusive upper bound
    MaxInclusive(Decimal),
    /// Exclusive lower bound
    MinExclusive(Decimal),
    /// Exclusive upper bound
    MaxExclusive(Decimal),
    /// Maximum number of total digits
    TotalDigits(u32),
    /// Maximum number of fraction digits
    FractionDigits(u32),
    /// White space normalization mode
    WhiteSpace(WhiteSpace),
}

impl Facet {
    /// Facet tag name as it appears in schema documents
    pub fn tag(&self) -> &'static str {
        match self {
            Facet::Length(_) => "length",
            Facet::MinLength(_) => "minLength",
            Facet::MaxLength(_) => "maxLength",
            Facet::Pattern(_) => "pattern",
            Facet::Enumeration(_) => "enumeration",
            Facet::MinInclusive(_) => "minInclusive",
            Facet::MaxInclusive(_) => "maxInclusive",
            Facet::MinExclusive(_) => "minExclusive",
            Facet::MaxExclusive(_) => "maxExclusive",
            Facet::TotalDigits(_) => "totalDigits",
            Facet::FractionDigits(_) => "fractionDigits",
            Facet::WhiteSpace(_) => "whiteSpace",
        }
    }

    /// Check a lexical value against this facet
    pub fn check(&self, value: &str) -> Result<()> {
        match self {
            Facet::Length(len) => {
                let count = value.chars().count() as u32;
                if count != *len {
                    return Err(Error::Value(format!(
                        "value '{}' has length {}, expected {}",
                        value, count, len
                    )));
                }
            }
            Facet::MinLength(min) => {
                if (value.chars().count() as u32) < *min {
                    return Err(Error::Value(format!(
                        "value '{}' is shorter than minLength {}",
                        value, min
                    )));
                }
            }
            Facet::MaxLength(max) => {
                if (value.chars().count() as u32) > *max {
                    return Err(Error::Value(format!(
                        "value '{}' is longer than maxLength {}",
                        value, max
                    )));
                }
            }
            Facet::Pattern(pattern) => {
                let anchored = format!("^(?:{})$", pattern);
                let regex = Regex::new(&anchored)
                    .map_err(|e| Error::Value(format!("invalid pattern facet: {}", e)))?;
                if !regex.is_match(value) {
                    return Err(Error::Value(format!(
                        "value '{}' does not match pattern '{}'",
                        value, pattern
                    )));
                }
            }
            Facet::Enumeration(literals) => {
                if !literals.iter().any(|l| l == value) {
                    return Err(Error::Value(format!(
                        "value '{}' is not one of the enumerated values",
                        value
                    )));
                }
            }
            Facet::MinInclusive(bound) => {
                if decimal_value(value)? < *bound {
                    return Err(Error::Value(format!(
                        "value '{}' is below minInclusive {}",
                        value, bound
                    )));
                }
            }
            Facet::MaxInclusive(bound) => {
                if decimal_value(value)? > *bound {
                    return Err(Error::Value(format!(
                        "value '{}' is above maxInclusive {}",
                        value, bound
                    )));
                }
            }
            Facet::MinExclusive(bound) => {
                if decimal_value(value)? <= *bound {
                    return Err(Error::Value(format!(
                        "value '{}' is not above minExclusive {}",
                        value, bound
                    )));
                }
            }
            Facet::MaxExclusive(bound) => {
                if decimal_value(value)? >= *bound {
                    return Err(Error::Value(format!(
                        "value '{}' is not below maxExclusive {}",
                        value, bound
                    )));
                }
            }
            Facet::TotalDigits(max) => {
                let digits = value.chars().filter(|c| c.is_ascii_digit()).count() as u32;
                if digits > *max {
                    return Err(Error::Value(format!(
                        "value '{}' has more than {} total digits",
                        value, max
                    )));
                }
            }
            Facet::FractionDigits(max) => {
                let fraction = value
                    .split_once('.')
                    .map(|(_, f)| f.chars().filter(|c| c.is_ascii_digit()).count() as u32)
                    .unwrap_or(0);
                if fraction > *max {
                    return Err(Error::Value(format!(
                        "value '{}' has more than {} fraction digits",
                        value, max
                    )));
                }
            }
            Facet::WhiteSpace(_) => {
                // normalization mode, not a value constraint
            }
        }
        Ok(())
    }
}

fn decimal_value(value: &str) -> Result<Decimal> {
    value
        .trim()
        .parse::<Decimal>()
        .map_err(|_| Error::Value(format!("value '{}' is not a valid decimal", value)))
}

/// Parse a facet from its tag name and value attribute
///
/// Enumeration facets are collected by the caller since they repeat;
/// this handles the single-valued tags.
pub fn parse_facet(tag: &str, value: &str) -> Result<Facet> {
    let int = |v: &str| -> Result<u32> {
        v.parse::<u32>().map_err(|_| {
            InvalidSchema::new(format!("facet '{}' value '{}' is not a non-negative integer", tag, v))
                .into()
        })
    };
    let dec = |v: &str| -> Result<Decimal> {
        v.parse::<Decimal>().map_err(|_| {
            InvalidSchema::new(format!("facet '{}' value '{}' is not a valid decimal", tag, v))
                .into()
        })
    };

    match tag {
        "length" => Ok(Facet::Length(int(value)?)),
        "minLength" => Ok(Facet::MinLength(int(value)?)),
        "maxLength" => Ok(Facet::MaxLength(int(value)?)),
        "pattern" => Ok(Facet::Pattern(value.to_string())),
        "minInclusive" => Ok(Facet::MinInclusive(dec(value)?)),
        "maxInclusive" => Ok(Facet::MaxInclusive(dec(value)?)),
        "minExclusive" => Ok(Facet::MinExclusive(dec(value)?)),
        "maxExclusive" => Ok(Facet::MaxExclusive(dec(value)?)),
        "totalDigits" => Ok(Facet::TotalDigits(int(value)?)),
        "fractionDigits" => Ok(Facet::FractionDigits(int(value)?)),
        "whiteSpace" => Ok(Facet::WhiteSpace(WhiteSpace::parse(value)?)),
        _ => Err(InvalidSchema::new(format!("unknown facet '{}'", tag)).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusive_bounds() {
        let min = Facet::MinInclusive(Decimal::from(0));
        let max = Facet::MaxInclusive(Decimal::from(100));

        assert!(min.check("0").is_ok());
        assert!(min.check("-1").is_err());
        assert!(max.check("100").is_ok());
        assert!(max.check("101").is_err());
    }

    #[test]
    fn test_exclusive_bounds() {
        let min = Facet::MinExclusive(Decimal::from(0));
        assert!(min.check("1").is_ok());
        assert!(min.check("0").is_err());

        let max = Facet::MaxExclusive(Decimal::from(10));
        assert!(max.check("9").is_ok());
        assert!(max.check("10").is_err());
    }

    #[test]
    fn test_length_facets() {
        assert!(Facet::Length(3).check("abc").is_ok());
        assert!(Facet::Length(3).check("ab").is_err());
        assert!(Facet::MinLength(2).check("ab").is_ok());
        assert!(Facet::MinLength(2).check("a").is_err());
        assert!(Facet::MaxLength(2).check("abc").is_err());
    }

    #[test]
    fn test_pattern_is_anchored() {
        let pattern = Facet::Pattern("[A-Z]{2}".to_string());
        assert!(pattern.check("AB").is_ok());
        assert!(pattern.check("ABC").is_err());
        assert!(pattern.check("xAB").is_err());
    }

    #[test]
    fn test_enumeration() {
        let facet = Facet::Enumeration(vec!["red".to_string(), "green".to_string()]);
        assert!(facet.check("red").is_ok());
        assert!(facet.check("blue").is_err());
    }

    #[test]
    fn test_digit_facets() {
        assert!(Facet::TotalDigits(4).check("12.34").is_ok());
        assert!(Facet::TotalDigits(3).check("12.34").is_err());
        assert!(Facet::FractionDigits(2).check("1.23").is_ok());
        assert!(Facet::FractionDigits(1).check("1.23").is_err());
    }

    #[test]
    fn test_whitespace_normalize() {
        assert_eq!(WhiteSpace::Replace.normalize("a\tb\nc"), "a b c");
        assert_eq!(WhiteSpace::Collapse.normalize("  a \t b  "), "a b");
    }

    #[test]
    fn test_parse_facet() {
        assert!(matches!(
            parse_facet("minInclusive", "0").unwrap(),
            Facet::MinInclusive(_)
        ));
        assert!(parse_facet("minInclusive", "zero").is_err());
        assert!(parse_facet("bogus", "1").is_err());
    }

    #[test]
    fn test_non_numeric_value_for_bound() {
        let min = Facet::MinInclusive(Decimal::from(0));
        assert!(min.check("abc").is_err());
    }
}
