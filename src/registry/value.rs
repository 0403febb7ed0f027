//! Parameter values and numeric literal scanning
//!
//! Integer and float literals stay distinct so that `ratio=4` and
//! `rate_hz=1.0` are written back exactly as they were read.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Integer literal, e.g. `-20`
    Int(i64),
    /// Decimal or exponent literal, e.g. `0.25`, `1e-3`
    Float(f64),
    /// Enumerated mode constant, e.g. `HPF12`
    Mode(String),
}

impl ParamValue {
    /// Numeric value, if this is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            ParamValue::Mode(_) => None,
        }
    }

    /// Mode constant name, if this is one
    pub fn as_mode(&self) -> Option<&str> {
        match self {
            ParamValue::Mode(m) => Some(m),
            _ => None,
        }
    }

    /// Parse a complete numeric literal; `None` if `text` is anything else
    pub fn parse_number(text: &str) -> Option<ParamValue> {
        if text.is_empty() || scan_number(text.as_bytes(), 0) != Some(text.len()) {
            return None;
        }
        let is_float = text.contains(['.', 'e', 'E']);
        if !is_float {
            if let Ok(v) = text.parse::<i64>() {
                return Some(ParamValue::Int(v));
            }
        }
        text.parse::<f64>().ok().map(ParamValue::Float)
    }
}

/// Scan a numeric literal starting at `start`
///
/// ```text
/// NUMBER ::= [+-]? ( DIGITS ( '.' DIGITS? )? | '.' DIGITS ) ( [eE] [+-]? DIGITS )?
/// ```
///
/// Returns the end offset, or `None` if no literal starts here.
pub(crate) fn scan_number(bytes: &[u8], start: usize) -> Option<usize> {
    let digits = |mut i: usize| {
        let from = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        (i, i > from)
    };

    let mut pos = start;
    if matches!(bytes.get(pos), Some(b'+' | b'-')) {
        pos += 1;
    }

    let (after_int, has_int) = digits(pos);
    pos = after_int;
    let mut has_frac = false;
    if bytes.get(pos) == Some(&b'.') {
        let (after_frac, frac) = digits(pos + 1);
        has_frac = frac;
        pos = after_frac;
    }
    if !has_int && !has_frac {
        return None;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let (after_exp, has_exp) = digits(exp);
        if !has_exp {
            return None;
        }
        pos = after_exp;
    }

    Some(pos)
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            // Debug keeps a trailing ".0" and uses exponents for extremes,
            // both of which `scan_number` reads back
            ParamValue::Float(v) => write!(f, "{:?}", v),
            ParamValue::Mode(m) => f.write_str(m),
        }
    }
}

impl FromStr for ParamValue {
    type Err = String;

    /// Numbers become `Int`/`Float`; a bare identifier becomes `Mode`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(value) = ParamValue::parse_number(s) {
            return Ok(value);
        }
        let is_ident = s.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if is_ident {
            Ok(ParamValue::Mode(s.to_string()))
        } else {
            Err(format!("'{}' is neither a number nor a mode name", s))
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Mode(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("4", ParamValue::Int(4) ; "integer")]
    #[test_case("-20", ParamValue::Int(-20) ; "negative integer")]
    #[test_case("+3", ParamValue::Int(3) ; "explicit plus")]
    #[test_case("1.0", ParamValue::Float(1.0) ; "decimal")]
    #[test_case(".5", ParamValue::Float(0.5) ; "leading dot")]
    #[test_case("2.", ParamValue::Float(2.0) ; "trailing dot")]
    #[test_case("1e-7", ParamValue::Float(1e-7) ; "exponent")]
    #[test_case("-2.5E3", ParamValue::Float(-2500.0) ; "signed exponent")]
    fn test_parse_number(text: &str, expected: ParamValue) {
        assert_eq!(ParamValue::parse_number(text), Some(expected));
    }

    #[test_case("" ; "empty")]
    #[test_case("-" ; "bare sign")]
    #[test_case("." ; "bare dot")]
    #[test_case("1e" ; "dangling exponent")]
    #[test_case("1+2" ; "arithmetic")]
    #[test_case("0x10" ; "hex")]
    #[test_case("inf" ; "infinity")]
    #[test_case("nan" ; "not a number")]
    fn test_parse_number_rejects(text: &str) {
        assert_eq!(ParamValue::parse_number(text), None);
    }

    #[test]
    fn test_huge_integer_falls_back_to_float() {
        let value = ParamValue::parse_number("99999999999999999999").unwrap();
        assert!(matches!(value, ParamValue::Float(_)));
    }

    #[test]
    fn test_display_reads_back() {
        for value in [
            ParamValue::Int(-20),
            ParamValue::Float(1.0),
            ParamValue::Float(-0.25),
            ParamValue::Float(1e-7),
            ParamValue::Float(3.5e21),
        ] {
            let text = value.to_string();
            assert_eq!(ParamValue::parse_number(&text), Some(value), "{}", text);
        }
    }

    #[test]
    fn test_from_str_mode() {
        assert_eq!("HPF12".parse::<ParamValue>().unwrap(), ParamValue::from("HPF12"));
        assert!("rm -rf".parse::<ParamValue>().is_err());
    }
}
