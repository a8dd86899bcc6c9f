//! Named numeric parameters with documented defaults
//!
//! Every cost mode reads its configuration from a flat set of named values
//! (a form, a `key=value` command line, a config file). Each field is
//! described once by a [`FieldSpec`]; parsing and sanitising go through the
//! same two functions so that a blank, malformed, negative or non-finite
//! value always lands on the field's default.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// How a field treats an explicit zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroPolicy {
    /// Zero is a real answer (e.g. no overhead, no heat treatment)
    Allowed,
    /// Zero is degenerate and means "not set" (e.g. density, bed size)
    MeansUnset,
}

/// Description of one numeric configuration field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub default: f64,
    pub zero: ZeroPolicy,
}

impl FieldSpec {
    pub const fn new(key: &'static str, default: f64, zero: ZeroPolicy) -> Self {
        Self { key, default, zero }
    }

    /// Shorthand for a field where zero is meaningful
    pub const fn zero_ok(key: &'static str, default: f64) -> Self {
        Self::new(key, default, ZeroPolicy::Allowed)
    }

    /// Shorthand for a field where zero falls back to the default
    pub const fn nonzero(key: &'static str, default: f64) -> Self {
        Self::new(key, default, ZeroPolicy::MeansUnset)
    }

    /// Whether `value` is inside the field's valid domain
    pub fn accepts(&self, value: f64) -> bool {
        if !value.is_finite() || value < 0.0 {
            return false;
        }
        !(value == 0.0 && self.zero == ZeroPolicy::MeansUnset)
    }

    /// Replace an out-of-domain value with the default
    pub fn sanitize(&self, value: f64) -> f64 {
        if self.accepts(value) {
            value
        } else {
            debug!(
                field = self.key,
                supplied = value,
                applied = self.default,
                "parameter fallback"
            );
            self.default
        }
    }

    /// Parse a raw textual value, falling back to the default
    pub fn parse(&self, raw: Option<&str>) -> f64 {
        match parse_number(raw) {
            Some(value) => self.sanitize(value),
            None => {
                if raw.is_some_and(|r| !r.trim().is_empty()) {
                    debug!(field = self.key, raw = ?raw, "unparseable parameter, using default");
                }
                self.default
            }
        }
    }
}

/// Strictly parse a trimmed decimal number
///
/// Unlike permissive prefix parsing, trailing garbage makes the whole value
/// invalid. Returns `None` for blank input.
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parse a count with a lower bound
///
/// Fractional input is truncated toward zero. Values below `min`, blanks
/// and garbage become `default` (which is itself clamped to `min`).
pub fn parse_count(raw: Option<&str>, default: u32, min: u32) -> u32 {
    let default = default.max(min);
    match parse_number(raw) {
        Some(v) if v.is_finite() && v.trunc() >= f64::from(min) => {
            if v >= f64::from(u32::MAX) {
                u32::MAX
            } else {
                v.trunc() as u32
            }
        }
        _ => default,
    }
}

/// Clamp a signed quantity to at least one
pub fn clamp_quantity(quantity: i64) -> u32 {
    quantity.clamp(1, i64::from(u32::MAX)) as u32
}

/// A flat set of named raw parameter values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSet {
    values: BTreeMap<String, String>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Parsed value of a field, or its default
    pub fn number(&self, spec: &FieldSpec) -> f64 {
        spec.parse(self.get(spec.key))
    }

    /// Parsed percentage field converted to a fraction
    pub fn percent(&self, spec: &FieldSpec) -> f64 {
        self.number(spec) / 100.0
    }

    /// Parsed count field, or its default
    pub fn count(&self, key: &str, default: u32, min: u32) -> u32 {
        parse_count(self.get(key), default, min)
    }

    /// Parse `key=value` pairs; entries without `=` are ignored
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for pair in pairs {
            if let Some((key, value)) = pair.as_ref().split_once('=') {
                set.insert(key.trim(), value.trim());
            }
        }
        set
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Store a number under `key`
    pub fn set_number(&mut self, key: &str, value: f64) {
        self.insert(key, value.to_string());
    }

    /// Overlay `other` on top of this set; its values win
    pub fn merge(&mut self, other: &ParameterSet) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DENSITY: FieldSpec = FieldSpec::nonzero("density", 4.43);
    const OVERHEAD: FieldSpec = FieldSpec::zero_ok("overhead", 100.0);

    #[test]
    fn test_invalid_values_fall_back() {
        for raw in ["abc", "-3", "NaN", "inf", "-inf", "", "   ", "12abc"] {
            assert_eq!(DENSITY.parse(Some(raw)), 4.43, "raw = {raw:?}");
            assert_eq!(OVERHEAD.parse(Some(raw)), 100.0, "raw = {raw:?}");
        }
        assert_eq!(DENSITY.parse(None), 4.43);
    }

    #[test]
    fn test_zero_policy() {
        assert_eq!(DENSITY.parse(Some("0")), 4.43);
        assert_eq!(OVERHEAD.parse(Some("0")), 0.0);
        assert_eq!(OVERHEAD.parse(Some(" 0.0 ")), 0.0);
    }

    #[test]
    fn test_valid_values_kept() {
        assert_eq!(DENSITY.parse(Some("8.0")), 8.0);
        assert_eq!(DENSITY.parse(Some("1e1")), 10.0);
        assert_eq!(OVERHEAD.sanitize(250.5), 250.5);
        assert_eq!(OVERHEAD.sanitize(f64::NAN), 100.0);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(Some("5"), 1, 1), 5);
        assert_eq!(parse_count(Some("2.9"), 1, 1), 2);
        assert_eq!(parse_count(Some("0"), 1, 1), 1);
        assert_eq!(parse_count(Some("-4"), 3, 1), 3);
        assert_eq!(parse_count(Some("x"), 2, 0), 2);
        assert_eq!(parse_count(None, 0, 1), 1);
    }

    #[test]
    fn test_clamp_quantity() {
        assert_eq!(clamp_quantity(-10), 1);
        assert_eq!(clamp_quantity(0), 1);
        assert_eq!(clamp_quantity(7), 7);
    }

    #[test]
    fn test_parameter_set_from_pairs() {
        let set = ParameterSet::from_pairs(["density=8.0", "broken", " margin_percent = 25 "]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("density"), Some("8.0"));
        assert_eq!(set.get("margin_percent"), Some("25"));

        let margin = FieldSpec::zero_ok("margin_percent", 20.0);
        assert_eq!(set.percent(&margin), 0.25);
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = ParameterSet::new().with("a", "1").with("b", "2");
        let mut top = ParameterSet::new().with("b", "3");
        top.set_number("c", 0.5);
        base.merge(&top);
        assert_eq!(base.get("a"), Some("1"));
        assert_eq!(base.get("b"), Some("3"));
        assert_eq!(base.get("c"), Some("0.5"));
    }
}
