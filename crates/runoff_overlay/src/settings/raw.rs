//! Untyped key-value input as it arrives from a form or a stored payload.
use std::collections::HashMap;

/// A single untyped payload value.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Flag(bool),
    Null,
    /// Nested structures and anything else that can never be read as a number.
    Unsupported,
}

impl RawValue {
    /// Reads the value as a real number. `None` for anything non-numeric, including NaN.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(v) => *v,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
            RawValue::Flag(b) => f64::from(u8::from(*b)),
            RawValue::Null | RawValue::Unsupported => return None,
        };
        (!value.is_nan()).then_some(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Flag(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// Flat key-value settings payload. Unknown keys are kept but never read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawSettings {
    values: HashMap<String, RawValue>,
}

impl RawSettings {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Insert a value, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Builder form of [`Self::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawSettings
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_values_parse_with_surrounding_whitespace() {
        assert_eq!(RawValue::from(" 0.25 ").as_number(), Some(0.25));
        assert_eq!(RawValue::from("1e-1").as_number(), Some(0.1));
    }

    #[test]
    fn non_numeric_values_read_as_none() {
        assert_eq!(RawValue::from("abc").as_number(), None);
        assert_eq!(RawValue::from("").as_number(), None);
        assert_eq!(RawValue::from("NaN").as_number(), None);
        assert_eq!(RawValue::Number(f64::NAN).as_number(), None);
        assert_eq!(RawValue::Null.as_number(), None);
        assert_eq!(RawValue::Unsupported.as_number(), None);
    }

    #[test]
    fn flags_read_as_zero_or_one() {
        assert_eq!(RawValue::from(true).as_number(), Some(1.0));
        assert_eq!(RawValue::from(false).as_number(), Some(0.0));
    }

    #[test]
    fn infinity_is_kept_for_clamping() {
        assert_eq!(RawValue::from("inf").as_number(), Some(f64::INFINITY));
    }

    #[test]
    fn collect_and_builder_agree() {
        let collected: RawSettings = [("c1", 0.5), ("c2", 0.25)].into_iter().collect();
        let built = RawSettings::new().with("c1", 0.5).with("c2", 0.25);
        assert_eq!(collected, built);
        assert_eq!(built.len(), 2);
        assert!(RawSettings::new().is_empty());
    }
}
