//! Stored JSON form of the settings payload.
use serde_json::{Map, Value};
use tracing::warn;

use super::{RawSettings, RawValue, SettingsModel};

impl From<&Value> for RawValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map_or(RawValue::Unsupported, RawValue::Number),
            Value::String(s) => RawValue::Text(s.clone()),
            Value::Bool(b) => RawValue::Flag(*b),
            Value::Null => RawValue::Null,
            Value::Array(_) | Value::Object(_) => RawValue::Unsupported,
        }
    }
}

impl RawSettings {
    /// Parse a JSON object into a payload. Anything that is not an object yields `None`.
    pub fn from_json(text: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Some(map.iter().map(|(k, v)| (k.as_str(), v)).collect()),
            Ok(_) => {
                warn!("settings payload is not a JSON object");
                None
            }
            Err(err) => {
                warn!(%err, "settings payload is not valid JSON");
                None
            }
        }
    }
}

impl SettingsModel {
    /// Read a stored payload with the same fallback rules as [`SettingsModel::from_payload`].
    pub fn from_json(text: Option<&str>, has_overlay: bool) -> Self {
        let raw = text.and_then(RawSettings::from_json);
        Self::from_payload(raw.as_ref(), has_overlay)
    }

    /// Flat JSON object with one coefficient key and one area key per class.
    pub fn to_json(&self) -> String {
        let mut map = Map::new();
        for (class, settings) in self.iter() {
            map.insert(class.id().to_owned(), Value::from(settings.coefficient));
        }
        for (class, settings) in self.iter() {
            map.insert(class.area_key().to_owned(), Value::from(settings.area_percent));
        }
        Value::Object(map).to_string()
    }
}
