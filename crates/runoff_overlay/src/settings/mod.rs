//! Validated per-class runoff settings.
//!
//! [`SettingsModel`] is built once at the boundary from an untyped [`RawSettings`] payload.
//! Every malformed or out-of-range value is absorbed here:
//! - missing keys take the class defaults from [`LandUseClass`],
//! - values that do not read as a number become `0`,
//! - coefficients are clamped to `[0, 1]` and area percentages to `[0, 100]`.
//!
//! Downstream consumers ([`crate::hydrology`], [`crate::overlay`]) therefore never see
//! invalid values and have no error paths of their own.
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::landuse::LandUseClass;

#[cfg(feature = "json")]
mod json;
mod raw;

pub use raw::{RawSettings, RawValue};

/// Coefficient and area weighting for one land-use class.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassSettings {
    /// Runoff coefficient in `[0, 1]`.
    pub coefficient: f64,
    /// Share of the parcel in `[0, 100]`.
    pub area_percent: f64,
}

impl ClassSettings {
    pub fn defaults_for(class: LandUseClass) -> Self {
        Self {
            coefficient: class.default_coefficient(),
            area_percent: class.default_area_percent(),
        }
    }
}

/// Clamp a raw value into a runoff coefficient. Non-numeric input reads as `0`.
pub fn normalize_coefficient(value: &RawValue) -> f64 {
    value.as_number().unwrap_or(0.0).clamp(0.0, 1.0)
}

/// Clamp a raw value into an area percentage. Non-numeric input reads as `0`.
pub fn normalize_area_percent(value: &RawValue) -> f64 {
    value.as_number().unwrap_or(0.0).clamp(0.0, 100.0)
}

/// Immutable mapping from land-use class to its [`ClassSettings`].
///
/// A model may be empty, in which case runoff estimates are zero and no overlay
/// placemark is recolored. The stored form is the flat payload written by `to_json`,
/// so every model goes through the clamping constructors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsModel {
    classes: BTreeMap<LandUseClass, ClassSettings>,
}

impl SettingsModel {
    /// A model without any class.
    pub fn empty() -> Self {
        Self {
            classes: BTreeMap::new(),
        }
    }

    /// All six classes with their default coefficient and area.
    pub fn defaults() -> Self {
        Self {
            classes: LandUseClass::ALL
                .into_iter()
                .map(|class| (class, ClassSettings::defaults_for(class)))
                .collect(),
        }
    }

    /// Build a complete model from a payload, filling in defaults for missing keys.
    pub fn from_raw(raw: &RawSettings) -> Self {
        let classes = LandUseClass::ALL
            .into_iter()
            .map(|class| {
                let coefficient = read_coefficient(raw, class);
                let area_percent = raw
                    .get(class.area_key())
                    .map_or(class.default_area_percent(), |value| {
                        read_field(class.area_key(), value, normalize_area_percent)
                    });
                (
                    class,
                    ClassSettings {
                        coefficient,
                        area_percent,
                    },
                )
            })
            .collect();
        Self { classes }
    }

    /// Build a model from a payload that may be absent.
    ///
    /// A missing or empty payload only falls back to [`Self::defaults`] when the subject
    /// already has an overlay document; otherwise the model is [`Self::empty`].
    pub fn from_payload(raw: Option<&RawSettings>, has_overlay: bool) -> Self {
        match raw {
            Some(raw) if !raw.is_empty() => Self::from_raw(raw),
            _ if has_overlay => Self::defaults(),
            _ => Self::empty(),
        }
    }

    /// Build a model from a settings form submission.
    ///
    /// Coefficients are read like [`Self::from_raw`] but area percentages always use the
    /// fixed default allocation. Uploading a new overlay resets every coefficient.
    pub fn from_form(form: &RawSettings, overlay_uploaded: bool) -> Self {
        if overlay_uploaded {
            return Self::defaults();
        }

        let classes = LandUseClass::ALL
            .into_iter()
            .map(|class| {
                (
                    class,
                    ClassSettings {
                        coefficient: read_coefficient(form, class),
                        area_percent: class.default_area_percent(),
                    },
                )
            })
            .collect();
        Self { classes }
    }

    /// Set one class, clamping both values into their domains.
    pub fn with_class(mut self, class: LandUseClass, coefficient: f64, area_percent: f64) -> Self {
        let coefficient = normalize_coefficient(&RawValue::Number(coefficient));
        let area_percent = normalize_area_percent(&RawValue::Number(area_percent));
        self.classes.insert(
            class,
            ClassSettings {
                coefficient,
                area_percent,
            },
        );
        self
    }

    pub fn get(&self, class: LandUseClass) -> Option<&ClassSettings> {
        self.classes.get(&class)
    }

    pub fn coefficient(&self, class: LandUseClass) -> Option<f64> {
        self.get(class).map(|c| c.coefficient)
    }

    pub fn area_percent(&self, class: LandUseClass) -> Option<f64> {
        self.get(class).map(|c| c.area_percent)
    }

    pub fn contains(&self, class: LandUseClass) -> bool {
        self.classes.contains_key(&class)
    }

    /// Iterate classes in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (LandUseClass, &ClassSettings)> + '_ {
        self.classes.iter().map(|(class, settings)| (*class, settings))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Sum of all area percentages. Not required to be 100 for edited input.
    pub fn total_area_percent(&self) -> f64 {
        self.classes.values().map(|c| c.area_percent).sum()
    }
}

fn read_coefficient(raw: &RawSettings, class: LandUseClass) -> f64 {
    raw.get(class.id())
        .map_or(class.default_coefficient(), |value| {
            read_field(class.id(), value, normalize_coefficient)
        })
}

fn read_field(key: &str, value: &RawValue, normalize: fn(&RawValue) -> f64) -> f64 {
    if value.as_number().is_none() {
        warn!(key, ?value, "non-numeric settings value, using 0");
    }
    normalize(value)
}
