//! Site and storm constants used by the runoff estimate.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_RAINFALL_FACTOR: f64 = 0.9;
pub const DEFAULT_DESIGN_RAINFALL_IN: f64 = 38.86;
pub const DEFAULT_SITE_AREA_SQFT: f64 = 98_000.0;
pub const DEFAULT_VOLUME_FACTOR: f64 = 7.48;

/// Configuration for a [`crate::hydrology::RunoffCalculator`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct HydrologyConfig {
    /// Site adjustment applied to the design rainfall.
    pub rainfall_factor: f64,
    /// Design storm depth in inches.
    pub design_rainfall_in: f64,
    /// Parcel area in square feet.
    pub site_area_sqft: f64,
    /// Multiplier applied to the cubic-foot volume (7.48 gallons per cubic foot).
    pub volume_factor: f64,
}

impl Default for HydrologyConfig {
    fn default() -> Self {
        Self {
            rainfall_factor: DEFAULT_RAINFALL_FACTOR,
            design_rainfall_in: DEFAULT_DESIGN_RAINFALL_IN,
            site_area_sqft: DEFAULT_SITE_AREA_SQFT,
            volume_factor: DEFAULT_VOLUME_FACTOR,
        }
    }
}

impl HydrologyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the site adjustment factor.
    pub fn with_rainfall_factor(mut self, rainfall_factor: f64) -> Self {
        self.rainfall_factor = rainfall_factor;
        self
    }

    /// Sets the design storm depth in inches.
    pub fn with_design_rainfall_in(mut self, design_rainfall_in: f64) -> Self {
        self.design_rainfall_in = design_rainfall_in;
        self
    }

    /// Sets the parcel area in square feet.
    pub fn with_site_area_sqft(mut self, site_area_sqft: f64) -> Self {
        self.site_area_sqft = site_area_sqft;
        self
    }

    pub fn with_volume_factor(mut self, volume_factor: f64) -> Self {
        self.volume_factor = volume_factor;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("rainfall_factor", self.rainfall_factor),
            ("design_rainfall_in", self.design_rainfall_in),
            ("site_area_sqft", self.site_area_sqft),
            ("volume_factor", self.volume_factor),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(HydrologyConfig::default().validate().is_ok());
    }

    #[test]
    fn builder_sets_fields() {
        let config = HydrologyConfig::new()
            .with_rainfall_factor(1.0)
            .with_design_rainfall_in(12.0)
            .with_site_area_sqft(1_000.0)
            .with_volume_factor(1.0);
        assert_eq!(config.rainfall_factor, 1.0);
        assert_eq!(config.design_rainfall_in, 12.0);
        assert_eq!(config.site_area_sqft, 1_000.0);
        assert_eq!(config.volume_factor, 1.0);
    }

    #[test]
    fn validate_rejects_non_positive_and_non_finite() {
        let err = HydrologyConfig::new()
            .with_site_area_sqft(0.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(ref msg) if msg.contains("site_area_sqft")));

        assert!(HydrologyConfig::new()
            .with_design_rainfall_in(f64::NAN)
            .validate()
            .is_err());
    }
}
