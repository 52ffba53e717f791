//! Area-weighted runoff estimate for the parcel.
//!
//! The estimate blends every class coefficient by its area share and scales the result
//! by the storm and site constants of a [`HydrologyConfig`]:
//!
//! ```text
//! weighted_coefficient = Σ coefficient_i * area_percent_i / 100
//! runoff_depth         = design_rainfall_in * rainfall_factor * weighted_coefficient
//! volume               = runoff_depth / 12 * site_area_sqft * volume_factor
//! ```
pub mod config;

use tracing::debug;

pub use config::HydrologyConfig;

use crate::error::Result;
use crate::settings::SettingsModel;

/// Breakdown of a runoff estimate.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunoffReport {
    /// Area-weighted runoff coefficient.
    pub weighted_coefficient: f64,
    /// Runoff depth in inches.
    pub runoff_depth_in: f64,
    /// Unrounded volume.
    pub volume: f64,
}

impl RunoffReport {
    /// The volume truncated to an integer for display.
    pub fn reported_volume(&self) -> u64 {
        self.volume as u64
    }
}

/// Computes runoff volumes for validated settings.
#[derive(Debug, Clone, Default)]
pub struct RunoffCalculator {
    pub config: HydrologyConfig,
}

impl RunoffCalculator {
    pub fn try_new(config: HydrologyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn new(config: HydrologyConfig) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "hydrology constants must be finite and > 0"
        );
        Self { config }
    }

    /// Area-weighted coefficient. Absent classes contribute nothing.
    pub fn weighted_coefficient(&self, settings: &SettingsModel) -> f64 {
        settings
            .iter()
            .fold(0.0, |acc, (_, c)| acc + c.coefficient * c.area_percent)
            / 100.0
    }

    pub fn report(&self, settings: &SettingsModel) -> RunoffReport {
        let weighted_coefficient = self.weighted_coefficient(settings);
        let runoff_depth_in =
            self.config.design_rainfall_in * self.config.rainfall_factor * weighted_coefficient;
        let volume =
            (runoff_depth_in / 12.0) * self.config.site_area_sqft * self.config.volume_factor;

        debug!(
            classes = settings.len(),
            weighted_coefficient, runoff_depth_in, volume, "estimated runoff"
        );

        RunoffReport {
            weighted_coefficient,
            runoff_depth_in,
            volume,
        }
    }

    /// Runoff volume for the settings. Never fails; empty settings estimate zero.
    pub fn estimate(&self, settings: &SettingsModel) -> f64 {
        self.report(settings).volume
    }
}

/// Estimate with the default [`HydrologyConfig`].
pub fn estimate(settings: &SettingsModel) -> f64 {
    RunoffCalculator::default().estimate(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landuse::LandUseClass;
    use crate::settings::RawSettings;

    fn scenario_a() -> SettingsModel {
        let raw: RawSettings = [
            ("c1", 0.3),
            ("c1_area_p", 0.0),
            ("c2", 0.9),
            ("c2_area_p", 20.0),
            ("c3", 0.1),
            ("c3_area_p", 10.0),
            ("c4", 0.5),
            ("c4_area_p", 25.0),
            ("c5", 0.15),
            ("c5_area_p", 30.0),
            ("c6", 0.75),
            ("c6_area_p", 15.0),
        ]
        .into_iter()
        .collect();
        SettingsModel::from_raw(&raw)
    }

    #[test]
    fn reference_parcel_volume() {
        let report = RunoffCalculator::default().report(&scenario_a());
        assert!((report.weighted_coefficient - 0.4725).abs() < 1e-12);
        assert!((report.runoff_depth_in - 16.525215).abs() < 1e-9);
        assert_eq!(report.reported_volume(), 1_009_470);
    }

    #[test]
    fn empty_settings_estimate_zero() {
        assert_eq!(estimate(&SettingsModel::empty()), 0.0);
    }

    #[test]
    fn zero_coefficients_estimate_zero() {
        let settings = LandUseClass::ALL
            .into_iter()
            .fold(SettingsModel::defaults(), |s, c| {
                s.with_class(c, 0.0, c.default_area_percent())
            });
        assert_eq!(estimate(&settings), 0.0);
    }

    #[test]
    fn estimate_is_linear_in_each_coefficient() {
        let calc = RunoffCalculator::default();
        for class in LandUseClass::ALL {
            let at = |v: f64| {
                calc.estimate(&scenario_a().with_class(class, v, class.default_area_percent()))
            };
            let (v0, v1, v2) = (at(0.0), at(0.4), at(0.8));
            assert!(((v1 - v0) - (v2 - v1)).abs() < 1e-6, "class {class}");
        }
    }

    #[test]
    fn non_numeric_coefficient_matches_zero() {
        let text = RawSettings::new().with("c2", "oops");
        let zero = RawSettings::new().with("c2", 0.0);
        assert_eq!(
            estimate(&SettingsModel::from_raw(&text)),
            estimate(&SettingsModel::from_raw(&zero))
        );
    }

    #[test]
    fn config_scales_volume() {
        let doubled = RunoffCalculator::try_new(
            HydrologyConfig::new().with_site_area_sqft(2.0 * config::DEFAULT_SITE_AREA_SQFT),
        )
        .unwrap();
        let base = estimate(&scenario_a());
        assert!((doubled.estimate(&scenario_a()) - 2.0 * base).abs() < 1e-6);
    }

    #[test]
    fn try_new_rejects_invalid_config() {
        let config = HydrologyConfig::new().with_volume_factor(-1.0);
        assert!(RunoffCalculator::try_new(config).is_err());
    }
}
