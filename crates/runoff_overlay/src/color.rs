//! Coefficient to overlay color mapping.
//!
//! The coefficient domain is split at `0.5` into two linear ramps. The low band ramps
//! the last byte of `ff00ff??` up towards saturation, the high band ramps the third byte
//! of `ff00??ff` back down, so both bands meet near full intensity at the midpoint.
//! The two formulas are kept exactly as-is; they are not forced to agree at `0.5`.
use std::fmt;

/// Coefficients below this value fall in [`ColorBand::Low`].
pub const BAND_SPLIT: f64 = 0.5;

/// Half of the coefficient domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorBand {
    Low,
    High,
}

impl ColorBand {
    /// KML color text (`aabbggrr`) with `intensity` in the band's live channel.
    pub fn color_text(self, intensity: u8) -> String {
        match self {
            ColorBand::Low => format!("ff00ff{intensity:02x}"),
            ColorBand::High => format!("ff00{intensity:02x}ff"),
        }
    }
}

impl fmt::Display for ColorBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColorBand::Low => "low",
            ColorBand::High => "high",
        })
    }
}

/// Band and 8-bit intensity for one coefficient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelValue {
    pub band: ColorBand,
    pub intensity: u8,
}

impl ChannelValue {
    pub fn color_text(&self) -> String {
        self.band.color_text(self.intensity)
    }
}

/// Map a coefficient in `[0, 1]` to its band and intensity. NaN maps like `0`.
pub fn channel(value: f64) -> ChannelValue {
    let value = if value.is_nan() { 0.0 } else { value };
    let (band, raw) = if value < BAND_SPLIT {
        (ColorBand::Low, 256.0 * (value * 2.0))
    } else {
        (ColorBand::High, 256.0 * (1.0 - (value - BAND_SPLIT) * 2.0))
    };

    ChannelValue {
        band,
        intensity: raw.clamp(0.0, 255.0) as u8,
    }
}

/// Color text for a coefficient.
pub fn color_for(value: f64) -> String {
    channel(value).color_text()
}
