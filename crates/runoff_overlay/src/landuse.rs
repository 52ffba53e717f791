//! The fixed set of land-use classes and their reference defaults.
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A land-use class of the parcel, identified in payloads and overlays as `c1`..`c6`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LandUseClass {
    C1,
    C2,
    C3,
    C4,
    C5,
    C6,
}

impl LandUseClass {
    /// All classes in identifier order.
    pub const ALL: [LandUseClass; 6] = [
        LandUseClass::C1,
        LandUseClass::C2,
        LandUseClass::C3,
        LandUseClass::C4,
        LandUseClass::C5,
        LandUseClass::C6,
    ];

    /// Identifier used for the coefficient key and the placemark `class` attribute.
    pub fn id(self) -> &'static str {
        match self {
            LandUseClass::C1 => "c1",
            LandUseClass::C2 => "c2",
            LandUseClass::C3 => "c3",
            LandUseClass::C4 => "c4",
            LandUseClass::C5 => "c5",
            LandUseClass::C6 => "c6",
        }
    }

    /// Key holding the area percentage of this class in a settings payload.
    pub fn area_key(self) -> &'static str {
        match self {
            LandUseClass::C1 => "c1_area_p",
            LandUseClass::C2 => "c2_area_p",
            LandUseClass::C3 => "c3_area_p",
            LandUseClass::C4 => "c4_area_p",
            LandUseClass::C5 => "c5_area_p",
            LandUseClass::C6 => "c6_area_p",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.id() == id)
    }

    /// Runoff coefficient used when none was supplied.
    pub fn default_coefficient(self) -> f64 {
        match self {
            LandUseClass::C1 => 0.3,
            LandUseClass::C2 => 0.9,
            LandUseClass::C3 => 0.1,
            LandUseClass::C4 => 0.5,
            LandUseClass::C5 => 0.15,
            LandUseClass::C6 => 0.75,
        }
    }

    /// Share of the parcel (0-100) under the default allocation. Sums to 100 over [`Self::ALL`].
    pub fn default_area_percent(self) -> f64 {
        match self {
            LandUseClass::C1 => 0.0,
            LandUseClass::C2 => 20.0,
            LandUseClass::C3 => 10.0,
            LandUseClass::C4 => 25.0,
            LandUseClass::C5 => 30.0,
            LandUseClass::C6 => 15.0,
        }
    }
}

impl fmt::Display for LandUseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for LandUseClass {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| format!("unknown land-use class '{s}'").into())
    }
}
