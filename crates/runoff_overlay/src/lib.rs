#![forbid(unsafe_code)]
//! runoff_overlay: Stormwater runoff estimation and KML overlay recoloring.
//!
//! Modules:
//! - landuse: the fixed set of land-use classes and their reference defaults
//! - settings: validated per-class coefficients and area weights built from untyped payloads
//! - hydrology: area-weighted runoff volume for a parcel
//! - color: coefficient to overlay color mapping
//! - overlay: structure-preserving recoloring of KML templates, model location lookup
//!
//! Every operation is a pure function of its inputs; nothing is cached between calls.
pub mod color;
pub mod error;
pub mod hydrology;
pub mod landuse;
pub mod overlay;
pub mod settings;

/// Convenient re-exports for common types. Import with `use runoff_overlay::prelude::*;`.
pub mod prelude {
    pub use crate::color::{channel, color_for, ChannelValue, ColorBand};
    pub use crate::error::{Error, Result};
    pub use crate::hydrology::{HydrologyConfig, RunoffCalculator, RunoffReport};
    pub use crate::landuse::LandUseClass;
    pub use crate::overlay::events::{
        EventSink, FnSink, OverlayEvent, SkipReason, TransformSummary, VecSink,
    };
    pub use crate::overlay::location::{model_location, ModelLocation};
    pub use crate::overlay::{
        transform, OverlayDocument, OverlayTransformer, TransformConfig, KML_CONTENT_TYPE,
        KML_NAMESPACE,
    };
    pub use crate::settings::{ClassSettings, RawSettings, RawValue, SettingsModel};
}
