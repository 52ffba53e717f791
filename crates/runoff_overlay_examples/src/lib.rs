#![forbid(unsafe_code)]

use std::fs;
use std::path::Path;

use anyhow::Context;
use runoff_overlay::prelude::OverlayDocument;
use tracing_subscriber::EnvFilter;

/// Overlay template bundled with the examples.
pub const SAMPLE_TEMPLATE: &str = include_str!("../assets/overlay.kml");

/// Install a formatted tracing subscriber honoring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Load the template at `path`, or the bundled sample when no path is given.
pub fn load_template(path: Option<&str>) -> anyhow::Result<OverlayDocument> {
    match path {
        Some(path) => OverlayDocument::from_path(path)
            .with_context(|| format!("failed to read overlay template {path}")),
        None => Ok(OverlayDocument::from(SAMPLE_TEMPLATE)),
    }
}

/// Read a settings payload from a file, or `None` when no path is given.
pub fn load_payload(path: Option<&str>) -> anyhow::Result<Option<String>> {
    path.map(|path| {
        fs::read_to_string(Path::new(path))
            .with_context(|| format!("failed to read settings payload {path}"))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use runoff_overlay::prelude::*;

    use super::*;

    #[test]
    fn sample_template_recolors_every_class() {
        let template = load_template(None).unwrap();
        let mut sink = VecSink::new();
        OverlayTransformer::default()
            .transform_with_events(&template, &SettingsModel::defaults(), &mut sink)
            .unwrap();

        let recolored = sink
            .as_slice()
            .iter()
            .filter(|e| matches!(e, OverlayEvent::PlacemarkRecolored { .. }))
            .count();
        assert_eq!(recolored, LandUseClass::ALL.len());
    }

    #[test]
    fn sample_template_has_model_location() {
        let template = load_template(None).unwrap();
        let location = model_location(&template).unwrap().unwrap();
        assert_eq!(location.latitude, 37.775);
        assert_eq!(location.longitude, -122.4192);
    }

    #[test]
    fn missing_files_are_reported() {
        assert!(load_template(Some("/no/such/template.kml")).is_err());
        assert!(load_payload(Some("/no/such/settings.json")).is_err());
        assert!(load_payload(None).unwrap().is_none());
    }
}
