use std::fs;

use anyhow::Context;
use runoff_overlay::prelude::*;
use runoff_overlay_examples::{init_tracing, load_payload, load_template};
use tracing::{info, warn};

/// Usage: overlay-recolor <output.kml> [template.kml] [settings.json]
///
/// Writes the recolored template. The bundled sample template is used when none is given.
fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let output = args
        .next()
        .context("usage: overlay-recolor <output.kml> [template.kml] [settings.json]")?;
    let template_path = args.next();
    let payload_path = args.next();

    let template = load_template(template_path.as_deref())?;
    let payload = load_payload(payload_path.as_deref())?;
    let settings = SettingsModel::from_json(payload.as_deref(), true);

    if let Some(location) = model_location(&template)? {
        info!(
            latitude = location.latitude,
            longitude = location.longitude,
            "model location"
        );
    }

    let mut sink = FnSink::new(|event| match event {
        OverlayEvent::PlacemarkRecolored {
            class,
            coefficient,
            channel,
            color,
            ..
        } => info!(
            %class,
            coefficient,
            band = %channel.band,
            intensity = channel.intensity,
            color = color.as_str(),
            "recolored"
        ),
        OverlayEvent::PlacemarkSkipped {
            index,
            class,
            reason,
        } => warn!(index, ?class, ?reason, "skipped"),
        _ => {}
    });

    let recolored = OverlayTransformer::try_new(TransformConfig::default())?
        .transform_with_events(&template, &settings, &mut sink)?;

    fs::write(&output, recolored.as_bytes())
        .with_context(|| format!("failed to write {output}"))?;
    info!(
        output = output.as_str(),
        content_type = KML_CONTENT_TYPE,
        bytes = recolored.len(),
        "overlay written"
    );
    Ok(())
}
