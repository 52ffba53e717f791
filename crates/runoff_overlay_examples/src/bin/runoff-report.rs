use runoff_overlay::prelude::*;
use runoff_overlay_examples::{init_tracing, load_payload};
use tracing::info;

/// Usage: runoff-report [settings.json]
///
/// Without a payload the report uses the default coefficients.
fn main() -> anyhow::Result<()> {
    init_tracing();

    let path = std::env::args().nth(1);
    let payload = load_payload(path.as_deref())?;
    let settings = SettingsModel::from_json(payload.as_deref(), true);

    let calc = RunoffCalculator::try_new(HydrologyConfig::default())?;
    let report = calc.report(&settings);

    for (class, s) in settings.iter() {
        info!(
            %class,
            coefficient = s.coefficient,
            area_percent = s.area_percent,
            "class settings"
        );
    }
    info!(
        weighted_coefficient = report.weighted_coefficient,
        runoff_depth_in = report.runoff_depth_in,
        "runoff estimate"
    );
    println!("{}", report.reported_volume());
    Ok(())
}
