use std::path::Path;

use extreme_events::config::PluginConfig;
use extreme_events::plugin::{EventPlugin, EventReport};
use ndarray::Array2;
use nwp_emulator::fields;
use nwp_emulator::host::EmulatorData;
use rand::SeedableRng;
use rand::prelude::SmallRng;

const TSTEP: f64 = 60.0;
const LEVELS: usize = 2;

/// Drive the plugin over the demo configuration exactly like the emulator
/// binary does and collect the per-step reports.
fn run_demo(steps: i64) -> Vec<(i64, Vec<EventReport>)> {
    let config = PluginConfig::from_file(Path::new("../assets/demo_config.yaml")).unwrap();

    let mut rng = SmallRng::seed_from_u64(0);
    let function_space = fields::regular_grid(48, 24, LEVELS).unwrap();
    let mut data = EmulatorData::new(function_space);
    data.set_int("NSTEP", 0);
    data.set_double("TSTEP", TSTEP);
    data.set_int("NFLEVG", LEVELS as i64);
    for name in ["u", "v"] {
        let field = fields::synthetic_field(data.function_space(), LEVELS, &mut rng);
        data.provide_field(name, field);
    }
    data.provide_field("100u", fields::synthetic_field(data.function_space(), 1, &mut rng));
    data.provide_field("100v", Array2::zeros((data.function_space().len(), 1)));

    let mut plugin = EventPlugin::from_config(config).unwrap();
    plugin.setup(&data).unwrap();

    let mut outcome = Vec::new();
    for step in 0..steps {
        data.set_int("NSTEP", step);
        data.update_field("100u", |field, fs| {
            fields::apply_demo_pattern(field, fs, step);
        });
        outcome.push((step, plugin.run(&data).unwrap()));
    }
    plugin.teardown();
    outcome
}

fn steps_reporting(outcome: &[(i64, Vec<EventReport>)], description_prefix: &str) -> Vec<i64> {
    outcome
        .iter()
        .filter(|(_, reports)| {
            reports
                .iter()
                .any(|r| r.description.starts_with(description_prefix))
        })
        .map(|(step, _)| *step)
        .collect()
}

#[test]
fn demo_run_detects_all_three_events() {
    let outcome = run_demo(6);

    // the 30 m/s disk exceeds the 25 m/s threshold from the first step on
    let wind_steps = steps_reporting(&outcome, "Extreme surface wind");
    assert!(wind_steps.contains(&0));

    // storm: T = 3, so NSTEP 0..2 are warm-up, the sustained disk fires at 3
    let storm_steps = steps_reporting(&outcome, "Storm");
    assert!(!storm_steps.iter().any(|&s| s < 3));
    assert!(storm_steps.contains(&3));

    // wind drought: the calm disk pushes the counter beyond T = 3 at step 3
    let drought_steps = steps_reporting(&outcome, "Wind drought");
    assert!(!drought_steps.iter().any(|&s| s < 3));
    assert!(drought_steps.contains(&3));

    // every reported detection carries at least one polygon with vertices
    for (_, reports) in &outcome {
        for report in reports {
            assert!(!report.polygons.is_empty());
            assert!(report.polygons.iter().all(|p| p.len() >= 3));
        }
    }
}
