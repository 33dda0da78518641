use std::fs;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use extreme_events::config::PluginConfig;
use extreme_events::host::ModelData;
use extreme_events::plugin::EventPlugin;
use log::info;
use nwp_emulator::cli::Cli;
use nwp_emulator::host::EmulatorData;
use nwp_emulator::{fields, io, svg_export};
use rand::SeedableRng;
use rand::prelude::SmallRng;

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    info!("*** Running NWP emulator ***");

    let config = PluginConfig::from_file(&args.config_file)
        .with_context(|| format!("could not load plugin config {:?}", args.config_file))?;

    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    // grid and synthetic fields offered to the plugin
    let function_space = fields::regular_grid(args.lon_points, args.lat_points, args.levels)?;
    let mut data = EmulatorData::new(function_space);
    data.set_int("NSTEP", 0);
    data.set_double("TSTEP", args.time_step);
    data.set_int("NFLEVG", args.levels as i64);
    for name in ["u", "v"] {
        let field = fields::synthetic_field(data.function_space(), args.levels, &mut rng);
        data.provide_field(name, field);
    }
    for name in ["100u", "100v"] {
        let field = fields::synthetic_field(data.function_space(), 1, &mut rng);
        data.provide_field(name, field);
    }

    let mut plugin = EventPlugin::from_config(config)?;

    // emulate the negotiation: every scalar the plugin requires must be offered
    let protocol = plugin.negotiate();
    for name in protocol
        .required_ints()
        .iter()
        .chain(protocol.required_doubles())
    {
        ensure!(
            data.has_parameter(name),
            "negotiation failed, parameter '{name}' is not offered"
        );
    }

    plugin.setup(&data)?;

    if let Some(folder) = &args.svg_folder {
        fs::create_dir_all(folder)
            .with_context(|| format!("could not create SVG folder {folder:?}"))?;
    }

    for step in 0..args.steps {
        data.set_int("NSTEP", step);
        data.update_field("100u", |field, fs| {
            fields::apply_demo_pattern(field, fs, step);
        });
        data.update_field("100v", |field, _| field.column_mut(0).fill(0.0));

        let reports = plugin.run(&data)?;
        for report in &reports {
            info!(
                "step {step}: {} polygon(s) for '{}'",
                report.polygons.len(),
                report.description
            );
        }
        if let Some(folder) = &args.svg_folder {
            if !reports.is_empty() {
                let document = svg_export::reports_to_svg(&reports);
                svg_export::write_svg(&document, &folder.join(format!("step_{step:03}.svg")))?;
            }
        }
    }

    plugin.teardown();
    info!("*** NWP emulator has completed ***");
    Ok(())
}
