mod common;

use common::MockData;
use extreme_events::config::{EventConfig, PluginConfig, RequiredParam, WindInstance};
use extreme_events::error::PluginError;
use extreme_events::plugin::{EventPlugin, model_step_str};
use test_case::test_case;

#[test_case(0, 1800.0, "0s"; "step zero")]
#[test_case(2, 1800.0, "1h"; "full hour")]
#[test_case(1, 1800.0, "30m"; "half hour")]
#[test_case(3, 7.0, "21s"; "odd seconds")]
#[test_case(48, 1800.0, "1d"; "full day")]
#[test_case(1, 90.0, "90s"; "seconds fallback")]
fn step_time_renders_the_largest_dividing_unit(nstep: i64, tstep: f64, expected: &str) {
    assert_eq!(model_step_str(nstep, tstep), expected);
}

fn wind_event(name: &str) -> EventConfig {
    EventConfig {
        name: name.to_string(),
        enabled: true,
        required_params: vec![
            RequiredParam {
                name: "100u".to_string(),
                param_type: "atlas_field".to_string(),
            },
            RequiredParam {
                name: "100v".to_string(),
                param_type: "atlas_field".to_string(),
            },
        ],
        instances: vec![WindInstance {
            lower_bound: 25.0,
            upper_bound: 0.0,
            description: "strong winds".to_string(),
            model_levels: None,
            heights: None,
        }],
        wind_speed_cutout: None,
        time_window: None,
    }
}

fn windy_host() -> MockData {
    let fs = common::grid(&[(10.0, 50.0), (190.0, -50.0)], 1);
    MockData::new(fs)
        .with_int("NSTEP", 0)
        .with_double("TSTEP", 60.0)
        .with_int("NFLEVG", 1)
        .with_field("100u", common::uniform_field(2, 1, 30.0))
        .with_field("100v", common::uniform_field(2, 1, 0.0))
}

fn plugin_config(events: Vec<EventConfig>) -> PluginConfig {
    PluginConfig {
        healpix_res: 2,
        enable_notification: false,
        events,
        ..PluginConfig::default()
    }
}

#[test]
fn run_reports_one_polygon_per_contiguous_region() {
    let data = windy_host();
    let mut plugin = EventPlugin::from_config(plugin_config(vec![wind_event("extreme_wind")])).unwrap();

    let protocol = plugin.negotiate();
    assert_eq!(protocol.required_ints(), ["NSTEP", "NFLEVG"]);
    assert_eq!(protocol.required_doubles(), ["TSTEP"]);

    plugin.setup(&data).unwrap();
    let reports = plugin.run(&data).unwrap();

    // the two firing points sit on opposite sides of the globe
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].polygons.len(), 2);
    assert!(reports[0].description.starts_with("strong winds"));
    assert_eq!(reports[0].param, "100u/100v");
}

#[test]
fn events_with_unoffered_parameters_are_skipped() {
    let data = windy_host();
    let mut needs_more = wind_event("extreme_wind");
    needs_more.required_params.push(RequiredParam {
        name: "not_offered".to_string(),
        param_type: "scalar".to_string(),
    });

    let mut plugin = EventPlugin::from_config(plugin_config(vec![needs_more])).unwrap();
    plugin.setup(&data).unwrap();

    assert!(plugin.run(&data).unwrap().is_empty());
}

#[test]
fn disabled_events_are_skipped_even_when_unknown() {
    let data = windy_host();
    let mut unknown = wind_event("definitely_not_registered");
    unknown.enabled = false;

    let mut plugin = EventPlugin::from_config(plugin_config(vec![unknown])).unwrap();
    assert!(plugin.setup(&data).is_ok());
}

#[test]
fn unknown_enabled_events_fail_setup_hard() {
    let data = windy_host();
    let plugin_config = plugin_config(vec![wind_event("definitely_not_registered")]);

    let mut plugin = EventPlugin::from_config(plugin_config).unwrap();
    assert!(matches!(
        plugin.setup(&data).unwrap_err(),
        PluginError::RegistryMiss(_)
    ));
}

#[test]
fn run_before_setup_is_an_error() {
    let data = windy_host();
    let mut plugin = EventPlugin::from_config(plugin_config(vec![])).unwrap();
    assert!(plugin.run(&data).is_err());
}

#[test]
fn teardown_is_idempotent() {
    let data = windy_host();
    let mut plugin = EventPlugin::from_config(plugin_config(vec![wind_event("extreme_wind")])).unwrap();
    plugin.setup(&data).unwrap();

    plugin.teardown();
    plugin.teardown();

    // the plugin stays callable, it just has nothing left to detect
    assert!(plugin.run(&data).unwrap().is_empty());
}
