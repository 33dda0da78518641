use std::collections::BTreeMap;
use std::env;
use std::sync::{Mutex, MutexGuard};

use extreme_events::error::PluginError;
use extreme_events::geometry::primitives::LonLat;
use extreme_events::notification::{AvisoNotifier, DEV_MODE_STATUS, DEV_MODE_VAR};

/// Serializes tests that mutate the process environment.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const SCHEMA_VARS: [(&str, &str); 5] = [
    ("CLASS", "d1"),
    ("TYPE", "fc"),
    ("EXPVER", "0001"),
    ("DATE", "20250101"),
    ("TIME", "0000"),
];

fn env_guard() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn set_schema_env() {
    for (key, value) in SCHEMA_VARS {
        unsafe { env::set_var(key, value) };
    }
}

fn clear_schema_env() {
    for (key, _) in SCHEMA_VARS {
        unsafe { env::remove_var(key) };
    }
}

fn test_schema() -> BTreeMap<String, String> {
    SCHEMA_VARS
        .iter()
        .map(|(key, value)| (key.to_lowercase(), value.to_string()))
        .collect()
}

#[test]
fn url_encoding_orders_schema_keys_and_flattens_the_polygon() {
    let notifier = AvisoNotifier::new("http://aviso.test", "/notify/mars", test_schema());
    let polygon = [LonLat(16.9, 250.3), LonLat(14.4, 247.4)];

    let url = notifier.encode_url(&polygon);

    assert_eq!(
        url,
        "http://aviso.test/notify/mars\
         ?class=d1&date=20250101&expver=0001&time=0000&type=fc\
         &polygon=250.3,16.9,247.4,14.4"
    );
}

#[test]
fn empty_schema_values_are_omitted_from_the_url() {
    let mut schema = test_schema();
    schema.insert("expver".to_string(), String::new());
    let notifier = AvisoNotifier::new("http://aviso.test", "/notify", schema);

    let url = notifier.encode_url(&[LonLat(10.0, 20.0)]);

    assert!(!url.contains("expver"));
    assert!(url.ends_with("polygon=20,10"));
}

#[test]
fn dev_mode_short_circuits_without_network_io() {
    let _guard = env_guard();
    unsafe { env::set_var(DEV_MODE_VAR, "1") };

    // an unroutable server: any attempt at network I/O would error out
    let notifier = AvisoNotifier::new("http://127.0.0.1:1", "/notify", test_schema());
    let status = notifier
        .send(r#"{"hello":"world"}"#, &[LonLat(250.3, 16.9)])
        .unwrap();

    unsafe { env::remove_var(DEV_MODE_VAR) };
    assert_eq!(status, DEV_MODE_STATUS);
}

#[test]
fn dev_mode_zero_means_disabled() {
    let _guard = env_guard();
    unsafe { env::set_var(DEV_MODE_VAR, "0") };

    let notifier = AvisoNotifier::new("http://127.0.0.1:1", "/notify", test_schema());
    let result = notifier.send("{}", &[LonLat(250.3, 16.9)]);

    unsafe { env::remove_var(DEV_MODE_VAR) };
    // the unroutable POST must fail as a transport error, proving the
    // bypass stayed off
    assert!(matches!(result, Err(PluginError::Notification(_))));
}

#[test]
fn schema_from_environment_requires_every_key() {
    let _guard = env_guard();

    set_schema_env();
    let notifier = AvisoNotifier::from_env("http://aviso.test", "/notify").unwrap();
    let url = notifier.encode_url(&[]);
    assert!(url.contains("class=d1"));
    assert!(url.contains("date=20250101"));

    unsafe { env::remove_var("EXPVER") };
    let err = AvisoNotifier::from_env("http://aviso.test", "/notify").unwrap_err();
    assert!(matches!(err, PluginError::BadParameter(_)));

    clear_schema_env();
}
