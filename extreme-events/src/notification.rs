use std::collections::BTreeMap;
use std::env;

use itertools::Itertools;
use reqwest::blocking::Client;

use crate::error::PluginError;
use crate::geometry::primitives::LonLat;

/// Environment variable enabling the development bypass: when set to a
/// non-zero integer, notifications are printed instead of sent.
pub const DEV_MODE_VAR: &str = "PLUME_PLUGIN_DEV";

/// Status code reported for notifications short-circuited by dev mode.
pub const DEV_MODE_STATUS: u16 = 999;

/// The Aviso MARS schema keys every notification must carry. All of them are
/// fixed for a given model run; `date` and `time` are the start of the
/// simulation, while the detection time travels in the payload because the
/// plugin works on internal rather than output steps.
const SCHEMA_KEYS: [&str; 5] = ["class", "type", "expver", "date", "time"];

/// Sends Aviso notifications for detected event polygons.
///
/// The schema map is fixed at construction; [`AvisoNotifier::from_env`] wraps
/// [`AvisoNotifier::new`] for hosts that expose the run metadata through the
/// environment. No check is performed on the configured server URL.
#[derive(Debug)]
pub struct AvisoNotifier {
    url_notify: String,
    schema: BTreeMap<String, String>,
    client: Client,
}

impl AvisoNotifier {
    /// Build a notifier with an explicit schema map.
    pub fn new(base_url: &str, notify_endpoint: &str, schema: BTreeMap<String, String>) -> Self {
        AvisoNotifier {
            url_notify: format!("{base_url}{notify_endpoint}"),
            schema,
            client: Client::new(),
        }
    }

    /// Build a notifier whose schema values come from environment variables
    /// named after the upper-cased schema keys (`class` from `CLASS`, ...).
    pub fn from_env(base_url: &str, notify_endpoint: &str) -> Result<Self, PluginError> {
        let mut schema = BTreeMap::new();
        for key in SCHEMA_KEYS {
            let var = key.to_uppercase();
            let value = env::var(&var).map_err(|_| {
                PluginError::BadParameter(format!(
                    "schema key '{var}' could not be found in the environment"
                ))
            })?;
            schema.insert(key.to_string(), value);
        }
        Ok(Self::new(base_url, notify_endpoint, schema))
    }

    /// Encode the schema entries and the polygon into the notification URL.
    /// The polygon value is `lat1,lon1,lat2,lon2,...` over the vertex list.
    pub fn encode_url(&self, polygon: &[LonLat]) -> String {
        let mut url = format!("{}?", self.url_notify);
        for (key, value) in &self.schema {
            if !value.is_empty() {
                url.push_str(&format!("{key}={value}&"));
            }
        }
        url.push_str("polygon=");
        url.push_str(
            &polygon
                .iter()
                .map(|point| format!("{},{}", point.lat(), point.lon()))
                .join(","),
        );
        url
    }

    /// Send one notification and return the HTTP status code.
    ///
    /// With [`DEV_MODE_VAR`] active the encoded URL and payload are printed
    /// and [`DEV_MODE_STATUS`] returned without any network I/O. The payload
    /// is posted verbatim as a JSON body otherwise.
    pub fn send(&self, payload: &str, polygon: &[LonLat]) -> Result<u16, PluginError> {
        let url = self.encode_url(polygon);
        if dev_mode() {
            println!("{url} {payload}");
            return Ok(DEV_MODE_STATUS);
        }
        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .body(payload.to_string())
            .send()?;
        Ok(response.status().as_u16())
    }
}

fn dev_mode() -> bool {
    env::var(DEV_MODE_VAR)
        .ok()
        .and_then(|value| value.trim().parse::<i64>().ok())
        .is_some_and(|value| value != 0)
}
