use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PluginError;

/// Top-level plugin configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// HEALPix resolution (nside) of the coarsening mesh
    pub healpix_res: u32,
    /// Whether detected polygons are sent to the Aviso server
    pub enable_notification: bool,
    /// Base URL of the Aviso server, only read when notifications are enabled
    pub aviso_url: String,
    /// Notification endpoint appended to the base URL
    pub notify_endpoint: String,
    /// Extreme events to load, in order
    pub events: Vec<EventConfig>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        PluginConfig {
            healpix_res: 2,
            enable_notification: false,
            aviso_url: String::new(),
            notify_endpoint: String::new(),
            events: Vec::new(),
        }
    }
}

impl PluginConfig {
    /// Load a plugin configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, PluginError> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(BufReader::new(file))?)
    }
}

/// Configuration of a single extreme event entry.
///
/// The `name` is the registry key. Every event carries a `required_params`
/// list; the remaining keys are event-specific and ignored by events that do
/// not use them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub required_params: Vec<RequiredParam>,
    /// `extreme_wind`: one detection interval per instance
    #[serde(default)]
    pub instances: Vec<WindInstance>,
    /// `storm`/`wind_drought`: wind speed threshold in m/s
    #[serde(default)]
    pub wind_speed_cutout: Option<f64>,
    /// `storm`/`wind_drought`: detection window in minutes
    #[serde(default)]
    pub time_window: Option<u32>,
}

fn default_enabled() -> bool {
    true
}

/// A named parameter an event requires from the host.
///
/// Entries of type `atlas_field` are field requirements, everything else is a
/// scalar parameter requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredParam {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
}

/// One wind interval of the `extreme_wind` event.
///
/// If `lower_bound > upper_bound` the interval acts as a plain threshold on
/// `lower_bound`, otherwise a point fires when its magnitude lies in
/// `[lower_bound, upper_bound)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindInstance {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub description: String,
    /// Model levels to detect on, usable only with the profile fields `u`/`v`
    #[serde(default)]
    pub model_levels: Option<Vec<i64>>,
    /// Physical heights are not supported, any non-empty list is rejected
    #[serde(default)]
    pub heights: Option<Vec<i64>>,
}
