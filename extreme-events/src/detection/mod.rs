use std::collections::BTreeSet;

use crate::config::EventConfig;
use crate::error::PluginError;
use crate::host::ModelData;

mod extreme_wind;
mod registry;
mod storm;
mod wind_drought;

pub use extreme_wind::ExtremeWind;
pub use registry::{EventFactory, EventRegistry};
pub use storm::Storm;
pub use wind_drought::WindDrought;

/// Result of detecting one configured instance of an event at one step.
///
/// `detected_cells` holds global HEALPix cell indices; the remaining keys are
/// the MARS-style metadata a notification consumer needs to retrieve the
/// data closest to the detected signal.
#[derive(Debug, Clone, Default)]
pub struct DetectionData {
    pub detected_cells: BTreeSet<i32>,
    pub description: String,
    pub param: String,
    pub levtype: String,
    pub levelist: String,
}

/// Behaviour shared by all extreme-event detectors.
///
/// A detector owns whatever temporal/spatial state its definition needs,
/// updates it once per internal model step from within `detect`, and reports
/// the cells firing at that step. One detector instance may run several
/// configurations of the same event and return one [`DetectionData`] each.
pub trait ExtremeEvent: std::fmt::Debug {
    /// Run the detection once for the current model step.
    ///
    /// Never fails: a detector that cannot read its inputs logs the problem
    /// and returns empty results for the step.
    fn detect(&mut self, data: &dyn ModelData) -> Vec<DetectionData>;

    /// Field names this detector reads every step.
    fn required_fields(&self) -> &[String];

    /// Scalar parameter names this detector requires from the host.
    fn required_params(&self) -> &[String];
}

/// Split an event's `required_params` list into scalar parameter names and
/// field names. Every event must require at least one field, otherwise its
/// detection could never run.
pub(crate) fn required_of(cfg: &EventConfig) -> Result<(Vec<String>, Vec<String>), PluginError> {
    let mut params = Vec::new();
    let mut fields = Vec::new();
    for required in &cfg.required_params {
        if required.param_type == "atlas_field" {
            fields.push(required.name.clone());
        } else {
            params.push(required.name.clone());
        }
    }
    if fields.is_empty() {
        return Err(PluginError::BadParameter(format!(
            "event '{}' has no configured required fields, detection will fail",
            cfg.name
        )));
    }
    Ok((params, fields))
}
