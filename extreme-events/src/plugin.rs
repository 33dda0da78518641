use std::sync::Arc;

use log::{debug, error, info};

use crate::config::{EventConfig, PluginConfig};
use crate::detection::{EventRegistry, ExtremeEvent};
use crate::error::PluginError;
use crate::geometry::mapping::CellMapping;
use crate::geometry::polygon::extract_polygons;
use crate::geometry::primitives::LonLat;
use crate::host::{ModelData, Protocol};
use crate::notification::AvisoNotifier;

/// Sub-hourly time units accepted as MARS step values, largest first.
const TIME_UNITS: [(i64, &str); 3] = [(86400, "d"), (3600, "h"), (60, "m")];

/// Render the elapsed simulation time after `nstep` steps of `tstep` seconds
/// as a MARS-style step value.
///
/// This is the *internal* step time: there is no guarantee it corresponds to
/// an output step, so data for it may not be retrievable after the run.
pub fn model_step_str(nstep: i64, tstep: f64) -> String {
    if nstep == 0 {
        return "0s".to_string();
    }
    let seconds = (nstep as f64 * tstep).round() as i64;
    for (unit, suffix) in TIME_UNITS {
        if seconds % unit == 0 {
            return format!("{}{}", seconds / unit, suffix);
        }
    }
    format!("{seconds}s")
}

/// Everything the plugin reports about one emitted detection of one step.
#[derive(Debug, Clone)]
pub struct EventReport {
    pub description: String,
    pub param: String,
    pub levtype: String,
    pub levelist: String,
    pub polygons: Vec<Vec<LonLat>>,
}

/// The plugin orchestrator.
///
/// Owns the configured detectors, the coarsening tables and the notification
/// handler. The host calls [`negotiate`](Self::negotiate) once,
/// [`setup`](Self::setup) once fields are available, [`run`](Self::run) every
/// internal step and [`teardown`](Self::teardown) at the end of the run.
///
/// Partitioning is not handled here: each partition coarsens and notifies
/// independently, so an event polygon spanning partitions yields one
/// notification per partition.
pub struct EventPlugin {
    healpix_res: u32,
    event_configs: Vec<EventConfig>,
    events: Vec<Box<dyn ExtremeEvent>>,
    notifier: Option<AvisoNotifier>,
    mapping: Option<Arc<CellMapping>>,
}

impl EventPlugin {
    /// Build the plugin from its configuration. The Aviso handler is created
    /// (from the environment) only when notifications are enabled.
    pub fn from_config(config: PluginConfig) -> Result<Self, PluginError> {
        let notifier = if config.enable_notification {
            Some(AvisoNotifier::from_env(
                &config.aviso_url,
                &config.notify_endpoint,
            )?)
        } else {
            None
        };
        Ok(EventPlugin {
            healpix_res: config.healpix_res,
            event_configs: config.events,
            events: Vec::new(),
            notifier,
            mapping: None,
        })
    }

    /// Scalar parameters required from the host. Field requirements are
    /// negotiated through the configuration instead.
    pub fn negotiate(&self) -> Protocol {
        Protocol::default()
            .require_int("NSTEP")
            .require_double("TSTEP")
            .require_int("NFLEVG")
    }

    /// Build the coarsening tables and instantiate the configured events.
    ///
    /// All detectors share the function space of the first offered field.
    /// Events are loaded in configuration order; an event whose required
    /// parameters are not all offered by the host is skipped, an unknown
    /// event name is a hard failure.
    pub fn setup(&mut self, data: &dyn ModelData) -> Result<(), PluginError> {
        let field_names = data.field_names();
        let first = field_names.first().ok_or_else(|| {
            PluginError::BadParameter(
                "the model offers no fields to build the coarsening mapping from".into(),
            )
        })?;
        let mapping = Arc::new(CellMapping::build(
            self.healpix_res,
            data.field(first)?.function_space,
        )?);

        let mut loaded = Vec::new();
        for cfg in &self.event_configs {
            if !cfg.enabled {
                continue;
            }
            if !cfg
                .required_params
                .iter()
                .all(|param| data.has_parameter(&param.name))
            {
                continue;
            }
            self.events
                .push(EventRegistry::create(cfg, data, Arc::clone(&mapping))?);
            loaded.push(cfg.name.clone());
        }
        if self.events.is_empty() {
            // should not happen when the negotiation went through
            error!("no extreme events loaded, detection will do nothing, check configuration");
        } else {
            info!("extreme event detection plugin loaded events: {}", loaded.join(" "));
        }
        self.mapping = Some(mapping);
        Ok(())
    }

    /// Run one detection sweep over all loaded events and notify each
    /// extracted polygon. Returns what was detected so hosts can render or
    /// archive the outcome themselves.
    pub fn run(&mut self, data: &dyn ModelData) -> Result<Vec<EventReport>, PluginError> {
        let mapping = self
            .mapping
            .clone()
            .ok_or_else(|| PluginError::BadParameter("run called before setup".into()))?;
        let elapsed = model_step_str(data.int("NSTEP")?, data.double("TSTEP")?);

        let mut reports = Vec::new();
        for event in &mut self.events {
            for detection in event.detect(data) {
                if detection.detected_cells.is_empty() {
                    continue;
                }
                let polygons = extract_polygons(&detection.detected_cells, mapping.cell_vertices());
                debug!(
                    "step {elapsed}: {} polygon(s) from {} cell(s) for '{}'",
                    polygons.len(),
                    detection.detected_cells.len(),
                    detection.description
                );
                if let Some(notifier) = &self.notifier {
                    for polygon in &polygons {
                        let payload = serde_json::json!({
                            "step": elapsed,
                            "description": detection.description,
                            "param": detection.param,
                            "levtype": detection.levtype,
                            "levelist": detection.levelist,
                        })
                        .to_string();
                        match notifier.send(&payload, polygon) {
                            Ok(200) | Ok(999) => {}
                            Ok(status) => {
                                error!("could not send Aviso notification, error code {status}")
                            }
                            Err(err) => error!("could not send Aviso notification: {err}"),
                        }
                    }
                }
                reports.push(EventReport {
                    description: detection.description,
                    param: detection.param,
                    levtype: detection.levtype,
                    levelist: detection.levelist,
                    polygons,
                });
            }
        }
        Ok(reports)
    }

    /// Drop all detector state. Safe to call more than once.
    pub fn teardown(&mut self) {
        self.events.clear();
    }
}
