use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use log::error;

use crate::config::EventConfig;
use crate::detection::{DetectionData, ExtremeEvent, required_of};
use crate::error::PluginError;
use crate::geometry::mapping::{CellMapping, NO_CELL};
use crate::host::ModelData;

/// Per-cell counter of consecutive low-wind steps. The point count is fixed
/// at setup and divides the per-step spatial sums into means.
#[derive(Debug, Clone, Copy)]
struct CellState {
    low_steps: u32,
    n_points: usize,
}

/// Detects wind droughts: prolonged periods of no wind.
///
/// No wind values are stored across steps; a per-cell counter tracks how
/// many consecutive steps the cell's spatial mean 100m wind speed stayed
/// below the cutout, and resets the moment one step reaches it.
#[derive(Debug)]
pub struct WindDrought {
    description: String,
    n_time_steps: u32,
    cutout: f64,
    cells: HashMap<i32, CellState>,
    required_params: Vec<String>,
    required_fields: Vec<String>,
    mapping: Arc<CellMapping>,
}

impl WindDrought {
    pub const NAME: &'static str = "wind_drought";

    pub fn from_config(
        cfg: &EventConfig,
        data: &dyn ModelData,
        mapping: Arc<CellMapping>,
    ) -> Result<Box<dyn ExtremeEvent>, PluginError> {
        let (required_params, mut required_fields) = required_of(cfg)?;
        required_fields.sort();
        if required_fields != ["100u", "100v"] {
            return Err(PluginError::BadValue(
                "wind drought event requires 100m wind component fields".into(),
            ));
        }

        let cutout = cfg.wind_speed_cutout.ok_or_else(|| {
            PluginError::BadParameter(
                "wind drought configuration is missing 'wind_speed_cutout'".into(),
            )
        })?;
        if cutout < 0.0 {
            return Err(PluginError::BadValue(
                "the cutout wind magnitude for the wind drought event should be greater than 0"
                    .into(),
            ));
        }

        let cells = mapping
            .points_per_cell()
            .into_iter()
            .map(|(cell, n_points)| {
                (
                    cell,
                    CellState {
                        low_steps: 0,
                        n_points,
                    },
                )
            })
            .collect();

        let time_window = cfg.time_window.ok_or_else(|| {
            PluginError::BadParameter("wind drought configuration is missing 'time_window'".into())
        })?;
        let tstep = data.double("TSTEP")?;
        let n_time_steps = ((time_window as f64 * 60.0) / tstep).ceil() as u32;

        Ok(Box::new(WindDrought {
            description: format!(
                "Wind drought (100m wind speed remains below {cutout}m/s for over {time_window}minutes)"
            ),
            n_time_steps,
            cutout,
            cells,
            required_params,
            required_fields,
            mapping,
        }))
    }
}

impl ExtremeEvent for WindDrought {
    fn detect(&mut self, data: &dyn ModelData) -> Vec<DetectionData> {
        let (Ok(field_u), Ok(field_v)) = (data.field("100u"), data.field("100v")) else {
            error!("wind drought detection skipped this step: 100m wind fields unavailable");
            return Vec::new();
        };

        let mapping = self.mapping.point_to_cell();

        // 1. spatial wind speed average per cell, then update the counters
        let mut averages: HashMap<i32, f64> = HashMap::new();
        for idx in 0..mapping.len() {
            let cell = mapping[idx];
            if cell == NO_CELL {
                continue;
            }
            let u = field_u.values[[idx, 0]];
            let v = field_v.values[[idx, 0]];
            let magnitude = (u * u + v * v).sqrt();
            *averages.entry(cell).or_insert(0.0) += magnitude / self.cells[&cell].n_points as f64;
        }
        for (cell, average) in averages {
            let state = self.cells.get_mut(&cell).expect("cell known since setup");
            if average < self.cutout {
                state.low_steps += 1;
            } else {
                // one step at or above the cutout breaks the drought
                state.low_steps = 0;
            }
        }

        // 2. fire the cells that stayed calm longer than the time window
        let mut result = DetectionData {
            detected_cells: BTreeSet::new(),
            description: self.description.clone(),
            param: "100u/100v".to_string(),
            levtype: "sfc".to_string(),
            levelist: "0".to_string(),
        };
        for (&cell, state) in &self.cells {
            if state.low_steps > self.n_time_steps {
                result.detected_cells.insert(cell);
            }
        }
        vec![result]
    }

    fn required_fields(&self) -> &[String] {
        &self.required_fields
    }

    fn required_params(&self) -> &[String] {
        &self.required_params
    }
}
