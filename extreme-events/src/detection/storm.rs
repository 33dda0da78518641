use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;

use log::error;

use crate::config::EventConfig;
use crate::detection::{DetectionData, ExtremeEvent, required_of};
use crate::error::PluginError;
use crate::geometry::mapping::{CellMapping, NO_CELL};
use crate::host::ModelData;

/// Detects storms: 100m wind speed exceeding a cutout over a time window.
///
/// Wind magnitudes are kept as fixed-point `round(m/s · 100)` in `u16`, laid
/// out slice-major (one full time slice of grid points is contiguous, most
/// recent slice first). Each step the oldest slice is dropped and the new
/// one prepended, so the buffer length is invariantly `T · N`.
#[derive(Debug)]
pub struct Storm {
    description: String,
    n_time_steps: usize,
    cutout_q16: u16,
    wind_speeds: VecDeque<u16>,
    required_params: Vec<String>,
    required_fields: Vec<String>,
    mapping: Arc<CellMapping>,
}

impl Storm {
    pub const NAME: &'static str = "storm";

    pub fn from_config(
        cfg: &EventConfig,
        data: &dyn ModelData,
        mapping: Arc<CellMapping>,
    ) -> Result<Box<dyn ExtremeEvent>, PluginError> {
        let (required_params, mut required_fields) = required_of(cfg)?;
        required_fields.sort();
        if required_fields != ["100u", "100v"] {
            return Err(PluginError::BadValue(
                "storm requires 100m wind component fields".into(),
            ));
        }

        let cutout = cfg.wind_speed_cutout.ok_or_else(|| {
            PluginError::BadParameter("storm configuration is missing 'wind_speed_cutout'".into())
        })?;
        let cutout_max = u16::MAX as f64 / 100.0;
        if !(0.0..=cutout_max).contains(&cutout) {
            return Err(PluginError::BadValue(format!(
                "the cutout wind speed for the storm event should be between 0 and {cutout_max}"
            )));
        }
        let cutout_q16 = (cutout * 100.0).round() as u16;

        let time_window = cfg.time_window.ok_or_else(|| {
            PluginError::BadParameter("storm configuration is missing 'time_window'".into())
        })?;
        let tstep = data.double("TSTEP")?;
        let n_time_steps = ((time_window as f64 * 60.0) / tstep).ceil() as usize;
        if n_time_steps == 0 {
            return Err(PluginError::BadValue(
                "the storm time window must cover at least one model step".into(),
            ));
        }

        let n_points = mapping.point_to_cell().len();
        Ok(Box::new(Storm {
            description: format!(
                "Storm (100m wind speed average over {time_window}min exceeding {cutout}m/s)"
            ),
            n_time_steps,
            cutout_q16,
            wind_speeds: VecDeque::from(vec![0u16; n_time_steps * n_points]),
            required_params,
            required_fields,
            mapping,
        }))
    }
}

impl ExtremeEvent for Storm {
    fn detect(&mut self, data: &dyn ModelData) -> Vec<DetectionData> {
        let (Ok(field_u), Ok(field_v)) = (data.field("100u"), data.field("100v")) else {
            error!("storm detection skipped this step: 100m wind fields unavailable");
            return Vec::new();
        };
        let nstep = match data.int("NSTEP") {
            Ok(nstep) => nstep,
            Err(err) => {
                error!("storm detection skipped this step: {err}");
                return Vec::new();
            }
        };

        let mapping = self.mapping.point_to_cell();
        let n_points = mapping.len();

        // 1. slide the window: drop the oldest slice, prepend the current one
        //    in reverse so point indices stay aligned
        self.wind_speeds
            .truncate((self.n_time_steps - 1) * n_points);
        for idx in (0..n_points).rev() {
            let u = field_u.values[[idx, 0]];
            let v = field_v.values[[idx, 0]];
            let magnitude = (u * u + v * v).sqrt();
            self.wind_speeds.push_front((magnitude * 100.0).round() as u16);
        }

        if (nstep as usize) < self.n_time_steps {
            // warm-up: keep filling the buffer but do not detect yet
            return Vec::new();
        }

        // 2. temporal sum per point, reduced to the maximum per cell
        let mut cell_maximums: HashMap<i32, u64> = HashMap::new();
        for idx in 0..n_points {
            let cell = mapping[idx];
            if cell == NO_CELL {
                continue;
            }
            let mut wind_sum: u64 = 0;
            for tstep in 0..self.n_time_steps {
                wind_sum += self.wind_speeds[tstep * n_points + idx] as u64;
            }
            cell_maximums
                .entry(cell)
                .and_modify(|max| *max = (*max).max(wind_sum))
                .or_insert(wind_sum);
        }

        let mut result = DetectionData {
            detected_cells: BTreeSet::new(),
            description: self.description.clone(),
            param: "100u/100v".to_string(),
            levtype: "sfc".to_string(),
            levelist: "0".to_string(),
        };
        // the window sum is compared against cutout · T, sidestepping the
        // division an actual average would need
        let threshold = self.cutout_q16 as u64 * self.n_time_steps as u64;
        for (cell, max) in cell_maximums {
            if max > threshold {
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
