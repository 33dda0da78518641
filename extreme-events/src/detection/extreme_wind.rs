use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use log::error;

use crate::config::EventConfig;
use crate::detection::{DetectionData, ExtremeEvent, required_of};
use crate::error::PluginError;
use crate::geometry::mapping::CellMapping;
use crate::host::{Field, ModelData};

/// A single wind magnitude check, flattened out of the configuration:
/// one interval per (instance × model level × available surface pair).
#[derive(Debug, Clone)]
struct Interval {
    lower: f64,
    upper: f64,
    /// 0 means surface; model levels are 1-based
    model_level: i64,
    u: Option<String>,
    v: Option<String>,
    description: String,
}

/// Detects extreme wind magnitudes at single time steps.
///
/// The configured bounds are either a plain threshold (`lower > upper`) or a
/// band `[lower, upper)`. Detection runs on the surface pairs `10u/10v` and
/// `100u/100v`, or on the profile fields `u`/`v` at named model levels; an
/// absent component of a pair is treated as zero.
#[derive(Debug)]
pub struct ExtremeWind {
    intervals: Vec<Interval>,
    required_params: Vec<String>,
    required_fields: Vec<String>,
    mapping: Arc<CellMapping>,
}

impl ExtremeWind {
    pub const NAME: &'static str = "extreme_wind";

    const SUPPORTED_FIELDS: [&'static str; 6] = ["100u", "100v", "10u", "10v", "u", "v"];

    pub fn from_config(
        cfg: &EventConfig,
        data: &dyn ModelData,
        mapping: Arc<CellMapping>,
    ) -> Result<Box<dyn ExtremeEvent>, PluginError> {
        let (required_params, required_fields) = required_of(cfg)?;
        for field in &required_fields {
            if !Self::SUPPORTED_FIELDS.contains(&field.as_str()) {
                return Err(PluginError::BadValue(format!(
                    "the field '{}' is not a supported wind field, please correct '{}' event configuration",
                    field,
                    Self::NAME
                )));
            }
        }

        let find_field = |name: &str| required_fields.iter().find(|f| f.as_str() == name).cloned();

        let mut intervals = Vec::new();
        for instance in &cfg.instances {
            if instance.heights.as_ref().is_some_and(|h| !h.is_empty()) {
                return Err(PluginError::BadParameter(
                    "detecting extreme wind at given heights is not currently supported, please remove from config"
                        .into(),
                ));
            }

            let description = if instance.lower_bound > instance.upper_bound {
                format!(
                    "{} (threshold : {} m/s)",
                    instance.description, instance.lower_bound
                )
            } else {
                format!(
                    "{} (lower bound : {} m/s, upper bound : {} m/s",
                    instance.description, instance.lower_bound, instance.upper_bound
                )
            };

            match &instance.model_levels {
                Some(model_levels) => {
                    let u = find_field("u");
                    let v = find_field("v");
                    if u.is_none() && v.is_none() {
                        return Err(PluginError::BadParameter(
                            "the `model_levels` key can only be used when non surface fields are required"
                                .into(),
                        ));
                    }
                    let n_levels = data.int("NFLEVG")?;
                    for &level in model_levels {
                        if level > n_levels {
                            return Err(PluginError::BadValue(format!(
                                "the model has {n_levels} vertical levels, please adjust the config"
                            )));
                        }
                        let field_desc = match (&u, &v) {
                            (Some(_), Some(_)) => {
                                format!(", level: {level}, fields : ('u','v'))")
                            }
                            _ => format!(
                                ", level: {level}, field : '{}{}'))",
                                u.as_deref().unwrap_or(""),
                                v.as_deref().unwrap_or("")
                            ),
                        };
                        intervals.push(Interval {
                            lower: instance.lower_bound,
                            upper: instance.upper_bound,
                            model_level: level,
                            u: u.clone(),
                            v: v.clone(),
                            description: format!("{description}{field_desc}"),
                        });
                    }
                }
                None => {
                    let surface_pairs = [
                        (find_field("10u"), find_field("10v")),
                        (find_field("100u"), find_field("100v")),
                    ];
                    if surface_pairs
                        .iter()
                        .all(|(u, v)| u.is_none() && v.is_none())
                    {
                        return Err(PluginError::BadParameter(
                            "the `model_levels` key or surface field(s) is missing in the configuration"
                                .into(),
                        ));
                    }
                    for (u, v) in surface_pairs {
                        if u.is_none() && v.is_none() {
                            continue;
                        }
                        let field_desc = match (&u, &v) {
                            (Some(u), Some(v)) => format!(", fields : ('{u}','{v}'))"),
                            _ => format!(
                                ", field : '{}{}'))",
                                u.as_deref().unwrap_or(""),
                                v.as_deref().unwrap_or("")
                            ),
                        };
                        intervals.push(Interval {
                            lower: instance.lower_bound,
                            upper: instance.upper_bound,
                            model_level: 0,
                            u,
                            v,
                            description: format!("{description}{field_desc}"),
                        });
                    }
                }
            }
        }

        if intervals.is_empty() {
            return Err(PluginError::BadValue(format!(
                "no valid instance found for '{}', ensure options and required fields align",
                Self::NAME
            )));
        }

        Ok(Box::new(ExtremeWind {
            intervals,
            required_params,
            required_fields,
            mapping,
        }))
    }
}

impl ExtremeEvent for ExtremeWind {
    fn detect(&mut self, data: &dyn ModelData) -> Vec<DetectionData> {
        let mut results: Vec<DetectionData> = self
            .intervals
            .iter()
            .map(|interval| DetectionData {
                detected_cells: BTreeSet::new(),
                description: interval.description.clone(),
                param: match (&interval.u, &interval.v) {
                    (Some(u), Some(v)) => format!("{u}/{v}"),
                    (Some(u), None) => u.clone(),
                    (None, Some(v)) => v.clone(),
                    (None, None) => String::new(),
                },
                levtype: if interval.model_level > 0 { "ml" } else { "sfc" }.to_string(),
                levelist: interval.model_level.to_string(),
            })
            .collect();

        let mut fields: HashMap<&str, Field<'_>> = HashMap::new();
        for name in &self.required_fields {
            match data.field(name) {
                Ok(field) => {
                    fields.insert(name.as_str(), field);
                }
                Err(err) => {
                    error!("extreme wind detection skipped this step: {err}");
                    return results;
                }
            }
        }

        let fs = fields[self.required_fields[0].as_str()].function_space;
        let mapping = self.mapping.point_to_cell();

        for idx in 0..fs.len() {
            if fs.is_ghost(idx) {
                continue;
            }
            let cell = mapping[idx];
            for (k, interval) in self.intervals.iter().enumerate() {
                // skip the magnitude check once the coarse cell already fired
                if results[k].detected_cells.contains(&cell) {
                    continue;
                }
                // model levels are 1-based, surface fields have a single level
                let level_idx = if interval.model_level > 0 {
                    (interval.model_level - 1) as usize
                } else {
                    0
                };
                let val_u = interval
                    .u
                    .as_deref()
                    .map_or(0.0, |u| fields[u].values[[idx, level_idx]]);
                let val_v = interval
                    .v
                    .as_deref()
                    .map_or(0.0, |v| fields[v].values[[idx, level_idx]]);
                let magnitude = (val_u * val_u + val_v * val_v).sqrt();
                if magnitude < interval.lower {
                    continue;
                }
                if interval.lower > interval.upper || magnitude < interval.upper {
                    // inverted bounds mean a plain threshold on the lower
                    // bound, otherwise the magnitude must lie in the band
                    results[k].detected_cells.insert(cell);
                }
            }
        }
        results
    }

    fn required_fields(&self) -> &[String] {
        &self.required_fields
    }

    fn required_params(&self) -> &[String] {
        &self.required_params
    }
}
