#![allow(dead_code)]

use std::collections::HashMap;

use extreme_events::error::PluginError;
use extreme_events::host::{Field, FunctionSpace, ModelData};
use ndarray::Array2;

/// Minimal in-memory host for driving detectors and the plugin in tests.
pub struct MockData {
    function_space: FunctionSpace,
    ints: HashMap<String, i64>,
    doubles: HashMap<String, f64>,
    fields: HashMap<String, Array2<f64>>,
}

impl MockData {
    pub fn new(function_space: FunctionSpace) -> Self {
        MockData {
            function_space,
            ints: HashMap::new(),
            doubles: HashMap::new(),
            fields: HashMap::new(),
        }
    }

    pub fn function_space(&self) -> &FunctionSpace {
        &self.function_space
    }

    pub fn with_int(mut self, name: &str, value: i64) -> Self {
        self.ints.insert(name.to_string(), value);
        self
    }

    pub fn with_double(mut self, name: &str, value: f64) -> Self {
        self.doubles.insert(name.to_string(), value);
        self
    }

    pub fn with_field(mut self, name: &str, values: Array2<f64>) -> Self {
        self.fields.insert(name.to_string(), values);
        self
    }

    pub fn set_int(&mut self, name: &str, value: i64) {
        self.ints.insert(name.to_string(), value);
    }

    /// Overwrite every value of a surface field.
    pub fn fill_field(&mut self, name: &str, value: f64) {
        self.fields
            .get_mut(name)
            .expect("field not provided")
            .fill(value);
    }
}

impl ModelData for MockData {
    fn int(&self, name: &str) -> Result<i64, PluginError> {
        self.ints.get(name).copied().ok_or_else(|| {
            PluginError::BadParameter(format!("parameter '{name}' is not offered"))
        })
    }

    fn double(&self, name: &str) -> Result<f64, PluginError> {
        self.doubles.get(name).copied().ok_or_else(|| {
            PluginError::BadParameter(format!("parameter '{name}' is not offered"))
        })
    }

    fn has_parameter(&self, name: &str) -> bool {
        self.ints.contains_key(name)
            || self.doubles.contains_key(name)
            || self.fields.contains_key(name)
    }

    fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.fields.keys().cloned().collect();
        names.sort();
        names
    }

    fn field(&self, name: &str) -> Result<Field<'_>, PluginError> {
        self.fields
            .get(name)
            .map(|values| Field {
                values: values.view(),
                function_space: &self.function_space,
            })
            .ok_or_else(|| PluginError::FieldAbsent(name.to_string()))
    }
}

/// Function space over explicit (lon, lat) points, all owned.
pub fn grid(points: &[(f64, f64)], levels: usize) -> FunctionSpace {
    grid_with_ghosts(points, &vec![false; points.len()], levels)
}

pub fn grid_with_ghosts(points: &[(f64, f64)], ghost: &[bool], levels: usize) -> FunctionSpace {
    let mut lonlat = Array2::zeros((points.len(), 2));
    for (idx, &(lon, lat)) in points.iter().enumerate() {
        lonlat[[idx, 0]] = lon;
        lonlat[[idx, 1]] = lat;
    }
    FunctionSpace::new(lonlat, ghost.to_vec(), levels).expect("valid test function space")
}

/// Constant-valued `[points, levels]` field.
pub fn uniform_field(points: usize, levels: usize, value: f64) -> Array2<f64> {
    Array2::from_elem((points, levels), value)
}
