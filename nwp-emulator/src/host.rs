use std::collections::HashMap;

use extreme_events::error::PluginError;
use extreme_events::host::{Field, FunctionSpace, ModelData};
use ndarray::Array2;

/// In-memory stand-in for the model host's data catalogue: named scalar
/// parameters plus `[point, level]` fields on a single function space.
pub struct EmulatorData {
    function_space: FunctionSpace,
    ints: HashMap<String, i64>,
    doubles: HashMap<String, f64>,
    fields: HashMap<String, Array2<f64>>,
}

impl EmulatorData {
    pub fn new(function_space: FunctionSpace) -> Self {
        EmulatorData {
            function_space,
            ints: HashMap::new(),
            doubles: HashMap::new(),
            fields: HashMap::new(),
        }
    }

    pub fn function_space(&self) -> &FunctionSpace {
        &self.function_space
    }

    pub fn set_int(&mut self, name: &str, value: i64) {
        self.ints.insert(name.to_string(), value);
    }

    pub fn set_double(&mut self, name: &str, value: f64) {
        self.doubles.insert(name.to_string(), value);
    }

    /// Offer a field to the plugins. The array must have one row per grid
    /// point of the function space.
    pub fn provide_field(&mut self, name: &str, values: Array2<f64>) {
        assert_eq!(values.nrows(), self.function_space.len());
        self.fields.insert(name.to_string(), values);
    }

    /// Update a field in place, with the function space alongside for
    /// coordinate lookups. Returns false when the field is not offered.
    pub fn update_field(
        &mut self,
        name: &str,
        update: impl FnOnce(&mut Array2<f64>, &FunctionSpace),
    ) -> bool {
        match self.fields.get_mut(name) {
            Some(values) => {
                update(values, &self.function_space);
                true
            }
            None => false,
        }
    }
}

impl ModelData for EmulatorData {
    fn int(&self, name: &str) -> Result<i64, PluginError> {
        self.ints.get(name).copied().ok_or_else(|| {
            PluginError::BadParameter(format!("parameter '{name}' is not offered by the emulator"))
        })
    }

    fn double(&self, name: &str) -> Result<f64, PluginError> {
        self.doubles.get(name).copied().ok_or_else(|| {
            PluginError::BadParameter(format!("parameter '{name}' is not offered by the emulator"))
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
