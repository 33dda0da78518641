use ndarray::ArrayView2;

use crate::error::PluginError;
use crate::host::FunctionSpace;

/// A non-owning `[point, level]` view over one named field, valid for the
/// duration of a single plugin call. Surface fields have a single level.
pub struct Field<'a> {
    pub values: ArrayView2<'a, f64>,
    pub function_space: &'a FunctionSpace,
}

/// Interface through which the host exposes named scalar parameters and
/// geospatial fields to the plugin.
///
/// `has_parameter` covers both scalars and fields: the host advertises every
/// offered name through it, which is what event loading checks against.
pub trait ModelData {
    /// Current value of an integer parameter (e.g. `NSTEP`).
    fn int(&self, name: &str) -> Result<i64, PluginError>;

    /// Current value of a floating point parameter (e.g. `TSTEP`).
    fn double(&self, name: &str) -> Result<f64, PluginError>;

    /// Whether the host currently offers the named parameter or field.
    fn has_parameter(&self, name: &str) -> bool;

    /// Names of all fields currently offered.
    fn field_names(&self) -> Vec<String>;

    /// Borrow the named field for this step.
    fn field(&self, name: &str) -> Result<Field<'_>, PluginError>;
}
