use ndarray::Array2;

use crate::error::PluginError;
use crate::geometry::primitives::LonLat;

/// Static geometry of the local grid partition: owned and halo points with
/// their geographic coordinates, ghost flags and the vertical level count.
///
/// Latitudes are degrees in −90..90. Longitudes are degrees in whichever
/// convention the host uses (0..360 or −180..180); downstream code never
/// compares them across conventions.
#[derive(Debug, Clone)]
pub struct FunctionSpace {
    lonlat: Array2<f64>,
    ghost: Vec<bool>,
    levels: usize,
}

impl FunctionSpace {
    /// `lonlat` must be `[N, 2]` with one row per grid point, matching the
    /// ghost flag array in length.
    pub fn new(lonlat: Array2<f64>, ghost: Vec<bool>, levels: usize) -> Result<Self, PluginError> {
        if lonlat.ncols() != 2 {
            return Err(PluginError::BadValue(format!(
                "lonlat array must have 2 columns, got {}",
                lonlat.ncols()
            )));
        }
        if lonlat.nrows() != ghost.len() {
            return Err(PluginError::BadValue(format!(
                "lonlat rows ({}) and ghost flags ({}) disagree on the number of grid points",
                lonlat.nrows(),
                ghost.len()
            )));
        }
        if levels == 0 {
            return Err(PluginError::BadValue(
                "a function space needs at least one vertical level".into(),
            ));
        }
        Ok(FunctionSpace {
            lonlat,
            ghost,
            levels,
        })
    }

    /// Number of grid points in the partition, halo included.
    pub fn len(&self) -> usize {
        self.ghost.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ghost.is_empty()
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Halo points are owned by another partition and excluded from detection.
    pub fn is_ghost(&self, idx: usize) -> bool {
        self.ghost[idx]
    }

    pub fn lonlat(&self, idx: usize) -> LonLat {
        LonLat(self.lonlat[[idx, 0]], self.lonlat[[idx, 1]])
    }
}
