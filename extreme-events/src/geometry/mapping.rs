use std::collections::HashMap;

use kiddo::{ImmutableKdTree, SquaredEuclidean};

use crate::error::PluginError;
use crate::geometry::healpix::HealpixMesh;
use crate::geometry::primitives::LonLat;
use crate::host::FunctionSpace;

/// Sentinel cell index for halo points, whose detection runs in the
/// partition that owns them. Cell index 0 is a valid cell.
pub const NO_CELL: i32 = -1;

/// Immutable coarsening tables, built once at plugin setup and shared
/// read-only by every detector.
///
/// `point_to_cell[i]` maps grid point `i` to the global index of the HEALPix
/// cell with the nearest centroid, or [`NO_CELL`] for ghost points.
/// `cell_vertices[c]` holds the vertex ring of cell `c` in the mesh's native
/// node ordering; firing cells are rendered to polygons from it.
#[derive(Debug)]
pub struct CellMapping {
    point_to_cell: Vec<i32>,
    cell_vertices: Vec<Vec<LonLat>>,
}

impl CellMapping {
    /// Build the mapping for one function space.
    ///
    /// Nearest-centroid assignment is a defensible stand-in for containment
    /// because HEALPix cells are equal-area and reasonably isotropic.
    pub fn build(resolution: u32, fs: &FunctionSpace) -> Result<Self, PluginError> {
        let mesh = HealpixMesh::generate(resolution)?;

        let entries: Vec<[f64; 3]> = mesh.centers().iter().map(LonLat::unit_vector).collect();
        let search: ImmutableKdTree<f64, 3> = ImmutableKdTree::new_from_slice(&entries);

        let mut point_to_cell = Vec::with_capacity(fs.len());
        for idx in 0..fs.len() {
            if fs.is_ghost(idx) {
                point_to_cell.push(NO_CELL);
                continue;
            }
            let nearest = search.nearest_one::<SquaredEuclidean>(&fs.lonlat(idx).unit_vector());
            point_to_cell.push(nearest.item as i32);
        }

        Ok(CellMapping {
            point_to_cell,
            cell_vertices: mesh.vertex_rings(),
        })
    }

    pub fn point_to_cell(&self) -> &[i32] {
        &self.point_to_cell
    }

    pub fn cell_vertices(&self) -> &[Vec<LonLat>] {
        &self.cell_vertices
    }

    pub fn n_cells(&self) -> usize {
        self.cell_vertices.len()
    }

    /// Number of grid points mapped to each cell, ghost points excluded.
    /// Detectors that average spatially over a cell divide by these counts.
    pub fn points_per_cell(&self) -> HashMap<i32, usize> {
        let mut counts = HashMap::new();
        for &cell in &self.point_to_cell {
            if cell != NO_CELL {
                *counts.entry(cell).or_insert(0) += 1;
            }
        }
        counts
    }
}
