use std::collections::HashMap;

use crate::error::PluginError;
use crate::geometry::primitives::LonLat;

/// Two distinct mesh nodes are never closer than ~1° at the supported
/// resolutions, while float noise between duplicate corner computations is
/// many orders of magnitude below this.
const MERGE_TOL_DEG: f64 = 1e-6;

/// Global HEALPix mesh of `12·nside²` equal-area cells.
///
/// The mesh is replicated on every process: each partition owns the whole
/// cell index space. Were the mesh ever partitioned, it would need a halo of
/// one cell so the nearest-centroid search stays complete.
///
/// Cell vertex rings are stored as indices into a shared node table, so two
/// adjacent cells reference bit-identical vertex coordinates. That exactness
/// is what lets the polygon extraction cancel interior edges. Rings are
/// ordered counterclockwise as seen from outside the sphere; the table
/// accepts rings of length 4 or 5 (pentagonal pole elements), the generator
/// itself emits quads whose polar cells meet in a single shared pole node.
pub struct HealpixMesh {
    nside: i64,
    centers: Vec<LonLat>,
    nodes: Vec<LonLat>,
    rings: Vec<Vec<u32>>,
}

impl HealpixMesh {
    /// Generate the global mesh at the given resolution (nside).
    pub fn generate(nside: u32) -> Result<Self, PluginError> {
        if nside == 0 {
            return Err(PluginError::BadValue(
                "HEALPix resolution must be at least 1".into(),
            ));
        }
        let r = nside as i64;
        let n_cells = (12 * r * r) as usize;

        let mut centers = Vec::with_capacity(n_cells);
        let mut rings = Vec::with_capacity(n_cells);
        let mut nodes = NodeTable::default();

        for face in 0..12 {
            let (fx, fy) = face_center(face, r);
            for j in 0..r {
                for i in 0..r {
                    // pixel diamond of half-diagonal 1 on the face lattice
                    let cx = fx + i - j;
                    let cy = fy + i + j - (r - 1);
                    centers.push(unproject(cx, cy, r));
                    let corners = [
                        (cx, cy + 1), // north
                        (cx - 1, cy), // west
                        (cx, cy - 1), // south
                        (cx + 1, cy), // east
                    ];
                    rings.push(
                        corners
                            .iter()
                            .map(|&(x, y)| nodes.intern(unproject(x, y, r)))
                            .collect(),
                    );
                }
            }
        }

        Ok(HealpixMesh {
            nside: r,
            centers,
            nodes: nodes.nodes,
            rings,
        })
    }

    pub fn nside(&self) -> u32 {
        self.nside as u32
    }

    pub fn n_cells(&self) -> usize {
        self.centers.len()
    }

    /// Cell centroids, indexed by global cell index.
    pub fn centers(&self) -> &[LonLat] {
        &self.centers
    }

    /// Vertex coordinates of one cell ring.
    pub fn ring(&self, cell: usize) -> impl Iterator<Item = LonLat> + '_ {
        self.rings[cell].iter().map(|&n| self.nodes[n as usize])
    }

    /// Materialize the cell-to-vertex-ring table, preserving node ordering.
    pub fn vertex_rings(&self) -> Vec<Vec<LonLat>> {
        (0..self.n_cells()).map(|c| self.ring(c).collect()).collect()
    }
}

/// Lattice coordinates of a base face center, in units of `π/(4·nside)`.
/// Faces 0..4 ring the north pole, 4..8 the equator, 8..12 the south pole.
fn face_center(face: i64, nside: i64) -> (i64, i64) {
    match face {
        0..4 => ((2 * face + 1) * nside, nside),
        4..8 => (2 * (face - 4) * nside, 0),
        _ => ((2 * (face - 8) + 1) * nside, -nside),
    }
}

/// Unproject a lattice position to geographic degrees.
///
/// The lattice covers the HEALPix projection plane with `x ∈ [0, 8·nside)`
/// (wrapped) and `y ∈ [−2·nside, 2·nside]`; the equatorial belt is
/// `|y| ≤ nside`, beyond it the four polar facets converge on the poles.
fn unproject(x: i64, y: i64, nside: i64) -> LonLat {
    let x = x.rem_euclid(8 * nside);
    let r = nside as f64;
    let xs = x as f64 / r;
    let ys = y as f64 / r;

    if y.abs() <= nside {
        let lat = (2.0 * ys / 3.0).asin().to_degrees();
        LonLat(45.0 * xs, lat)
    } else if y.abs() == 2 * nside {
        // all four facet corners meet here, one canonical node per pole
        LonLat(0.0, 90f64.copysign(ys))
    } else {
        let sign = ys.signum();
        let sigma = 2.0 - ys.abs();
        let lat = sign * (1.0 - sigma * sigma / 3.0).asin().to_degrees();
        // meridian of the facet column this point belongs to
        let xc = (2 * (x / (2 * nside)) + 1) as f64;
        let lon = 45.0 * (xc + (xs - xc) / sigma);
        LonLat(lon.rem_euclid(360.0), lat)
    }
}

/// Deduplicating node store.
///
/// Corners generated from different faces of the projection plane can denote
/// the same sphere point (the polar cut edges, the seam and the poles); they
/// unproject to coordinates equal up to float noise and must collapse to a
/// single node. Lookup quantizes to a `MERGE_TOL_DEG` grid and probes the
/// surrounding buckets so near-boundary values cannot split a node in two.
#[derive(Default)]
struct NodeTable {
    nodes: Vec<LonLat>,
    index: HashMap<(i64, i64), u32>,
}

impl NodeTable {
    fn intern(&mut self, p: LonLat) -> u32 {
        let p = canonicalize(p);
        let kx = (p.lon() / MERGE_TOL_DEG).round() as i64;
        let ky = (p.lat() / MERGE_TOL_DEG).round() as i64;
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(&id) = self.index.get(&(kx + dx, ky + dy)) {
                    let q = self.nodes[id as usize];
                    if (q.lon() - p.lon()).abs() < MERGE_TOL_DEG
                        && (q.lat() - p.lat()).abs() < MERGE_TOL_DEG
                    {
                        return id;
                    }
                }
            }
        }
        let id = self.nodes.len() as u32;
        self.nodes.push(p);
        self.index.insert((kx, ky), id);
        id
    }
}

/// Collapse the representations that the projection plane leaves ambiguous:
/// the poles (longitude undefined) and the longitude wrap at 360°.
fn canonicalize(p: LonLat) -> LonLat {
    if p.lat() > 90.0 - MERGE_TOL_DEG {
        return LonLat(0.0, 90.0);
    }
    if p.lat() < -90.0 + MERGE_TOL_DEG {
        return LonLat(0.0, -90.0);
    }
    if p.lon() > 360.0 - MERGE_TOL_DEG {
        return LonLat(p.lon() - 360.0, p.lat());
    }
    p
}
