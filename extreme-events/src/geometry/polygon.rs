use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::warn;

use crate::geometry::primitives::{CellEdge, LonLat};

/// Wrapper giving vertices the total order used by the walk bookkeeping.
#[derive(Clone, Copy, PartialEq, Eq)]
struct OrdPoint(LonLat);

impl Ord for OrdPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for OrdPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Extract the boundary polygon(s) of a set of fired cells.
///
/// Every edge of a fired cell's ring is counted as an unordered endpoint
/// pair; edges shared by two fired cells are interior and discarded, the
/// remainder is the region boundary. Because all rings wind consistently,
/// each boundary edge survives in exactly one direction (the one its single
/// owning cell emitted), so the boundary decomposes into directed cycles
/// which are walked off one polygon at a time.
///
/// Returned polygons are ordered vertex lists with an implicit closing edge.
/// The result depends only on the fired set, not on any iteration order.
///
/// Known limitations, kept as they are:
/// - a region with holes yields the hole boundary as a separate polygon;
/// - a region covering the whole mesh has no boundary at all and collapses
///   to the sentinel polygon `[(0,0)]`.
pub fn extract_polygons(fired: &BTreeSet<i32>, vertices: &[Vec<LonLat>]) -> Vec<Vec<LonLat>> {
    // count undirected occurrences, remembering the orientation in which the
    // first owning cell emitted each edge
    let mut edge_count: HashMap<CellEdge, (LonLat, LonLat, u32)> = HashMap::new();
    for &cell in fired {
        let ring = &vertices[cell as usize];
        for k in 0..ring.len() {
            let from = ring[k];
            let to = ring[(k + 1) % ring.len()];
            edge_count
                .entry(CellEdge::new(from, to))
                .and_modify(|(_, _, n)| *n += 1)
                .or_insert((from, to, 1));
        }
    }

    // directed adjacency over boundary edges, successors kept sorted
    let mut walk: BTreeMap<OrdPoint, Vec<LonLat>> = BTreeMap::new();
    for (from, to, count) in edge_count.into_values() {
        if count > 1 {
            continue; // interior edge, shared by two fired cells
        }
        let successors = walk.entry(OrdPoint(from)).or_default();
        let pos = successors.partition_point(|v| OrdPoint(*v) < OrdPoint(to));
        successors.insert(pos, to);
    }

    if walk.is_empty() && !fired.is_empty() {
        // every edge belonged to two firing cells: the whole mesh fired
        warn!("all the globe has fired, case not handled");
        return vec![vec![LonLat(0.0, 0.0)]];
    }

    let mut polygons = Vec::new();
    loop {
        // start each polygon at the smallest remaining vertex
        let Some(start) = walk.keys().next().map(|key| key.0) else {
            break;
        };
        let mut polygon = vec![start];
        let mut current = start;
        loop {
            // consume one outgoing edge of the current vertex; none left
            // means the cycle closed
            let Some(mut successors) = walk.remove(&OrdPoint(current)) else {
                break;
            };
            // when two boundary cycles touch at this vertex, walk towards the
            // second successor iff the current longitude exceeds the first
            // successor's (known-approximate near the poles)
            let pick = if successors.len() > 1 && current.lon() > successors[0].lon() {
                1
            } else {
                0
            };
            let next = successors.remove(pick);
            if !successors.is_empty() {
                walk.insert(OrdPoint(current), successors);
            }
            polygon.push(next);
            current = next;
        }
        // the walk can only stop back at its start; drop the duplicate so the
        // closing edge stays implicit
        if polygon.len() > 1 {
            polygon.pop();
        }
        polygons.push(polygon);
    }
    polygons
}
