/// Global HEALPix mesh generation
pub mod healpix;

/// Point-to-cell coarsening tables, built once at plugin setup
pub mod mapping;

/// Extraction of event polygons from sets of fired cells
pub mod polygon;

/// Geometric primitives shared across the module
pub mod primitives;
