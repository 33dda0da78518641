//! Detection core of the extreme-event plugin for NWP model hosts.
//!
//! Once per internal model step the host hands the plugin its freshly computed
//! meteorological fields. The plugin runs every configured event detector over
//! the local grid partition, coarsens firing grid points onto a global HEALPix
//! mesh, extracts the outer polygon(s) of each contiguous firing region and
//! emits one Aviso notification per event polygon.

/// Plugin configuration as loaded from YAML
pub mod config;

/// Event detectors, their shared trait and the detector registry
pub mod detection;

/// Error taxonomy of the plugin
pub mod error;

/// HEALPix mesh, point-to-cell coarsening and polygon extraction
pub mod geometry;

/// The narrow interface through which the host offers parameters and fields
pub mod host;

/// Aviso notification handling
pub mod notification;

/// The plugin orchestrator: negotiate, setup, run, teardown
pub mod plugin;
