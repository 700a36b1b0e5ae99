//! Converts dotlan region SVGs into Pathfinder map imports.
//!
//! The pipeline is split so each step can be driven on its own: markers are
//! parsed from the SVG without any I/O, resolved into systems through a
//! [`pfconv_esi::UniverseLookup`], assembled into a deduplicated graph and
//! finally written as a Pathfinder JSON document.

pub mod config;
pub mod document;
pub mod error;
pub mod graph;
pub mod model;
pub mod pipeline;
pub mod resolve;
pub mod svg;

pub use config::{ConvertConfig, LookupPolicy, OutputMode};
pub use error::{ConvertError, LookupKind, Result};
pub use graph::{Graph, assemble, assemble_resolved};
pub use model::{Position, SolarSystem, Stargate};
pub use pipeline::{ConversionSummary, ConvertOptions, ProgressCallback, convert};
pub use svg::{Marker, extract, parse_markers, resolve_systems};
