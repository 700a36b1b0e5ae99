// Reads system markers out of a dotlan region SVG

use crate::config::{ConvertConfig, SVG_NAMESPACE};
use crate::error::{ConvertError, Result};
use crate::model::SolarSystem;
use crate::pipeline::ProgressCallback;
use crate::resolve::resolve_system;
use pfconv_esi::{SystemId, UniverseLookup};
use roxmltree::{Document, Node, ParsingOptions};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// A system marker as drawn in the SVG, before anything is fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub system_id: SystemId,
    pub raw_x: f64,
    pub raw_y: f64,
}

/// Finds the marker layer and reads one `Marker` per element child, in
/// document order. Only the first marker for a system id is kept.
pub fn parse_markers(svg: &str, config: &ConvertConfig) -> Result<Vec<Marker>> {
    // dotlan exports carry an SVG 1.1 DOCTYPE
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;

    let document = Document::parse_with_options(svg, options)
        .map_err(|e| ConvertError::MalformedInput(format!("Not a valid SVG document: {}", e)))?;

    let layer = document
        .descendants()
        .find(|node| {
            node.has_tag_name((SVG_NAMESPACE, "g"))
                && node.attribute("id") == Some(config.system_layer_id.as_str())
        })
        .ok_or_else(|| {
            ConvertError::MalformedInput(format!(
                "No <g id=\"{}\"> marker layer in SVG",
                config.system_layer_id
            ))
        })?;

    let mut seen = HashSet::new();
    let mut markers = Vec::new();
    for node in layer.children().filter(|node| node.is_element()) {
        let marker = parse_marker(node, config.marker_prefix_len)?;
        if !seen.insert(marker.system_id) {
            warn!("Ignoring repeated marker for system {}", marker.system_id);
            continue;
        }
        markers.push(marker);
    }

    debug!("Found {} markers in layer '{}'", markers.len(), config.system_layer_id);
    Ok(markers)
}

fn parse_marker(node: Node<'_, '_>, prefix_len: usize) -> Result<Marker> {
    let raw_id = required_attribute(node, "id")?;
    let system_id = strip_marker_prefix(raw_id, prefix_len)
        .and_then(|id| id.parse::<SystemId>().ok())
        .ok_or_else(|| {
            ConvertError::MalformedInput(format!("Marker id '{}' does not name a system", raw_id))
        })?;

    Ok(Marker {
        system_id,
        raw_x: coordinate(node, raw_id, "x")?,
        raw_y: coordinate(node, raw_id, "y")?,
    })
}

/// Drops the first `prefix_len` characters; `None` when nothing would remain.
pub fn strip_marker_prefix(raw_id: &str, prefix_len: usize) -> Option<&str> {
    let (offset, _) = raw_id.char_indices().nth(prefix_len)?;
    Some(&raw_id[offset..])
}

fn required_attribute<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        ConvertError::MalformedInput(format!(
            "<{}> marker without '{}' attribute",
            node.tag_name().name(),
            name
        ))
    })
}

fn coordinate(node: Node<'_, '_>, raw_id: &str, axis: &str) -> Result<f64> {
    let value = required_attribute(node, axis)?;
    match value.trim().parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(ConvertError::MalformedInput(format!(
            "Marker '{}' has non-numeric {} '{}'",
            raw_id, axis, value
        ))),
    }
}

/// Resolves every marker against ESI. Markers the lookup policy skips are
/// left out entirely; no partially populated system is ever returned.
pub async fn resolve_systems<L: UniverseLookup>(
    lookup: &L,
    markers: &[Marker],
    config: &ConvertConfig,
    now: i64,
    progress: Option<&ProgressCallback>,
) -> Result<Vec<SolarSystem>> {
    let mut systems = Vec::with_capacity(markers.len());

    for (index, marker) in markers.iter().enumerate() {
        if let Some(callback) = progress {
            callback(format!(
                "Resolving system {}/{} ({})",
                index + 1,
                markers.len(),
                marker.system_id
            ));
        }

        if let Some(record) = resolve_system(lookup, marker.system_id, config.lookup_policy).await? {
            systems.push(SolarSystem::from_record(marker, record, config, now));
        }
    }

    info!("Resolved {} of {} systems", systems.len(), markers.len());
    Ok(systems)
}

/// Parses the SVG and resolves every marker it contains.
pub async fn extract<L: UniverseLookup>(
    lookup: &L,
    svg: &str,
    config: &ConvertConfig,
    now: i64,
    progress: Option<&ProgressCallback>,
) -> Result<Vec<SolarSystem>> {
    let markers = parse_markers(svg, config)?;
    resolve_systems(lookup, &markers, config, now, progress).await
}
