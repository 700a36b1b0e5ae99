// Turns resolved systems into the system/connection lists of one map

use crate::config::ConvertConfig;
use crate::error::Result;
use crate::model::{SolarSystem, Stargate};
use crate::pipeline::ProgressCallback;
use crate::resolve::resolve_stargate;
use pfconv_esi::{SystemId, UniverseLookup};
use std::collections::HashSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Systems in extraction order, truncated to the configured cap
    pub systems: Vec<SolarSystem>,
    /// One entry per physical gate pair, from whichever side came first
    pub connections: Vec<Stargate>,
    /// Systems dropped by the cap
    pub truncated_systems: usize,
    /// Gates the lookup policy skipped
    pub skipped_edges: usize,
}

/// Resolves every gate of every system, attaches them as the system's
/// outgoing edges, then deduplicates and caps.
///
/// Gates are resolved for all systems, including those past the cap.
pub async fn assemble<L: UniverseLookup>(
    lookup: &L,
    mut systems: Vec<SolarSystem>,
    config: &ConvertConfig,
    now: i64,
    progress: Option<&ProgressCallback>,
) -> Result<Graph> {
    let total = systems.len();
    let mut skipped_edges = 0;

    for (index, system) in systems.iter_mut().enumerate() {
        if let Some(callback) = progress {
            callback(format!(
                "Resolving gates of {} ({}/{})",
                system.name,
                index + 1,
                total
            ));
        }

        for gate_id in system.stargate_ids.clone() {
            match resolve_stargate(lookup, gate_id, config.lookup_policy).await? {
                Some(record) => system.edges.push(Stargate::from_record(record, now)),
                None => skipped_edges += 1,
            }
        }
    }

    let mut graph = assemble_resolved(systems, config.max_systems);
    graph.skipped_edges = skipped_edges;
    Ok(graph)
}

/// The pure half of assembly: walk systems in order, keep a gate only when
/// its destination has not been walked yet, and cap the system list. A system
/// id seen twice keeps only its first occurrence.
pub fn assemble_resolved(systems: Vec<SolarSystem>, max_systems: usize) -> Graph {
    let mut scanned: HashSet<SystemId> = HashSet::with_capacity(systems.len());
    let mut connections = Vec::new();
    let mut unique = Vec::with_capacity(systems.len());

    for system in systems {
        if !scanned.insert(system.id()) {
            warn!("Dropping repeated system {}", system.id());
            continue;
        }

        for gate in &system.edges {
            if scanned.contains(&gate.target) {
                debug!(
                    "Dropping reverse gate {} ({} -> {})",
                    gate.id, gate.source, gate.target
                );
                continue;
            }
            connections.push(gate.clone());
        }
        unique.push(system);
    }

    let truncated_systems = unique.len().saturating_sub(max_systems);
    let systems: Vec<SolarSystem> = unique.into_iter().take(max_systems).collect();

    info!(
        "Assembled {} systems ({} over cap) and {} connections",
        systems.len(),
        truncated_systems,
        connections.len()
    );

    Graph {
        systems,
        connections,
        truncated_systems,
        skipped_edges: 0,
    }
}
