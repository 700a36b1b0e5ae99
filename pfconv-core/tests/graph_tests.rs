// Tests for graph assembly and connection deduplication

mod common;

use common::{FakeUniverse, region_svg, three_system_universe};
use pfconv_core::{
    ConvertConfig, ConvertError, Graph, LookupKind, LookupPolicy, Marker, SolarSystem, Stargate,
    assemble, assemble_resolved, extract,
};
use pfconv_esi::{Destination, StargateRecord, SystemRecord};

const NOW: i64 = 1_700_000_000;

async fn assemble_svg(universe: &FakeUniverse, markers: &[(&str, f64, f64)], config: &ConvertConfig) -> Graph {
    let svg = region_svg(markers);
    let systems = extract(universe, &svg, config, NOW, None).await.unwrap();
    assemble(universe, systems, config, NOW, None).await.unwrap()
}

fn pairs(graph: &Graph) -> Vec<(u64, u64)> {
    graph.connections.iter().map(|c| (c.source, c.target)).collect()
}

// ============================================================================
// Deduplication Tests
// ============================================================================

#[tokio::test]
async fn test_three_system_chain() {
    let universe = three_system_universe();
    let graph = assemble_svg(
        &universe,
        &[("sys101", 0.0, 0.0), ("sys102", 10.0, 10.0), ("sys103", 20.0, 20.0)],
        &ConvertConfig::default(),
    )
    .await;

    assert_eq!(graph.systems.len(), 3);
    assert_eq!(pairs(&graph), vec![(101, 102), (102, 103)]);
    assert_eq!(graph.connections[0].id, 5001);
    assert_eq!(graph.connections[1].id, 5003);
    assert_eq!(graph.skipped_edges, 0);
    assert_eq!(graph.truncated_systems, 0);
}

#[tokio::test]
async fn test_direction_follows_processing_order() {
    let universe = three_system_universe();
    let graph = assemble_svg(
        &universe,
        &[("sys103", 0.0, 0.0), ("sys102", 10.0, 10.0), ("sys101", 20.0, 20.0)],
        &ConvertConfig::default(),
    )
    .await;

    assert_eq!(pairs(&graph), vec![(103, 102), (102, 101)]);
}

#[tokio::test]
async fn test_edges_are_attached_to_systems() {
    let universe = three_system_universe();
    let graph = assemble_svg(
        &universe,
        &[("sys101", 0.0, 0.0), ("sys102", 10.0, 10.0), ("sys103", 20.0, 20.0)],
        &ConvertConfig::default(),
    )
    .await;

    // Both directions stay on the systems even though only one is emitted
    let bravo = &graph.systems[1];
    let targets: Vec<u64> = bravo.edges.iter().map(|e| e.target).collect();
    assert_eq!(targets, vec![101, 103]);
}

#[tokio::test]
async fn test_gates_leaving_the_region_are_kept() {
    let universe = FakeUniverse::new()
        .with_system(101, "Alpha")
        .with_system(900, "Elsewhere")
        .with_link(101, 5001, 900, 5900);

    let graph = assemble_svg(&universe, &[("sys101", 0.0, 0.0)], &ConvertConfig::default()).await;

    assert_eq!(graph.systems.len(), 1);
    assert_eq!(pairs(&graph), vec![(101, 900)]);
}

#[tokio::test]
async fn test_fully_connected_triangle() {
    let universe = FakeUniverse::new()
        .with_system(1, "A")
        .with_system(2, "B")
        .with_system(3, "C")
        .with_link(1, 11, 2, 21)
        .with_link(1, 12, 3, 31)
        .with_link(2, 23, 3, 32);

    let graph = assemble_svg(
        &universe,
        &[("sys1", 0.0, 0.0), ("sys2", 0.0, 0.0), ("sys3", 0.0, 0.0)],
        &ConvertConfig::default(),
    )
    .await;

    assert_eq!(pairs(&graph), vec![(1, 2), (1, 3), (2, 3)]);
}

// ============================================================================
// Lookup Failure Tests
// ============================================================================

#[tokio::test]
async fn test_unknown_gate_is_skipped() {
    let universe = three_system_universe().with_dangling_gate(101, 5999);
    let graph = assemble_svg(
        &universe,
        &[("sys101", 0.0, 0.0), ("sys102", 10.0, 10.0), ("sys103", 20.0, 20.0)],
        &ConvertConfig::default(),
    )
    .await;

    assert_eq!(pairs(&graph), vec![(101, 102), (102, 103)]);
    assert_eq!(graph.skipped_edges, 1);
}

#[tokio::test]
async fn test_unknown_gate_aborts_when_configured() {
    let universe = three_system_universe().with_dangling_gate(102, 5999);
    let config = ConvertConfig::default().with_lookup_policy(LookupPolicy::Abort);
    let svg = region_svg(&[("sys101", 0.0, 0.0), ("sys102", 10.0, 10.0)]);
    let systems = extract(&universe, &svg, &config, NOW, None).await.unwrap();

    let err = assemble(&universe, systems, &config, NOW, None).await.unwrap_err();

    assert!(matches!(
        err,
        ConvertError::LookupUnavailable {
            kind: LookupKind::Stargate,
            id: 5999,
            ..
        }
    ));
}

#[tokio::test]
async fn test_flaky_gate_recovers_with_retry() {
    let universe = three_system_universe().with_flaky(5001, 1);
    let config = ConvertConfig::default().with_lookup_policy(LookupPolicy::Retry(1));

    let graph = assemble_svg(
        &universe,
        &[("sys101", 0.0, 0.0), ("sys102", 10.0, 10.0), ("sys103", 20.0, 20.0)],
        &config,
    )
    .await;

    assert_eq!(pairs(&graph), vec![(101, 102), (102, 103)]);
    assert_eq!(universe.calls_for(5001), 2);
}

#[tokio::test]
async fn test_missing_system_drops_only_that_system() {
    let universe = three_system_universe();
    let graph = assemble_svg(
        &universe,
        &[("sys101", 0.0, 0.0), ("sys555", 5.0, 5.0), ("sys103", 20.0, 20.0)],
        &ConvertConfig::default(),
    )
    .await;

    let ids: Vec<u64> = graph.systems.iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec![101, 103]);
    // 102 was never walked, so both gates into it survive
    assert_eq!(pairs(&graph), vec![(101, 102), (103, 102)]);
}

// ============================================================================
// System Cap Tests
// ============================================================================

fn chain_universe(len: u64) -> FakeUniverse {
    let mut universe = FakeUniverse::new();
    for id in 1..=len {
        universe = universe.with_system(id, &format!("S{}", id));
    }
    for id in 1..len {
        universe = universe.with_link(id, 10_000 + id, id + 1, 20_000 + id);
    }
    universe
}

#[tokio::test]
async fn test_systems_are_capped_but_connections_are_not() {
    let universe = chain_universe(105);
    let names: Vec<String> = (1..=105).map(|id| format!("sys{}", id)).collect();
    let markers: Vec<(&str, f64, f64)> = names.iter().map(|n| (n.as_str(), 0.0, 0.0)).collect();

    let graph = assemble_svg(&universe, &markers, &ConvertConfig::default()).await;

    assert_eq!(graph.systems.len(), 100);
    assert_eq!(graph.truncated_systems, 5);
    assert_eq!(graph.systems.last().unwrap().id(), 100);
    assert_eq!(graph.connections.len(), 104);
    assert!(pairs(&graph).contains(&(104, 105)));
}

#[tokio::test]
async fn test_cap_not_reached() {
    let universe = chain_universe(4);
    let graph = assemble_svg(
        &universe,
        &[("sys1", 0.0, 0.0), ("sys2", 0.0, 0.0), ("sys3", 0.0, 0.0), ("sys4", 0.0, 0.0)],
        &ConvertConfig::default(),
    )
    .await;

    assert_eq!(graph.systems.len(), 4);
    assert_eq!(graph.truncated_systems, 0);
}

#[tokio::test]
async fn test_repeated_marker_yields_one_system_and_unique_connections() {
    let universe = three_system_universe();
    let graph = assemble_svg(
        &universe,
        &[("sys101", 0.0, 0.0), ("sys101", 0.0, 0.0), ("sys102", 10.0, 10.0)],
        &ConvertConfig::default(),
    )
    .await;

    let ids: Vec<u64> = graph.systems.iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec![101, 102]);
    assert_eq!(pairs(&graph), vec![(101, 102), (102, 103)]);
}

// ============================================================================
// Pure Assembly Tests
// ============================================================================

fn resolved(id: u64, targets: &[u64]) -> SolarSystem {
    let marker = Marker { system_id: id, raw_x: 0.0, raw_y: 0.0 };
    let record = SystemRecord {
        system_id: id,
        name: format!("S{}", id),
        constellation_id: None,
        region_id: None,
        security_class: None,
        security_status: 0.0,
        stargates: Vec::new(),
    };
    let mut system = SolarSystem::from_record(&marker, record, &ConvertConfig::default(), NOW);
    for (i, target) in targets.iter().enumerate() {
        system.edges.push(Stargate::from_record(
            StargateRecord {
                stargate_id: id * 100 + i as u64,
                name: String::new(),
                system_id: id,
                destination: Destination {
                    stargate_id: 0,
                    system_id: *target,
                },
            },
            NOW,
        ));
    }
    system
}

#[test]
fn test_assemble_resolved_drops_self_loops() {
    let graph = assemble_resolved(vec![resolved(1, &[1, 2]), resolved(2, &[1])], 100);
    assert_eq!(pairs(&graph), vec![(1, 2)]);
}

#[test]
fn test_assemble_resolved_custom_cap() {
    let graph = assemble_resolved(
        vec![resolved(1, &[2]), resolved(2, &[3]), resolved(3, &[4])],
        2,
    );
    assert_eq!(graph.systems.len(), 2);
    assert_eq!(graph.truncated_systems, 1);
    assert_eq!(pairs(&graph), vec![(1, 2), (2, 3), (3, 4)]);
}

#[test]
fn test_assemble_resolved_empty() {
    let graph = assemble_resolved(Vec::new(), 100);
    assert!(graph.systems.is_empty());
    assert!(graph.connections.is_empty());
}

#[test]
fn test_assemble_resolved_drops_repeated_system() {
    let graph = assemble_resolved(
        vec![resolved(1, &[2]), resolved(1, &[2]), resolved(2, &[1, 3])],
        100,
    );

    let ids: Vec<u64> = graph.systems.iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(pairs(&graph), vec![(1, 2), (2, 3)]);
}
