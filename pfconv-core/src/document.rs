// Pathfinder map import document: layout, serialization and writing

use crate::config::OutputMode;
use crate::error::{ConvertError, Result};
use crate::graph::Graph;
use crate::model::{Position, SolarSystem, Stargate};
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const MAP_CONFIG_ID: u32 = 10;
pub const MAP_SCOPE_ID: u32 = 1;
pub const MAP_ICON: &str = "fa-desktop";
pub const MAP_TYPE_ID: u32 = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub config: MapConfig,
    pub data: MapData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub id: u32,
    pub name: String,
    pub scope: IdRef,
    pub icon: String,
    #[serde(rename = "type")]
    pub map_type: IdRef,
    pub created: i64,
    pub updated: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapData {
    pub systems: Vec<SystemEntry>,
    pub connections: Vec<ConnectionEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef<T> {
    pub id: T,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreatedStamp {
    pub created: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpdatedStamp {
    pub updated: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sovereignty {
    pub faction: NamedRef<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemEntry {
    pub id: u64,
    pub created: CreatedStamp,
    pub updated: UpdatedStamp,
    pub system_id: u64,
    pub name: String,
    pub alias: String,
    #[serde(rename = "type")]
    pub system_type: IdRef,
    pub security: Option<String>,
    pub true_sec: f64,
    pub region: NamedRef<Option<u64>>,
    pub constellation: NamedRef<u64>,
    pub status: IdRef,
    pub locked: u8,
    pub rally_updated: i64,
    pub rally_poke: i64,
    pub current_user: bool,
    pub planets: Option<u32>,
    pub shattered: u8,
    pub drifter: u8,
    pub user_count: u32,
    pub position: Position,
    pub sovereignty: Sovereignty,
}

impl From<&SolarSystem> for SystemEntry {
    fn from(system: &SolarSystem) -> Self {
        Self {
            id: system.id(),
            created: CreatedStamp {
                created: system.created_at,
            },
            updated: UpdatedStamp {
                updated: system.updated_at,
            },
            system_id: system.id(),
            name: system.name.clone(),
            alias: system.alias.clone(),
            system_type: IdRef { id: system.type_id },
            security: system.security_class.clone(),
            true_sec: system.true_security,
            region: NamedRef {
                id: system.region_id,
                name: system.region_name.clone(),
            },
            constellation: NamedRef {
                id: system.constellation_id,
                name: system.constellation_name.clone(),
            },
            status: IdRef {
                id: system.status_id,
            },
            locked: system.locked,
            rally_updated: system.rally_updated,
            rally_poke: system.rally_poke,
            current_user: system.current_user,
            planets: system.planets,
            shattered: system.shattered,
            drifter: system.drifter,
            user_count: system.user_count,
            position: system.position,
            sovereignty: Sovereignty {
                faction: NamedRef {
                    id: system.sovereignty_faction_id,
                    name: system.sovereignty_faction_name.clone(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionEntry {
    pub id: u64,
    pub created: i64,
    pub updated: i64,
    pub source: u64,
    pub target: u64,
    pub source_name: String,
    pub source_alias: String,
    pub target_name: String,
    pub target_alias: String,
    pub scope: String,
    #[serde(rename = "type")]
    pub connection_type: Vec<String>,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    pub source: Endpoint,
    pub target: Endpoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub label: String,
    pub types: Vec<String>,
}

impl Endpoint {
    fn labelled(label: &str) -> Self {
        Self {
            label: label.to_string(),
            types: Vec::new(),
        }
    }
}

impl From<&Stargate> for ConnectionEntry {
    fn from(gate: &Stargate) -> Self {
        Self {
            id: gate.id,
            created: gate.created_at,
            updated: gate.created_at,
            source: gate.source,
            target: gate.target,
            // Pathfinder fills names in on import
            source_name: String::new(),
            source_alias: String::new(),
            target_name: String::new(),
            target_alias: String::new(),
            scope: gate.kind().to_string(),
            connection_type: vec![gate.kind().to_string()],
            endpoints: Endpoints {
                source: Endpoint::labelled("source"),
                target: Endpoint::labelled("target"),
            },
        }
    }
}

pub fn build_document(region_name: &str, graph: &Graph, now: i64) -> Document {
    Document {
        config: MapConfig {
            id: MAP_CONFIG_ID,
            name: region_name.to_string(),
            scope: IdRef { id: MAP_SCOPE_ID },
            icon: MAP_ICON.to_string(),
            map_type: IdRef { id: MAP_TYPE_ID },
            created: now,
            updated: now,
        },
        data: MapData {
            systems: graph.systems.iter().map(SystemEntry::from).collect(),
            connections: graph.connections.iter().map(ConnectionEntry::from).collect(),
        },
    }
}

/// Pretty-prints with four-space indentation, matching earlier exports.
pub fn to_pretty_bytes(document: &Document) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    document.serialize(&mut serializer)?;
    Ok(buffer)
}

pub fn serialize(region_name: &str, graph: &Graph, now: i64) -> Result<Vec<u8>> {
    to_pretty_bytes(&build_document(region_name, graph, now))
}

/// `<output_dir>/<region_name>.json`
pub fn output_path(output_dir: &Path, region_name: &str) -> PathBuf {
    output_dir.join(format!("{}.json", region_name))
}

pub fn write_document(path: &Path, bytes: &[u8], mode: OutputMode) -> Result<()> {
    let write_failure = |source: std::io::Error| ConvertError::OutputWriteFailure {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_failure)?;
    }

    match mode {
        OutputMode::Overwrite => fs::write(path, bytes).map_err(write_failure)?,
        OutputMode::Append => {
            let existing = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
            if existing > 0 {
                warn!(
                    "Appending to non-empty {} ({} bytes); the file will no longer be a single JSON document",
                    path.display(),
                    existing
                );
            }
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(write_failure)?;
            file.write_all(bytes).map_err(write_failure)?;
        }
    }

    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
