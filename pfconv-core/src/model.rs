// In-memory systems and stargates, built from already-fetched ESI records

use crate::config::ConvertConfig;
use crate::svg::Marker;
use pfconv_esi::{StargateId, StargateRecord, SystemId, SystemRecord};
use serde::{Deserialize, Serialize};

/// Pathfinder system type for k-space.
pub const SYSTEM_TYPE_ID: u32 = 2;
/// Pathfinder "unknown" system status.
pub const SYSTEM_STATUS_ID: u32 = 1;
pub const CONNECTION_SCOPE: &str = "stargate";

/// Canvas position in Pathfinder units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    /// Scales raw SVG coordinates, truncating toward zero on each axis.
    pub fn scaled(raw_x: f64, raw_y: f64, x_scale: f64, y_scale: f64) -> Self {
        Self {
            x: (raw_x * x_scale).trunc() as i64,
            y: (raw_y * y_scale).trunc() as i64,
        }
    }
}

/// One directed stargate jump, as seen from `source`.
#[derive(Debug, Clone, PartialEq)]
pub struct Stargate {
    pub id: StargateId,
    pub name: String,
    pub source: SystemId,
    pub target: SystemId,
    pub target_gate: StargateId,
    pub created_at: i64,
}

impl Stargate {
    pub fn from_record(record: StargateRecord, now: i64) -> Self {
        Self {
            id: record.stargate_id,
            name: record.name,
            source: record.system_id,
            target: record.destination.system_id,
            target_gate: record.destination.stargate_id,
            created_at: now,
        }
    }

    pub fn kind(&self) -> &'static str {
        CONNECTION_SCOPE
    }
}

/// A system on the map. ESI supplies identity, name and security; the SVG
/// supplies the position. Everything Pathfinder tracks per-map starts neutral.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarSystem {
    id: SystemId,
    pub name: String,
    pub alias: String,
    pub region_id: Option<u64>,
    pub region_name: String,
    pub constellation_id: u64,
    pub constellation_name: String,
    pub security_class: Option<String>,
    pub true_security: f64,
    pub position: Position,
    pub type_id: u32,
    pub status_id: u32,
    pub locked: u8,
    pub rally_updated: i64,
    pub rally_poke: i64,
    pub current_user: bool,
    pub planets: Option<u32>,
    pub shattered: u8,
    pub drifter: u8,
    pub user_count: u32,
    pub sovereignty_faction_id: u64,
    pub sovereignty_faction_name: String,
    pub created_at: i64,
    pub updated_at: i64,
    /// Gate ids reported by ESI, in ESI order
    pub stargate_ids: Vec<StargateId>,
    /// Resolved outgoing connections, filled in during assembly
    pub edges: Vec<Stargate>,
}

impl SolarSystem {
    pub fn from_record(
        marker: &Marker,
        record: SystemRecord,
        config: &ConvertConfig,
        now: i64,
    ) -> Self {
        let position = Position::scaled(marker.raw_x, marker.raw_y, config.x_scale, config.y_scale);

        Self {
            id: record.system_id,
            alias: record.name.clone(),
            name: record.name,
            region_id: record.region_id,
            region_name: String::new(),
            constellation_id: record.constellation_id.unwrap_or(0),
            constellation_name: String::new(),
            security_class: record.security_class,
            true_security: record.security_status,
            position,
            type_id: SYSTEM_TYPE_ID,
            status_id: SYSTEM_STATUS_ID,
            locked: 1,
            rally_updated: 0,
            rally_poke: 0,
            current_user: false,
            planets: None,
            shattered: 0,
            drifter: 0,
            user_count: 0,
            sovereignty_faction_id: 0,
            sovereignty_faction_name: String::new(),
            created_at: now,
            updated_at: now,
            stargate_ids: record.stargates,
            edges: Vec::new(),
        }
    }

    pub fn id(&self) -> SystemId {
        self.id
    }
}
