use serde::{Deserialize, Serialize};

pub type SystemId = u64;
pub type StargateId = u64;

/// Subset of `GET /universe/systems/{system_id}/` that a map import needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemRecord {
    pub system_id: SystemId,
    pub name: String,
    pub constellation_id: Option<u64>,
    pub region_id: Option<u64>,
    pub security_class: Option<String>,
    pub security_status: f64,
    // Systems without gates (e.g. Jove space) omit the key entirely
    #[serde(default)]
    pub stargates: Vec<StargateId>,
}

/// Subset of `GET /universe/stargates/{stargate_id}/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StargateRecord {
    pub stargate_id: StargateId,
    pub name: String,
    pub system_id: SystemId,
    pub destination: Destination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub stargate_id: StargateId,
    pub system_id: SystemId,
}
