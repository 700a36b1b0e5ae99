// Shared fixtures for pfconv-core integration tests
#![allow(dead_code)]

use pfconv_esi::error::Result;
use pfconv_esi::{
    Destination, EsiError, StargateId, StargateRecord, SystemId, SystemRecord, UniverseLookup,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory stand-in for ESI. Unknown ids answer "absent".
#[derive(Default)]
pub struct FakeUniverse {
    systems: HashMap<SystemId, SystemRecord>,
    stargates: HashMap<StargateId, StargateRecord>,
    /// id -> number of calls that still fail with a transport-style error
    flaky: Mutex<HashMap<u64, u32>>,
    calls: Mutex<Vec<u64>>,
}

impl FakeUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system(mut self, id: SystemId, name: &str) -> Self {
        self.systems.insert(
            id,
            SystemRecord {
                system_id: id,
                name: name.to_string(),
                constellation_id: Some(20000000 + id),
                region_id: None,
                security_class: Some("C".to_string()),
                security_status: -0.25,
                stargates: Vec::new(),
            },
        );
        self
    }

    /// Adds a gate from `from` to `to`. Both systems need to be added first.
    pub fn with_gate(mut self, gate_id: StargateId, from: SystemId, to: SystemId, to_gate: StargateId) -> Self {
        if let Some(system) = self.systems.get_mut(&from) {
            system.stargates.push(gate_id);
        }
        self.stargates.insert(
            gate_id,
            StargateRecord {
                stargate_id: gate_id,
                name: format!("Stargate ({})", to),
                system_id: from,
                destination: Destination {
                    stargate_id: to_gate,
                    system_id: to,
                },
            },
        );
        self
    }

    /// Adds a two-way link: gate `a_gate` in `a` and `b_gate` in `b`.
    pub fn with_link(self, a: SystemId, a_gate: StargateId, b: SystemId, b_gate: StargateId) -> Self {
        self.with_gate(a_gate, a, b, b_gate)
            .with_gate(b_gate, b, a, a_gate)
    }

    /// Lists a gate on a system without ESI knowing the gate itself.
    pub fn with_dangling_gate(mut self, system: SystemId, gate_id: StargateId) -> Self {
        if let Some(record) = self.systems.get_mut(&system) {
            record.stargates.push(gate_id);
        }
        self
    }

    pub fn with_flaky(self, id: u64, failures: u32) -> Self {
        self.flaky.lock().unwrap().insert(id, failures);
        self
    }

    pub fn calls_for(&self, id: u64) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == id).count()
    }

    fn record_call(&self, id: u64) -> Result<()> {
        self.calls.lock().unwrap().push(id);
        let mut flaky = self.flaky.lock().unwrap();
        if let Some(remaining) = flaky.get_mut(&id)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(EsiError::ParseError(format!("flaky lookup {}", id)));
        }
        Ok(())
    }
}

impl UniverseLookup for FakeUniverse {
    async fn system(&self, id: SystemId) -> Result<Option<SystemRecord>> {
        self.record_call(id)?;
        Ok(self.systems.get(&id).cloned())
    }

    async fn stargate(&self, id: StargateId) -> Result<Option<StargateRecord>> {
        self.record_call(id)?;
        Ok(self.stargates.get(&id).cloned())
    }
}

/// A minimal dotlan-shaped SVG with one `<use>` marker per entry.
pub fn region_svg(markers: &[(&str, f64, f64)]) -> String {
    let mut svg = String::from(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="1024" height="768">
  <g id="jumps"><line x1="0" y1="0" x2="10" y2="10"/></g>
  <g id="sysuse">
"##,
    );
    for (id, x, y) in markers {
        svg.push_str(&format!(
            "    <use id=\"{}\" x=\"{}\" y=\"{}\" width=\"62.5\" height=\"30\" xlink:href=\"#def{}\"/>\n",
            id, x, y, id
        ));
    }
    svg.push_str("  </g>\n</svg>\n");
    svg
}

/// Ids 101, 102, 103 linked 101-102 and 102-103.
pub fn three_system_universe() -> FakeUniverse {
    FakeUniverse::new()
        .with_system(101, "Alpha")
        .with_system(102, "Bravo")
        .with_system(103, "Charlie")
        .with_link(101, 5001, 102, 5002)
        .with_link(102, 5003, 103, 5004)
}
