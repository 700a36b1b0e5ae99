pub mod client;
pub mod error;
pub mod lookup;
pub mod record;

pub use client::{DEFAULT_DATASOURCE, DEFAULT_ESI_URL, EsiClient};
pub use error::EsiError;
pub use lookup::UniverseLookup;
pub use record::{Destination, StargateId, StargateRecord, SystemId, SystemRecord};
