use crate::error::Result;
use crate::record::{StargateId, StargateRecord, SystemId, SystemRecord};
use std::future::Future;

/// Read-only access to universe data.
///
/// `Ok(None)` means the service answered but had nothing usable for the id
/// (any non-success status). `Err` means the request itself failed.
pub trait UniverseLookup {
    fn system(&self, id: SystemId) -> impl Future<Output = Result<Option<SystemRecord>>>;

    fn stargate(&self, id: StargateId) -> impl Future<Output = Result<Option<StargateRecord>>>;
}
