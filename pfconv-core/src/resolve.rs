// Applies the configured LookupPolicy around single ESI lookups

use crate::config::LookupPolicy;
use crate::error::{ConvertError, LookupKind, Result};
use pfconv_esi::{StargateId, StargateRecord, SystemId, SystemRecord, UniverseLookup};
use std::future::Future;
use tracing::{debug, warn};

/// Looks up one system. `Ok(None)` means the policy decided to skip it.
pub async fn resolve_system<L: UniverseLookup>(
    lookup: &L,
    id: SystemId,
    policy: LookupPolicy,
) -> Result<Option<SystemRecord>> {
    with_policy(LookupKind::System, id, policy, || lookup.system(id)).await
}

/// Looks up one stargate. `Ok(None)` means the policy decided to skip it.
pub async fn resolve_stargate<L: UniverseLookup>(
    lookup: &L,
    id: StargateId,
    policy: LookupPolicy,
) -> Result<Option<StargateRecord>> {
    with_policy(LookupKind::Stargate, id, policy, || lookup.stargate(id)).await
}

async fn with_policy<T, F, Fut>(
    kind: LookupKind,
    id: u64,
    policy: LookupPolicy,
    mut fetch: F,
) -> Result<Option<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = pfconv_esi::error::Result<Option<T>>>,
{
    let attempts = policy.attempts();
    let mut reason = String::new();

    for attempt in 1..=attempts {
        match fetch().await {
            Ok(Some(record)) => return Ok(Some(record)),
            Ok(None) => reason = "ESI returned no record".to_string(),
            Err(e) => reason = e.to_string(),
        }
        if attempt < attempts {
            debug!("Retrying {} {} ({}/{}): {}", kind, id, attempt, attempts, reason);
        }
    }

    match policy {
        LookupPolicy::Abort => Err(ConvertError::LookupUnavailable { kind, id, reason }),
        LookupPolicy::Skip | LookupPolicy::Retry(_) => {
            warn!("Skipping {} {}: {}", kind, id, reason);
            Ok(None)
        }
    }
}
