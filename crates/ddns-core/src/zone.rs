//! Hosted zone resolution
//!
//! Zones are matched by exact, byte-for-byte name equality. No normalization
//! of case or trailing dots is applied; the caller must pass the zone name in
//! the form the provider renders it.

use crate::error::{Error, Result};
use crate::traits::{DnsProvider, HostedZone};

/// Find the first zone in `zones` whose name equals `zone_name`
///
/// On a miss the error names the requested zone, and suggests a visible zone
/// that differs only by a trailing dot.
pub fn find_zone(zones: &[HostedZone], zone_name: &str) -> Result<HostedZone> {
    if let Some(zone) = zones.iter().find(|zone| zone.name == zone_name) {
        return Ok(zone.clone());
    }

    let hint = zones
        .iter()
        .find(|zone| zone.name.trim_end_matches('.') == zone_name.trim_end_matches('.'))
        .map(|zone| format!(" (did you mean '{}'?)", zone.name))
        .unwrap_or_default();

    Err(Error::not_found(format!(
        "unable to find zone: {}{}",
        zone_name, hint
    )))
}

/// List the provider's hosted zones and resolve `zone_name` among them
pub async fn resolve_zone(provider: &dyn DnsProvider, zone_name: &str) -> Result<HostedZone> {
    let zones = provider.list_hosted_zones().await?;
    tracing::debug!(
        "{} hosted zone(s) visible to {}",
        zones.len(),
        provider.provider_name()
    );
    find_zone(&zones, zone_name)
}
