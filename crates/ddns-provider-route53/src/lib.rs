// # Route53 DNS Provider
//
// This crate provides the AWS Route53 implementation of `DnsProvider` for the
// DDNS job.
//
// ## Behavior
//
// - `list_hosted_zones` follows `NextMarker` until `IsTruncated` is false
// - `submit_change` sends exactly one `ChangeResourceRecordSets` request
// - SDK retries are disabled; failures are returned verbatim
// - Dry-run mode builds and logs the change batch without sending it
//
// ## API Reference
//
// - ListHostedZones: GET `/2013-04-01/hostedzone`
// - ChangeResourceRecordSets: POST `/2013-04-01/hostedzone/{Id}/rrset`

mod batch;
mod credentials;

pub use batch::{to_change_batch, to_record_set};
pub use credentials::{CredentialProvider, Credentials, FALLBACK_REGION, Route53Settings};

use async_trait::async_trait;
use aws_sdk_route53::Client;
use aws_sdk_route53::error::DisplayErrorContext;
use ddns_core::traits::{
    ChangeReceipt, DnsProvider, DnsProviderFactory, HostedZone, RecordChange, UpsertOutcome,
};
use ddns_core::{Error, Result};

/// Provider name used in logs and errors
pub const PROVIDER_NAME: &str = "route53";

/// Route53 DNS provider
pub struct Route53Provider {
    /// Authenticated Route53 client
    client: Client,

    /// Dry-run mode: list zones, but skip the change request
    dry_run: bool,
}

impl std::fmt::Debug for Route53Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Provider")
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl Route53Provider {
    /// Create a provider around an existing client
    pub fn new(client: Client, dry_run: bool) -> Self {
        Self { client, dry_run }
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>> {
        let mut zones = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let output = self
                .client
                .list_hosted_zones()
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| {
                    Error::provider(
                        PROVIDER_NAME,
                        format!("ListHostedZones failed: {}", DisplayErrorContext(&e)),
                    )
                })?;

            zones.extend(
                output
                    .hosted_zones()
                    .iter()
                    .map(|hz| HostedZone::new(hz.id(), hz.name())),
            );

            if !output.is_truncated() {
                break;
            }
            match output.next_marker() {
                Some(next) => {
                    tracing::debug!("Hosted zone list truncated, continuing at {}", next);
                    marker = Some(next.to_string());
                }
                None => {
                    return Err(Error::provider(
                        PROVIDER_NAME,
                        "ListHostedZones truncated without NextMarker",
                    ));
                }
            }
        }

        Ok(zones)
    }

    async fn submit_change(
        &self,
        zone: &HostedZone,
        change: &RecordChange,
    ) -> Result<UpsertOutcome> {
        let batch = to_change_batch(change)?;

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send ChangeResourceRecordSets to {} with payload: {}",
                zone.id,
                serde_json::to_string(change)?
            );
            return Ok(UpsertOutcome::DryRun);
        }

        tracing::debug!(
            "ChangeResourceRecordSets {} {} {} -> {}",
            zone.id,
            change.action,
            change.record_name,
            change.value
        );

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(&zone.id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, DisplayErrorContext(&e).to_string()))?;

        let info = output.change_info().ok_or_else(|| {
            Error::provider(PROVIDER_NAME, "ChangeResourceRecordSets returned no ChangeInfo")
        })?;

        Ok(UpsertOutcome::Submitted(ChangeReceipt {
            change_id: info.id().to_string(),
            status: info.status().as_str().to_string(),
        }))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Bootstrap for Route53 providers
///
/// Holds the injected credential source; nothing is loaded until
/// [`DnsProviderFactory::create`] runs.
#[derive(Debug, Clone, Default)]
pub struct Route53Factory {
    credentials: CredentialProvider,
    settings: Route53Settings,
}

impl Route53Factory {
    /// Create a factory for the given credential source and settings
    pub fn new(credentials: CredentialProvider, settings: Route53Settings) -> Self {
        Self {
            credentials,
            settings,
        }
    }

    /// Client settings
    pub fn settings(&self) -> &Route53Settings {
        &self.settings
    }
}

#[async_trait]
impl DnsProviderFactory for Route53Factory {
    async fn create(&self) -> Result<Box<dyn DnsProvider>> {
        let sdk_config = self.credentials.load(&self.settings).await?;

        if self.settings.dry_run {
            tracing::warn!("Route53 provider running in DRY-RUN mode - no changes will be made");
        }

        Ok(Box::new(Route53Provider::new(
            Client::new(&sdk_config),
            self.settings.dry_run,
        )))
    }
}
