// # DNS Provider Trait
//
// Defines the interface for listing hosted zones and submitting record
// changes through a cloud DNS provider API.
//
// ## Implementations
//
// - Route53: `ddns-provider-route53` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{DnsProvider, RecordChange};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let zones = provider.list_hosted_zones().await?;
//     let change = RecordChange::upsert_a("host.example.com.", &"203.0.113.7".into());
//     provider.submit_change(&zones[0], &change).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::config::{CHANGE_COMMENT, RECORD_TTL_SECS};
use crate::traits::ExternalIp;

/// A hosted zone visible to the provider credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostedZone {
    /// Provider zone id (Route53 renders it as "/hostedzone/Z123")
    pub id: String,
    /// Zone name as rendered by the provider, usually with a trailing dot
    pub name: String,
}

impl HostedZone {
    /// Create a zone reference
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Change action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    /// Create the record if absent, overwrite it if present
    Upsert,
}

impl ChangeAction {
    /// Wire name of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Upsert => "UPSERT",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordType {
    /// IPv4 address record
    A,
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single resource record change, provider independent
///
/// This is the only mutation the job ever sends. It is built once and
/// submitted once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordChange {
    /// What to do with the record set
    pub action: ChangeAction,
    /// Record name (the domain being updated)
    pub record_name: String,
    /// Record type
    pub record_type: RecordType,
    /// Record value (the discovered IP, verbatim)
    pub value: String,
    /// Time-to-live in seconds
    pub ttl_secs: i64,
    /// Change-batch comment
    pub comment: String,
}

impl RecordChange {
    /// Build the UPSERT of an A record for `domain` pointing at `ip`
    pub fn upsert_a(domain: &str, ip: &ExternalIp) -> Self {
        Self {
            action: ChangeAction::Upsert,
            record_name: domain.to_string(),
            record_type: RecordType::A,
            value: ip.as_str().to_string(),
            ttl_secs: RECORD_TTL_SECS,
            comment: CHANGE_COMMENT.to_string(),
        }
    }
}

/// What the provider reported after accepting a change batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeReceipt {
    /// Provider change id (Route53: "/change/C...")
    pub change_id: String,
    /// Propagation status (Route53: "PENDING" or "INSYNC")
    pub status: String,
}

/// Result of the upsert step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The change batch was accepted by the provider
    Submitted(ChangeReceipt),
    /// Dry-run mode: the change batch was built and logged but not sent
    DryRun,
}

/// Trait for DNS provider implementations
///
/// # Contract
///
/// - `list_hosted_zones` returns every zone visible to the credentials,
///   following provider pagination to the end.
/// - `submit_change` issues exactly one change request and reports the
///   provider's error verbatim. It never retries.
/// - Neither method decides whether an update is needed; UPSERT semantics at
///   the provider make a repeated identical change a no-op.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List all hosted zones visible to the credentials
    async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>, crate::Error>;

    /// Submit a single change to the given zone
    ///
    /// # Returns
    ///
    /// - `Ok(UpsertOutcome::Submitted)`: The provider accepted the change
    /// - `Ok(UpsertOutcome::DryRun)`: Nothing was sent (dry-run providers)
    /// - `Err(Error::Provider)`: The request was rejected or failed
    async fn submit_change(
        &self,
        zone: &HostedZone,
        change: &RecordChange,
    ) -> Result<UpsertOutcome, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Bootstrap for DNS providers
///
/// Loading credentials and building an authenticated client is its own step
/// of the job (it runs after the IP lookup), so the job receives a factory
/// rather than a ready client.
#[async_trait]
pub trait DnsProviderFactory: Send + Sync {
    /// Load credentials/configuration and create an authenticated provider
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn DnsProvider>)`: A ready provider
    /// - `Err(Error::Config)`: Credentials or configuration could not be loaded
    async fn create(&self) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
