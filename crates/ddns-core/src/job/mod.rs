//! One-shot DDNS job
//!
//! The DdnsJob runs the update workflow exactly once:
//! - Discover the current public IP via IpSource
//! - Load credentials and build a DnsProvider via DnsProviderFactory
//! - Resolve the hosted zone by exact name
//! - Upsert the A record for the domain
//!
//! ## Stage Flow
//!
//! ```text
//! LookupIp ──► Authenticate ──► ResolveZone ──► UpsertRecord ──► Done
//!    │              │                │                │
//!    └──────────────┴────────┬───────┴────────────────┘
//!                            ▼
//!                         Failed
//! ```
//!
//! Every stage is terminal on failure. There is no retry or recovery
//! transition; the first error is returned to the caller together with a
//! [`JobEvent::Failed`] naming the stage it happened in.

use crate::config::JobConfig;
use crate::error::{Error, Result};
use crate::traits::{
    DnsProvider, DnsProviderFactory, ExternalIp, HostedZone, IpSource, RecordChange,
    UpsertOutcome,
};
use crate::zone;
use std::fmt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Capacity of the job event channel
///
/// A run emits at most a dozen events, so the channel never fills unless the
/// receiver is dropped.
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Stages of a job run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStage {
    /// Query the IP-echo service
    LookupIp,
    /// Load credentials and build the provider client
    Authenticate,
    /// Find the hosted zone by name
    ResolveZone,
    /// Submit the A record upsert
    UpsertRecord,
    /// Run completed
    Done,
}

impl JobStage {
    /// Stage name (for logging)
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStage::LookupIp => "lookup_ip",
            JobStage::Authenticate => "authenticate",
            JobStage::ResolveZone => "resolve_zone",
            JobStage::UpsertRecord => "upsert_record",
            JobStage::Done => "done",
        }
    }
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events emitted by the DdnsJob
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    /// A stage was entered
    StageStarted {
        stage: JobStage,
    },

    /// The public IP was discovered
    IpDiscovered {
        ip: ExternalIp,
    },

    /// The provider client is ready
    ProviderReady {
        provider: &'static str,
    },

    /// The hosted zone was resolved
    ZoneResolved {
        zone: HostedZone,
    },

    /// The record change went through the provider
    ChangeApplied {
        zone_id: String,
        change: RecordChange,
        outcome: UpsertOutcome,
    },

    /// The run finished successfully
    Finished,

    /// The run stopped at `stage`
    Failed {
        stage: JobStage,
        error: String,
    },
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    /// The zone the record was upserted into
    pub zone: HostedZone,
    /// The updated domain
    pub domain_name: String,
    /// The IP the record now points at
    pub ip: ExternalIp,
    /// What the provider reported
    pub outcome: UpsertOutcome,
}

/// One-shot DDNS job
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsJob::new()`]
/// 2. Execute with [`DdnsJob::run()`]
/// 3. Drop
///
/// The job owns no state beyond its inputs, and running it twice performs
/// the whole workflow twice.
pub struct DdnsJob {
    /// IP source for the public IP lookup
    ip_source: Box<dyn IpSource>,

    /// Bootstrap for the DNS provider
    provider_factory: Box<dyn DnsProviderFactory>,

    /// Job inputs
    config: JobConfig,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<JobEvent>,
}

impl DdnsJob {
    /// Create a new DDNS job
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider_factory`: DNS provider bootstrap
    /// - `config`: Job configuration
    ///
    /// # Returns
    ///
    /// A tuple of (job, event_receiver) where event_receiver yields job events
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider_factory: Box<dyn DnsProviderFactory>,
        config: JobConfig,
    ) -> Result<(Self, mpsc::Receiver<JobEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let job = Self {
            ip_source,
            provider_factory,
            config,
            event_tx: tx,
        };

        Ok((job, rx))
    }

    /// Run the job
    ///
    /// # Returns
    ///
    /// - `Ok(JobReport)`: The record was upserted (or dry-run logged)
    /// - `Err(Error)`: The first failure, unmodified
    pub async fn run(&self) -> Result<JobReport> {
        info!("Zone name: {}", self.config.zone_name);
        info!("Domain: {}", self.config.domain_name);

        let ip = self
            .lookup_ip()
            .await
            .map_err(|e| self.failed(JobStage::LookupIp, e))?;

        let provider = self
            .authenticate()
            .await
            .map_err(|e| self.failed(JobStage::Authenticate, e))?;

        let zone = self
            .resolve_zone(provider.as_ref())
            .await
            .map_err(|e| self.failed(JobStage::ResolveZone, e))?;

        let outcome = self
            .upsert_record(provider.as_ref(), &zone, &ip)
            .await
            .map_err(|e| self.failed(JobStage::UpsertRecord, e))?;

        self.emit_event(JobEvent::StageStarted {
            stage: JobStage::Done,
        });
        self.emit_event(JobEvent::Finished);
        info!("Done");

        Ok(JobReport {
            zone,
            domain_name: self.config.domain_name.clone(),
            ip,
            outcome,
        })
    }

    async fn lookup_ip(&self) -> Result<ExternalIp> {
        self.enter(JobStage::LookupIp);

        let ip = self.ip_source.current().await?;
        if self.config.require_ipv4 {
            ip.to_ipv4()?;
        }

        info!("Current IP: {}", ip);
        self.emit_event(JobEvent::IpDiscovered { ip: ip.clone() });
        Ok(ip)
    }

    async fn authenticate(&self) -> Result<Box<dyn DnsProvider>> {
        self.enter(JobStage::Authenticate);

        let provider = self.provider_factory.create().await?;
        debug!("Provider {} ready", provider.provider_name());
        self.emit_event(JobEvent::ProviderReady {
            provider: provider.provider_name(),
        });
        Ok(provider)
    }

    async fn resolve_zone(&self, provider: &dyn DnsProvider) -> Result<HostedZone> {
        self.enter(JobStage::ResolveZone);

        let zone = zone::resolve_zone(provider, &self.config.zone_name).await?;
        info!("Hosted Zone ID: {}", zone.id);
        self.emit_event(JobEvent::ZoneResolved { zone: zone.clone() });
        Ok(zone)
    }

    async fn upsert_record(
        &self,
        provider: &dyn DnsProvider,
        zone: &HostedZone,
        ip: &ExternalIp,
    ) -> Result<UpsertOutcome> {
        self.enter(JobStage::UpsertRecord);

        let change = RecordChange::upsert_a(&self.config.domain_name, ip);
        let outcome = provider
            .submit_change(zone, &change)
            .await
            .map_err(|e| match e {
                Error::Provider { .. } => e,
                other => Error::provider(provider.provider_name(), other.to_string()),
            })?;

        match &outcome {
            UpsertOutcome::Submitted(receipt) => {
                info!(
                    "Upserted {} {} -> {} (change {}, {})",
                    change.record_type,
                    change.record_name,
                    change.value,
                    receipt.change_id,
                    receipt.status
                );
            }
            UpsertOutcome::DryRun => {
                info!(
                    "[DRY-RUN] Skipped upsert of {} {} -> {}",
                    change.record_type, change.record_name, change.value
                );
            }
        }

        self.emit_event(JobEvent::ChangeApplied {
            zone_id: zone.id.clone(),
            change,
            outcome: outcome.clone(),
        });
        Ok(outcome)
    }

    fn enter(&self, stage: JobStage) {
        debug!("Entering stage {}", stage);
        self.emit_event(JobEvent::StageStarted { stage });
    }

    fn failed(&self, stage: JobStage, error: Error) -> Error {
        debug!("Stage {} failed: {}", stage, error);
        self.emit_event(JobEvent::Failed {
            stage,
            error: error.to_string(),
        });
        error
    }

    /// Emit a job event
    fn emit_event(&self, event: JobEvent) {
        if self.event_tx.try_send(event).is_err() {
            // Full or closed; events are informational only
            warn!("Event channel unavailable, dropping event");
        }
    }
}
