// # ddns-core
//
// Core library for the one-shot Route53 DDNS job.
//
// ## Architecture Overview
//
// This library provides the provider-independent half of the job:
// - **IpSource**: Trait for discovering the current public IP
// - **DnsProvider**: Trait for listing hosted zones and submitting record changes
// - **DnsProviderFactory**: Trait for loading credentials and building a provider
// - **zone**: Exact-name hosted zone resolution
// - **DdnsJob**: Runs LookupIp → Authenticate → ResolveZone → UpsertRecord once
//
// ## Design Principles
//
// 1. **Result all the way up**: No component exits the process; the binary decides
// 2. **Injected capabilities**: IP source and provider bootstrap are passed in
// 3. **Single shot**: One lookup, one change batch, no retry, no cached state

pub mod traits;
pub mod job;
pub mod zone;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{
    DnsProvider, DnsProviderFactory, ExternalIp, HostedZone, IpSource, RecordChange,
    UpsertOutcome,
};
pub use job::{DdnsJob, JobEvent, JobReport, JobStage};
pub use config::JobConfig;
pub use error::{Error, Result};
