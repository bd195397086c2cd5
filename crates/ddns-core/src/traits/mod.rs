//! Core traits for the DDNS job
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpSource`]: Discover the current public IP
//! - [`DnsProvider`]: List hosted zones and submit record changes
//! - [`DnsProviderFactory`]: Load credentials and build an authenticated provider

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::{IpSource, ExternalIp};
pub use dns_provider::{
    ChangeAction, ChangeReceipt, DnsProvider, DnsProviderFactory, HostedZone, RecordChange,
    RecordType, UpsertOutcome,
};
