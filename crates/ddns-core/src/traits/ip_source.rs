// # IP Source Trait
//
// Defines the interface for discovering the caller's current public IP.
//
// ## Implementations
//
// - HTTP IP-echo service: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let ip = source.current().await?;
//     println!("Current IP: {}", ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::fmt;
use std::net::Ipv4Addr;

/// The discovered public IP, exactly as the lookup service returned it
///
/// No trimming or validation is applied on construction: whatever the
/// service sent is what ends up in the A record. Use [`ExternalIp::to_ipv4`]
/// for a strict check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalIp(String);

impl ExternalIp {
    /// Wrap a raw response body
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw textual value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the raw value as a dotted-decimal IPv4 address
    ///
    /// The raw value is parsed as-is, so surrounding whitespace fails.
    pub fn to_ipv4(&self) -> Result<Ipv4Addr, crate::Error> {
        self.0.parse().map_err(|_| {
            crate::Error::invalid_input(format!(
                "IP echo returned {:?}, which is not an IPv4 address",
                self.0
            ))
        })
    }
}

impl fmt::Display for ExternalIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ExternalIp {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for ExternalIp {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Trait for IP source implementations
///
/// One call to [`IpSource::current`] is one lookup. Implementations must not
/// cache, retry, or fall back to another endpoint; a failed lookup is
/// reported to the caller as-is.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(ExternalIp)`: The raw IP text reported by the source
    /// - `Err(Error::Network)`: Transport, status, or body-read failure
    async fn current(&self) -> Result<ExternalIp, crate::Error>;

    /// Source name (for logging)
    fn source_name(&self) -> &'static str;
}
