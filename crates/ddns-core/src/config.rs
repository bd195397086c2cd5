//! Configuration types for the DDNS job
//!
//! A [`JobConfig`] is produced once at startup (by the CLI layer) and is
//! read-only for the rest of the run.

/// Default IP-echo endpoint
pub const DEFAULT_IP_ECHO_URL: &str = "https://api.ipify.org?format=text";

/// TTL applied to the upserted A record
pub const RECORD_TTL_SECS: i64 = 300;

/// Comment attached to every change batch
pub const CHANGE_COMMENT: &str = "Automated update from DDNS Job";

/// Configuration for a single DDNS job run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    /// Hosted zone name, in the exact form the provider renders it
    /// (usually with a trailing dot, e.g. "example.com.")
    pub zone_name: String,

    /// Fully-qualified domain whose A record is upserted
    pub domain_name: String,

    /// IP-echo endpoint queried for the current public IP
    pub ip_echo_url: String,

    /// Reject an IP-echo body that is not a well-formed IPv4 address
    pub require_ipv4: bool,
}

impl JobConfig {
    /// Create a configuration for the given zone and domain with defaults
    pub fn new(zone_name: impl Into<String>, domain_name: impl Into<String>) -> Self {
        Self {
            zone_name: zone_name.into(),
            domain_name: domain_name.into(),
            ip_echo_url: DEFAULT_IP_ECHO_URL.to_string(),
            require_ipv4: false,
        }
    }

    /// Override the IP-echo endpoint
    pub fn with_ip_echo_url(mut self, url: impl Into<String>) -> Self {
        self.ip_echo_url = url.into();
        self
    }

    /// Enable or disable strict IPv4 validation of the discovered IP
    pub fn with_require_ipv4(mut self, require_ipv4: bool) -> Self {
        self.require_ipv4 = require_ipv4;
        self
    }

    /// Validate the configuration
    ///
    /// Zone and domain only need to be non-empty; their format is left to the
    /// provider.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.zone_name.is_empty() {
            return Err(crate::Error::invalid_input("zone name cannot be empty"));
        }
        if self.domain_name.is_empty() {
            return Err(crate::Error::invalid_input("domain name cannot be empty"));
        }
        if self.ip_echo_url.is_empty() {
            return Err(crate::Error::config("IP echo URL cannot be empty"));
        }
        if !self.ip_echo_url.starts_with("https://") && !self.ip_echo_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "IP echo URL must use HTTP or HTTPS scheme. Got: {}",
                self.ip_echo_url
            )));
        }
        Ok(())
    }
}
