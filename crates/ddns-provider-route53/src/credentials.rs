//! Credential and SDK configuration bootstrap
//!
//! Resolution order of the ambient chain (environment, shared profile files,
//! container/instance metadata) is owned by `aws-config`; this module only
//! decides which chain to use and which overrides to layer on top.

use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::ProfileFileRegionProvider;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, ConfigLoader, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_route53::error::DisplayErrorContext;
use ddns_core::{Error, Result};

pub use aws_credential_types::Credentials;

/// Region used when neither an override nor the chain supplies one
///
/// Route53 is a global service, so any region resolves the same endpoint.
pub const FALLBACK_REGION: &str = "us-east-1";

/// Where AWS credentials come from
#[derive(Debug, Clone, Default)]
pub enum CredentialProvider {
    /// The SDK default chain
    #[default]
    Ambient,
    /// A named profile from the shared config/credentials files
    Profile(String),
    /// Fixed credentials
    Static(Credentials),
}

/// Client settings layered over the credential chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route53Settings {
    /// Region override
    pub region: Option<String>,
    /// Endpoint override (LocalStack, test doubles)
    pub endpoint_url: Option<String>,
    /// Build and log the change batch without submitting it
    pub dry_run: bool,
}

impl CredentialProvider {
    /// Build a config loader for this credential source
    pub fn config_loader(&self, settings: &Route53Settings) -> ConfigLoader {
        let mut config_loader =
            aws_config::defaults(BehaviorVersion::latest()).retry_config(RetryConfig::disabled());

        let mut region = RegionProviderChain::first_try(settings.region.clone().map(Region::new));

        match self {
            CredentialProvider::Ambient => {}
            CredentialProvider::Profile(profile_name) => {
                tracing::debug!("AWS using profile name {}", profile_name);
                region = region.or_else(
                    ProfileFileRegionProvider::builder()
                        .profile_name(profile_name)
                        .build(),
                );
                config_loader = config_loader.profile_name(profile_name);
            }
            CredentialProvider::Static(credentials) => {
                config_loader = config_loader.credentials_provider(credentials.clone());
            }
        }

        config_loader = config_loader.region(
            region
                .or_default_provider()
                .or_else(Region::new(FALLBACK_REGION)),
        );

        if let Some(endpoint_url) = &settings.endpoint_url {
            config_loader = config_loader.endpoint_url(endpoint_url);
        }

        config_loader
    }

    /// Load the SDK configuration and make sure credentials resolve
    ///
    /// # Returns
    ///
    /// - `Ok(SdkConfig)`: Configuration with usable credentials
    /// - `Err(Error::Config)`: No credentials could be loaded
    pub async fn load(&self, settings: &Route53Settings) -> Result<SdkConfig> {
        let sdk_config = self.config_loader(settings).load().await;

        let credentials = sdk_config
            .credentials_provider()
            .ok_or_else(|| Error::config("no AWS credentials provider configured"))?;

        credentials.provide_credentials().await.map_err(|e| {
            Error::config(format!(
                "failed to load AWS credentials: {}",
                DisplayErrorContext(&e)
            ))
        })?;

        tracing::debug!(
            "AWS config loaded (region: {})",
            sdk_config
                .region()
                .map(|r| r.as_ref().to_string())
                .unwrap_or_else(|| "<none>".to_string())
        );

        Ok(sdk_config)
    }
}
