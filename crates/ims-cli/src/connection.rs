//! Connection and session flags shared by every subcommand.

use anyhow::{Context, Result};
use clap::Args;
use ims_client::config::{ConfigError, DEFAULT_BASE_URL};
use ims_client::{ImsApiConfig, ImsClient};
use ims_core::{IncubatorId, SessionContext, UserId};
use url::Url;
use zeroize::Zeroizing;

/// Platform endpoint, credentials and acting identity.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Base URL of the platform API.
    #[arg(long, env = "IMS_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub api_url: Url,

    /// Bearer token for the platform API.
    #[arg(long, env = "IMS_API_TOKEN", hide_env_values = true, global = true)]
    pub api_token: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "IMS_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// Acting user, stamped into createdBy/modifiedBy.
    #[arg(long, env = "IMS_USER_ID", global = true)]
    pub user_id: Option<UserId>,

    /// Incubator whose data is read and written.
    #[arg(long, env = "IMS_INCUBATOR_ID", global = true)]
    pub incubator_id: Option<IncubatorId>,
}

impl ConnectionArgs {
    pub fn api_config(&self) -> Result<ImsApiConfig> {
        let token = self.api_token.clone().ok_or(ConfigError::MissingToken)?;
        Ok(ImsApiConfig {
            base_url: self.api_url.clone(),
            api_token: Zeroizing::new(token),
            timeout_secs: self.timeout_secs,
        })
    }

    pub fn client(&self) -> Result<ImsClient> {
        ImsClient::new(self.api_config()?).context("building platform API client")
    }

    pub fn incubator(&self) -> Result<IncubatorId> {
        self.incubator_id
            .context("--incubator-id or IMS_INCUBATOR_ID is required")
    }

    pub fn session(&self) -> Result<SessionContext> {
        let user_id = self
            .user_id
            .context("--user-id or IMS_USER_ID is required")?;
        Ok(SessionContext::new(user_id, self.incubator()?))
    }
}
