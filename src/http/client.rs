use std::time::Duration;

use reqwest::{Client, redirect};

use crate::error::HttpError;

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("volley/", env!("CARGO_PKG_VERSION"));

/// Settings for the pooled client shared by every worker of a run.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Maximum redirects to follow; 0 disables redirects.
    pub redirect_limit: u32,
    pub insecure: bool,
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            redirect_limit: 10,
            insecure: false,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

pub(super) fn build_client(settings: &ClientSettings) -> Result<Client, HttpError> {
    let mut client_builder = Client::builder()
        .timeout(settings.timeout)
        .connect_timeout(settings.connect_timeout)
        .user_agent(settings.user_agent.as_str());

    if settings.redirect_limit == 0 {
        client_builder = client_builder.redirect(redirect::Policy::none());
    } else {
        client_builder = client_builder.redirect(redirect::Policy::limited(
            usize::try_from(settings.redirect_limit).unwrap_or(10),
        ));
    }

    if settings.insecure {
        client_builder = client_builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
    }

    client_builder.build().map_err(|err| {
        tracing::error!("Failed to build HTTP client: {}", err);
        HttpError::BuildClientFailed { source: err }
    })
}
