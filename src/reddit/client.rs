// Reddit API client — application-only OAuth over HTTP.
//
// Reddit's read endpoints accept an app-only bearer token obtained with the
// client-credentials grant. The token is fetched once when the client is
// built; a single run never outlives its one-hour lifetime.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;

/// Default host for the OAuth token endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://www.reddit.com";

/// Default host for authenticated API calls.
pub const DEFAULT_API_URL: &str = "https://oauth.reddit.com";

/// Authenticated HTTP client for Reddit's JSON API.
///
/// A thin reqwest wrapper with a generic GET helper, the same shape as the
/// other HTTP clients in this crate.
pub struct RedditClient {
    client: reqwest::Client,
    api_url: String,
    access_token: String,
}

impl RedditClient {
    /// Build the HTTP client and exchange the app credentials for a token.
    ///
    /// Credentials are checked by `Config::require_reddit` beforehand. Any
    /// failure here means we cannot talk to Reddit at all, so callers treat
    /// it as fatal.
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.reddit_user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;

        let token_url = format!(
            "{}/api/v1/access_token",
            config.reddit_auth_url.trim_end_matches('/')
        );

        let response = client
            .post(&token_url)
            .basic_auth(&config.reddit_client_id, Some(&config.reddit_client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .context("Failed to reach the Reddit token endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Reddit token endpoint returned {status}: {body}");
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse Reddit token response")?;

        // Reddit answers bad credentials with 200 and an `error` field.
        let access_token = match (token.access_token, token.error) {
            (Some(t), _) if !t.is_empty() => t,
            (_, Some(err)) => anyhow::bail!("Reddit rejected the app credentials: {err}"),
            _ => anyhow::bail!("Reddit token response carried no access_token"),
        };

        info!(
            expires_in = token.expires_in.unwrap_or_default(),
            "Obtained Reddit application token"
        );

        Ok(Self {
            client,
            api_url: config.reddit_api_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    /// Make a GET request to an API path and deserialize the response.
    ///
    /// `path` starts with a slash (e.g. "/r/Turkey/search"). `raw_json=1` is
    /// always added so bodies come back without HTML entity escaping.
    pub async fn api_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.api_url, path);

        debug!(path = path, "Reddit GET request");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(params)
            .query(&[("raw_json", "1")])
            .send()
            .await
            .with_context(|| format!("Reddit request failed: {path}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Reddit {path} returned {status}: {body}");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize {path} response"))
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
    // A string like "invalid_grant" or a bare status number
    error: Option<serde_json::Value>,
}
