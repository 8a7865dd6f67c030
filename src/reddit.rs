//! Source channel collaborator: app-only OAuth2 client for the Reddit
//! listing API, behind the [`SubmissionSource`] seam so the ingestion loop
//! can be driven by a fake in tests.
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::RedditCredentials;

const REDDIT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const REDDIT_API_BASE: &str = "https://oauth.reddit.com/";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("reddit request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("reddit authentication failed ({status}): {body}")]
    Auth { status: StatusCode, body: String },
    #[error("reddit error {status} fetching r/{subreddit}: {body}")]
    Api {
        status: StatusCode,
        subreddit: String,
        body: String,
    },
}

/// One submission as returned by the listing endpoint. Every field is
/// optional at the wire level so a single malformed child cannot fail the
/// whole batch; extraction decides what is actually required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSubmission {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_utc: Option<f64>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub author_flair_text: Option<String>,
    #[serde(default)]
    pub link_flair_text: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
}

/// Standard kind/data/children listing envelope.
#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    pub children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
pub struct ListingChild {
    pub data: RawSubmission,
}

#[async_trait]
pub trait SubmissionSource: Send + Sync {
    /// Fetch the newest submissions of one subreddit, newest-first, at most
    /// `limit` of them.
    async fn fetch_newest(
        &self,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<RawSubmission>, FetchError>;
}

#[derive(Clone)]
pub struct RedditClient {
    http: Client,
    api_base: Url,
    token: String,
}

impl fmt::Debug for RedditClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedditClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

impl RedditClient {
    /// Authenticate with the `client_credentials` grant and return a client
    /// holding the access token for the rest of the run.
    pub async fn connect(creds: &RedditCredentials) -> Result<Self, FetchError> {
        let token_url = Url::parse(REDDIT_TOKEN_URL).expect("valid default reddit token URL");
        let api_base = Url::parse(REDDIT_API_BASE).expect("valid default reddit API URL");
        Self::connect_with_base_urls(creds, token_url, api_base).await
    }

    /// Same as [`connect`](Self::connect) with injectable endpoints.
    pub async fn connect_with_base_urls(
        creds: &RedditCredentials,
        token_url: Url,
        api_base: Url,
    ) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(&creds.user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client");

        let res = http
            .post(token_url)
            .basic_auth(&creds.client_id, Some(&creds.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(FetchError::Auth { status, body });
        }
        let payload: AccessTokenResponse = res.json().await?;
        info!("authenticated with reddit");

        Ok(Self {
            http,
            api_base,
            token: payload.access_token,
        })
    }
}

#[async_trait]
impl SubmissionSource for RedditClient {
    async fn fetch_newest(
        &self,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<RawSubmission>, FetchError> {
        let url = self
            .api_base
            .join(&format!("r/{subreddit}/new"))
            .map_err(|_| FetchError::Api {
                status: StatusCode::BAD_REQUEST,
                subreddit: subreddit.to_string(),
                body: "invalid subreddit name".to_string(),
            })?;

        debug!(subreddit, limit, "fetching newest submissions");
        let res = self
            .http
            .get(url)
            .query(&[("limit", limit.to_string()), ("raw_json", "1".to_string())])
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status,
                subreddit: subreddit.to_string(),
                body,
            });
        }

        let listing: Listing = res.json().await?;
        Ok(listing.data.children.into_iter().map(|c| c.data).collect())
    }
}
