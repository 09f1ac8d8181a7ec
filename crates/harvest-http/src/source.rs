//! [`HttpSource`] — fetches items from the JSON item endpoint.

use std::time::Duration;

use harvest_core::{ConfigError, FetchError, Item, source::ItemSource};
use reqwest::{Client, StatusCode, header::HeaderValue};
use tracing::debug;

use crate::Result;

/// Item endpoint of the public Hacker News API.
pub const DEFAULT_ITEM_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0/item";

/// Connection settings for the item API.
#[derive(Debug, Clone)]
pub struct SourceConfig {
  /// Item URLs are `<item_base_url>/<id>.json`.
  pub item_base_url: String,
  /// Sent as `User-Agent` on every request. Required.
  pub user_agent:    String,
  pub timeout:       Duration,
}

impl SourceConfig {
  pub fn new(user_agent: impl Into<String>) -> Self {
    Self {
      item_base_url: DEFAULT_ITEM_BASE_URL.to_owned(),
      user_agent:    user_agent.into(),
      timeout:       Duration::from_secs(30),
    }
  }
}

/// Async HTTP client for the item API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct HttpSource {
  client:   Client,
  base_url: String,
}

impl HttpSource {
  /// Build the client. A missing or unusable user agent is a configuration
  /// error here, not a per-request failure later.
  pub fn new(config: SourceConfig) -> Result<Self> {
    if config.user_agent.trim().is_empty() {
      return Err(ConfigError::Missing("user_agent").into());
    }
    let user_agent = HeaderValue::from_str(&config.user_agent)
      .map_err(|e| ConfigError::invalid("user_agent", e.to_string()))?;

    let base_url = config.item_base_url.trim_end_matches('/').to_owned();
    if base_url.is_empty() {
      return Err(ConfigError::Missing("item_base_url").into());
    }

    let client = Client::builder()
      .user_agent(user_agent)
      .timeout(config.timeout)
      .build()?;
    Ok(Self { client, base_url })
  }

  /// `<item_base_url>/<id>.json`
  pub fn item_url(&self, id: i64) -> String {
    format!("{}/{id}.json", self.base_url)
  }
}

impl ItemSource for HttpSource {
  async fn fetch(&self, id: i64) -> Result<Option<Item>, FetchError> {
    let url = self.item_url(id);
    debug!(id, %url, "GET item");

    let resp = match self.client.get(&url).send().await {
      Ok(resp) => resp,
      Err(e) => {
        return Err(FetchError::Transport {
          url,
          source: e.into(),
        });
      }
    };

    let status = resp.status();
    if status != StatusCode::OK {
      return Err(FetchError::BadResponse {
        url,
        status: status.as_u16(),
      });
    }

    let body = match resp.bytes().await {
      Ok(body) => body,
      Err(e) => {
        return Err(FetchError::Transport {
          url,
          source: e.into(),
        });
      }
    };

    Item::from_json(&body).map_err(|e| FetchError::Malformed {
      url,
      reason: e.to_string(),
    })
  }
}
