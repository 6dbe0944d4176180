//! Off-chain bookkeeping of completed distributions.

use {
    crate::{
        domain::distribution::Record,
        util::http::{self, roundtrip},
    },
    reqwest::Url,
    serde::de::IgnoredAny,
};

mod dto;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    async fn save(&self, record: &Record) -> Result<(), http::Error>;
}

/// Client for the record API.
#[derive(Debug, Clone)]
pub struct Api {
    client: reqwest::Client,
    endpoint: Url,
}

impl Api {
    /// `url` is the base URL of the API, distributions are posted to
    /// `{url}/distributions`.
    pub fn new(client: reqwest::Client, mut url: Url) -> Result<Self, url::ParseError> {
        if !url.path().ends_with('/') {
            url.set_path(&format!("{}/", url.path()));
        }
        Ok(Self {
            client,
            endpoint: url.join("distributions")?,
        })
    }
}

#[async_trait::async_trait]
impl RecordStore for Api {
    async fn save(&self, record: &Record) -> Result<(), http::Error> {
        let body = dto::Distribution::from(record);
        let _: IgnoredAny =
            roundtrip!(<IgnoredAny>; self.client.post(self.endpoint.clone()).json(&body)).await?;
        Ok(())
    }
}

/// Used when no record API is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disabled;

#[async_trait::async_trait]
impl RecordStore for Disabled {
    async fn save(&self, _: &Record) -> Result<(), http::Error> {
        tracing::debug!("no record API configured, not saving distribution");
        Ok(())
    }
}
