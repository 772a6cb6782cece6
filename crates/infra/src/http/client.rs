use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Response};
use serde::Serialize;
use timesync_domain::Result;
use tracing::debug;

use crate::errors::IntoDomainError;

const USER_AGENT: &str = concat!("timesync/", env!("CARGO_PKG_VERSION"));

/// Outbound JSON client bounded by a per-request timeout.
///
/// Every request is sent exactly once. Provider entries carry no
/// idempotency key, so a resend could create a duplicate remotely.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Client whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .no_proxy()
            .build()
            .map_err(IntoDomainError::into_domain)?;

        Ok(Self { client })
    }

    /// POST `body` as JSON with extra `headers`.
    ///
    /// Any status is returned as a response; only transport failures are errors.
    pub async fn post_json<B>(&self, url: &str, headers: HeaderMap, body: &B) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        debug!(%url, "sending HTTP POST");

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                debug!(%url, error = %err, "HTTP request failed");
                err.into_domain()
            })?;

        debug!(%url, status = %response.status(), "received HTTP response");
        Ok(response)
    }
}
