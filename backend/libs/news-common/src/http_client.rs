//! HTTP client utilities for inter-service communication
//!
//! Every call carries the caller's correlation identifier as the
//! `request_id` query parameter so downstream logs can be joined up.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, ServiceError};
use crate::REQUEST_ID_PARAM;

/// Status and body of a downstream response, detached from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).trim().to_string()
    }
}

/// Inter-service HTTP client
#[derive(Clone)]
pub struct ServiceClient {
    client: Client,
    base_url: String,
    service_name: String,
}

impl ServiceClient {
    /// Create a new service client.
    ///
    /// `timeout` bounds each individual request at the transport level.
    pub fn new(service_name: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_name: service_name.to_string(),
        })
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn transport_error(&self, err: reqwest::Error) -> ServiceError {
        ServiceError::Transport {
            service: self.service_name.clone(),
            message: err.to_string(),
        }
    }

    async fn into_raw(&self, response: reqwest::Response) -> Result<RawResponse> {
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }

    /// GET `path` with the given query, returning whatever the service answered.
    pub async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
        request_id: &str,
    ) -> Result<RawResponse> {
        debug!(
            service = %self.service_name,
            path = %path,
            request_id = %request_id,
            "Calling downstream service"
        );

        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .query(&[(REQUEST_ID_PARAM, request_id)])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.into_raw(response).await
    }

    /// GET `path` and decode a successful JSON body.
    ///
    /// Non-success statuses become [`ServiceError::Status`] carrying the body text.
    pub async fn get_json<T>(&self, path: &str, query: &[(&str, &str)], request_id: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let raw = self.get(path, query, request_id).await?;
        self.decode(raw)
    }

    /// POST a JSON body to `path`, returning whatever the service answered.
    pub async fn post_json<B>(&self, path: &str, body: &B, request_id: &str) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        debug!(
            service = %self.service_name,
            path = %path,
            request_id = %request_id,
            "Posting to downstream service"
        );

        let response = self
            .client
            .post(self.url(path))
            .query(&[(REQUEST_ID_PARAM, request_id)])
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.into_raw(response).await
    }

    /// Decode a raw response as JSON, rejecting non-success statuses first.
    pub fn decode<T>(&self, raw: RawResponse) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if !raw.is_success() {
            return Err(ServiceError::Status {
                service: self.service_name.clone(),
                status: raw.status,
                body: raw.text(),
            });
        }

        crate::json::from_slice(&raw.body).map_err(|e| ServiceError::Decode {
            service: self.service_name.clone(),
            message: e.to_string(),
        })
    }
}
