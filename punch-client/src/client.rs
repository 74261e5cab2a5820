use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::dto::{ClockRequest, ClockResponse, RecordsRequest, RecordsResponse};
use crate::endpoint::Endpoint;
use crate::error::{CallError, ConnectError};
use crate::service::{ClockService, Connector};
use crate::types::{ClockDirection, ClockReply, MemberId, Record, RecordRange};

const HEALTH_PATH: &str = "v1/health";
const CLOCK_PATH: &str = "v1/clock";
const RECORDS_PATH: &str = "v1/records";

/// HTTP client for the time-clock service.
#[derive(Debug, Clone)]
pub struct ClockClient {
    client: Client,
    base_url: Url,
    call_timeout: Duration,
}

impl ClockClient {
    /// Connect to `endpoint`, waiting until the service answers its health
    /// check or the endpoint's connect timeout elapses.
    pub async fn connect(endpoint: &Endpoint) -> Result<Self, ConnectError> {
        let address = endpoint.address();
        tracing::info!(%address, insecure = endpoint.insecure, "connecting");

        match tokio::time::timeout(endpoint.connect_timeout, Self::dial(endpoint)).await {
            Ok(result) => result,
            Err(_) => Err(ConnectError::Timeout(address)),
        }
    }

    async fn dial(endpoint: &Endpoint) -> Result<Self, ConnectError> {
        let base_url = endpoint.base_url()?;
        let mut builder = Client::builder()
            .connect_timeout(endpoint.connect_timeout)
            .timeout(endpoint.call_timeout);

        if endpoint.needs_pinning() {
            let addr = tokio::net::lookup_host(endpoint.address())
                .await
                .map_err(|e| ConnectError::Transport(e.to_string()))?
                .next()
                .ok_or_else(|| {
                    ConnectError::InvalidEndpoint(format!("{} did not resolve", endpoint.host))
                })?;
            builder = builder.resolve(endpoint.authority(), addr);
        }

        let client = builder
            .build()
            .map_err(|e| ConnectError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        let this = Self {
            client,
            base_url,
            call_timeout: endpoint.call_timeout,
        };

        let url = this.endpoint(HEALTH_PATH)?;
        let response = this
            .client
            .get(url)
            .timeout(endpoint.connect_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ConnectError::Timeout(endpoint.address())
                } else {
                    ConnectError::Transport(e.to_string())
                }
            })?;
        if !response.status().is_success() {
            return Err(ConnectError::Status(response.status().as_u16()));
        }

        tracing::info!(base_url = %this.base_url, "connected");
        Ok(this)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ConnectError> {
        self.base_url
            .join(path)
            .map_err(|e| ConnectError::InvalidEndpoint(format!("{}: {}", path, e)))
    }

    fn post(&self, path: &'static str) -> Result<RequestBuilder, CallError> {
        let url = self
            .endpoint(path)
            .map_err(|e| CallError::Transport(e.to_string()))?;
        Ok(self.client.post(url).timeout(self.call_timeout))
    }

    async fn send(request: RequestBuilder, call: &'static str) -> Result<Response, CallError> {
        let response = request
            .send()
            .await
            .map_err(|e| CallError::from_reqwest(call, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CallError::Status {
                call,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn call_json<T: DeserializeOwned>(
        request: RequestBuilder,
        call: &'static str,
    ) -> Result<T, CallError> {
        let response = Self::send(request, call).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| CallError::from_reqwest(call, e))
    }
}

#[async_trait]
impl ClockService for ClockClient {
    async fn clock(
        &self,
        member: MemberId,
        direction: ClockDirection,
    ) -> Result<ClockReply, CallError> {
        let body = ClockRequest {
            member: member.into(),
            direction,
        };
        let request = self.post(CLOCK_PATH)?.json(&body);
        let response: ClockResponse = Self::call_json(request, "Clock").await?;
        Ok(response.into())
    }

    async fn records(
        &self,
        member: MemberId,
        range: RecordRange,
    ) -> Result<Vec<Record>, CallError> {
        let body = RecordsRequest {
            member: member.into(),
            range,
        };
        let request = self.post(RECORDS_PATH)?.json(&body);
        let response: RecordsResponse = Self::call_json(request, "Records").await?;
        Ok(response.records.into_iter().map(Record::from).collect())
    }
}

#[async_trait]
impl Connector for Endpoint {
    type Service = ClockClient;

    async fn connect(&self) -> Result<ClockClient, ConnectError> {
        ClockClient::connect(self).await
    }
}
