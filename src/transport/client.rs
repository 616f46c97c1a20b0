//! `reqwest`-backed transport service.
//!
//! # Responsibilities
//! - Execute `http::Request<Bytes>` through a shared `reqwest::Client`
//! - Buffer the response body so it can be read any number of times
//! - Turn 4xx/5xx into `TransportError::Status` when `http_errors` is on
//!
//! # Design Decisions
//! - The client is cloned per call (it is an `Arc` internally)
//! - Per-request options ride in request extensions

use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use http::{Request, Response};
use tower::Service;

use crate::config::TransportConfig;
use crate::transport::{RequestOptions, TransportError};

/// Sends requests with `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    http_errors: bool,
}

impl ReqwestTransport {
    /// Wrap an existing client. `http_errors` is on.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            http_errors: true,
        }
    }

    /// Build a client from configuration.
    pub fn from_config(config: &TransportConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            http_errors: config.http_errors,
        })
    }

    pub fn http_errors(mut self, enabled: bool) -> Self {
        self.http_errors = enabled;
        self
    }
}

impl Service<Request<Bytes>> for ReqwestTransport {
    type Response = Response<Bytes>;
    type Error = TransportError;
    type Future = BoxFuture<'static, Result<Response<Bytes>, TransportError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let options = request
            .extensions()
            .get::<RequestOptions>()
            .copied()
            .unwrap_or_default();
        let http_errors = options.http_errors.unwrap_or(self.http_errors);
        let method = request.method().clone();
        let uri = request.uri().clone();
        let client = self.client.clone();

        Box::pin(async move {
            let mut outbound = reqwest::Request::try_from(request)?;
            if let Some(timeout) = options.timeout {
                *outbound.timeout_mut() = Some(timeout);
            }

            let response = buffer(client.execute(outbound).await?).await?;

            let status = response.status();
            if http_errors && (status.is_client_error() || status.is_server_error()) {
                return Err(TransportError::Status {
                    method,
                    uri,
                    response: Box::new(response),
                });
            }
            Ok::<_, TransportError>(response)
        })
    }
}

async fn buffer(response: reqwest::Response) -> Result<Response<Bytes>, reqwest::Error> {
    let status = response.status();
    let version = response.version();
    let headers = response.headers().clone();
    let body = response.bytes().await?;

    let mut buffered = Response::new(body);
    *buffered.status_mut() = status;
    *buffered.version_mut() = version;
    *buffered.headers_mut() = headers;
    Ok(buffered)
}
