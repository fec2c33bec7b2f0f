//! HTTP implementation of [`Transport`].

use std::{
    error::Error as _,
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::{debug, trace};
use url::Url;

use nzbget_types::NzbGetError;

use crate::config::ClientConfig;
use crate::ops::{Envelope, Transport, TransportError};

/// JSON-RPC over HTTP, the way NZBGet speaks it.
///
/// RPC calls are POSTed to the endpoint, queries are GETs against `{endpoint}/{method}`.
/// Clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: Url,
    config: ClientConfig,
    next_id: Arc<AtomicU64>,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    version: &'static str,
    id: u64,
    method: &'a str,
    params: &'a [Value],
}

impl HttpTransport {
    /// Create a transport for the endpoint in `config`.
    pub fn try_new(config: &ClientConfig) -> Result<Self, NzbGetError> {
        let endpoint = Url::parse(&config.url)
            .map_err(|e| NzbGetError::Config(format!("Invalid RPC URL {}: {e}", config.url)))?;
        if endpoint.cannot_be_a_base() {
            return Err(NzbGetError::Config(format!(
                "Invalid RPC URL {}: not a base URL",
                config.url
            )));
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| NzbGetError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint,
            config: config.clone(),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// The endpoint all RPC and query calls go to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.username {
            Some(username) => request.basic_auth(username, self.config.password.as_deref()),
            None => request,
        }
    }

    fn query_url(&self, path: &str) -> Result<Url, TransportError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::Request(format!("{} is not a base URL", self.endpoint)))?
            .pop_if_empty()
            .push(path);
        Ok(url)
    }
}

impl Transport for HttpTransport {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Envelope, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            version: "1.1",
            id,
            method,
            params: &params,
        };

        trace!("POST {} method={method} id={id}", self.endpoint);
        let response = self
            .authorize(self.http.post(self.endpoint.clone()))
            .timeout(self.config.rpc_timeout)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = read_body(response).await?;
        match serde_json::from_slice::<Envelope>(&body) {
            Ok(envelope) if status.is_success() || envelope.error.is_some() => Ok(envelope),
            Ok(_) => Err(TransportError::Status(status.as_u16())),
            Err(_) if !status.is_success() => Err(TransportError::Status(status.as_u16())),
            Err(e) => Err(TransportError::Decode(e.to_string())),
        }
    }

    async fn get(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<Vec<u8>, TransportError> {
        let url = self.query_url(path)?;

        trace!("GET {url} query={query:?}");
        let response = self
            .authorize(self.http.get(url))
            .query(&query)
            .timeout(self.config.rpc_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = read_body(response).await?;
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(body)
    }

    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64, TransportError> {
        let url = Url::parse(url).map_err(|e| TransportError::Request(format!("{url}: {e}")))?;

        debug!("Fetching {url} into {}", dest.display());
        let mut response = self
            .http
            .get(url)
            .timeout(self.config.fetch_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let mut file = File::create(dest)
            .await
            .map_err(|e| TransportError::Io(e.to_string()))?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(map_body_error)? {
            file.write_all(&chunk)
                .await
                .map_err(|e| TransportError::Io(e.to_string()))?;
            written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| TransportError::Io(e.to_string()))?;

        debug!("Fetched {written} bytes");
        Ok(written)
    }
}

async fn read_body(response: Response) -> Result<Vec<u8>, TransportError> {
    if response.status() == StatusCode::UNAUTHORIZED {
        return Err(TransportError::Unauthorized);
    }
    let body = response.bytes().await.map_err(map_body_error)?;
    trace!("Response body: {}", String::from_utf8_lossy(&body));
    Ok(body.to_vec())
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_builder() {
        TransportError::Request(describe(&err))
    } else {
        TransportError::Network(describe(&err))
    }
}

fn map_body_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Body(describe(&err))
    }
}

/// Renders the error with its source chain; reqwest keeps the useful part in the sources.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
