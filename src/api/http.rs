//! reqwest Transport
//!
//! Native [`Transport`] used by the CLI.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;

use super::transport::{HttpRequest, HttpResponse, Method, RequestBody, Transport};
use crate::error::{ClientError, ClientResult};

/// HTTP transport backed by a shared reqwest client
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Build a client; `timeout` of `None` waits for the transport to settle
    pub fn new(timeout: Option<Duration>) -> ClientResult<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            "narrativeiq/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    fn map_error(e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Transport("request timed out".to_string())
        } else if e.is_connect() {
            ClientError::Transport(format!("backend unavailable: {}", e))
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

#[async_trait(?Send)]
impl Transport for HttpClient {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(value.to_string()),
            RequestBody::Multipart(file) => {
                let mut part = Part::bytes(file.bytes).file_name(file.filename);
                if let Some(mime) = file.content_type {
                    part = part.mime_str(&mime).map_err(Self::map_error)?;
                }
                builder.multipart(Form::new().part("file", part))
            }
        };

        let response = builder.send().await.map_err(Self::map_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(Self::map_error)?.to_vec();

        Ok(HttpResponse { status, body })
    }
}
