use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::{BackendClient, BackendError, BackendRequest};
use crate::resource::{Method, ResourceDescriptor};

/// Header carrying the anti-forgery token on mutating requests.
pub const CSRF_HEADER: &str = "X-CSRFToken";

const NO_BODY: Option<&()> = None;

/// Shape of a business-rule rejection.
#[derive(Debug, Deserialize)]
struct ServerErrorBody {
    error: String,
}

// =============================================================================
// HTTP BACKEND SERVICE
// =============================================================================

/// Service answering [`BackendRequest`]s against the basket HTTP API.
///
/// Each request runs in its own task so a slow response never holds up the
/// others; ordering between responses is therefore not guaranteed.
#[derive(Debug)]
pub struct HttpBackend {
    receiver: mpsc::Receiver<BackendRequest>,
    exchange: Exchange,
}

#[derive(Debug, Clone)]
struct Exchange {
    http: reqwest::Client,
    base_url: String,
    csrf_token: Option<String>,
}

impl HttpBackend {
    pub fn new(
        buffer_size: usize,
        base_url: impl Into<String>,
        csrf_token: Option<String>,
    ) -> (Self, BackendClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let backend = Self {
            receiver,
            exchange: Exchange {
                http: reqwest::Client::new(),
                base_url: base_url.into(),
                csrf_token,
            },
        };
        (backend, BackendClient::new(sender))
    }

    #[instrument(name = "http_backend", skip(self))]
    pub async fn run(mut self) {
        info!(base_url = %self.exchange.base_url, "HttpBackend starting");
        while let Some(msg) = self.receiver.recv().await {
            let exchange = self.exchange.clone();
            tokio::spawn(async move { exchange.handle(msg).await });
        }
        info!("HttpBackend stopped");
    }
}

impl Exchange {
    async fn handle(self, msg: BackendRequest) {
        match msg {
            BackendRequest::GetDelivery { resource, respond_to } => {
                let _ = respond_to.send(self.send(&resource, NO_BODY).await);
            }
            BackendRequest::GetOrder { resource, respond_to } => {
                let _ = respond_to.send(self.send(&resource, NO_BODY).await);
            }
            BackendRequest::CreateOrder { resource, payload, respond_to } => {
                let _ = respond_to.send(self.send(&resource, Some(&payload)).await);
            }
            BackendRequest::UpdateOrder { resource, payload, respond_to } => {
                let _ = respond_to.send(self.send(&resource, Some(&payload)).await);
            }
            BackendRequest::DeleteOrder { resource, respond_to } => {
                let _ = respond_to.send(self.send(&resource, NO_BODY).await);
            }
            BackendRequest::ListDeliveries { resource, respond_to } => {
                let _ = respond_to.send(self.send(&resource, NO_BODY).await);
            }
            BackendRequest::ListOrders { resource, respond_to } => {
                let _ = respond_to.send(self.send(&resource, NO_BODY).await);
            }
        }
    }

    fn url_for(&self, resource: &ResourceDescriptor) -> String {
        if resource.url.starts_with("http://") || resource.url.starts_with("https://") {
            resource.url.clone()
        } else {
            format!("{}{}", self.base_url.trim_end_matches('/'), resource.url)
        }
    }

    #[instrument(skip_all, fields(resource = %resource))]
    async fn send<B, T>(&self, resource: &ResourceDescriptor, body: Option<&B>) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let method = match resource.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut request = self.http.request(method, self.url_for(resource));
        if resource.method != Method::Get {
            match &self.csrf_token {
                Some(token) => request = request.header(CSRF_HEADER, token),
                None => warn!("Sending mutating request without CSRF token"),
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        debug!(status = status.as_u16(), "Response received");

        interpret(status, &text)
    }
}

/// Turns a raw response into a typed reply.
///
/// An `{error}` body is a business-rule rejection whatever the status. Any
/// other non-success status is reported as such.
pub(crate) fn interpret<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, BackendError> {
    if let Ok(rejection) = serde_json::from_str::<ServerErrorBody>(body) {
        return Err(BackendError::Server(rejection.error));
    }
    if !status.is_success() {
        return Err(BackendError::Status(status.as_u16()));
    }
    serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))
}
