//! HTTP client for the Send API.
//!
//! Owner-side calls (`create`, `edit`, `get`, `list`, `delete`,
//! `remove_password`) carry a bearer token; the anonymous access call carries
//! nothing but the `accessId` and an optional proof body, and is exposed
//! through the [`AccessTransport`] seam so the protocol machine stays
//! testable without HTTP.
//!
//! HTTP failures are surfaced as-is: the client maps status codes to typed
//! replies or `Transport` errors but never rewrites server messages.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::access::{AccessReply, AccessTransport, SendAccess, SendAccessRequest};
use crate::envelope::{SendEnvelope, SendUpsert};
use crate::error::{Result, SendError};

/// List response wrapper, matching the server's `{ "data": [...] }` shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendListResponse {
    data: Vec<SendEnvelope>,
}

/// Error body the server attaches to 400 responses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SendApiClient {
    base: Url,
    client: Client,
}

impl SendApiClient {
    /// Build a client for the given server.
    ///
    /// `access_token` authorizes the owner-side endpoints; anonymous access
    /// works without one.
    pub fn new(base: &Url, access_token: Option<&str>) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = access_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| SendError::InvalidInput("Invalid access token".to_string()))?;
            default_headers.insert(AUTHORIZATION, value);
        }
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            base: base.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| SendError::InvalidInput(format!("Invalid endpoint path: {}", e)))
    }

    /// `POST /api/sends`
    pub async fn create(&self, upsert: &SendUpsert) -> Result<SendEnvelope> {
        let url = self.endpoint("api/sends")?;
        let response = self.client.post(url).json(upsert).send().await?;
        Self::owner_response(response).await
    }

    /// `PUT /api/sends/{id}`
    pub async fn edit(&self, id: &str, upsert: &SendUpsert) -> Result<SendEnvelope> {
        let url = self.endpoint(&format!("api/sends/{}", id))?;
        let response = self.client.put(url).json(upsert).send().await?;
        Self::owner_response(response).await
    }

    /// `GET /api/sends/{id}`
    pub async fn get(&self, id: &str) -> Result<SendEnvelope> {
        let url = self.endpoint(&format!("api/sends/{}", id))?;
        let response = self.client.get(url).send().await?;
        Self::owner_response(response).await
    }

    /// `GET /api/sends`
    pub async fn list(&self) -> Result<Vec<SendEnvelope>> {
        let url = self.endpoint("api/sends")?;
        let response = self.client.get(url).send().await?;
        let listing: SendListResponse = Self::owner_response(response).await?;
        Ok(listing.data)
    }

    /// `DELETE /api/sends/{id}`
    pub async fn delete(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&format!("api/sends/{}", id))?;
        let response = self.client.delete(url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::owner_error(status, response.text().await?))
        }
    }

    /// `PUT /api/sends/{id}/remove-password`
    ///
    /// Clears the password gate server-side without re-uploading content.
    pub async fn remove_password(&self, id: &str) -> Result<SendEnvelope> {
        let url = self.endpoint(&format!("api/sends/{}/remove-password", id))?;
        let response = self.client.put(url).send().await?;
        Self::owner_response(response).await
    }

    /// `GET /api/sends/{access_id}/access/file/{file_id}`
    ///
    /// Anonymous download of a file Send's encrypted blob. The bytes come
    /// back still sealed; only the link holder can open them.
    pub async fn download(&self, access_id: &str, file_id: &str) -> Result<Vec<u8>> {
        let url = self.endpoint(&format!("api/sends/{}/access/file/{}", access_id, file_id))?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SendError::NotFound("file blob returned 404".to_string()));
        }
        if !status.is_success() {
            return Err(SendError::Transport(format!(
                "file download returned {}",
                status
            )));
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn owner_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            Err(Self::owner_error(status, response.text().await?))
        }
    }

    fn owner_error(status: StatusCode, body: String) -> SendError {
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or(body);
        match status {
            StatusCode::NOT_FOUND => SendError::NotFound(format!("server returned 404: {}", message)),
            StatusCode::BAD_REQUEST => SendError::InvalidInput(message),
            _ => SendError::Transport(format!("{}: {}", status, message)),
        }
    }
}

#[async_trait]
impl AccessTransport for SendApiClient {
    /// `POST /api/sends/access/{access_id}`
    ///
    /// Anonymous: no bearer token is required and no key material appears in
    /// the request, only the optional derived proof.
    async fn request_access(
        &self,
        access_id: &str,
        request: &SendAccessRequest,
    ) -> Result<AccessReply> {
        let url = self.endpoint(&format!("api/sends/access/{}", access_id))?;
        let response = self.client.post(url).json(request).send().await?;
        let status = response.status();
        debug!(%access_id, %status, "access response");

        match status {
            s if s.is_success() => {
                let access: SendAccess = response.json().await?;
                Ok(AccessReply::Granted(access))
            }
            StatusCode::UNAUTHORIZED => Ok(AccessReply::AuthRequired),
            StatusCode::NOT_FOUND => Ok(AccessReply::Missing),
            StatusCode::BAD_REQUEST => {
                let body = response.text().await?;
                let message = serde_json::from_str::<ApiErrorBody>(&body)
                    .ok()
                    .and_then(|b| b.message)
                    .unwrap_or(body);
                Ok(AccessReply::Rejected(message))
            }
            other => Err(SendError::Transport(format!(
                "access endpoint returned {}",
                other
            ))),
        }
    }
}
