//! REST client for the configuration backend's internal API.
//!
//! Wraps the `/api/v2/internal/...` endpoints (records, revisions, option
//! lists, tenants, metric template import, session) using [`reqwest`].

use async_trait::async_trait;
use monconsole_core::columns::ListOptions;
use monconsole_core::error::CoreError;
use monconsole_core::history::{parse_history, VersionEntry};
use monconsole_core::import::{ImportReport, ImportRequest};
use monconsole_core::permissions::AuthContext;
use monconsole_core::record::Record;
use monconsole_core::schema::EntityType;
use monconsole_core::tenants::Tenant;
use reqwest::Url;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::source::{BulkActionSink, IdentityProvider, RecordSource};

const INTERNAL_API: [&str; 3] = ["api", "v2", "internal"];

/// Errors from the backend REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend error ({status}): {body}")]
    Status { status: u16, body: String },

    /// The backend answered with JSON that does not match the expected shape.
    #[error("Unexpected backend response: {0}")]
    Decode(#[from] CoreError),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// HTTP client for one backend instance.
#[derive(Debug, Clone)]
pub struct ConsoleApi {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ConsoleApi {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Self::with_client(client, config)
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url));
        }
        Ok(Self {
            client,
            base_url,
            token: config.token,
        })
    }

    /// URL of an internal endpoint; every segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(INTERNAL_API).extend(segments);
        }
        url
    }

    fn get(&self, url: Url, token: Option<&str>) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match token.or(self.token.as_deref()) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json(&self, segments: &[&str]) -> Result<Value, ApiError> {
        let url = self.endpoint(segments);
        tracing::debug!(%url, "Backend GET");
        let response = self.get(url, None).send().await?;
        Self::parse_response(response).await
    }

    async fn get_strings(&self, segments: &[&str]) -> Result<Vec<String>, ApiError> {
        let value = self.get_json(segments).await?;
        string_list(&value).ok_or_else(|| {
            let path = segments.join("/");
            CoreError::MalformedRecord(format!("{path} must be a string list")).into()
        })
    }

    /// Groups the session user belongs to, for one permission key.
    async fn user_groups(&self, entity: EntityType) -> Result<Vec<String>, ApiError> {
        let value = self.get_json(&["usergroups"]).await?;
        Ok(value
            .get(entity.permission_key())
            .and_then(string_list)
            .unwrap_or_default())
    }

    fn history_path(entity: EntityType) -> &'static str {
        if entity.is_tenant_scoped() {
            "tenantversion"
        } else {
            "version"
        }
    }

    // ---- private helpers ----

    /// Return the response unchanged on success, or a [`ApiError::Status`]
    /// carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
}

#[async_trait]
impl RecordSource for ConsoleApi {
    async fn fetch_many(&self, entity: EntityType) -> Result<Vec<Record>, ApiError> {
        let value = self.get_json(&[entity.path_segment()]).await?;
        let items = value.as_array().ok_or_else(|| {
            CoreError::MalformedRecord(format!("{} list must be a JSON array", entity.label()))
        })?;
        let records = items
            .iter()
            .map(Record::from_json)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(entity = %entity, count = records.len(), "Fetched records");
        Ok(records)
    }

    async fn fetch_one(&self, entity: EntityType, name: &str) -> Result<Record, ApiError> {
        let value = self.get_json(&[entity.path_segment(), name]).await?;
        Ok(Record::from_json(&value)?)
    }

    async fn fetch_version_history(
        &self,
        entity: EntityType,
        name: &str,
    ) -> Result<Vec<VersionEntry>, ApiError> {
        let value = self
            .get_json(&[Self::history_path(entity), entity.history_segment(), name])
            .await?;
        Ok(parse_history(&value)?)
    }

    async fn fetch_options(&self, entity: EntityType) -> Result<ListOptions, ApiError> {
        match entity {
            EntityType::Metric => {
                let (types, groups) =
                    tokio::try_join!(self.get_strings(&["mtypes"]), self.user_groups(entity))?;
                Ok(ListOptions { types, groups })
            }
            EntityType::MetricTemplate => Ok(ListOptions {
                types: self.get_strings(&["mttypes"]).await?,
                groups: Vec::new(),
            }),
            EntityType::AggregationProfile => Ok(ListOptions {
                types: Vec::new(),
                groups: self.user_groups(entity).await?,
            }),
            EntityType::Probe => Ok(ListOptions::default()),
        }
    }

    async fn fetch_public_tenants(&self) -> Result<Vec<Tenant>, ApiError> {
        let value = self.get_json(&["public_tenants"]).await?;
        serde_json::from_value(value)
            .map_err(|e| CoreError::MalformedRecord(format!("tenant list: {e}")).into())
    }
}

#[async_trait]
impl BulkActionSink for ConsoleApi {
    async fn submit_selection(&self, request: &ImportRequest) -> Result<ImportReport, ApiError> {
        let url = self.endpoint(&["importmetrics"]);
        let mut builder = self.client.post(url).json(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        let value: Value = Self::parse_response(builder.send().await?).await?;
        let report = ImportReport::from_json(&value)?;
        tracing::info!(
            requested = request.metrictemplates.len(),
            imported = report.imported_count(),
            "Submitted metric template import"
        );
        Ok(report)
    }
}

#[async_trait]
impl IdentityProvider for ConsoleApi {
    /// Resolve with the caller's own token, never the service token.
    async fn resolve(&self, token: &str) -> Result<AuthContext, ApiError> {
        let url = self.endpoint(&["sessionactive"]);
        let response = self.get(url, Some(token)).send().await?;
        let value: Value = Self::parse_response(response).await?;
        Ok(AuthContext::from_session_json(&value)?)
    }
}
