#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use monconsole_api::config::{LogFormat, ServerConfig};
use monconsole_api::router::build_app_router;
use monconsole_api::state::AppState;
use monconsole_client::{ApiError, BulkActionSink, IdentityProvider, RecordSource};
use monconsole_core::columns::ListOptions;
use monconsole_core::history::{parse_history, VersionEntry};
use monconsole_core::import::{ImportReport, ImportRequest};
use monconsole_core::permissions::AuthContext;
use monconsole_core::record::Record;
use monconsole_core::schema::EntityType;
use monconsole_core::tenants::{Tenant, SUPER_TENANT_NAME};
use serde_json::json;
use tower::ServiceExt;

pub const ADMIN_TOKEN: &str = "admin-token";
pub const USER_TOKEN: &str = "user-token";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        backend_url: "http://backend.invalid".to_string(),
        backend_token: None,
        default_page_size: 50,
        log_format: LogFormat::Text,
    }
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// Backend stand-in holding fixed fixtures.
///
/// Aggregation profiles always fail with a 503 so tests can observe how
/// backend outages surface.
pub struct MemoryBackend {
    records: BTreeMap<EntityType, Vec<Record>>,
    history: HashMap<(EntityType, String), Vec<VersionEntry>>,
    sessions: HashMap<String, AuthContext>,
    tenants: Vec<Tenant>,
    /// Every import request received, in order.
    pub imports: Mutex<Vec<ImportRequest>>,
}

fn metric(name: &str, probeversion: &str, mtype: &str, group: &str) -> Record {
    Record::new()
        .with_scalar("name", name)
        .with_scalar("probeversion", probeversion)
        .with_scalar("mtype", mtype)
        .with_scalar("group", group)
        .with_pairs("config", &[("path", "/usr/libexec/argo"), ("timeout", "60")])
}

fn template(name: &str, probeversion: &str, mtype: &str) -> Record {
    Record::new()
        .with_scalar("name", name)
        .with_scalar("probeversion", probeversion)
        .with_scalar("mtype", mtype)
}

impl MemoryBackend {
    pub fn new() -> Self {
        let mut records = BTreeMap::new();
        records.insert(
            EntityType::Metric,
            vec![
                metric("argo.AMS-Check", "ams-probe (0.1.7)", "Active", "ARGO"),
                metric(
                    "argo.AMSPublisher-Check",
                    "ams-publisher-probe (0.1.7)",
                    "Active",
                    "EGI",
                ),
                Record::new()
                    .with_scalar("name", "org.apel.APEL-Pub")
                    .with_scalar("mtype", "Passive")
                    .with_scalar("group", "EGI")
                    .with_pairs("flags", &[("OBSESS", "1"), ("PASSIVE", "1")]),
            ],
        );
        records.insert(
            EntityType::MetricTemplate,
            vec![
                template("argo.AMS-Check", "ams-probe (0.1.7)", "Active"),
                template("argo.AMSPublisher-Check", "ams-publisher-probe (0.1.7)", "Active"),
                template("argo.POEM-API-MON", "poem-probe (0.1.0)", "Active"),
                template("org.apel.APEL-Pub", "", "Passive"),
            ],
        );
        records.insert(
            EntityType::Probe,
            vec![
                Record::new()
                    .with_scalar("name", "ams-probe")
                    .with_scalar("version", "0.1.7")
                    .with_scalar("description", "Probe is inspecting AMS service."),
                Record::new()
                    .with_scalar("name", "selection")
                    .with_scalar("version", "1.0.0"),
                Record::new()
                    .with_scalar("name", "import")
                    .with_scalar("version", "2.0.0"),
            ],
        );

        let mut history = HashMap::new();
        let revisions = parse_history(&json!([
            {
                "version": "20200202-101010",
                "object_repr": "argo.AMS-Check",
                "date_created": "2020-02-02 10:10:10",
                "user": "poem",
                "comment": "[{\"changed\": {\"fields\": [\"probeversion\", \"config\"]}}]",
                "fields": {
                    "name": "argo.AMS-Check",
                    "probeversion": "ams-probe (0.1.7)",
                    "mtype": "Active",
                    "group": "ARGO",
                    "config": [{"key": "path", "value": "/usr/libexec/argo"}]
                }
            },
            {
                "version": "20200101-090000",
                "object_repr": "argo.AMS-Check",
                "date_created": "2020-01-01 09:00:00",
                "user": "poem",
                "comment": "Initial version.",
                "fields": {
                    "name": "argo.AMS-Check",
                    "probeversion": "ams-probe (0.1.6)",
                    "mtype": "Active",
                    "group": "ARGO",
                    "config": [{"key": "path", "value": "/usr/libexec/argo-monitoring"}]
                }
            }
        ]))
        .unwrap();
        history.insert((EntityType::Metric, "argo.AMS-Check".to_string()), revisions);

        let mut sessions = HashMap::new();
        sessions.insert(
            ADMIN_TOKEN.to_string(),
            AuthContext {
                username: "admin".into(),
                is_superuser: true,
                write_groups: BTreeMap::new(),
            },
        );
        let mut write_groups = BTreeMap::new();
        write_groups.insert(EntityType::Metric, BTreeSet::from(["EGI".to_string()]));
        sessions.insert(
            USER_TOKEN.to_string(),
            AuthContext {
                username: "alice".into(),
                is_superuser: false,
                write_groups,
            },
        );

        let tenants = ["EGI", SUPER_TENANT_NAME, "EUDAT", "SDC", "EOSC"]
            .into_iter()
            .map(|name| Tenant {
                name: name.to_string(),
                domain_url: format!("{}.poem.example.org", name.to_lowercase()),
            })
            .collect();

        Self {
            records,
            history,
            sessions,
            tenants,
            imports: Mutex::new(Vec::new()),
        }
    }

    fn not_found(what: &str) -> ApiError {
        ApiError::Status {
            status: 404,
            body: format!("{what} not found"),
        }
    }

    fn unavailable() -> ApiError {
        ApiError::Status {
            status: 503,
            body: "Service Unavailable".into(),
        }
    }
}

#[async_trait]
impl RecordSource for MemoryBackend {
    async fn fetch_many(&self, entity: EntityType) -> Result<Vec<Record>, ApiError> {
        if entity == EntityType::AggregationProfile {
            return Err(Self::unavailable());
        }
        Ok(self.records.get(&entity).cloned().unwrap_or_default())
    }

    async fn fetch_one(&self, entity: EntityType, name: &str) -> Result<Record, ApiError> {
        self.fetch_many(entity)
            .await?
            .into_iter()
            .find(|r| r.scalar("name") == Some(name))
            .ok_or_else(|| Self::not_found(name))
    }

    async fn fetch_version_history(
        &self,
        entity: EntityType,
        name: &str,
    ) -> Result<Vec<VersionEntry>, ApiError> {
        self.history
            .get(&(entity, name.to_string()))
            .cloned()
            .ok_or_else(|| Self::not_found(name))
    }

    async fn fetch_options(&self, entity: EntityType) -> Result<ListOptions, ApiError> {
        Ok(match entity {
            EntityType::Metric => ListOptions {
                types: vec!["Active".into(), "Passive".into()],
                groups: vec!["ARGO".into(), "EGI".into()],
            },
            EntityType::MetricTemplate => ListOptions {
                types: vec!["Active".into(), "Passive".into()],
                groups: Vec::new(),
            },
            _ => ListOptions::default(),
        })
    }

    async fn fetch_public_tenants(&self) -> Result<Vec<Tenant>, ApiError> {
        Ok(self.tenants.clone())
    }
}

#[async_trait]
impl BulkActionSink for MemoryBackend {
    async fn submit_selection(&self, request: &ImportRequest) -> Result<ImportReport, ApiError> {
        self.imports.lock().unwrap().push(request.clone());
        let existing: Vec<String> = self.records[&EntityType::Metric]
            .iter()
            .map(|r| r.display("name"))
            .collect();
        let (errors, imported): (Vec<String>, Vec<String>) = request
            .metrictemplates
            .iter()
            .cloned()
            .partition(|name| existing.contains(name));
        Ok(ImportReport { imported, errors })
    }
}

#[async_trait]
impl IdentityProvider for MemoryBackend {
    async fn resolve(&self, token: &str) -> Result<AuthContext, ApiError> {
        self.sessions.get(token).cloned().ok_or(ApiError::Status {
            status: 401,
            body: "Invalid token".into(),
        })
    }
}

// ---------------------------------------------------------------------------
// App and request helpers
// ---------------------------------------------------------------------------

/// Build the full application router on top of a fresh [`MemoryBackend`].
pub fn build_test_app() -> (Router, Arc<MemoryBackend>) {
    let config = test_config();
    let backend = Arc::new(MemoryBackend::new());
    let state = AppState {
        records: backend.clone(),
        bulk: backend.clone(),
        identity: backend.clone(),
        config: Arc::new(config.clone()),
    };
    (build_app_router(state, &config), backend)
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
