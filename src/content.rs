use std::path::PathBuf;

use log::{error, info, warn};
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::models::entity::{sort_newest_first, Entity, EntityKind};

/// Why a collection could not be loaded. Only used for logging; callers see a
/// single `ContentUnavailable` kind.
#[derive(Debug, Error)]
pub enum Cause {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
#[error("content unavailable at {path}: {cause}")]
pub struct ContentUnavailable {
    pub path: String,
    #[source]
    pub cause: Cause,
}

impl ContentUnavailable {
    fn new(path: &str, cause: Cause) -> Self {
        ContentUnavailable {
            path: path.to_string(),
            cause,
        }
    }
}

/// Raw response from a content source, before any status or JSON checks.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: u16,
    pub body: String,
}

impl Fetched {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Where collection documents come from. Every call must hit the source:
/// implementations never cache.
#[rocket::async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<Fetched, Cause>;

    /// Human-readable origin, for logs and `/health`.
    fn describe(&self) -> String;
}

/// Reads collections from a directory on disk.
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsFetcher { root: root.into() }
    }
}

#[rocket::async_trait]
impl ContentFetcher for FsFetcher {
    async fn fetch(&self, path: &str) -> Result<Fetched, Cause> {
        let rel = path.trim_start_matches('/');
        if rel.split('/').any(|seg| seg == "..") {
            return Ok(Fetched { status: 403, body: String::new() });
        }
        match rocket::tokio::fs::read_to_string(self.root.join(rel)).await {
            Ok(body) => Ok(Fetched { status: 200, body }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Fetched { status: 404, body: String::new() })
            }
            Err(e) => Err(Cause::Transport(e.to_string())),
        }
    }

    fn describe(&self) -> String {
        format!("file://{}", self.root.display())
    }
}

/// Fetches collections from a remote base URL, always revalidating.
pub struct HttpFetcher {
    base: Url,
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(base: &str) -> Result<Self, String> {
        let mut base = Url::parse(base).map_err(|e| format!("invalid content_base_url {}: {}", base, e))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .user_agent(concat!("ngtech-site/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| e.to_string())?;
        Ok(HttpFetcher { base, client })
    }
}

#[rocket::async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<Fetched, Cause> {
        let url = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|e| Cause::Transport(e.to_string()))?;
        let resp = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| Cause::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| Cause::Transport(e.to_string()))?;
        Ok(Fetched { status, body })
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

/// Parse a collection document into normalised entities, newest first.
/// A valid document whose top level is not an array counts as empty.
pub fn parse_collection(kind: EntityKind, body: &str) -> Result<Vec<Entity>, serde_json::Error> {
    let doc: Value = serde_json::from_str(body)?;
    let mut entities: Vec<Entity> = match doc {
        Value::Array(items) => items.iter().map(|v| Entity::normalize(kind, v)).collect(),
        other => {
            warn!(
                "{} collection is not a JSON array (got {}), treating as empty",
                kind.label(),
                json_type(&other)
            );
            Vec::new()
        }
    };
    sort_newest_first(&mut entities);
    Ok(entities)
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Load one collection. A single attempt: any failure discards the whole load.
pub async fn load(
    fetcher: &dyn ContentFetcher,
    kind: EntityKind,
    path: &str,
) -> Result<Vec<Entity>, ContentUnavailable> {
    let result = fetch_and_parse(fetcher, kind, path).await;
    match &result {
        Ok(entities) => info!("Loaded {} {} entries from {}", entities.len(), kind.label(), path),
        Err(e) => error!("Error loading {}: {}", kind.label(), e),
    }
    result
}

async fn fetch_and_parse(
    fetcher: &dyn ContentFetcher,
    kind: EntityKind,
    path: &str,
) -> Result<Vec<Entity>, ContentUnavailable> {
    let fetched = fetcher
        .fetch(path)
        .await
        .map_err(|cause| ContentUnavailable::new(path, cause))?;
    if !fetched.is_success() {
        return Err(ContentUnavailable::new(path, Cause::Status(fetched.status)));
    }
    parse_collection(kind, &fetched.body).map_err(|e| ContentUnavailable::new(path, e.into()))
}
