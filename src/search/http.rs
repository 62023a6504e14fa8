//! HTTP search service for Elasticsearch/OpenSearch compatible clusters.
//!
//! Endpoints used:
//!   * GET  /
//!   * GET  /_cat/indices?format=json
//!   * GET  /{index}/_mapping
//!   * POST /{index}/_search (with `search_after` continuation)

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde_json::{Value, json};
use tracing::debug;

use super::types::{
    ClusterInfo, CollectionInfo, Hit, HttpMethod, Scope, SearchPage, SortCursor, is_sort_clause,
};
use super::{SearchService, ServiceResult};
use crate::config::ConnectionConfig;
use crate::error::{ConnectionError, Result, ServiceError};

/// Longest error body kept in a [`ServiceError::Status`]
const MAX_ERROR_BODY: usize = 300;

/// How requests are authenticated
#[derive(Debug, Clone)]
enum Auth {
    None,
    Basic {
        username: String,
        password: Option<String>,
    },
    ApiKey(String),
}

/// Search service backed by the cluster's REST API
#[derive(Debug, Clone)]
pub struct HttpSearchService {
    http: Client,
    base_url: Url,
    auth: Auth,
    default_sort: Value,
}

impl HttpSearchService {
    /// Build a service for the given cluster URL
    ///
    /// Credentials embedded in the URL take precedence over the configured
    /// username/password; an API key takes precedence over both.
    ///
    /// # Arguments
    /// * `url` - Cluster base URL
    /// * `config` - Connection configuration
    /// * `default_sort` - Sort clause used when a scope has none
    pub fn new(url: &str, config: &ConnectionConfig, default_sort: Value) -> Result<Self> {
        let mut base_url =
            Url::parse(url).map_err(|e| ConnectionError::InvalidUrl(format!("{url}: {e}")))?;

        let mut auth = match (&config.username, &config.password) {
            (Some(username), password) => Auth::Basic {
                username: username.clone(),
                password: password.clone(),
            },
            _ => Auth::None,
        };

        if !base_url.username().is_empty() {
            auth = Auth::Basic {
                username: base_url.username().to_string(),
                password: base_url.password().map(str::to_string),
            };
            // Url only fails these on cannot-be-a-base URLs, which http(s) never are
            let _ = base_url.set_username("");
            let _ = base_url.set_password(None);
        }

        if let Some(key) = &config.api_key {
            auth = Auth::ApiKey(encode_api_key(key));
        }

        debug!("Initializing search service: base_url={}", base_url);

        let http = Client::builder()
            .user_agent(concat!("searchsh/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ConnectionError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            auth,
            default_sort,
        })
    }

    /// Base URL without credentials, for display
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Auth::None => request,
            Auth::Basic { username, password } => request.basic_auth(username, password.as_ref()),
            Auth::ApiKey(key) => request.header("Authorization", format!("ApiKey {key}")),
        }
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> ServiceResult<Value> {
        let url = self.endpoint(path);
        debug!("{} {}", method, url);

        let mut request = self.authorize(self.http.request(method, url));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ServiceError::Status {
                code: status.as_u16(),
                body: summarize_error_body(&text),
            });
        }

        if text.trim().is_empty() {
            return Ok(json!({ "status": status.as_u16() }));
        }

        // Some endpoints (e.g. `_cat` without format=json) answer in plain text
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

#[async_trait]
impl SearchService for HttpSearchService {
    async fn search(
        &self,
        scope: &Scope,
        cursor: &SortCursor,
        page_size: usize,
    ) -> ServiceResult<SearchPage> {
        let body = build_search_body(scope, cursor, page_size, &self.default_sort);
        let path = format!("/{}/_search", scope.index);
        let response = self.send(Method::POST, &path, Some(&body)).await?;
        let page = parse_paged_response(&response)?;
        debug!(
            "search page: index={}, hits={}, total={}",
            scope.index,
            page.hits.len(),
            page.total
        );
        Ok(page)
    }

    async fn list(&self) -> ServiceResult<Vec<CollectionInfo>> {
        let response = self
            .send(
                Method::GET,
                "/_cat/indices?format=json&h=index,health,status,docs.count,store.size",
                None,
            )
            .await?;
        parse_cat_indices(&response)
    }

    async fn mapping(&self, index: &str) -> ServiceResult<Value> {
        self.send(Method::GET, &format!("/{index}/_mapping"), None)
            .await
    }

    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> ServiceResult<Value> {
        let method = match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
        };
        self.send(method, path, body).await
    }

    async fn ping(&self) -> ServiceResult<ClusterInfo> {
        let response = self.send(Method::GET, "/", None).await?;
        Ok(ClusterInfo {
            cluster_name: response
                .get("cluster_name")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            version: response
                .pointer("/version/number")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

/// Build the `_search` body for one page
///
/// The total is always tracked exactly, and `search_after` is only sent once
/// a cursor exists.
pub fn build_search_body(
    scope: &Scope,
    cursor: &SortCursor,
    page_size: usize,
    default_sort: &Value,
) -> Value {
    let mut body = json!({
        "size": page_size,
        "track_total_hits": true,
        "query": scope.query.clone().unwrap_or_else(|| json!({ "match_all": {} })),
        "sort": scope
            .sort
            .clone()
            .filter(is_sort_clause)
            .unwrap_or_else(|| default_sort.clone()),
    });

    if !cursor.is_start() {
        body["search_after"] = Value::Array(cursor.values().to_vec());
    }
    body
}

/// Decode a `_search` response into a page
pub fn parse_search_response(response: &Value) -> ServiceResult<SearchPage> {
    let hits = response
        .get("hits")
        .ok_or_else(|| ServiceError::Decode("response has no `hits` section".to_string()))?;

    // `hits.total` is an object on modern clusters and a bare number on old ones
    let total = match hits.get("total") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(total) => total.get("value").and_then(Value::as_u64),
        None => None,
    }
    .ok_or_else(|| ServiceError::Decode("response has no `hits.total`".to_string()))?;

    let raw_hits = hits
        .get("hits")
        .and_then(Value::as_array)
        .ok_or_else(|| ServiceError::Decode("`hits.hits` is not an array".to_string()))?;

    let hits = raw_hits
        .iter()
        .map(|hit| Hit {
            id: hit
                .get("_id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            index: hit
                .get("_index")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            source: hit.get("_source").cloned().unwrap_or(Value::Null),
            sort: SortCursor::new(
                hit.get("sort")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default(),
            ),
        })
        .collect();

    Ok(SearchPage { hits, total })
}

/// Decode a page fetched for the browser
///
/// Every hit must carry sort values, the next page continues after them.
fn parse_paged_response(response: &Value) -> ServiceResult<SearchPage> {
    let page = parse_search_response(response)?;
    if let Some(hit) = page.hits.iter().find(|hit| hit.sort.is_start()) {
        return Err(ServiceError::Decode(format!(
            "hit `{}` has no sort values to continue from",
            hit.id
        )));
    }
    Ok(page)
}

/// Decode `_cat/indices?format=json`, sorted by index name
pub fn parse_cat_indices(response: &Value) -> ServiceResult<Vec<CollectionInfo>> {
    let rows = response
        .as_array()
        .ok_or_else(|| ServiceError::Decode("expected a JSON array of indices".to_string()))?;

    let field = |row: &Value, name: &str| row.get(name).and_then(Value::as_str).map(str::to_string);

    let mut indices: Vec<CollectionInfo> = rows
        .iter()
        .filter_map(|row| {
            Some(CollectionInfo {
                name: field(row, "index")?,
                health: field(row, "health"),
                status: field(row, "status"),
                docs_count: field(row, "docs.count").and_then(|n| n.parse().ok()),
                store_size: field(row, "store.size"),
            })
        })
        .collect();

    indices.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(indices)
}

/// Flatten an index mapping into `(field path, type)` pairs
///
/// Multi-fields are reported as `field.subfield`; objects without an explicit
/// type are reported as `object`.
pub fn mapping_fields(mapping: &Value) -> Vec<(String, String)> {
    let mut fields = Vec::new();

    if let Some(indices) = mapping.as_object() {
        for index_mapping in indices.values() {
            if let Some(properties) = index_mapping.pointer("/mappings/properties") {
                collect_properties(properties, "", &mut fields);
            }
        }
    }

    fields.sort();
    fields.dedup();
    fields
}

fn collect_properties(properties: &Value, prefix: &str, out: &mut Vec<(String, String)>) {
    let Some(properties) = properties.as_object() else {
        return;
    };

    for (name, definition) in properties {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };

        let kind = definition
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("object");
        out.push((path.clone(), kind.to_string()));

        if let Some(nested) = definition.get("properties") {
            collect_properties(nested, &path, out);
        }
        if let Some(multi) = definition.get("fields") {
            collect_properties(multi, &path, out);
        }
    }
}

/// `id:key` pairs are base64-encoded as the cluster expects; anything else is
/// assumed to be encoded already.
fn encode_api_key(key: &str) -> String {
    if key.contains(':') {
        base64::engine::general_purpose::STANDARD.encode(key)
    } else {
        key.to_string()
    }
}

/// Extract the most useful part of an error response
fn summarize_error_body(text: &str) -> String {
    if let Ok(body) = serde_json::from_str::<Value>(text) {
        let error_type = body.pointer("/error/type").and_then(Value::as_str);
        let reason = body.pointer("/error/reason").and_then(Value::as_str);
        match (error_type, reason) {
            (Some(t), Some(r)) => return format!("{t}: {r}"),
            (None, Some(r)) => return r.to_string(),
            _ => {}
        }
    }

    let trimmed = text.trim();
    if trimmed.chars().count() > MAX_ERROR_BODY {
        let cut: String = trimmed.chars().take(MAX_ERROR_BODY).collect();
        format!("{cut}...")
    } else {
        trimmed.to_string()
    }
}
