use std::fmt;
use std::time::Duration;

use log::{debug, error, warn};
use serde_json::Value;
use url::Url;

use crate::config::CmsConfig;
use crate::models::item::CatalogItem;
use crate::models::service::ServiceItem;

pub mod images;

// ── Errors ─────────────────────────────────────────────

/// Failure taxonomy for content requests. Transport covers unreachable
/// hosts and connection drops; Status is a non-2xx answer; Shape is a
/// response that is not the expected JSON envelope (including the HTML
/// interstitial a tunnel host serves when the bypass header is missing).
#[derive(Debug)]
pub enum ClientError {
    Transport(String),
    Status(u16),
    Shape(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(msg) => write!(f, "transport error: {}", msg),
            ClientError::Status(code) => write!(f, "content API returned HTTP {}", code),
            ClientError::Shape(msg) => write!(f, "unexpected response shape: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

// ── Envelope ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub page: i64,
    pub page_size: i64,
    pub page_count: i64,
    pub total: i64,
}

/// One page of normalized catalog items plus whatever pagination metadata
/// the envelope carried.
#[derive(Debug)]
pub struct Listing {
    pub items: Vec<CatalogItem>,
    pub pagination: Option<PageMeta>,
}

/// Pull normalized items and pagination out of a collection envelope.
/// `data` may be an array or (for single-type collections) one object;
/// entries without a name are skipped, not fatal.
pub fn parse_listing(body: &Value) -> Result<Listing, ClientError> {
    let data = body
        .get("data")
        .ok_or_else(|| ClientError::Shape("envelope has no data field".into()))?;

    let entries: Vec<&Value> = match data {
        Value::Array(list) => list.iter().collect(),
        Value::Object(_) => vec![data],
        Value::Null => vec![],
        other => {
            return Err(ClientError::Shape(format!(
                "data is neither object nor array: {}",
                other
            )))
        }
    };

    let items = entries
        .iter()
        .filter_map(|entry| {
            let item = CatalogItem::from_entry(entry);
            if item.is_none() {
                warn!("Skipping catalog entry without a name: {}", entry);
            }
            item
        })
        .collect();

    Ok(Listing {
        items,
        pagination: parse_page_meta(body),
    })
}

pub fn parse_page_meta(body: &Value) -> Option<PageMeta> {
    let p = body.get("meta")?.get("pagination")?;
    Some(PageMeta {
        page: p.get("page")?.as_i64()?,
        page_size: p.get("pageSize").and_then(|v| v.as_i64()).unwrap_or(0),
        page_count: p.get("pageCount")?.as_i64()?,
        total: p.get("total").and_then(|v| v.as_i64()).unwrap_or(0),
    })
}

/// Unwrap a single-type envelope (`{data: {id, attributes: {...}}}`) into
/// its attribute object, tolerating the flat shape as well.
pub fn unwrap_single(body: &Value) -> Result<Value, ClientError> {
    let data = body
        .get("data")
        .ok_or_else(|| ClientError::Shape("envelope has no data field".into()))?;
    let entry = match data {
        Value::Array(list) => list
            .first()
            .ok_or_else(|| ClientError::Shape("empty data array".into()))?,
        other => other,
    };
    match entry.get("attributes") {
        Some(attrs) if attrs.is_object() => Ok(attrs.clone()),
        _ => Ok(entry.clone()),
    }
}

// ── Client ─────────────────────────────────────────────

/// One parameterized client for the whole content API; the host, prefix
/// and tunnel-bypass header all come from configuration, so every page
/// talks to the same deployment.
pub struct CmsClient {
    base: Url,
    api_prefix: String,
    tunnel_marker: String,
    bypass_header: String,
    bypass_value: String,
    http: reqwest::blocking::Client,
}

impl CmsClient {
    pub fn new(cfg: &CmsConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&cfg.base_url)
            .map_err(|e| ClientError::Shape(format!("bad base_url {}: {}", cfg.base_url, e)))?;

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| ClientError::Transport(format!("HTTP client error: {}", e)))?;

        Ok(CmsClient {
            base,
            api_prefix: cfg.api_prefix.trim_matches('/').to_string(),
            tunnel_marker: cfg.tunnel_marker.clone(),
            bypass_header: cfg.bypass_header.clone(),
            bypass_value: cfg.bypass_value.clone(),
            http,
        })
    }

    /// Scheme + host (+ port), without a trailing slash. Relative media
    /// paths are joined onto this.
    pub fn origin(&self) -> String {
        self.base.origin().ascii_serialization()
    }

    pub fn tunnel_marker(&self) -> &str {
        &self.tunnel_marker
    }

    /// Build `<host>/<prefix>/<collection>?<params>`. Query values are
    /// percent-encoded by the url crate, so exact-match filters survive
    /// names with spaces.
    pub fn collection_url(&self, collection: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        url.set_path(&format!("/{}/{}", self.api_prefix, collection));
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter().copied());
        }
        url
    }

    fn get(&self, url: Url) -> Result<Value, ClientError> {
        debug!("GET {}", url);

        let mut req = self.http.get(url.as_str());
        if !self.bypass_header.is_empty() {
            req = req.header(&self.bypass_header, &self.bypass_value);
        }

        let resp = req.send().map_err(|e| {
            error!("Content fetch failed for {}: {}", url, e);
            ClientError::Transport(e.to_string())
        })?;

        let status = resp.status();
        if !status.is_success() {
            error!("Content API returned {} for {}", status, url);
            return Err(ClientError::Status(status.as_u16()));
        }

        // A tunnel host without the bypass header answers 200 with an HTML
        // warning page; failing to parse JSON is a fetch failure.
        resp.json()
            .map_err(|e| ClientError::Shape(format!("invalid JSON from {}: {}", url, e)))
    }

    /// Fetch raw bytes (for image inlining). Returns the body plus the
    /// Content-Type header when the server sent one.
    pub(crate) fn get_bytes(&self, raw_url: &str) -> Result<(Vec<u8>, Option<String>), ClientError> {
        debug!("GET {} (bytes)", raw_url);

        let mut req = self.http.get(raw_url);
        if !self.bypass_header.is_empty() {
            req = req.header(&self.bypass_header, &self.bypass_value);
        }

        let resp = req
            .send()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.split(';').next().unwrap_or(s).trim().to_string());

        let bytes = resp
            .bytes()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok((bytes.to_vec(), content_type))
    }

    // ── Collections ────────────────────────────────────

    /// One page of products. The page number is clamped to ≥1 before the
    /// request is built; the CMS clamps the upper bound itself.
    pub fn products_page(&self, page: i64, page_size: i64) -> Result<Listing, ClientError> {
        let page = page.max(1);
        let page_str = page.to_string();
        let size_str = page_size.max(1).to_string();
        let url = self.collection_url(
            "products",
            &[
                ("populate", "image"),
                ("pagination[page]", &page_str),
                ("pagination[pageSize]", &size_str),
            ],
        );
        parse_listing(&self.get(url)?)
    }

    /// Products whose name matches exactly. The detail page is addressed
    /// by display name, so this can return more than one record.
    pub fn products_by_name(&self, name: &str) -> Result<Vec<CatalogItem>, ClientError> {
        let url = self.collection_url(
            "products",
            &[("filters[name][$eq]", name), ("populate", "*")],
        );
        Ok(parse_listing(&self.get(url)?)?.items)
    }

    /// Products sharing a category, for the related-items rail.
    pub fn products_by_category(&self, category: &str) -> Result<Vec<CatalogItem>, ClientError> {
        let url = self.collection_url(
            "products",
            &[("filters[category][$eq]", category), ("populate", "image")],
        );
        Ok(parse_listing(&self.get(url)?)?.items)
    }

    pub fn services(&self) -> Result<Vec<ServiceItem>, ClientError> {
        let url = self.collection_url("services", &[("populate", "*")]);
        let body = self.get(url)?;
        let data = body
            .get("data")
            .and_then(|d| d.as_array())
            .cloned()
            .unwrap_or_default();
        Ok(data.iter().filter_map(ServiceItem::from_entry).collect())
    }

    /// A single service by id. A 404 is a normal miss, not an error.
    pub fn service(&self, id: &str) -> Result<Option<ServiceItem>, ClientError> {
        let url = self.collection_url(&format!("services/{}", id), &[("populate", "*")]);
        match self.get(url) {
            Ok(body) => {
                let data = match body.get("data") {
                    Some(d) if !d.is_null() => d.clone(),
                    _ => return Ok(None),
                };
                Ok(ServiceItem::from_entry(&data))
            }
            Err(ClientError::Status(404)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn homepage(&self) -> Result<Value, ClientError> {
        let url = self.collection_url("homepage", &[("populate", "deep")]);
        unwrap_single(&self.get(url)?)
    }

    pub fn marketing_banner(&self) -> Result<Value, ClientError> {
        let url = self.collection_url("marketing-banner", &[]);
        unwrap_single(&self.get(url)?)
    }

    pub fn footer_content(&self) -> Result<Value, ClientError> {
        let url = self.collection_url("footer-content", &[("populate", "deep")]);
        unwrap_single(&self.get(url)?)
    }

    pub fn contact_info(&self) -> Result<Value, ClientError> {
        let url = self.collection_url("contact-info", &[]);
        unwrap_single(&self.get(url)?)
    }

    /// Resolve a media field to a plain URL (no inlining). Empty string
    /// when the field carries no usable reference.
    pub fn image_url(&self, field: &Value) -> String {
        images::resolve_url(&self.origin(), field)
    }
}
