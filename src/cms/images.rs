use base64::{engine::general_purpose::STANDARD, Engine};
use log::warn;
use serde_json::Value;
use url::Url;

use super::{ClientError, CmsClient};

/// How many image fetches run at once when a rail of related items is
/// inlined. Order of results always matches the order of inputs.
const FETCH_WORKERS: usize = 4;

/// Resolve a media field to a URL string, tolerating every shape the CMS
/// has been seen to produce: array-wrapped `data`, object-wrapped
/// `data.attributes.url`, a bare `attributes` wrapper, a flat `{url}`,
/// or a plain string. Returns `""` when nothing usable is present.
pub fn resolve_url(host: &str, field: &Value) -> String {
    let path = match field {
        Value::Null => return String::new(),
        Value::String(s) => s.clone(),
        Value::Object(_) => {
            let inner = match field.get("data") {
                Some(Value::Array(list)) => list.first().cloned().unwrap_or(Value::Null),
                Some(d) if !d.is_null() => d.clone(),
                _ => field.clone(),
            };
            let url = inner
                .get("attributes")
                .and_then(|a| a.get("url"))
                .or_else(|| inner.get("url"))
                .and_then(|u| u.as_str());
            match url {
                Some(u) => u.to_string(),
                None => return String::new(),
            }
        }
        _ => return String::new(),
    };

    if path.is_empty() {
        String::new()
    } else if path.starts_with("http") {
        path
    } else {
        format!("{}{}", host, path)
    }
}

/// True when the URL points at a tunnel/preview host whose interstitial
/// warning page breaks plain `<img>` references.
pub fn is_tunnel_url(raw_url: &str, marker: &str) -> bool {
    if marker.is_empty() {
        return false;
    }
    Url::parse(raw_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.contains(marker)))
        .unwrap_or(false)
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Detect MIME type from file extension
pub fn mime_from_extension(path: &str) -> &'static str {
    let ext = path
        .rsplit('.')
        .next()
        .unwrap_or("")
        .split(['?', '#'])
        .next()
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

/// Fetch an image and re-encode it as an inline data URI, preferring the
/// server's Content-Type over the extension guess.
pub fn fetch_as_data_uri(client: &CmsClient, raw_url: &str) -> Result<String, ClientError> {
    let (bytes, content_type) = client.get_bytes(raw_url)?;
    let mime = content_type.unwrap_or_else(|| mime_from_extension(raw_url).to_string());
    Ok(data_uri(&mime, &bytes))
}

/// The URL a view should actually render for a media field. Tunnel-hosted
/// images are inlined; anything that fails degrades to the placeholder
/// with a warning, never aborting the surrounding render.
pub fn display_url(client: &CmsClient, field: Option<&Value>, placeholder: &str) -> String {
    let resolved = match field {
        Some(f) => resolve_url(&client.origin(), f),
        None => String::new(),
    };

    if resolved.is_empty() {
        return placeholder.to_string();
    }

    if is_tunnel_url(&resolved, client.tunnel_marker()) {
        match fetch_as_data_uri(client, &resolved) {
            Ok(uri) => uri,
            Err(e) => {
                warn!("Image inlining failed for {}: {}", resolved, e);
                placeholder.to_string()
            }
        }
    } else {
        resolved
    }
}

/// Resolve a batch of media fields with a bounded fan-out. Fields are
/// processed `FETCH_WORKERS` at a time and the output order matches the
/// input order, so rails render their items in catalog order.
pub fn display_urls(
    client: &CmsClient,
    fields: &[Option<Value>],
    placeholder: &str,
) -> Vec<String> {
    let mut out = Vec::with_capacity(fields.len());
    for chunk in fields.chunks(FETCH_WORKERS) {
        let resolved: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = chunk
                .iter()
                .map(|field| scope.spawn(move || display_url(client, field.as_ref(), placeholder)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|_| placeholder.to_string()))
                .collect()
        });
        out.extend(resolved);
    }
    out
}
