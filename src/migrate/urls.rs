//! Image-proxy URL normalization.
//!
//! Every externally-hosted image URL in wizard state is rewritten to flow
//! through the internal proxy path (CORS and caching). Inline-encoded URLs,
//! blob URLs, already-proxied paths, and assets on the trusted storage origin
//! pass through unchanged, which also makes the rewrite idempotent.

use serde_json::Value;

use crate::schema::WizardState;

/// Proxy path prefix every external image URL is rewritten through.
pub const PROXY_PREFIX: &str = "/api/image-proxy?url=";

/// Origin of our own storage bucket; assets here are served directly.
pub const TRUSTED_STORAGE_ORIGIN: &str = "https://storage.appdraft.dev";

/// Rewrite a single image URL through the proxy if it is externally hosted.
pub fn proxy_image_url(url: &str) -> String {
    if url.is_empty()
        || url.starts_with(PROXY_PREFIX)
        || url.starts_with("data:")
        || url.starts_with("blob:")
        || url.starts_with(TRUSTED_STORAGE_ORIGIN)
    {
        return url.to_string();
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        // Relative paths are already same-origin.
        return url.to_string();
    }
    format!("{PROXY_PREFIX}{}", urlencoding::encode(url))
}

fn proxy_opt(url: &mut Option<String>) {
    if let Some(u) = url {
        *u = proxy_image_url(u);
    }
}

/// Rewrite every image URL field in a typed state. The field list here is the
/// authoritative one; the raw-JSON pass in the migration table exists only so
/// pre-v2 payloads are normalized before slice decoding.
pub fn normalize_state(state: &mut WizardState) {
    for img in &mut state.moodboard.reference_images {
        img.url = proxy_image_url(&img.url);
    }
    if let Some(logo) = &mut state.branding.logo {
        logo.url = proxy_image_url(&logo.url);
    }
    proxy_opt(&mut state.branding.splash_url);
    if let Some(nav) = &mut state.screens.navigation {
        proxy_opt(&mut nav.bar_image_url);
    }
    for gen in &mut state.mockups.generated {
        gen.image_url = proxy_image_url(&gen.image_url);
    }
    proxy_opt(&mut state.mockups.nav_bar_url);
    proxy_opt(&mut state.mockups.logo_url);
}

/// Rewrite URL-bearing string fields in raw persisted JSON. Keys follow the
/// persisted naming convention: `url` itself or a `*Url` suffix.
pub fn rewrite_raw_urls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if key == "url" || key.ends_with("Url") {
                    if let Value::String(s) = child {
                        *s = proxy_image_url(s);
                        continue;
                    }
                }
                rewrite_raw_urls(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                rewrite_raw_urls(item);
            }
        }
        _ => {}
    }
}
