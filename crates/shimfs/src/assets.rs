//! The virtual-host read path.
//!
//! The synchronous read is the one genuinely blocking operation in the
//! shim: the host serves the asset directory tree under a fixed virtual
//! host, and `read_file_sync` issues a blocking fetch against it.
//! Backend-native paths are rewritten to URL form by stripping the
//! resolved base directory and converting separators.

use winpath::SEP;

/// Rewrites a backend-native path to its virtual-host URL.
///
/// Absolute paths under the resolved base directory become relative to
/// it; absolute paths outside it are returned unrewritten (the fetch
/// will miss, which reads as absence). Relative paths map directly.
pub fn asset_url(host: &str, base_dir: Option<&str>, path: &str) -> String {
    if path.contains(':') {
        if let Some(base) = base_dir.filter(|b| !b.is_empty()) {
            // The component boundary after the base must be a separator;
            // this also rejects sibling prefixes like base + "r\...".
            let relative = path
                .strip_prefix(base)
                .and_then(|rest| rest.strip_prefix(SEP));
            if let Some(relative) = relative {
                return format!("http://{host}/{}", relative.replace(SEP, "/"));
            }
        }
        // Absolute but outside the base directory: no rewrite possible.
        return path.to_string();
    }
    format!("http://{host}/{}", path.replace(SEP, "/"))
}

/// Source of asset text for the blocking synchronous read.
///
/// A miss (any non-success response) is expected absence, not an
/// error: save files that don't exist yet are probed routinely.
pub trait AssetSource: Send + Sync {
    fn fetch_text(&self, url: &str) -> Option<String>;
}

/// Blocking HTTP asset source for the real virtual host.
///
/// This blocks the calling thread for the duration of the round-trip.
/// Call it from the host's script thread, never from inside the async
/// runtime.
pub struct HttpAssetSource {
    client: reqwest::blocking::Client,
}

impl HttpAssetSource {
    pub fn new() -> Self {
        HttpAssetSource {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpAssetSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetSource for HttpAssetSource {
    fn fetch_text(&self, url: &str) -> Option<String> {
        let response = self.client.get(url).send().ok()?;
        if !response.status().is_success() {
            return None;
        }
        response.text().ok()
    }
}
