use std::env;
use std::path::PathBuf;

const DEFAULT_DATABASE_URL: &str = "app.db";
const DEFAULT_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MEDIA_ROOT: &str = "media";
const DEFAULT_MEDIA_URL: &str = "/media";

/// Runtime settings shared with the request handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Directory uploaded images are written into.
    pub media_root: PathBuf,
    /// Path prefix the media root is mounted and served under, without a
    /// trailing slash.
    pub media_url: String,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup, falling back
    /// to defaults for anything unset or unparsable.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let address = lookup("ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let media_root = lookup("MEDIA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT));
        let media_url = lookup("MEDIA_URL")
            .map(|value| normalize_media_url(&value))
            .unwrap_or_else(|| DEFAULT_MEDIA_URL.to_string());

        Self {
            database_url,
            address,
            port,
            media_root,
            media_url,
        }
    }

    /// Public URL for an image reference stored relative to the media root.
    pub fn media_url_for(&self, relative_path: &str) -> String {
        format!("{}/{}", self.media_url, relative_path.trim_start_matches('/'))
    }
}

fn normalize_media_url(value: &str) -> String {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_MEDIA_URL.to_string();
    }

    // The prefix doubles as the route the media directory is mounted on.
    if trimmed.contains("://") {
        log::warn!("MEDIA_URL must be a path, ignoring {trimmed}");
        return DEFAULT_MEDIA_URL.to_string();
    }

    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
