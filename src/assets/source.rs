//! Asset sources and fetching
//!
//! Models come either from a remote URL or from the local filesystem. A fetch
//! reads the whole body, decodes it as UTF-8 and parses it as OBJ; failure at
//! any stage ends the attempt with an [`AssetError`]. There are no retries and
//! no timeouts beyond what the HTTP client applies.
//!
//! On native targets the blocking `reqwest` client runs inside a Bevy task so
//! no Tokio runtime is required; on wasm32 the async client is used.

use super::error::{AssetError, AssetResult};
use super::obj::{parse_obj, ObjModel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where a model is fetched from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetSource {
    /// `http://` or `https://` URL
    Url(String),
    /// Local file path
    Path(PathBuf),
}

impl From<&str> for AssetSource {
    fn from(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            AssetSource::Url(value.to_string())
        } else {
            AssetSource::Path(PathBuf::from(value))
        }
    }
}

impl From<String> for AssetSource {
    fn from(value: String) -> Self {
        AssetSource::from(value.as_str())
    }
}

impl From<AssetSource> for String {
    fn from(source: AssetSource) -> Self {
        source.to_string()
    }
}

impl fmt::Display for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetSource::Url(url) => write!(f, "{}", url),
            AssetSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl AssetSource {
    /// Fetches the raw body bytes
    pub async fn fetch_bytes(&self) -> AssetResult<Vec<u8>> {
        match self {
            AssetSource::Url(url) => fetch_url(url).await,
            AssetSource::Path(path) => std::fs::read(path).map_err(|error| AssetError::Io {
                location: self.to_string(),
                error,
            }),
        }
    }

    /// Fetches and parses the model
    pub async fn fetch_model(&self) -> AssetResult<ObjModel> {
        let bytes = self.fetch_bytes().await?;
        decode_model(self, bytes)
    }
}

/// Decodes a fetched body into a model
pub fn decode_model(source: &AssetSource, bytes: Vec<u8>) -> AssetResult<ObjModel> {
    let text = String::from_utf8(bytes).map_err(|error| AssetError::Utf8 {
        location: source.to_string(),
        error,
    })?;
    parse_obj(&text).map_err(|error| AssetError::Obj {
        location: source.to_string(),
        error,
    })
}

#[cfg(not(target_arch = "wasm32"))]
async fn fetch_url(url: &str) -> AssetResult<Vec<u8>> {
    // Blocking client on its own thread keeps the task pool free of a Tokio runtime
    let owned = url.to_string();
    std::thread::spawn(move || {
        let http_error = |e: reqwest::Error| AssetError::Http {
            location: owned.clone(),
            message: e.to_string(),
        };

        let response = reqwest::blocking::get(&owned).map_err(http_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::HttpStatus {
                location: owned.clone(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().map_err(http_error)?;
        Ok(body.to_vec())
    })
    .join()
    .unwrap_or_else(|_| {
        Err(AssetError::TaskLost {
            location: url.to_string(),
        })
    })
}

#[cfg(target_arch = "wasm32")]
async fn fetch_url(url: &str) -> AssetResult<Vec<u8>> {
    let http_error = |e: reqwest::Error| AssetError::Http {
        location: url.to_string(),
        message: e.to_string(),
    };

    let response = reqwest::get(url).await.map_err(http_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(AssetError::HttpStatus {
            location: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.bytes().await.map_err(http_error)?;
    Ok(body.to_vec())
}
