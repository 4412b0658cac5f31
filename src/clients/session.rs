use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clients::errors::{Error, Result};

/// Base URL of the production MyRadio API.
pub const DEFAULT_BASE_URL: &str = "https://ury.org.uk/api/v2";

const API_KEY_VAR: &str = "MYRADIO_API_KEY";
const BASE_URL_VAR: &str = "MYRADIO_BASE_URL";
const KEY_FILE_NAME: &str = ".myradio.key";
const SYSTEM_KEY_FILES: [&str; 2] = ["/etc/myradio.key", "/usr/local/etc/myradio.key"];

// Every response is wrapped in this envelope
#[derive(Deserialize, Debug)]
struct ApiResponse {
    status: String,
    #[serde(default)]
    payload: Option<Value>,
}

/// An authenticated connection to a MyRadio API server.
///
/// All accessors take the session explicitly; it keeps no per-call state
/// and can be shared between tasks.
pub struct Session {
    http: Client,
    base_url: String,
    api_key: String,
}

impl Session {
    /// Create a session against the production API.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a session against the API at `base_url`.
    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::ConfigurationError("API key cannot be empty".into()));
        }

        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::ConfigurationError(format!(
                "Base URL must start with http:// or https://, got {base_url:?}"
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("myradio-rs/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Session {
            http,
            base_url,
            api_key: api_key.trim().to_string(),
        })
    }

    /// Create a session against `base_url` with the API key stored in the
    /// file at `path`.
    pub async fn from_key_file(path: impl AsRef<Path>, base_url: &str) -> Result<Self> {
        let path = path.as_ref();
        let key = tokio::fs::read_to_string(path).await?;
        debug!("Loaded MyRadio API key from {path:?}");
        Self::with_base_url(key, base_url)
    }

    /// Create a session from `MYRADIO_API_KEY` or the first readable key file.
    ///
    /// `MYRADIO_BASE_URL` overrides the production base URL when set.
    pub async fn try_default() -> Result<Self> {
        let base_url = match std::env::var(BASE_URL_VAR) {
            Ok(url) => url,
            Err(std::env::VarError::NotPresent) => DEFAULT_BASE_URL.to_string(),
            Err(e) => return Err(Error::from(e)),
        };
        Self::try_with_base_url(&base_url).await
    }

    /// Like [`Session::try_default`], but against the API at `base_url`.
    pub async fn try_with_base_url(base_url: &str) -> Result<Self> {
        if let Ok(key) = std::env::var(API_KEY_VAR) {
            debug!("Using MyRadio API key from {API_KEY_VAR}");
            return Self::with_base_url(key, base_url);
        }
        Self::from_first_key_file(&key_file_candidates(), base_url).await
    }

    // Unreadable or empty candidates are skipped, not fatal
    async fn from_first_key_file(candidates: &[PathBuf], base_url: &str) -> Result<Self> {
        for path in candidates {
            match tokio::fs::read_to_string(path).await {
                Ok(key) if key.trim().is_empty() => {
                    debug!("Skipping empty MyRadio API key file {path:?}");
                }
                Ok(key) => {
                    debug!("Loaded MyRadio API key from {path:?}");
                    return Self::with_base_url(key, base_url);
                }
                Err(e) => debug!("Cannot read MyRadio API key file {path:?}: {e}"),
            }
        }

        Err(Error::ConfigurationError(format!(
            "No MyRadio API key found. Set {API_KEY_VAR} or create a {KEY_FILE_NAME} file."
        )))
    }

    /// The base URL every endpoint path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform a GET request on `endpoint` and unwrap the response envelope.
    ///
    /// Returns `None` when the server answered OK with a null payload.
    pub(crate) async fn api_request(&self, endpoint: &str) -> Result<Option<Value>> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Requesting {url}");

        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let envelope: ApiResponse = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(Error::ServerError {
                    status: status.as_u16(),
                    message: body,
                });
            }
            Err(e) => return Err(Error::DeserializationError(e)),
        };

        if envelope.status != "OK" {
            return Err(Error::ApiError {
                endpoint: endpoint.to_string(),
                status: envelope.status,
                payload: envelope.payload.map(|p| p.to_string()).unwrap_or_default(),
            });
        }

        debug!(
            "{endpoint} answered OK ({})",
            if envelope.payload.is_some() {
                "with payload"
            } else {
                "no payload"
            }
        );
        Ok(envelope.payload)
    }
}

/// Decode a payload, handing an absent payload to the decoder as `null`.
pub(crate) fn decode<T: DeserializeOwned>(payload: Option<Value>) -> Result<T> {
    Ok(serde_json::from_value(payload.unwrap_or(Value::Null))?)
}

fn key_file_candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(KEY_FILE_NAME)];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(KEY_FILE_NAME));
    }
    paths.extend(SYSTEM_KEY_FILES.iter().map(PathBuf::from));
    paths
}
