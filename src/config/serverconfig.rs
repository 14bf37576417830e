use serde::Deserialize;

/// Where the sorting server lives, and how to talk to it
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL. A path prefix is kept, so `http://host/app` sends requests to
    /// `http://host/app/sort_playlist/<id>`.
    pub url: String,
    /// Session cookie of a logged in browser session, sent as-is in the `Cookie` header. The
    /// server reads the Spotify access token from it.
    pub session_cookie: Option<String>,
    /// Client side timeout. Unset means the request waits until the transport gives up.
    pub timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8888".to_string(),
            session_cookie: None,
            timeout_secs: None,
        }
    }
}
