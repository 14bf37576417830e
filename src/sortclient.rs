use std::{future::Future, time::Duration};

use color_eyre::{eyre::eyre, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, COOKIE},
    Client, Url,
};
use tracing::debug;

use crate::{
    config::serverconfig::ServerConfig,
    sortclient::{
        error::TransportError,
        outcome::{SortOutcome, SortResponse},
        types::PlaylistID,
    },
};

pub mod error;
pub mod outcome;
pub mod types;

const SORT_ENDPOINT: &str = "sort_playlist";

/// Anything that can ask for a playlist to be sorted. Every call is one request; nothing is
/// retried or cached.
pub trait SortBackend: Send + Sync + 'static {
    fn sort_playlist(
        &self,
        id: &PlaylistID,
    ) -> impl Future<Output = Result<SortOutcome, TransportError>> + Send;
}

pub struct HttpSortClient {
    client: Client,
    base: Url,
}

impl HttpSortClient {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let base = Url::parse(&config.url)
            .map_err(|e| eyre!("Invalid server URL {}: {}", config.url, e))?;
        if base.cannot_be_a_base() {
            return Err(eyre!("Server URL {} cannot be used as a base", config.url));
        }

        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let mut value = HeaderValue::from_str(cookie)
                .map_err(|e| eyre!("Session cookie is not a valid header value: {}", e))?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }

        let mut builder = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    /// `<base>/sort_playlist/<id>`, with the ID encoded as a single path segment
    pub fn endpoint(&self, id: &PlaylistID) -> Result<Url, TransportError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(SORT_ENDPOINT)
            .push(id);
        Ok(url)
    }
}

impl SortBackend for HttpSortClient {
    fn sort_playlist(
        &self,
        id: &PlaylistID,
    ) -> impl Future<Output = Result<SortOutcome, TransportError>> + Send {
        async move {
            let url = self.endpoint(id)?;
            debug!("GET {url}");
            let res = self.client.get(url).send().await?;
            let status = res.status();
            let body = res.text().await?;
            match SortResponse::parse(&body) {
                Ok(decoded) if status.is_success() => Ok(decoded.into()),
                // An error status only counts as an answer when the body admits the failure
                Ok(decoded) if !decoded.is_success() => Ok(decoded.into()),
                Ok(_) => Err(TransportError::Status(status)),
                Err(_) if !status.is_success() => Err(TransportError::Status(status)),
                Err(e) => Err(TransportError::Decode(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;

    use crate::tests::spawn_server;

    use super::*;

    fn client(url: &str) -> HttpSortClient {
        HttpSortClient::new(&ServerConfig {
            url: url.to_string(),
            ..ServerConfig::default()
        })
        .unwrap()
    }

    fn id(s: &str) -> PlaylistID {
        PlaylistID::new(s).unwrap()
    }

    #[test]
    fn test_endpoint() {
        let c = client("http://localhost:8888");
        assert_eq!(
            c.endpoint(&id("37i9dQZF1DX")).unwrap().as_str(),
            "http://localhost:8888/sort_playlist/37i9dQZF1DX"
        );
        let c = client("http://localhost:8888/app/");
        assert_eq!(
            c.endpoint(&id("abc")).unwrap().as_str(),
            "http://localhost:8888/app/sort_playlist/abc"
        );
        assert_eq!(
            c.endpoint(&id("a b/c")).unwrap().as_str(),
            "http://localhost:8888/app/sort_playlist/a%20b%2Fc"
        );
    }

    #[test]
    fn test_bad_config() {
        assert!(HttpSortClient::new(&ServerConfig {
            url: "not a url".to_string(),
            ..ServerConfig::default()
        })
        .is_err());
        assert!(HttpSortClient::new(&ServerConfig {
            url: "mailto:someone@example.com".to_string(),
            ..ServerConfig::default()
        })
        .is_err());
        assert!(HttpSortClient::new(&ServerConfig {
            session_cookie: Some("session=\nbroken".to_string()),
            ..ServerConfig::default()
        })
        .is_err());
    }

    #[tokio::test]
    async fn test_success() {
        let url = spawn_server().await;
        let outcome = client(&url).sort_playlist(&id("42")).await.unwrap();
        assert_eq!(
            outcome,
            SortOutcome::Success {
                message: "Sorted 42".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_encoded_id_reaches_server_intact() {
        let url = spawn_server().await;
        let outcome = client(&format!("{url}/app"))
            .sort_playlist(&id("a b/c"))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            SortOutcome::Success {
                message: "Sorted a b/c".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_decoded_failure() {
        let url = spawn_server().await;
        let outcome = client(&url).sort_playlist(&id("fail")).await.unwrap();
        assert_eq!(
            outcome,
            SortOutcome::Failure {
                status: "error".to_string(),
                detail: Some("Failed to clear playlist".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_error_status_with_json_body() {
        let url = spawn_server().await;
        let c = client(&url);
        assert!(matches!(
            c.sort_playlist(&id("denied")).await,
            Ok(SortOutcome::Failure { .. })
        ));
        match c.sort_playlist(&id("liar")).await {
            Err(TransportError::Status(code)) => assert_eq!(code, StatusCode::BAD_GATEWAY),
            other => panic!("Expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_numeric_status_is_failure() {
        let url = spawn_server().await;
        assert_eq!(
            client(&url).sort_playlist(&id("numeric")).await.unwrap(),
            SortOutcome::Failure {
                status: "500".to_string(),
                detail: Some("boom".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_unreadable_bodies() {
        let url = spawn_server().await;
        let c = client(&url);
        assert!(matches!(
            c.sort_playlist(&id("html")).await,
            Err(TransportError::Decode(_))
        ));
        match c.sort_playlist(&id("crash")).await {
            Err(TransportError::Status(code)) => {
                assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR)
            }
            other => panic!("Expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let res = client(&format!("http://{addr}"))
            .sort_playlist(&id("42"))
            .await;
        assert!(matches!(res, Err(TransportError::Request(_))));
    }

    #[tokio::test]
    async fn test_session_cookie_is_sent() {
        let url = spawn_server().await;
        let c = HttpSortClient::new(&ServerConfig {
            url,
            session_cookie: Some("session=abc123".to_string()),
            timeout_secs: Some(5),
        })
        .unwrap();
        assert_eq!(
            c.sort_playlist(&id("whoami")).await.unwrap(),
            SortOutcome::Success {
                message: "session=abc123".to_string()
            }
        );
    }
}
