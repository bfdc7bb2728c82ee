use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to fetch metadata ({url}): {error}")]
    Fetch { error: reqwest::Error, url: Url },
    #[error("unexpected status {status} fetching metadata ({url})")]
    Status {
        status: reqwest::StatusCode,
        url: Url,
    },
    #[error("failed to decode metadata response ({url}): {error}")]
    Decode { error: reqwest::Error, url: Url },
    #[error("invalid metadata endpoint for reference \"{reference}\": {error}")]
    Endpoint {
        error: url::ParseError,
        reference: String,
    },
    #[error("no metadata registered for reference \"{0}\"")]
    Unknown(String),
}

/// Metadata the provider reports for a hosted video.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub thumbnail_url: String,
    pub width: u32,
    pub height: u32,
}

/// Boundary to the external video-hosting provider. The transformer is
/// generic over this, so callers can inject [`Fixed`] instead of touching the
/// network.
#[allow(async_fn_in_trait)]
pub trait MetadataProvider {
    async fn fetch(&self, reference: &str) -> Result<VideoMetadata, Error>;
}

const DEFAULT_ENDPOINT: &str = "https://www.youtube.com/oembed";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// oEmbed JSON lookup keyed by provider reference.
pub struct Oembed {
    client: reqwest::Client,
    endpoint: Url,
}

impl Oembed {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("failed to build HTTP client"),
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
        }
    }

    pub fn with_endpoint(endpoint: Url, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("failed to build HTTP client"),
            endpoint,
        }
    }

    fn lookup_url(&self, reference: &str) -> Result<Url, Error> {
        let watch_url = format!("https://www.youtube.com/watch?v={reference}");
        Url::parse_with_params(
            self.endpoint.as_str(),
            &[("url", watch_url.as_str()), ("format", "json")],
        )
        .map_err(|error| Error::Endpoint {
            error,
            reference: reference.to_string(),
        })
    }
}

impl Default for Oembed {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataProvider for Oembed {
    async fn fetch(&self, reference: &str) -> Result<VideoMetadata, Error> {
        let url = self.lookup_url(reference)?;
        debug!(%url, reference, "fetching video metadata");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|error| Error::Fetch {
                error,
                url: url.clone(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status { status, url });
        }
        response
            .json()
            .await
            .map_err(|error| Error::Decode { error, url })
    }
}

/// In-memory provider for offline and deterministic use.
#[derive(Debug, Clone, Default)]
pub struct Fixed(IndexMap<String, VideoMetadata>);

impl Fixed {
    pub fn insert(mut self, reference: impl Into<String>, metadata: VideoMetadata) -> Self {
        self.0.insert(reference.into(), metadata);
        self
    }
}

impl From<IndexMap<String, VideoMetadata>> for Fixed {
    fn from(metadata: IndexMap<String, VideoMetadata>) -> Self {
        Self(metadata)
    }
}

impl MetadataProvider for Fixed {
    async fn fetch(&self, reference: &str) -> Result<VideoMetadata, Error> {
        self.0
            .get(reference)
            .cloned()
            .ok_or_else(|| Error::Unknown(reference.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_url_carries_reference_and_format() {
        let oembed = Oembed::new();
        let url = oembed.lookup_url("abc123").unwrap();
        assert_eq!(url.host_str(), Some("www.youtube.com"));
        assert_eq!(url.path(), "/oembed");
        let query: Vec<_> = url.query_pairs().collect();
        assert_eq!(
            query[0],
            (
                "url".into(),
                "https://www.youtube.com/watch?v=abc123".into()
            )
        );
        assert_eq!(query[1], ("format".into(), "json".into()));
    }

    #[tokio::test]
    async fn test_fixed_provider_hit_and_miss() {
        let provider = Fixed::default().insert(
            "abc123",
            VideoMetadata {
                title: "A title".into(),
                thumbnail_url: "https://img.test/abc123.jpg".into(),
                width: 640,
                height: 360,
            },
        );
        let metadata = provider.fetch("abc123").await.unwrap();
        assert_eq!(metadata.title, "A title");
        assert!(matches!(
            provider.fetch("missing").await,
            Err(Error::Unknown(reference)) if reference == "missing"
        ));
    }

    #[test]
    fn test_metadata_decodes_ignoring_extra_fields() {
        let metadata: VideoMetadata = serde_json::from_str(
            r#"{
                "title": "A title",
                "author_name": "someone",
                "thumbnail_url": "https://img.test/abc123.jpg",
                "thumbnail_width": 480,
                "width": 640,
                "height": 360
            }"#,
        )
        .unwrap();
        assert_eq!(
            metadata,
            VideoMetadata {
                title: "A title".into(),
                thumbnail_url: "https://img.test/abc123.jpg".into(),
                width: 640,
                height: 360,
            }
        );
    }
}
