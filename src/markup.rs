use std::sync::LazyLock;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::{
    Error,
    fixture::{ClassSchema, FieldType, FixtureDefinition, Instance},
    id::{IdSource, UuidIds},
    provider::MetadataProvider,
};

pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";
pub const IMAGE_CONTENT_SIZE: u64 = 105336;
pub const VIDEO_CONTENT_TYPE: &str = "video/x-flv";

const IMAGE_NAME: &str = "Name for image";
const IMAGE_DESCRIPTION: &str = "description for image";
const VIDEO_NAME: &str = "Name for video";
const VIDEO_DESCRIPTION: &str = "description for video";
const VIDEO_PLACEHOLDER_THUMBNAIL: &str = "dummy/dummy_video.jpg";
const VIDEO_PLACEHOLDER_WIDTH: u32 = 480;
const VIDEO_PLACEHOLDER_HEIGHT: u32 = 270;

static PROVIDER_REFERENCE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(?:v=|v/|youtu\.be/)([-\w]+)").unwrap());

/// Video id assigned by the hosting provider, captured from `v=<id>`,
/// `/v/<id>` and `youtu.be/<id>` URL shapes.
pub fn provider_reference(url: &str) -> Option<&str> {
    PROVIDER_REFERENCE
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|capture| capture.as_str())
}

fn is_external_uri(uri: &str) -> bool {
    // External means scheme plus host. Schemeless and relative paths fail to
    // parse, opaque schemes like `file:` carry no host.
    matches!(Url::parse(uri), Ok(url) if url.has_host())
}

/// Placeholder media record substituted for an image or video field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub thumbnail: String,
    pub thumbnail_path: String,
    pub content_path: String,
    pub content_type: String,
    pub content_size: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub provider_reference: Option<String>,
}

fn expect_string(value: &Value) -> Result<&str, Error> {
    value.as_str().ok_or_else(|| Error::TypeMismatch {
        expected: "string",
        got: value.clone(),
    })
}

fn expect_string_array(value: &Value) -> Result<Vec<&str>, Error> {
    let items = value.as_array().ok_or_else(|| Error::TypeMismatch {
        expected: "array of strings",
        got: value.clone(),
    })?;
    items.iter().map(expect_string).collect()
}

/// Expands media-typed fields of raw fixture instances into [`AssetRecord`]s.
///
/// Video policy: when a provider reference is extractable from the URL the
/// injected [`MetadataProvider`] is consulted and its title, thumbnail and
/// dimensions are used; otherwise fixed placeholder metadata is substituted
/// and no provider call is made. A failed provider call aborts the whole
/// `prepare` call.
pub struct Transformer<P, I = UuidIds> {
    host_url: String,
    provider: P,
    ids: I,
}

impl<P> Transformer<P, UuidIds>
where
    P: MetadataProvider,
{
    pub fn new(host_url: impl Into<String>, provider: P) -> Self {
        Self::with_id_source(host_url, provider, UuidIds)
    }
}

impl<P, I> Transformer<P, I>
where
    P: MetadataProvider,
    I: IdSource,
{
    pub fn with_id_source(host_url: impl Into<String>, provider: P, ids: I) -> Self {
        Self {
            host_url: host_url.into(),
            provider,
            ids,
        }
    }

    /// Expands every media field of every instance, in input order, and
    /// assigns a fresh `id` to each instance. Any failure aborts the whole
    /// batch.
    pub async fn prepare(&self, fixture: &FixtureDefinition) -> Result<Vec<Instance>, Error> {
        let class = fixture.class.as_ref().ok_or(Error::ClassUndefined)?;
        let mut prepared = Vec::with_capacity(fixture.instances.len());
        for instance in &fixture.instances {
            prepared.push(self.prepare_instance(class, instance).await?);
        }
        Ok(prepared)
    }

    async fn prepare_instance(
        &self,
        class: &ClassSchema,
        instance: &Instance,
    ) -> Result<Instance, Error> {
        let mut prepared = Instance::new();
        for (name, value) in instance {
            let field_type = class
                .field_type(name)
                .ok_or_else(|| Error::FieldUndefined(name.clone()))?;
            let value = match field_type {
                FieldType::Image => {
                    debug!(field = %name, "expanding image field");
                    serde_json::to_value(self.image_record(expect_string(value)?))?
                }
                FieldType::ImageCollection => {
                    debug!(field = %name, "expanding image collection field");
                    let records: Vec<_> = expect_string_array(value)?
                        .into_iter()
                        .map(|image| self.image_record(image))
                        .collect();
                    serde_json::to_value(records)?
                }
                FieldType::Video => {
                    debug!(field = %name, "expanding video field");
                    serde_json::to_value(self.video_record(expect_string(value)?).await?)?
                }
                FieldType::VideoCollection => {
                    debug!(field = %name, "expanding video collection field");
                    let mut records = Vec::new();
                    for video in expect_string_array(value)? {
                        records.push(self.video_record(video).await?);
                    }
                    serde_json::to_value(records)?
                }
                FieldType::Opaque => value.clone(),
            };
            prepared.insert(name.clone(), value);
        }
        prepared.insert("id".to_string(), Value::String(self.ids.next_id()));
        Ok(prepared)
    }

    fn add_host_url(&self, path: &str) -> String {
        format!("{}/{path}", self.host_url)
    }

    fn image_record(&self, image: &str) -> AssetRecord {
        let image_path = if is_external_uri(image) {
            image.to_string()
        } else {
            self.add_host_url(image)
        };
        AssetRecord {
            id: self.ids.next_id(),
            name: IMAGE_NAME.to_string(),
            description: IMAGE_DESCRIPTION.to_string(),
            thumbnail: image_path.clone(),
            thumbnail_path: image_path,
            content_path: image.to_string(),
            content_type: IMAGE_CONTENT_TYPE.to_string(),
            content_size: Some(IMAGE_CONTENT_SIZE),
            width: None,
            height: None,
            provider_reference: None,
        }
    }

    async fn video_record(&self, video: &str) -> Result<AssetRecord, Error> {
        let reference = provider_reference(video);
        let metadata = match reference {
            Some(reference) => Some(self.provider.fetch(reference).await.map_err(|source| {
                Error::Metadata {
                    reference: reference.to_string(),
                    source,
                }
            })?),
            None => None,
        };
        let (name, thumbnail, width, height) = match metadata {
            Some(metadata) => (
                metadata.title,
                metadata.thumbnail_url,
                metadata.width,
                metadata.height,
            ),
            None => (
                VIDEO_NAME.to_string(),
                self.add_host_url(VIDEO_PLACEHOLDER_THUMBNAIL),
                VIDEO_PLACEHOLDER_WIDTH,
                VIDEO_PLACEHOLDER_HEIGHT,
            ),
        };
        Ok(AssetRecord {
            id: self.ids.next_id(),
            name,
            description: VIDEO_DESCRIPTION.to_string(),
            thumbnail: thumbnail.clone(),
            thumbnail_path: thumbnail,
            content_path: video.to_string(),
            content_type: VIDEO_CONTENT_TYPE.to_string(),
            content_size: None,
            width: Some(width),
            height: Some(height),
            provider_reference: reference.map(ToOwned::to_owned),
        })
    }
}
