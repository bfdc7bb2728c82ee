use serde::Deserialize;

/// Raw fixture instance as supplied by the caller. `preserve_order` keeps the
/// field order of the source document.
pub type Instance = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    Image,
    ImageCollection,
    Video,
    VideoCollection,
    /// Anything the transformer does not recognize passes through untouched.
    #[default]
    Opaque,
}

impl From<&str> for FieldType {
    fn from(value: &str) -> Self {
        match value {
            "image" => Self::Image,
            "image_collection" => Self::ImageCollection,
            "video" => Self::Video,
            "video_collection" => Self::VideoCollection,
            _ => Self::Opaque,
        }
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from(tag.as_str()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassSchema {
    pub fields: Vec<FieldDefinition>,
}

impl ClassSchema {
    /// Exact-name lookup. Field names are unique within a schema, so the
    /// first match is the only one.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|def| def.name == name)
            .map(|def| def.field_type)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureDefinition {
    #[serde(default)]
    pub class: Option<ClassSchema>,
    #[serde(default)]
    pub instances: Vec<Instance>,
}
