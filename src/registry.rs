use indexmap::IndexMap;

use crate::{
    Error,
    fixture::{FixtureDefinition, Instance},
    id::{IdSource, UuidIds},
    markup::Transformer,
    provider::MetadataProvider,
};

/// Class-name keyed store of fixture definitions. Lookup plus delegation to
/// the transformer, nothing else.
pub struct FixtureRegistry<P, I = UuidIds> {
    fixtures: IndexMap<String, FixtureDefinition>,
    transformer: Transformer<P, I>,
}

impl<P, I> FixtureRegistry<P, I>
where
    P: MetadataProvider,
    I: IdSource,
{
    pub fn new(
        fixtures: IndexMap<String, FixtureDefinition>,
        transformer: Transformer<P, I>,
    ) -> Self {
        Self {
            fixtures,
            transformer,
        }
    }

    pub async fn get(&self, class_name: &str) -> Result<Vec<Instance>, Error> {
        let fixture = self
            .fixtures
            .get(class_name)
            .filter(|fixture| fixture.class.is_some())
            .ok_or_else(|| Error::FixtureNotFound(class_name.to_string()))?;
        self.transformer.prepare(fixture).await
    }
}
