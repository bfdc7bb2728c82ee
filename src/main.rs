use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use indexmap::IndexMap;
use markup_fixture::{
    fixture::FixtureDefinition, markup::Transformer, provider::Oembed, registry::FixtureRegistry,
};
use tracing::error;

#[derive(Parser)]
struct Opts {
    /// YAML document mapping class names to fixture definitions.
    #[clap(short, long, env = "MARKUP_FIXTURE_FILE")]
    fixtures: PathBuf,
    #[clap(long, env = "MARKUP_FIXTURE_HOST_URL")]
    host_url: String,
    /// Class names to prepare; all registered classes when empty.
    class: Vec<String>,
}

async fn run(opts: Opts) -> anyhow::Result<()> {
    let fixtures = tokio::fs::read_to_string(&opts.fixtures)
        .await
        .with_context(|| format!("read fixtures from {}", opts.fixtures.display()))?;
    let fixtures: IndexMap<String, FixtureDefinition> = serde_yaml::from_str(&fixtures)
        .with_context(|| format!("parse fixtures from {}", opts.fixtures.display()))?;

    let class_names: Vec<String> = if opts.class.is_empty() {
        fixtures.keys().cloned().collect()
    } else {
        opts.class.clone()
    };

    let registry = FixtureRegistry::new(fixtures, Transformer::new(opts.host_url, Oembed::new()));
    let mut prepared = IndexMap::new();
    for class_name in class_names {
        let instances = registry
            .get(&class_name)
            .await
            .with_context(|| format!("prepare fixture for {class_name}"))?;
        prepared.insert(class_name, instances);
    }
    println!("{}", serde_json::to_string_pretty(&prepared)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    let opts = Opts::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    if let Err(e) = run(opts).await {
        error!(?e, "critical error");
        std::process::exit(1);
    }
}
