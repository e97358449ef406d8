use tracing_subscriber::EnvFilter;

mod app;
mod curator;
mod model;
mod page;
mod selector;
mod server;
mod sources;
mod storage;
mod subject_filter;
mod wikimedia;

use anyhow::Result;
use app::GusterApp;
use curator::CurationPipeline;
use std::time::Duration;
use subject_filter::SubjectFilter;
use tracing::{info, warn};
use wikimedia::WikimediaClient;

fn main() -> Result<()> {
    let mut env_filter = EnvFilter::from_default_env();
    if let Ok(directive) = "guster_web=info".parse() {
        env_filter = env_filter.add_directive(directive);
    }
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = storage::load_config()?;
    let config_path = storage::config_path()?;
    if !config_path.exists() {
        storage::save_config(&config)?;
        info!("Wrote default config to {:?}", config_path);
    }

    let client = WikimediaClient::new(Duration::from_secs(config.fetch_timeout_secs));
    let filter = SubjectFilter::new(config.filter.clone(), config.scoring.clone());
    let pipeline = CurationPipeline::new(client, filter, config.query_limit);
    let outcome = pipeline.curate(&config.search_queries, config.pool_limit);
    info!(
        "Curated {} image URLs from {} raw results ({} of {} queries failed)",
        outcome.stats.results_kept,
        outcome.stats.results_seen,
        outcome.stats.queries_failed,
        outcome.stats.queries_run
    );

    // Remote results first, then locally curated URLs not already present.
    let mut image_urls = outcome.pool;
    for url in sources::load_text_file(&config.image_list_path) {
        if !image_urls.contains(&url) {
            image_urls.push(url);
        }
    }
    let nicknames = sources::load_text_file(&config.nickname_list_path);

    if image_urls.is_empty() {
        warn!("No image URLs available; the page will show an empty state");
    }
    if nicknames.is_empty() {
        warn!("No nicknames available; the page will show an empty state");
    }

    let app = GusterApp::new(image_urls, nicknames, config.max_recent);
    server::run(app, &config.host, config.port)?;
    Ok(())
}
