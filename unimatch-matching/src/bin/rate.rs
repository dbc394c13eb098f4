//! Batch job: scores every candidate and replaces the stored `matches` rows.

use std::sync::Arc;

use clap::Parser;

use unimatch_matching::config::AppConfig;
use unimatch_matching::matching::{compute_and_store, SimilarityScorer};
use unimatch_shared::clients::db::create_pool;

#[derive(Debug, Parser)]
#[command(name = "rate", about = "Compute candidate match scores and store them")]
struct Args {
    /// Minimum score to keep, as a percentage (0-100).
    #[arg(long)]
    min_score: Option<f64>,

    /// SQLite database file. Overrides UNIMATCH_MATCHING__DATABASE_URL.
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    unimatch_shared::middleware::init_tracing("rate");

    let args = Args::parse();
    let mut config = AppConfig::load()?;
    if let Some(url) = args.database_url {
        config.database_url = url;
    }
    let min_score = args.min_score.unwrap_or(config.default_min_score);

    let db = create_pool(&config.database_url)?;
    let scorer = SimilarityScorer::new(Arc::new(config.embedder()?));

    let inserted = compute_and_store(&db, &scorer, min_score).await?;
    println!("Inserted {inserted} match rows into 'matches' table.");

    Ok(())
}
