use chrono::Utc;
use clap::Parser;
use rift_processor::{
    api::RiotApiClient,
    args::Args,
    database::db::DbClient,
    ingestion::{
        patch::resolve_current_patch,
        player_pool::{resolve_player_pool, ProRoster},
        region_display_name, MatchIngestionPipeline
    },
    metadata::GameMetadata,
    model::{
        aggregator::{aggregate_region, counted_games},
        leaderboard::LeaderboardTracker
    },
    output::{write_artifact, Artifact, Meta}
};
use std::collections::BTreeMap;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .init();

    let api = RiotApiClient::new(args.api_key.clone());
    let db = DbClient::connect(&args.connection_string)
        .await
        .expect("Expected valid database connection");
    db.ensure_schema()
        .await
        .expect("Expected matches schema to be available");

    let metadata = GameMetadata::load(&api).await;
    let current_patch = resolve_current_patch(&metadata, &db).await;
    info!("Current patch: {}", current_patch);

    // Retention: only the current patch survives into aggregation.
    if let Err(e) = db.delete_other_patches(&current_patch.to_string()).await {
        error!("Retention purge failed: {}", e);
    }

    let roster = match &args.pro_roster {
        Some(path) => ProRoster::load(path).unwrap_or_else(|e| {
            warn!("Could not load pro roster from {}: {}", path.display(), e);
            ProRoster::default()
        }),
        None => ProRoster::default()
    };

    let pipeline = MatchIngestionPipeline::new(
        &api,
        &db,
        &metadata,
        Some(current_patch),
        args.match_history_count
    );

    // Phase 1: crawl.
    let mut run_new_matches = 0;
    let mut sample_size = 0;

    for region in &args.regions {
        info!("=== Scan: {} ({}) ===", region_display_name(region), region);

        let pool = resolve_player_pool(&api, &db, &roster, region, args.player_count).await;
        sample_size += pool.len();

        let outcome = pipeline.ingest_region(region, &pool).await;
        run_new_matches += outcome.new_matches;
    }

    // Phase 2: aggregate from the store only.
    info!("Generating artifact...");

    let patch = current_patch.to_string();
    let mut leaderboard = LeaderboardTracker::new();
    let mut regions = BTreeMap::new();
    let mut total_games = 0;
    let mut patch_games = 0;

    for region in &args.regions {
        let matches = match db.matches_by_region(region).await {
            Ok(matches) => matches,
            Err(e) => {
                error!("[{}] Could not read stored matches: {}", region, e);
                Vec::new()
            }
        };

        total_games += counted_games(&matches, !args.exclude_roleless);
        let on_patch: Vec<_> = matches.iter().filter(|m| m.patch == patch).cloned().collect();
        patch_games += counted_games(&on_patch, !args.exclude_roleless);

        let mut region_tracker = LeaderboardTracker::new();
        let stats = aggregate_region(
            region,
            &matches,
            &patch,
            metadata.completed_items.as_ref(),
            &mut region_tracker
        );

        leaderboard.merge(region_tracker);
        regions.insert(region.clone(), stats);
    }

    let artifact = Artifact {
        meta: Meta {
            total_games,
            patch_games,
            current_patch: patch,
            last_updated: Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
            sample_size
        },
        regions,
        leaderboards: leaderboard.finalize()
    };

    write_artifact(&args.output, &artifact).expect("Expected artifact to be written");
    info!("Complete. New matches: {}", run_new_matches);
}
