pub mod patch;
pub mod player_pool;

use crate::{
    api::{ApiError, RiotApiClient},
    database::{
        db::{DbClient, StoreError},
        db_structs::MatchRecord
    },
    metadata::GameMetadata,
    model::structures::patch_version::PatchVersion,
    utils::progress_utils::progress_bar
};
use player_pool::PlayerIdentity;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError)
}

/// Tallies for one region scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestionOutcome {
    pub new_matches: u64,
    pub duplicates: u64,
    pub discarded: u64
}

/// Human-readable names for the log banner; unlisted regions print as-is.
pub fn region_display_name(region: &str) -> &str {
    match region {
        "kr" => "Korea",
        "euw1" => "Europe West",
        "eun1" => "Europe Nordic & East",
        "na1" => "North America",
        "br1" => "Brazil",
        "jp1" => "Japan",
        other => other
    }
}

/// The set difference the crawl acts on: history entries not yet stored,
/// in upstream (most recent first) order.
pub fn new_match_ids(history: &[String], existing: &HashSet<String>) -> Vec<String> {
    history.iter().filter(|id| !existing.contains(*id)).cloned().collect()
}

/// Turns player identities into deduplicated, normalized match facts in
/// the store. Failures are contained at player granularity so one bad
/// lookup never aborts a region's scan.
pub struct MatchIngestionPipeline<'a> {
    api: &'a RiotApiClient,
    db: &'a DbClient,
    metadata: &'a GameMetadata,
    /// When set, details from other patches are discarded before storage
    /// instead of being persisted and purged later.
    target_patch: Option<PatchVersion>,
    history_count: usize
}

impl<'a> MatchIngestionPipeline<'a> {
    pub fn new(
        api: &'a RiotApiClient,
        db: &'a DbClient,
        metadata: &'a GameMetadata,
        target_patch: Option<PatchVersion>,
        history_count: usize
    ) -> MatchIngestionPipeline<'a> {
        MatchIngestionPipeline {
            api,
            db,
            metadata,
            target_patch,
            history_count
        }
    }

    pub async fn ingest_region(&self, region: &str, players: &[PlayerIdentity]) -> IngestionOutcome {
        let mut outcome = IngestionOutcome::default();
        let bar = progress_bar(
            players.len() as u64,
            format!("Scanning {} players", region_display_name(region))
        );

        for player in players {
            if let Err(e) = self.ingest_player(region, &player.puuid, &mut outcome).await {
                warn!("[{}] Player scan failed for {}: {}", region, player.puuid, e);
            }
            bar.inc(1);
        }

        bar.finish();
        info!(
            "[{}] Scan complete: {} new, {} already stored, {} off-patch",
            region, outcome.new_matches, outcome.duplicates, outcome.discarded
        );

        outcome
    }

    async fn ingest_player(&self, region: &str, puuid: &str, outcome: &mut IngestionOutcome) -> Result<(), IngestError> {
        let history = self
            .api
            .match_ids_by_puuid(region, puuid, self.history_count)
            .await?
            .unwrap_or_default();

        if history.is_empty() {
            return Ok(());
        }

        let existing = self.db.existing_match_ids(region, &history).await?;
        let to_fetch = new_match_ids(&history, &existing);
        outcome.duplicates += (history.len() - to_fetch.len()) as u64;

        for match_id in to_fetch {
            let Some(detail) = self.api.match_by_id(region, &match_id).await? else {
                debug!("[{}] Match {} no longer available", region, match_id);
                continue;
            };

            let record = MatchRecord::from_detail(region, &match_id, &detail, self.metadata);

            if let Some(target) = self.target_patch {
                if PatchVersion::parse(&record.patch) != target {
                    outcome.discarded += 1;
                    debug!("[{}] Discarding {} from patch {}", region, match_id, record.patch);
                    continue;
                }
            }

            match self.db.insert_match(&record).await {
                Ok(true) => {
                    outcome.new_matches += 1;
                    debug!("[{}] Added match: {}", region, match_id);
                }
                // Another run stored it first; that is success, not error.
                Ok(false) => outcome.duplicates += 1,
                Err(e) => warn!("[{}] Failed to store match {}: {}", region, match_id, e)
            }
        }

        Ok(())
    }
}
