use crate::{
    api::{RiotApiClient, LADDER_BRACKETS},
    database::db::DbClient
};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};
use thiserror::Error;
use tracing::{debug, warn};

/// A player selected for sampling. The rank score orders the pool; ladder
/// entries carry their ranked points, fallback tiers score zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub puuid: String,
    pub rank_score: i64
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse roster file: {0}")]
    Parse(#[from] serde_json::Error)
}

/// Curated well-known player handles per region, supplied as configuration
/// because any hardcoded roster goes stale. Handles are `name#tag` pairs.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct ProRoster {
    regions: HashMap<String, Vec<String>>
}

impl ProRoster {
    pub fn load(path: &Path) -> Result<ProRoster, RosterError> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    pub fn handles(&self, region: &str) -> &[String] {
        self.regions.get(region).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Resolves the ordered set of players to sample for one region. Tiers are
/// consulted most-exclusive first and only while the pool is still short of
/// `target_count`; coming up short overall is not an error.
pub async fn resolve_player_pool(
    api: &RiotApiClient,
    db: &DbClient,
    roster: &ProRoster,
    region: &str,
    target_count: usize
) -> Vec<PlayerIdentity> {
    let mut pool: Vec<PlayerIdentity> = Vec::new();

    // Tiers 1-3: the ranked ladder, bracket by bracket.
    for bracket in LADDER_BRACKETS {
        if pool.len() >= target_count {
            break;
        }

        match api.league_by_bracket(region, bracket).await {
            Ok(Some(league)) => {
                for entry in league.entries {
                    match entry.puuid {
                        Some(puuid) => pool.push(PlayerIdentity {
                            puuid,
                            rank_score: entry.league_points
                        }),
                        None => debug!("[{}] Skipping {} entry without identity", region, bracket)
                    }
                }
            }
            Ok(None) => debug!("[{}] No {} ladder published", region, bracket),
            Err(e) => warn!("[{}] Failed to fetch {} ladder: {}", region, bracket, e)
        }
    }

    // Tier 4: players seen in recently stored matches, for ladders that are
    // sparse right after a season reset.
    if pool.len() < target_count {
        match db.recent_participant_puuids(region).await {
            Ok(puuids) => pool.extend(puuids.into_iter().map(|puuid| PlayerIdentity {
                puuid,
                rank_score: 0
            })),
            Err(e) => warn!("[{}] Failed to sample recent participants: {}", region, e)
        }
    }

    // Tier 5: the curated roster, one identity lookup per handle.
    if pool.len() < target_count {
        for handle in roster.handles(region) {
            let Some((game_name, tag_line)) = handle.split_once('#') else {
                warn!("[{}] Skipping malformed roster handle '{}'", region, handle);
                continue;
            };

            match api.account_by_riot_id(region, game_name, tag_line).await {
                Ok(Some(account)) => pool.push(PlayerIdentity {
                    puuid: account.puuid,
                    rank_score: 0
                }),
                Ok(None) => warn!("[{}] Roster handle '{}' does not resolve", region, handle),
                Err(e) => warn!("[{}] Failed to resolve roster handle '{}': {}", region, handle, e)
            }
        }
    }

    rank_and_truncate(pool, target_count)
}

/// Deduplicates by identity (highest score wins), sorts by score descending
/// with the identity as a deterministic tie-break, and bounds the pool.
pub fn rank_and_truncate(pool: Vec<PlayerIdentity>, target_count: usize) -> Vec<PlayerIdentity> {
    let mut best: IndexMap<String, i64> = IndexMap::new();

    for player in pool {
        let score = best.entry(player.puuid).or_insert(player.rank_score);
        *score = i64::max(*score, player.rank_score);
    }

    let mut ranked: Vec<PlayerIdentity> = best
        .into_iter()
        .map(|(puuid, rank_score)| PlayerIdentity { puuid, rank_score })
        .sorted_by(|a, b| b.rank_score.cmp(&a.rank_score).then_with(|| a.puuid.cmp(&b.puuid)))
        .collect();

    ranked.truncate(target_count);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(puuid: &str, score: i64) -> PlayerIdentity {
        PlayerIdentity {
            puuid: puuid.to_string(),
            rank_score: score
        }
    }

    #[test]
    fn test_sorted_by_score_descending() {
        let pool = vec![player("low", 100), player("high", 900), player("mid", 500)];
        let ranked = rank_and_truncate(pool, 10);

        assert_eq!(ranked[0].puuid, "high");
        assert_eq!(ranked[1].puuid, "mid");
        assert_eq!(ranked[2].puuid, "low");
    }

    #[test]
    fn test_truncated_to_target() {
        let pool = (0..20).map(|i| player(&format!("p{:02}", i), i)).collect();
        let ranked = rank_and_truncate(pool, 5);

        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].rank_score, 19);
    }

    #[test]
    fn test_duplicate_identity_keeps_highest_score() {
        let pool = vec![player("p1", 0), player("p1", 700), player("p2", 300)];
        let ranked = rank_and_truncate(pool, 10);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0], player("p1", 700));
    }

    #[test]
    fn test_ties_break_deterministically() {
        let ranked = rank_and_truncate(vec![player("b", 50), player("a", 50)], 10);

        assert_eq!(ranked[0].puuid, "a");
        assert_eq!(ranked[1].puuid, "b");
    }

    #[test]
    fn test_short_pool_is_not_an_error() {
        let ranked = rank_and_truncate(vec![player("only", 10)], 50);

        assert_eq!(ranked.len(), 1);
    }
}
