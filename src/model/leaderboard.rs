use crate::{
    database::db_structs::ParticipantSnapshot,
    model::{round_kda, round_rate, structures::role::Role}
};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Ranked entry for one player under a `(role, champion)` key. The full
/// list is emitted; consumers needing a top-N truncate on their side.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LeaderboardEntry {
    pub player: String,
    pub region: String,
    pub games: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub kda: f64
}

#[derive(Debug, Clone, Default)]
struct PlayerTally {
    player: String,
    region: String,
    games: u32,
    wins: u32,
    kills: i64,
    deaths: i64,
    assists: i64
}

/// Accumulates per-role-per-champion player tallies as a by-product of the
/// aggregation pass. One tracker is threaded through each region's
/// processing and merged into the run-level tracker once, so aggregation
/// stays referentially transparent per region.
#[derive(Debug, Default)]
pub struct LeaderboardTracker {
    // (role, champion) -> puuid -> tally; insertion order kept so merges
    // are deterministic for a fixed input snapshot.
    tallies: IndexMap<(Role, String), IndexMap<String, PlayerTally>>
}

impl LeaderboardTracker {
    pub fn new() -> LeaderboardTracker {
        LeaderboardTracker::default()
    }

    pub fn record(&mut self, role: Role, region: &str, snapshot: &ParticipantSnapshot) {
        let tally = self
            .tallies
            .entry((role, snapshot.champion_name.clone()))
            .or_default()
            .entry(snapshot.puuid.clone())
            .or_default();

        // Display identity can drift between matches; the latest wins.
        tally.player = snapshot.player.clone();
        tally.region = region.to_string();
        tally.games += 1;
        if snapshot.win {
            tally.wins += 1;
        }
        tally.kills += snapshot.kills as i64;
        tally.deaths += snapshot.deaths as i64;
        tally.assists += snapshot.assists as i64;
    }

    /// Folds another tracker (typically one region's) into this one.
    pub fn merge(&mut self, other: LeaderboardTracker) {
        for (key, players) in other.tallies {
            let target = self.tallies.entry(key).or_default();

            for (puuid, tally) in players {
                match target.get_mut(&puuid) {
                    Some(existing) => {
                        existing.player = tally.player;
                        existing.region = tally.region;
                        existing.games += tally.games;
                        existing.wins += tally.wins;
                        existing.kills += tally.kills;
                        existing.deaths += tally.deaths;
                        existing.assists += tally.assists;
                    }
                    None => {
                        target.insert(puuid, tally);
                    }
                }
            }
        }
    }

    /// Produces the final role -> champion -> ranked entries mapping.
    /// Entries sort by games played descending, win rate descending, then
    /// player name as the deterministic tie-break.
    pub fn finalize(&self) -> BTreeMap<String, BTreeMap<String, Vec<LeaderboardEntry>>> {
        let mut leaderboards: BTreeMap<String, BTreeMap<String, Vec<LeaderboardEntry>>> = BTreeMap::new();

        for ((role, champion), players) in &self.tallies {
            let mut entries: Vec<LeaderboardEntry> = players
                .values()
                .map(|t| LeaderboardEntry {
                    player: t.player.clone(),
                    region: t.region.clone(),
                    games: t.games,
                    wins: t.wins,
                    win_rate: if t.games > 0 {
                        round_rate(t.wins as f64 / t.games as f64 * 100.0)
                    } else {
                        0.0
                    },
                    kda: round_kda((t.kills + t.assists) as f64 / i64::max(t.deaths, 1) as f64)
                })
                .collect();

            entries.sort_by(|a, b| {
                b.games
                    .cmp(&a.games)
                    .then_with(|| b.win_rate.partial_cmp(&a.win_rate).unwrap())
                    .then_with(|| a.player.cmp(&b.player))
            });

            leaderboards
                .entry(role.to_string())
                .or_default()
                .insert(champion.clone(), entries);
        }

        leaderboards
    }
}
