use crate::{
    database::db_structs::MatchRecord,
    model::{
        builds::{build_signature, BuildSignature, BuildTally},
        leaderboard::LeaderboardTracker,
        round_kda, round_rate,
        structures::{
            context_tag::{derive_context_tag, ContextTag},
            role::Role
        }
    }
};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use strum::IntoEnumIterator;

/// Result lists are bounded to this many champions per role-subset.
pub const MAX_CHAMPIONS_PER_ROLE: usize = 15;

/// A context-tagged sub-build needs this many tagged games before it is
/// reported.
pub const CONTEXT_BUILD_MIN_GAMES: u32 = 3;

/// Champions with zero games must clear this ban rate to appear at all,
/// which keeps one-off bans in large samples out of the results.
pub const BAN_RATE_FLOOR: f64 = 1.0;

/// Raw per-champion tallies for one role over one match subset. Rates are
/// always derived from these counts at finalization, never stored.
#[derive(Debug, Default)]
struct ChampionRoleStat {
    games: u32,
    wins: u32,
    kills: i64,
    deaths: i64,
    assists: i64,
    bans: u32,
    builds: BuildTally,
    context_builds: IndexMap<ContextTag, ContextBucket>
}

#[derive(Debug, Default)]
struct ContextBucket {
    games: u32,
    builds: BuildTally
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChampionSummary {
    pub name: String,
    pub games: u32,
    pub pick_rate: f64,
    pub win_rate: f64,
    pub ban_rate: f64,
    pub kda: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_build: Option<BuildSignature>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub context_builds: Vec<ContextBuild>
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContextBuild {
    pub tag: ContextTag,
    pub games: u32,
    pub build: BuildSignature
}

/// Champion summaries for every role over the season and current-patch
/// subsets of one region.
#[derive(Debug, Serialize)]
pub struct RegionStats {
    pub season: BTreeMap<String, Vec<ChampionSummary>>,
    pub patch: BTreeMap<String, Vec<ChampionSummary>>
}

/// Aggregates one region's retained matches into ranked champion summaries,
/// feeding the leaderboard tracker from the season pass as a by-product.
/// Deterministic for a fixed input snapshot.
pub fn aggregate_region(
    region: &str,
    matches: &[MatchRecord],
    current_patch: &str,
    completed_items: Option<&HashSet<i32>>,
    leaderboard: &mut LeaderboardTracker
) -> RegionStats {
    let champion_names = champion_name_index(matches);

    let season: Vec<&MatchRecord> = matches.iter().collect();
    let patch: Vec<&MatchRecord> = matches.iter().filter(|m| m.patch == current_patch).collect();

    let mut season_stats = BTreeMap::new();
    let mut patch_stats = BTreeMap::new();

    for role in Role::iter() {
        season_stats.insert(
            role.to_string(),
            aggregate_role(&season, role, region, &champion_names, completed_items, Some(&mut *leaderboard))
        );
        patch_stats.insert(
            role.to_string(),
            aggregate_role(&patch, role, region, &champion_names, completed_items, None)
        );
    }

    RegionStats {
        season: season_stats,
        patch: patch_stats
    }
}

/// Ranked champion summaries for one role over one subset. Bans are
/// credited from every match in the subset; pick/win/KDA tallies only from
/// matches fielding the role.
pub fn aggregate_role(
    matches: &[&MatchRecord],
    role: Role,
    region: &str,
    champion_names: &HashMap<i32, String>,
    completed_items: Option<&HashSet<i32>>,
    mut leaderboard: Option<&mut LeaderboardTracker>
) -> Vec<ChampionSummary> {
    let total_matches = matches.len();
    if total_matches == 0 {
        return Vec::new();
    }

    let mut stats: IndexMap<String, ChampionRoleStat> = IndexMap::new();

    for m in matches {
        if let Some(p) = m.participant_in_role(role) {
            let stat = stats.entry(p.champion_name.clone()).or_default();

            stat.games += 1;
            if p.win {
                stat.wins += 1;
            }
            stat.kills += p.kills as i64;
            stat.deaths += p.deaths as i64;
            stat.assists += p.assists as i64;

            let signature = build_signature(&p.items, completed_items);
            if let Some(signature) = &signature {
                stat.builds.record(signature.clone());
            }

            if let Some(tag) = derive_context_tag(p.enemy_physical_damage, p.enemy_magic_damage, p.enemy_tank_count) {
                let bucket = stat.context_builds.entry(tag).or_default();
                bucket.games += 1;
                if let Some(signature) = signature {
                    bucket.builds.record(signature);
                }
            }

            if let Some(tracker) = leaderboard.as_deref_mut() {
                tracker.record(role, region, p);
            }
        }

        // A match with nobody in this role still credits its bans.
        for ban in &m.bans {
            if let Some(name) = champion_names.get(ban) {
                stats.entry(name.clone()).or_default().bans += 1;
            }
        }
    }

    let mut results = Vec::new();

    for (name, stat) in &stats {
        if stat.games == 0 && stat.bans == 0 {
            continue;
        }

        let pick_rate = round_rate(stat.games as f64 / total_matches as f64 * 100.0);
        let ban_rate = round_rate(stat.bans as f64 / total_matches as f64 * 100.0);
        let win_rate = if stat.games > 0 {
            round_rate(stat.wins as f64 / stat.games as f64 * 100.0)
        } else {
            0.0
        };
        let kda = round_kda((stat.kills + stat.assists) as f64 / i64::max(stat.deaths, 1) as f64);

        if stat.games == 0 && ban_rate <= BAN_RATE_FLOOR {
            continue;
        }

        results.push(ChampionSummary {
            name: name.clone(),
            games: stat.games,
            pick_rate,
            win_rate,
            ban_rate,
            kda,
            top_build: stat.builds.top().cloned(),
            context_builds: context_builds(&stat.context_builds)
        });
    }

    results.sort_by(|a, b| {
        b.pick_rate
            .partial_cmp(&a.pick_rate)
            .unwrap()
            .then_with(|| a.name.cmp(&b.name))
    });
    results.truncate(MAX_CHAMPIONS_PER_ROLE);

    results
}

/// Maps champion ids to names from every participant seen in the corpus,
/// so banned champions can be reported by name. Ban ids never seen played
/// anywhere stay unmapped and are skipped.
pub fn champion_name_index(matches: &[MatchRecord]) -> HashMap<i32, String> {
    let mut names = HashMap::new();

    for m in matches {
        for p in &m.participants {
            names.entry(p.champion_id).or_insert_with(|| p.champion_name.clone());
        }
    }

    names
}

/// Counts the matches contributing to the output meta block. The roleless
/// policy decides whether matches with no role-tagged participant count.
pub fn counted_games(matches: &[MatchRecord], include_roleless: bool) -> u64 {
    matches
        .iter()
        .filter(|m| include_roleless || m.participants.iter().any(|p| p.role.is_some()))
        .count() as u64
}

fn context_builds(buckets: &IndexMap<ContextTag, ContextBucket>) -> Vec<ContextBuild> {
    let mut reported = Vec::new();

    // Fixed tag order keeps the output stable across runs.
    for tag in ContextTag::iter() {
        let Some(bucket) = buckets.get(&tag) else { continue };
        if bucket.games < CONTEXT_BUILD_MIN_GAMES {
            continue;
        }
        if let Some(build) = bucket.builds.top() {
            reported.push(ContextBuild {
                tag,
                games: bucket.games,
                build: build.clone()
            });
        }
    }

    reported
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{champion_id_for, generate_match, generate_snapshot};

    fn role_match(id: u32, champion: &str, win: bool, bans: Vec<i32>) -> MatchRecord {
        generate_match(
            "kr",
            &format!("KR_{}", id),
            "14.23",
            bans,
            vec![generate_snapshot(Some(Role::Top), champion, win, 5, 5, 5)]
        )
    }

    fn filler_match(id: u32, bans: Vec<i32>) -> MatchRecord {
        generate_match(
            "kr",
            &format!("KR_F{}", id),
            "14.23",
            bans,
            vec![generate_snapshot(Some(Role::Middle), "Ahri", true, 5, 5, 5)]
        )
    }

    fn aggregate(matches: &[MatchRecord], role: Role) -> Vec<ChampionSummary> {
        let refs: Vec<&MatchRecord> = matches.iter().collect();
        let names = champion_name_index(matches);
        aggregate_role(&refs, role, "kr", &names, None, None)
    }

    #[test]
    fn test_rate_math() {
        // 40 matches; champion X plays TOP in 10 with 6 wins and is banned
        // in 2 of the remaining matches.
        let mut matches = Vec::new();
        for i in 0..10 {
            matches.push(role_match(i, "XChamp", i < 6, vec![]));
        }
        for i in 10..40 {
            let bans = if i < 12 { vec![champion_id_for("XChamp")] } else { vec![] };
            matches.push(role_match(i, "Other", false, bans));
        }

        let results = aggregate(&matches, Role::Top);
        let x = results.iter().find(|c| c.name == "XChamp").unwrap();

        assert_eq!(x.pick_rate, 25.0);
        assert_eq!(x.win_rate, 60.0);
        assert_eq!(x.ban_rate, 5.0);
    }

    #[test]
    fn test_kda_rounding() {
        let mut matches = vec![generate_match(
            "kr",
            "KR_1",
            "14.23",
            vec![],
            vec![generate_snapshot(Some(Role::Top), "Aatrox", true, 7, 3, 6)]
        )];
        matches.push(generate_match(
            "kr",
            "KR_2",
            "14.23",
            vec![],
            vec![generate_snapshot(Some(Role::Top), "Aatrox", false, 2, 3, 1)]
        ));

        let results = aggregate(&matches, Role::Top);
        // (7 + 2 + 6 + 1) / (3 + 3) = 2.666...
        assert_eq!(results[0].kda, 2.67);
    }

    #[test]
    fn test_deaths_floor_at_one() {
        let matches = vec![generate_match(
            "kr",
            "KR_1",
            "14.23",
            vec![],
            vec![generate_snapshot(Some(Role::Top), "Aatrox", true, 10, 0, 5)]
        )];

        let results = aggregate(&matches, Role::Top);
        assert_eq!(results[0].kda, 15.0);
    }

    #[test]
    fn test_inclusion_filter_on_ban_rate() {
        // "Noise" is banned once, "Contested" twice; neither is ever
        // played TOP, so only the ban-rate floor decides inclusion.
        let mut matches = Vec::new();
        for i in 0..100 {
            let mut bans = Vec::new();
            if i == 0 {
                bans.push(900);
            }
            if i < 2 {
                bans.push(901);
            }
            matches.push(role_match(i, "Filler", false, bans));
        }
        // Name the banned ids somewhere in the corpus (other role).
        let mut noise = generate_snapshot(Some(Role::Middle), "Noise", false, 0, 0, 0);
        noise.champion_id = 900;
        let mut contested = generate_snapshot(Some(Role::Middle), "Contested", false, 0, 0, 0);
        contested.champion_id = 901;
        matches.push(generate_match("kr", "KR_names", "14.23", vec![], vec![noise, contested]));

        let results = aggregate(&matches, Role::Top);

        assert!(!results.iter().any(|c| c.name == "Noise"));
        let contested = results.iter().find(|c| c.name == "Contested").unwrap();
        assert_eq!(contested.games, 0);
        assert!(contested.ban_rate > BAN_RATE_FLOOR);
    }

    #[test]
    fn test_bans_credited_from_roleless_matches() {
        // One TOP game plus one match with no TOP participant banning
        // the same champion.
        let mut matches = vec![role_match(0, "Aatrox", true, vec![])];
        let aatrox_id = matches[0].participants[0].champion_id;
        matches.push(filler_match(1, vec![aatrox_id]));

        let results = aggregate(&matches, Role::Top);
        let aatrox = results.iter().find(|c| c.name == "Aatrox").unwrap();

        assert_eq!(aatrox.games, 1);
        assert_eq!(aatrox.ban_rate, 50.0);
    }

    #[test]
    fn test_truncation_to_fifteen() {
        let mut matches = Vec::new();
        let mut id = 0;
        for champ in 0..20 {
            // Champion c plays (20 - c) games so pick rates are distinct.
            for _ in 0..(20 - champ) {
                matches.push(role_match(id, &format!("Champ{:02}", champ), true, vec![]));
                id += 1;
            }
        }

        let results = aggregate(&matches, Role::Top);

        assert_eq!(results.len(), MAX_CHAMPIONS_PER_ROLE);
        assert_eq!(results[0].name, "Champ00");
        assert!(results[0].pick_rate > results[14].pick_rate);
    }

    #[test]
    fn test_empty_subset_yields_no_results() {
        assert!(aggregate(&[], Role::Top).is_empty());
    }

    #[test]
    fn test_top_build_mining() {
        let mut matches = Vec::new();
        for i in 0..3 {
            let mut p = generate_snapshot(Some(Role::Top), "Aatrox", true, 1, 1, 1);
            p.items = if i < 2 { [30, 10, 20, 0, 0, 0] } else { [40, 50, 60, 0, 0, 0] };
            matches.push(generate_match("kr", &format!("KR_{}", i), "14.23", vec![], vec![p]));
        }

        let results = aggregate(&matches, Role::Top);
        assert_eq!(results[0].top_build, Some(vec![10, 20, 30]));
    }

    #[test]
    fn test_context_builds_require_minimum_sample() {
        let mut matches = Vec::new();
        for i in 0..5 {
            let mut p = generate_snapshot(Some(Role::Top), "Aatrox", true, 1, 1, 1);
            p.items = [10, 20, 30, 0, 0, 0];
            // Two tagged games only: below the reporting threshold.
            if i < 2 {
                p.enemy_physical_damage = 90_000;
                p.enemy_magic_damage = 10_000;
            }
            matches.push(generate_match("kr", &format!("KR_{}", i), "14.23", vec![], vec![p]));
        }

        let results = aggregate(&matches, Role::Top);
        assert!(results[0].context_builds.is_empty());
        assert_eq!(results[0].top_build, Some(vec![10, 20, 30]));
    }

    #[test]
    fn test_context_builds_reported_at_threshold() {
        let mut matches = Vec::new();
        for i in 0..3 {
            let mut p = generate_snapshot(Some(Role::Top), "Aatrox", true, 1, 1, 1);
            p.items = [10, 20, 30, 0, 0, 0];
            p.enemy_physical_damage = 90_000;
            p.enemy_magic_damage = 10_000;
            matches.push(generate_match("kr", &format!("KR_{}", i), "14.23", vec![], vec![p]));
        }

        let results = aggregate(&matches, Role::Top);
        let context = &results[0].context_builds;

        assert_eq!(context.len(), 1);
        assert_eq!(context[0].tag, ContextTag::HeavyAd);
        assert_eq!(context[0].games, 3);
        assert_eq!(context[0].build, vec![10, 20, 30]);
    }

    #[test]
    fn test_region_stats_patch_subset() {
        let mut matches = vec![
            role_match(0, "Aatrox", true, vec![]),
            role_match(1, "Aatrox", false, vec![])
        ];
        matches[1].patch = "14.22".to_string();

        let mut tracker = LeaderboardTracker::new();
        let stats = aggregate_region("kr", &matches, "14.23", None, &mut tracker);

        let season_top = &stats.season["TOP"];
        let patch_top = &stats.patch["TOP"];

        assert_eq!(season_top[0].games, 2);
        assert_eq!(patch_top[0].games, 1);
        assert_eq!(patch_top[0].win_rate, 100.0);
    }

    #[test]
    fn test_counted_games_policy() {
        let with_role = role_match(0, "Aatrox", true, vec![]);
        let roleless = generate_match(
            "kr",
            "KR_roleless",
            "14.23",
            vec![],
            vec![generate_snapshot(None, "Ahri", true, 1, 1, 1)]
        );
        let matches = vec![with_role, roleless];

        assert_eq!(counted_games(&matches, true), 2);
        assert_eq!(counted_games(&matches, false), 1);
    }
}
