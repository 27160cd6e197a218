use rift_processor::{
    model::{
        aggregator::aggregate_region,
        leaderboard::LeaderboardTracker,
        structures::role::Role
    },
    output::{write_artifact, Artifact, Meta},
    utils::test_utils::{generate_match, generate_snapshot}
};
use std::collections::BTreeMap;

fn region_corpus(region: &str, champion: &str, games: u32) -> Vec<rift_processor::database::db_structs::MatchRecord> {
    (0..games)
        .map(|i| {
            let mut p = generate_snapshot(Some(Role::Middle), champion, i % 2 == 0, 8, 4, 6);
            p.puuid = format!("{}-{}", region, champion);
            p.items = [3020, 3089, 3157, 0, 0, 0];
            generate_match(region, &format!("{}_{}", region.to_uppercase(), i), "14.23", vec![], vec![p])
        })
        .collect()
}

#[test]
fn test_full_artifact_generation() {
    let kr_matches = region_corpus("kr", "Ahri", 4);
    let euw_matches = region_corpus("euw1", "Syndra", 2);

    let mut leaderboard = LeaderboardTracker::new();
    let mut regions = BTreeMap::new();

    for (region, matches) in [("kr", &kr_matches), ("euw1", &euw_matches)] {
        let mut tracker = LeaderboardTracker::new();
        let stats = aggregate_region(region, matches, "14.23", None, &mut tracker);
        leaderboard.merge(tracker);
        regions.insert(region.to_string(), stats);
    }

    let artifact = Artifact {
        meta: Meta {
            total_games: (kr_matches.len() + euw_matches.len()) as u64,
            patch_games: (kr_matches.len() + euw_matches.len()) as u64,
            current_patch: "14.23".to_string(),
            last_updated: "2024-11-20 12:00 UTC".to_string(),
            sample_size: 2
        },
        regions,
        leaderboards: leaderboard.finalize()
    };

    let path = std::env::temp_dir().join(format!("rift_artifact_{}.json", std::process::id()));
    write_artifact(&path, &artifact).unwrap();

    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    std::fs::remove_file(&path).unwrap();

    // Meta block carries the run-level counts.
    assert_eq!(value["meta"]["total_games"], 6);
    assert_eq!(value["meta"]["current_patch"], "14.23");

    // Every configured region appears with per-role season and patch views.
    let ahri = &value["regions"]["kr"]["season"]["MIDDLE"][0];
    assert_eq!(ahri["name"], "Ahri");
    assert_eq!(ahri["games"], 4);
    assert_eq!(ahri["pick_rate"], 100.0);
    assert_eq!(ahri["win_rate"], 50.0);
    assert_eq!(ahri["top_build"], serde_json::json!([3020, 3089, 3157]));

    // Leaderboards merge across regions under role -> champion.
    assert_eq!(value["leaderboards"]["MIDDLE"]["Ahri"][0]["region"], "kr");
    assert_eq!(value["leaderboards"]["MIDDLE"]["Syndra"][0]["region"], "euw1");
}
