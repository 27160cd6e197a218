use crate::{
    api::api_structs::Participant,
    database::db_structs::{MatchRecord, ParticipantSnapshot},
    model::structures::role::Role
};

/// Deterministic champion id derived from the name, so generated snapshots
/// and ban lists can reference each other without bookkeeping.
pub fn champion_id_for(name: &str) -> i32 {
    name.bytes().map(|b| b as i32).sum()
}

pub fn generate_snapshot(
    role: Option<Role>,
    champion_name: &str,
    win: bool,
    kills: i32,
    deaths: i32,
    assists: i32
) -> ParticipantSnapshot {
    ParticipantSnapshot {
        puuid: format!("puuid-{}", champion_name),
        player: format!("{}#TEST", champion_name),
        role,
        champion_id: champion_id_for(champion_name),
        champion_name: champion_name.to_string(),
        win,
        kills,
        deaths,
        assists,
        items: [0; 6],
        enemy_physical_damage: 0,
        enemy_magic_damage: 0,
        enemy_tank_count: 0
    }
}

pub fn generate_match(
    region: &str,
    match_id: &str,
    patch: &str,
    bans: Vec<i32>,
    participants: Vec<ParticipantSnapshot>
) -> MatchRecord {
    MatchRecord {
        match_id: match_id.to_string(),
        region: region.to_string(),
        patch: patch.to_string(),
        game_creation: 1_700_000_000_000,
        bans,
        participants
    }
}

/// An upstream participant payload with only identity, team, position, and
/// champion populated; tests override the rest as needed.
pub fn generate_upstream_participant(puuid: &str, team_id: i32, position: &str, champion_name: &str) -> Participant {
    Participant {
        puuid: puuid.to_string(),
        riot_id_game_name: None,
        riot_id_tagline: None,
        summoner_name: None,
        team_id,
        team_position: Some(position.to_string()),
        champion_id: champion_id_for(champion_name),
        champion_name: champion_name.to_string(),
        win: false,
        kills: 0,
        deaths: 0,
        assists: 0,
        item0: 0,
        item1: 0,
        item2: 0,
        item3: 0,
        item4: 0,
        item5: 0,
        physical_damage_dealt_to_champions: 0,
        magic_damage_dealt_to_champions: 0
    }
}
