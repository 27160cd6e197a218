use crate::{
    api::api_structs::{MatchDetail, Participant},
    metadata::GameMetadata,
    model::structures::{patch_version::PatchVersion, role::Role}
};
use serde::{Deserialize, Serialize};

/// Sentinel champion id the upstream uses for an empty ban slot.
const NO_BAN: i32 = -1;

/// Immutable match fact as persisted. Created once at ingestion, never
/// mutated, deleted only by the patch-retention purge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub match_id: String,
    pub region: String,
    /// Short `major.minor` patch this match was played on.
    pub patch: String,
    /// Raw creation timestamp in milliseconds.
    pub game_creation: i64,
    /// Banned champion ids across both teams, empty slots excluded.
    pub bans: Vec<i32>,
    pub participants: Vec<ParticipantSnapshot>
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSnapshot {
    pub puuid: String,
    /// Display identity: game-name#tag when present, legacy name fallback.
    pub player: String,
    pub role: Option<Role>,
    pub champion_id: i32,
    pub champion_name: String,
    pub win: bool,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    /// Equipped item ids, slot order preserved, 0 = empty slot.
    pub items: [i32; 6],
    /// Enemy-composition totals captured at ingestion for context tagging.
    pub enemy_physical_damage: i64,
    pub enemy_magic_damage: i64,
    pub enemy_tank_count: i32
}

impl MatchRecord {
    /// Normalizes ("slims") a full upstream match detail down to the fields
    /// aggregation needs, bounding storage growth regardless of how verbose
    /// the upstream payload is.
    pub fn from_detail(region: &str, match_id: &str, detail: &MatchDetail, metadata: &GameMetadata) -> MatchRecord {
        let info = &detail.info;

        let bans = info
            .teams
            .iter()
            .flat_map(|t| t.bans.iter())
            .map(|b| b.champion_id)
            .filter(|id| *id != NO_BAN)
            .collect();

        let participants = info
            .participants
            .iter()
            .map(|p| ParticipantSnapshot::from_participant(p, &info.participants, metadata))
            .collect();

        MatchRecord {
            match_id: match_id.to_string(),
            region: region.to_string(),
            patch: PatchVersion::short(&info.game_version),
            game_creation: info.game_creation,
            bans,
            participants
        }
    }

    /// The snapshot holding `role`, if any. Both teams field each role;
    /// the last listed snapshot represents it, one per match.
    pub fn participant_in_role(&self, role: Role) -> Option<&ParticipantSnapshot> {
        self.participants.iter().rev().find(|p| p.role == Some(role))
    }
}

impl ParticipantSnapshot {
    fn from_participant(participant: &Participant, all: &[Participant], metadata: &GameMetadata) -> ParticipantSnapshot {
        let mut enemy_physical_damage = 0;
        let mut enemy_magic_damage = 0;
        let mut enemy_tank_count = 0;

        for enemy in all.iter().filter(|other| other.team_id != participant.team_id) {
            enemy_physical_damage += enemy.physical_damage_dealt_to_champions;
            enemy_magic_damage += enemy.magic_damage_dealt_to_champions;

            if metadata.is_tank(&enemy.champion_name) {
                enemy_tank_count += 1;
            }
        }

        ParticipantSnapshot {
            puuid: participant.puuid.clone(),
            player: display_identity(participant),
            role: Role::from_position(participant.team_position.as_deref()),
            champion_id: participant.champion_id,
            champion_name: participant.champion_name.clone(),
            win: participant.win,
            kills: participant.kills,
            deaths: participant.deaths,
            assists: participant.assists,
            items: participant.items(),
            enemy_physical_damage,
            enemy_magic_damage,
            enemy_tank_count
        }
    }
}

fn display_identity(participant: &Participant) -> String {
    match (&participant.riot_id_game_name, &participant.riot_id_tagline) {
        (Some(name), Some(tag)) if !name.is_empty() => format!("{}#{}", name, tag),
        _ => participant
            .summoner_name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}
