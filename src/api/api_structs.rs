use serde::Deserialize;

/// One ladder bracket as returned by the league endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueList {
    pub tier: String,
    pub entries: Vec<LeagueEntry>
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntry {
    #[serde(default)]
    pub puuid: Option<String>,
    #[serde(default)]
    pub league_points: i64
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub puuid: String,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub tag_line: Option<String>
}

/// Full match detail. Only the fields the ingestion pipeline reads are
/// deserialized; everything else in the upstream payload is dropped here.
#[derive(Debug, Deserialize)]
pub struct MatchDetail {
    pub info: MatchInfo
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    pub game_version: String,
    pub game_creation: i64,
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub teams: Vec<Team>
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub puuid: String,
    #[serde(default)]
    pub riot_id_game_name: Option<String>,
    #[serde(default)]
    pub riot_id_tagline: Option<String>,
    #[serde(default)]
    pub summoner_name: Option<String>,
    pub team_id: i32,
    #[serde(default)]
    pub team_position: Option<String>,
    pub champion_id: i32,
    pub champion_name: String,
    pub win: bool,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    #[serde(default)]
    pub item0: i32,
    #[serde(default)]
    pub item1: i32,
    #[serde(default)]
    pub item2: i32,
    #[serde(default)]
    pub item3: i32,
    #[serde(default)]
    pub item4: i32,
    #[serde(default)]
    pub item5: i32,
    #[serde(default)]
    pub physical_damage_dealt_to_champions: i64,
    #[serde(default)]
    pub magic_damage_dealt_to_champions: i64
}

impl Participant {
    pub fn items(&self) -> [i32; 6] {
        [self.item0, self.item1, self.item2, self.item3, self.item4, self.item5]
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default)]
    pub bans: Vec<Ban>
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ban {
    pub champion_id: i32
}
