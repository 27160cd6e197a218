use crate::api::RiotApiClient;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

const VERSIONS_URL: &str = "https://ddragon.leagueoflegends.com/api/versions.json";

/// Items below this total gold cost are components, not completed builds.
const COMPLETED_ITEM_MIN_GOLD: i32 = 2000;

const TANK_TAG: &str = "Tank";

#[derive(Debug, Deserialize)]
struct ChampionIndex {
    data: HashMap<String, ChampionEntry>
}

#[derive(Debug, Deserialize)]
struct ChampionEntry {
    #[serde(default)]
    tags: Vec<String>
}

#[derive(Debug, Deserialize)]
struct ItemIndex {
    data: HashMap<String, ItemEntry>
}

#[derive(Debug, Deserialize)]
struct ItemEntry {
    #[serde(default)]
    gold: ItemGold
}

#[derive(Debug, Deserialize, Default)]
struct ItemGold {
    #[serde(default)]
    total: i32
}

/// Read-only lookups derived from the static game-metadata feed. Every
/// field degrades independently to `None` when the feed is unreachable,
/// which disables the dependent filter rather than failing the run.
#[derive(Debug, Default)]
pub struct GameMetadata {
    /// Most recent full version string, newest first in the feed.
    pub latest_version: Option<String>,
    /// Champion names (internal ids) tagged as tanks.
    pub tank_champions: Option<HashSet<String>>,
    /// Item ids considered completed, i.e. valid for build mining.
    pub completed_items: Option<HashSet<i32>>
}

impl GameMetadata {
    /// Metadata with every lookup disabled, as if the feed never answered.
    pub fn unavailable() -> GameMetadata {
        GameMetadata::default()
    }

    pub async fn load(client: &RiotApiClient) -> GameMetadata {
        let versions = match client.get_public::<Vec<String>>(VERSIONS_URL).await {
            Ok(versions) => versions,
            Err(e) => {
                warn!("Metadata feed unreachable, filters disabled: {}", e);
                return GameMetadata::unavailable();
            }
        };

        let latest_version = versions.into_iter().next();
        let Some(version) = latest_version.clone() else {
            warn!("Metadata feed returned no versions");
            return GameMetadata::unavailable();
        };

        let tank_champions = match client
            .get_public::<ChampionIndex>(&format!(
                "https://ddragon.leagueoflegends.com/cdn/{}/data/en_US/champion.json",
                version
            ))
            .await
        {
            Ok(index) => Some(tank_set(index)),
            Err(e) => {
                warn!("Champion definitions unavailable, tank tagging disabled: {}", e);
                None
            }
        };

        let completed_items = match client
            .get_public::<ItemIndex>(&format!(
                "https://ddragon.leagueoflegends.com/cdn/{}/data/en_US/item.json",
                version
            ))
            .await
        {
            Ok(index) => Some(completed_item_set(index)),
            Err(e) => {
                warn!("Item definitions unavailable, item filtering disabled: {}", e);
                None
            }
        };

        info!(
            "Loaded game metadata for version {} ({} tanks, {} completed items)",
            version,
            tank_champions.as_ref().map_or(0, HashSet::len),
            completed_items.as_ref().map_or(0, HashSet::len)
        );

        GameMetadata {
            latest_version,
            tank_champions,
            completed_items
        }
    }

    /// True when the champion is a known tank. Without champion metadata
    /// this is always false, so tank density never triggers.
    pub fn is_tank(&self, champion_name: &str) -> bool {
        self.tank_champions
            .as_ref()
            .is_some_and(|tanks| tanks.contains(champion_name))
    }
}

fn tank_set(index: ChampionIndex) -> HashSet<String> {
    index
        .data
        .into_iter()
        .filter(|(_, entry)| entry.tags.iter().any(|t| t == TANK_TAG))
        .map(|(name, _)| name)
        .collect()
}

fn completed_item_set(index: ItemIndex) -> HashSet<i32> {
    index
        .data
        .into_iter()
        .filter(|(_, entry)| entry.gold.total >= COMPLETED_ITEM_MIN_GOLD)
        .filter_map(|(id, _)| id.parse::<i32>().ok())
        .collect()
}
