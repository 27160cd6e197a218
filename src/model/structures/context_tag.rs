use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// Minimum number of enemy tanks before a lobby reads as tank-heavy.
pub const TANK_HEAVY_MIN: i32 = 3;

/// Share of enemy champion damage one type must reach to skew the lobby.
pub const DAMAGE_SKEW_SHARE: f64 = 0.65;

/// Describes the opposing team's damage profile or tank density. Attached
/// per participant and used to bucket builds by matchup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
pub enum ContextTag {
    #[serde(rename = "Heavy AD")]
    #[strum(serialize = "Heavy AD")]
    HeavyAd,

    #[serde(rename = "Heavy AP")]
    #[strum(serialize = "Heavy AP")]
    HeavyAp,

    #[serde(rename = "Tank Heavy")]
    #[strum(serialize = "Tank Heavy")]
    TankHeavy
}

/// Derives the context tag from the stored enemy-composition totals.
/// Tank density wins over damage skew; a balanced lobby has no tag.
pub fn derive_context_tag(physical_damage: i64, magic_damage: i64, tank_count: i32) -> Option<ContextTag> {
    if tank_count >= TANK_HEAVY_MIN {
        return Some(ContextTag::TankHeavy);
    }

    let total = physical_damage + magic_damage;
    if total <= 0 {
        return None;
    }

    let physical_share = physical_damage as f64 / total as f64;
    if physical_share >= DAMAGE_SKEW_SHARE {
        Some(ContextTag::HeavyAd)
    } else if physical_share <= 1.0 - DAMAGE_SKEW_SHARE {
        Some(ContextTag::HeavyAp)
    } else {
        None
    }
}
