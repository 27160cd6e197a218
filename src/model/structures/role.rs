use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

/// The five fixed lane assignments a participant may hold. Anything else
/// reported by the upstream payload is treated as unassigned and excluded
/// from per-role aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Role {
    Top,
    Jungle,
    Middle,
    Bottom,
    Utility
}

impl Role {
    /// Parses the upstream team position field; an empty, missing, or
    /// unrecognized position is a typed absent case, not an error.
    pub fn from_position(position: Option<&str>) -> Option<Role> {
        position.and_then(|p| Role::from_str(p).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_valid_positions_parse() {
        assert_eq!(Role::from_position(Some("TOP")), Some(Role::Top));
        assert_eq!(Role::from_position(Some("JUNGLE")), Some(Role::Jungle));
        assert_eq!(Role::from_position(Some("MIDDLE")), Some(Role::Middle));
        assert_eq!(Role::from_position(Some("BOTTOM")), Some(Role::Bottom));
        assert_eq!(Role::from_position(Some("UTILITY")), Some(Role::Utility));
    }

    #[test]
    fn test_invalid_positions_are_unassigned() {
        assert_eq!(Role::from_position(Some("")), None);
        assert_eq!(Role::from_position(Some("Invalid")), None);
        assert_eq!(Role::from_position(None), None);
    }

    #[test]
    fn test_display_matches_upstream_names() {
        assert_eq!(Role::Utility.to_string(), "UTILITY");
    }

    #[test]
    fn test_enumerate() {
        let roles = Role::iter().collect::<Vec<_>>();
        assert_eq!(
            roles,
            vec![Role::Top, Role::Jungle, Role::Middle, Role::Bottom, Role::Utility]
        );
    }
}
