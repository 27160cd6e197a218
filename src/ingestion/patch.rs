use crate::{
    database::db::DbClient,
    metadata::GameMetadata,
    model::structures::patch_version::PatchVersion
};
use tracing::{info, warn};

/// Resolves the authoritative current patch. The metadata feed is the
/// primary source; the store's highest observed patch is the fallback;
/// [`PatchVersion::MINIMUM`] is the answer of last resort.
pub async fn resolve_current_patch(metadata: &GameMetadata, db: &DbClient) -> PatchVersion {
    if let Some(version) = &metadata.latest_version {
        let parsed = PatchVersion::parse(version);
        if parsed != PatchVersion::SENTINEL {
            return parsed;
        }
        warn!("Metadata feed reported unparseable version '{}'", version);
    }

    match db.all_patches().await {
        Ok(patches) => match latest_stored_patch(&patches) {
            Some(patch) => {
                info!("Falling back to highest stored patch {}", patch);
                patch
            }
            None => PatchVersion::MINIMUM
        },
        Err(e) => {
            warn!("Could not read stored patches, using default: {}", e);
            PatchVersion::MINIMUM
        }
    }
}

/// Highest patch among the stored short versions, by numeric tuple order.
/// Sentinel values from malformed rows never win unless nothing else exists.
pub fn latest_stored_patch(patches: &[String]) -> Option<PatchVersion> {
    patches
        .iter()
        .map(|p| PatchVersion::parse(p))
        .filter(|p| *p != PatchVersion::SENTINEL)
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_is_numeric_not_lexical() {
        let patches = vec!["14.9".to_string(), "14.10".to_string(), "14.2".to_string()];

        assert_eq!(
            latest_stored_patch(&patches),
            Some(PatchVersion { major: 14, minor: 10 })
        );
    }

    #[test]
    fn test_empty_store_has_no_patch() {
        assert_eq!(latest_stored_patch(&[]), None);
    }

    #[test]
    fn test_malformed_rows_are_ignored() {
        let patches = vec!["0.0".to_string(), "garbage".to_string()];

        assert_eq!(latest_stored_patch(&patches), None);
    }
}
