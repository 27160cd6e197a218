use crate::model::{aggregator::RegionStats, leaderboard::LeaderboardEntry};
use serde::Serialize;
use std::{collections::BTreeMap, fs, io, path::Path};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write artifact: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize artifact: {0}")]
    Serialization(#[from] serde_json::Error)
}

/// The single document handed to consumers. Regenerated wholesale on every
/// run; never updated in place.
#[derive(Debug, Serialize)]
pub struct Artifact {
    pub meta: Meta,
    pub regions: BTreeMap<String, RegionStats>,
    pub leaderboards: BTreeMap<String, BTreeMap<String, Vec<LeaderboardEntry>>>
}

#[derive(Debug, Serialize)]
pub struct Meta {
    pub total_games: u64,
    pub patch_games: u64,
    pub current_patch: String,
    pub last_updated: String,
    pub sample_size: usize
}

/// Writes the artifact atomically: serialize to a sibling temp file, then
/// rename over the destination so consumers never observe a partial write.
pub fn write_artifact(path: &Path, artifact: &Artifact) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    fs::write(tmp, serde_json::to_vec(artifact)?)?;
    fs::rename(tmp, path)?;

    info!("Wrote artifact to {}", path.display());
    Ok(())
}
