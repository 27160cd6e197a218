use super::db_structs::MatchRecord;
use postgres_types::ToSql;
use std::{collections::HashSet, sync::Arc};
use thiserror::Error;
use tokio_postgres::{Client, NoTls};
use tracing::{error, info};

/// Newest matches inspected when sampling recent participant identities.
pub const RECENT_SAMPLE_WINDOW: i64 = 500;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("failed to encode match document: {0}")]
    Encoding(#[from] serde_json::Error)
}

#[derive(Clone)]
pub struct DbClient {
    client: Arc<Client>
}

impl DbClient {
    // Connect to the database and return a DbClient instance
    pub async fn connect(connection_str: &str) -> Result<Self, StoreError> {
        let (client, connection) = tokio_postgres::connect(connection_str, NoTls).await?;

        // Spawn the connection object to run in the background
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("connection error: {}", e);
            }
        });

        Ok(DbClient {
            client: Arc::new(client)
        })
    }

    /// Creates the match collection if it does not exist. The uniqueness
    /// constraint on `(region, match_id)` is the sole dedup authority for
    /// concurrent ingestion runs.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS matches (
                    id BIGSERIAL PRIMARY KEY,
                    region TEXT NOT NULL,
                    match_id TEXT NOT NULL,
                    patch TEXT NOT NULL,
                    game_creation BIGINT NOT NULL,
                    data JSONB NOT NULL,
                    UNIQUE (region, match_id)
                );
                CREATE INDEX IF NOT EXISTS matches_region_creation_idx
                    ON matches (region, game_creation DESC);"
            )
            .await?;

        Ok(())
    }

    /// Batched existence lookup: which of `candidates` are already stored
    /// for this region. One round trip regardless of candidate count.
    pub async fn existing_match_ids(&self, region: &str, candidates: &[String]) -> Result<HashSet<String>, StoreError> {
        let candidates: Vec<&str> = candidates.iter().map(String::as_str).collect();
        let rows = self
            .client
            .query(
                "SELECT match_id FROM matches WHERE region = $1 AND match_id = ANY($2)",
                &[&region, &candidates]
            )
            .await?;

        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    /// Inserts a match record, relying on the uniqueness constraint.
    /// Returns `false` when the record was already present (another run
    /// stored it first), which callers must treat as success.
    pub async fn insert_match(&self, record: &MatchRecord) -> Result<bool, StoreError> {
        let data = serde_json::to_value(record)?;
        let params: &[&(dyn ToSql + Sync)] = &[
            &record.region,
            &record.match_id,
            &record.patch,
            &record.game_creation,
            &data
        ];

        let inserted = self
            .client
            .execute(
                "INSERT INTO matches (region, match_id, patch, game_creation, data)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (region, match_id) DO NOTHING",
                params
            )
            .await?;

        Ok(inserted == 1)
    }

    /// Bulk retention purge: removes every match not on `patch`.
    pub async fn delete_other_patches(&self, patch: &str) -> Result<u64, StoreError> {
        let deleted = self
            .client
            .execute("DELETE FROM matches WHERE patch <> $1", &[&patch])
            .await?;

        if deleted > 0 {
            info!("Purged {} matches from stale patches", deleted);
        }

        Ok(deleted)
    }

    pub async fn match_count(&self) -> Result<i64, StoreError> {
        let row = self.client.query_one("SELECT COUNT(*) FROM matches", &[]).await?;
        Ok(row.get(0))
    }

    /// All distinct short patch versions present in the store, used as the
    /// fallback source for current-patch resolution.
    pub async fn all_patches(&self) -> Result<Vec<String>, StoreError> {
        let rows = self.client.query("SELECT DISTINCT patch FROM matches", &[]).await?;
        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    /// Distinct participant identities from the newest stored matches for a
    /// region, newest first. Used to reseed the player pool when the ladder
    /// is sparse.
    pub async fn recent_participant_puuids(&self, region: &str) -> Result<Vec<String>, StoreError> {
        let rows = self
            .client
            .query(
                "SELECT data FROM matches WHERE region = $1
                 ORDER BY game_creation DESC LIMIT $2",
                &[&region, &RECENT_SAMPLE_WINDOW]
            )
            .await?;

        let mut seen = HashSet::new();
        let mut puuids = Vec::new();

        for row in rows {
            let record: MatchRecord = serde_json::from_value(row.get(0))?;
            for participant in record.participants {
                if seen.insert(participant.puuid.clone()) {
                    puuids.push(participant.puuid);
                }
            }
        }

        Ok(puuids)
    }

    /// Every retained match for a region, oldest first. Ordering makes the
    /// aggregation pass deterministic for a fixed store snapshot.
    pub async fn matches_by_region(&self, region: &str) -> Result<Vec<MatchRecord>, StoreError> {
        let rows = self
            .client
            .query(
                "SELECT data FROM matches WHERE region = $1 ORDER BY game_creation, match_id",
                &[&region]
            )
            .await?;

        let mut matches = Vec::with_capacity(rows.len());
        for row in rows {
            matches.push(serde_json::from_value(row.get(0))?);
        }

        Ok(matches)
    }
}
