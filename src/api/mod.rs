pub mod api_structs;

use crate::api::api_structs::{Account, LeagueList, MatchDetail};
use reqwest::{header::RETRY_AFTER, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use strum_macros::Display;
use thiserror::Error;
use tracing::{debug, warn};

const QUEUE: &str = "RANKED_SOLO_5x5";
const DEFAULT_RETRY_AFTER_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status} for {url}")]
    Status { status: StatusCode, url: String }
}

/// Ladder brackets in order of exclusivity, most exclusive first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum LadderBracket {
    Challenger,
    Grandmaster,
    Master
}

pub const LADDER_BRACKETS: [LadderBracket; 3] = [
    LadderBracket::Challenger,
    LadderBracket::Grandmaster,
    LadderBracket::Master
];

/// Maps a platform identifier to the regional cluster serving its match
/// and account endpoints. Unknown platforms fall back to "americas".
pub fn regional_route(platform: &str) -> &'static str {
    match platform {
        "kr" | "jp1" => "asia",
        "euw1" | "eun1" | "tr1" | "ru" => "europe",
        "na1" | "br1" | "la1" | "la2" | "oc1" => "americas",
        _ => "americas"
    }
}

/// Client for the ranked/match API. Every call absorbs rate limiting by
/// honoring the server-provided retry delay and treats a 404 as an absent
/// resource rather than a failure.
pub struct RiotApiClient {
    client: Client,
    api_key: String
}

impl RiotApiClient {
    pub fn new(api_key: String) -> Self {
        RiotApiClient {
            client: Client::new(),
            api_key
        }
    }

    pub async fn league_by_bracket(
        &self,
        platform: &str,
        bracket: LadderBracket
    ) -> Result<Option<LeagueList>, ApiError> {
        let url = format!(
            "https://{}.api.riotgames.com/lol/league/v4/{}leagues/by-queue/{}",
            platform, bracket, QUEUE
        );

        self.get_json(&url).await
    }

    pub async fn match_ids_by_puuid(
        &self,
        platform: &str,
        puuid: &str,
        count: usize
    ) -> Result<Option<Vec<String>>, ApiError> {
        let url = format!(
            "https://{}.api.riotgames.com/lol/match/v5/matches/by-puuid/{}/ids?start=0&count={}",
            regional_route(platform),
            puuid,
            count
        );

        self.get_json(&url).await
    }

    pub async fn match_by_id(&self, platform: &str, match_id: &str) -> Result<Option<MatchDetail>, ApiError> {
        let url = format!(
            "https://{}.api.riotgames.com/lol/match/v5/matches/{}",
            regional_route(platform),
            match_id
        );

        self.get_json(&url).await
    }

    pub async fn account_by_riot_id(
        &self,
        platform: &str,
        game_name: &str,
        tag_line: &str
    ) -> Result<Option<Account>, ApiError> {
        let url = format!(
            "https://{}.api.riotgames.com/riot/account/v1/accounts/by-riot-id/{}/{}",
            regional_route(platform),
            game_name,
            tag_line
        );

        self.get_json(&url).await
    }

    /// Unauthenticated GET for the static metadata feed.
    pub async fn get_public<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                url: url.to_string()
            });
        }

        Ok(response.json().await?)
    }

    /// Issues an authenticated GET, retrying indefinitely on quota
    /// exhaustion. Returns `Ok(None)` when the resource does not exist.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, ApiError> {
        loop {
            debug!("Requesting: {}", url);

            let response = self
                .client
                .get(url)
                .header("X-Riot-Token", &self.api_key)
                .send()
                .await?;

            match response.status() {
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry = retry_after_secs(&response).unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                    warn!("Rate limited, sleeping {}s", retry);
                    tokio::time::sleep(Duration::from_secs(retry + 1)).await;
                }
                StatusCode::NOT_FOUND => return Ok(None),
                status if status.is_success() => return Ok(Some(response.json().await?)),
                status => {
                    return Err(ApiError::Status {
                        status,
                        url: url.to_string()
                    })
                }
            }
        }
    }
}

fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regional_route_known_platforms() {
        assert_eq!(regional_route("kr"), "asia");
        assert_eq!(regional_route("euw1"), "europe");
        assert_eq!(regional_route("na1"), "americas");
    }

    #[test]
    fn test_regional_route_unknown_platform_defaults() {
        assert_eq!(regional_route("pbe1"), "americas");
    }

    #[test]
    fn test_bracket_url_segment() {
        assert_eq!(LadderBracket::Challenger.to_string(), "challenger");
        assert_eq!(LadderBracket::Grandmaster.to_string(), "grandmaster");
        assert_eq!(LadderBracket::Master.to_string(), "master");
    }
}
