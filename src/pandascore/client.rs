use anyhow::Context;
use async_trait::async_trait;
use futures_util::future::try_join_all;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::models::{League, LeagueId, Match, Partition};
use super::source::MatchSource;
use crate::error::{CalendarError, CalendarResult};

/// Client for the PandaScore REST API.
/// Docs: <https://developers.pandascore.co/reference>
#[derive(Clone)]
pub struct PandaScoreClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
    per_page: u32,
}

impl PandaScoreClient {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
        per_page: u32,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        let base_url = Url::parse(base_url).context("Invalid PandaScore base URL")?;
        Ok(PandaScoreClient {
            http,
            base_url,
            token,
            per_page,
        })
    }

    fn endpoint_url(&self, segments: &[&str]) -> CalendarResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CalendarError::Transport(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        url: Url,
        query: &[(&str, u32)],
    ) -> CalendarResult<T> {
        debug!("Fetching PandaScore {}: {}", endpoint, url);

        let mut req = self.http.get(url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| CalendarError::from_reqwest(endpoint, e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            warn!("PandaScore {} returned {}", endpoint, status);
            return Err(CalendarError::Upstream {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| CalendarError::from_reqwest(endpoint, e))
    }

    async fn fetch_partition(
        &self,
        league_id: LeagueId,
        partition: Partition,
    ) -> CalendarResult<Vec<Match>> {
        let id = league_id.to_string();
        let url = self.endpoint_url(&["leagues", id.as_str(), "matches", partition.as_str()])?;
        let endpoint = format!("matches/{}", partition.as_str());
        self.get_json(&endpoint, url, &[("per_page", self.per_page)])
            .await
    }
}

#[async_trait]
impl MatchSource for PandaScoreClient {
    fn name(&self) -> &str {
        "PandaScore"
    }

    async fn fetch_league(&self, league_id: LeagueId) -> CalendarResult<League> {
        let id = league_id.to_string();
        let url = self.endpoint_url(&["leagues", id.as_str()])?;
        self.get_json("league", url, &[]).await
    }

    async fn fetch_matches(&self, league_id: LeagueId) -> CalendarResult<Vec<Match>> {
        // Partitions are requested concurrently; try_join_all keeps their order.
        let partitions = try_join_all(
            Partition::ALL
                .iter()
                .map(|p| self.fetch_partition(league_id, *p)),
        )
        .await?;

        let counts: Vec<usize> = partitions.iter().map(Vec::len).collect();
        let matches: Vec<Match> = partitions.into_iter().flatten().collect();
        info!(
            "Fetched {} matches for league {} (running/past/upcoming = {:?})",
            matches.len(),
            league_id,
            counts
        );
        Ok(matches)
    }
}
