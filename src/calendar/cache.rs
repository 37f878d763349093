//! Read-through cache of rendered league calendars.
//!
//! Each league id maps to the last successfully rendered document and the
//! instant it was rendered.  A request for a fresh entry is answered straight
//! from memory; a stale or missing entry triggers a refresh against the
//! `MatchSource`.
//!
//! ```text
//!  get(id) ──fresh?──▶ stored document
//!     │
//!     └─stale──▶ in-flight refresh for id? ──yes──▶ await the same future
//!                      │ no
//!                      ▼
//!               spawn refresh: league ∥ matches → render → store
//! ```
//!
//! A failed refresh leaves the stored entry untouched and the error is
//! returned to every caller that waited on it.  Refreshes run on their own
//! task, so a caller that goes away does not cancel the upstream work.
//!
//! Capacity is bounded by an LRU.  Hits only take a read lock and `peek`, so
//! recency is updated when an entry is (re)rendered: the entry evicted first
//! is the one refreshed least recently.

use futures_util::future::{BoxFuture, FutureExt, Shared};
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::render::render_calendar;
use crate::error::{CalendarError, CalendarResult};
use crate::pandascore::{LeagueId, MatchSource};

/// A rendered ICS document, shared between the cache and responses.
pub type Document = Arc<str>;

type Refresh = Shared<BoxFuture<'static, CalendarResult<Document>>>;

struct CacheEntry {
    document: Document,
    rendered_at: Instant,
}

/// Thread-safe, TTL-based cache of league calendars with per-league
/// refresh coalescing.
#[derive(Clone)]
pub struct CalendarCache {
    source: Arc<dyn MatchSource>,
    ttl: Duration,
    entries: Arc<RwLock<LruCache<LeagueId, CacheEntry>>>,
    in_flight: Arc<Mutex<HashMap<LeagueId, Refresh>>>,
}

impl CalendarCache {
    pub fn new(source: Arc<dyn MatchSource>, ttl: Duration, capacity: NonZeroUsize) -> Self {
        CalendarCache {
            source,
            ttl,
            entries: Arc::new(RwLock::new(LruCache::new(capacity))),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Return the calendar for `league_id`, refreshing it first if the
    /// cached copy is missing or older than the TTL.
    pub async fn get(&self, league_id: LeagueId) -> CalendarResult<Document> {
        if let Some(document) = self.fresh(league_id).await {
            debug!("Calendar cache hit for league {}", league_id);
            return Ok(document);
        }

        let refresh = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(refresh) = in_flight.get(&league_id) {
                debug!("Joining in-flight refresh for league {}", league_id);
                refresh.clone()
            } else if let Some(document) = self.fresh(league_id).await {
                // A refresh finished between the first check and taking the lock.
                return Ok(document);
            } else {
                let refresh = self.spawn_refresh(league_id);
                in_flight.insert(league_id, refresh.clone());
                refresh
            }
        };

        refresh.await
    }

    /// Number of leagues currently cached (fresh or stale).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn fresh(&self, league_id: LeagueId) -> Option<Document> {
        let entries = self.entries.read().await;
        entries
            .peek(&league_id)
            .filter(|entry| entry.rendered_at.elapsed() <= self.ttl)
            .map(|entry| Arc::clone(&entry.document))
    }

    /// Must be called with the in-flight lock held.
    fn spawn_refresh(&self, league_id: LeagueId) -> Refresh {
        let cache = self.clone();
        let handle = tokio::spawn(async move {
            let result = cache.refresh(league_id).await;
            // The entry (if any) is stored before the in-flight slot is freed.
            cache.in_flight.lock().await.remove(&league_id);
            result
        });

        let in_flight = Arc::clone(&self.in_flight);
        async move {
            match handle.await {
                Ok(result) => result,
                Err(join_err) => {
                    in_flight.lock().await.remove(&league_id);
                    Err(CalendarError::RefreshAborted(join_err.to_string()))
                }
            }
        }
        .boxed()
        .shared()
    }

    async fn refresh(&self, league_id: LeagueId) -> CalendarResult<Document> {
        info!(
            "🔄 Refreshing calendar for league {} from {}",
            league_id,
            self.source.name()
        );
        let started = Instant::now();

        let (league, matches) = tokio::try_join!(
            self.source.fetch_league(league_id),
            self.source.fetch_matches(league_id),
        )
        .map_err(|e| {
            warn!("Calendar refresh for league {} failed: {}", league_id, e);
            e
        })?;

        let document: Document = render_calendar(&league, &matches, self.ttl).into();

        let mut entries = self.entries.write().await;
        let replaced = entries.push(
            league_id,
            CacheEntry {
                document: Arc::clone(&document),
                rendered_at: Instant::now(),
            },
        );
        if let Some((evicted, _)) = replaced {
            if evicted != league_id {
                info!("Evicted calendar for league {} (capacity reached)", evicted);
            }
        }

        info!(
            "Calendar for league {} ({}) rendered from {} matches in {:?}",
            league_id,
            league.name,
            matches.len(),
            started.elapsed()
        );
        Ok(document)
    }

    #[cfg(test)]
    async fn stored(&self, league_id: LeagueId) -> Option<Document> {
        let entries = self.entries.read().await;
        entries.peek(&league_id).map(|e| Arc::clone(&e.document))
    }
}
