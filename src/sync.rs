//! Polling engine that keeps every registered feed independently fresh.
//!
//! Each feed owns one tokio task driving a fixed [`tokio::time::interval`].
//! A tick that finds the previous fetch still in flight is skipped, not
//! queued, so a rate-limited upstream never sees overlapping requests from
//! the same feed. Completions are applied through a single update routine
//! that checks the feed's registration epoch and a per-feed sequence number,
//! which makes unregistration and out-of-order completions safe to ignore.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use chrono::Utc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::core::feed::{FeedDescriptor, FeedId, FeedState, FetchError};

struct FeedSlot<T> {
    state: FeedState<T>,
    /// Registration epoch; bumped when the same id is registered again.
    epoch: u64,
    /// Sequence number of the most recently issued fetch.
    issued_seq: u64,
    /// Sequence number of the most recently applied completion.
    published_seq: u64,
    in_flight: bool,
    task: Option<JoinHandle<()>>,
}

/// Outcome of one fetch, tagged with enough context to decide whether it may
/// still be published.
struct FeedCompletion<T> {
    id: FeedId,
    epoch: u64,
    seq: u64,
    outcome: Result<T, FetchError>,
}

type FeedTable<T> = Arc<RwLock<HashMap<FeedId, FeedSlot<T>>>>;

/// Capability to stop one feed's polling loop.
///
/// Returned by [`FeedSynchronizer::register`]. Unregistering is idempotent;
/// calling it after the feed was replaced or shut down is a no-op.
pub struct FeedHandle<T> {
    id: FeedId,
    epoch: u64,
    feeds: FeedTable<T>,
}

impl<T> FeedHandle<T> {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Stop the feed's timer and drop its state. A fetch already dispatched
    /// at this point produces no observable state change.
    pub async fn unregister(&self) {
        let mut feeds = self.feeds.write().await;
        let matches = feeds
            .get(&self.id)
            .is_some_and(|slot| slot.epoch == self.epoch);
        if !matches {
            return;
        }
        if let Some(slot) = feeds.remove(&self.id) {
            if let Some(task) = slot.task {
                task.abort();
            }
            debug!(feed = %self.id, "Unregistered feed");
        }
    }
}

/// Owns all feed state and timers; consumers only ever read published
/// snapshots.
pub struct FeedSynchronizer<T> {
    feeds: FeedTable<T>,
    next_epoch: Arc<AtomicU64>,
}

impl<T> Clone for FeedSynchronizer<T> {
    fn clone(&self) -> Self {
        FeedSynchronizer {
            feeds: Arc::clone(&self.feeds),
            next_epoch: Arc::clone(&self.next_epoch),
        }
    }
}

impl<T> Default for FeedSynchronizer<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FeedSynchronizer<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        FeedSynchronizer {
            feeds: Arc::new(RwLock::new(HashMap::new())),
            next_epoch: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Start polling a feed: one immediate fetch, then one every
    /// `descriptor.interval` until the returned handle unregisters it.
    ///
    /// Registering an id that is already present replaces the descriptor and
    /// restarts its timer; completions from the replaced loop are discarded.
    pub async fn register(&self, descriptor: FeedDescriptor<T>) -> FeedHandle<T> {
        let FeedDescriptor {
            id,
            fetch,
            interval,
        } = descriptor;
        let epoch = self.next_epoch.fetch_add(1, Ordering::Relaxed);

        let mut feeds = self.feeds.write().await;
        if let Some(previous) = feeds.remove(&id) {
            if let Some(task) = previous.task {
                task.abort();
            }
            debug!(feed = %id, "Replacing existing feed registration");
        }

        feeds.insert(
            id.clone(),
            FeedSlot {
                state: FeedState::pending(),
                epoch,
                issued_seq: 0,
                published_seq: 0,
                in_flight: false,
                task: None,
            },
        );

        let task = tokio::spawn(Self::poll_loop(
            Arc::clone(&self.feeds),
            id.clone(),
            epoch,
            fetch,
            interval,
        ));
        if let Some(slot) = feeds.get_mut(&id) {
            slot.task = Some(task);
        }
        debug!(feed = %id, interval = ?interval, "Registered feed");

        FeedHandle {
            id,
            epoch,
            feeds: Arc::clone(&self.feeds),
        }
    }

    /// Most recently published state for a feed, if it is registered. Never
    /// triggers a fetch.
    pub async fn state(&self, id: &str) -> Option<FeedState<T>> {
        self.feeds.read().await.get(id).map(|slot| slot.state.clone())
    }

    /// Stop every feed. Used when the owning view exits.
    pub async fn shutdown(&self) {
        let mut feeds = self.feeds.write().await;
        for (id, slot) in feeds.drain() {
            if let Some(task) = slot.task {
                task.abort();
            }
            debug!(feed = %id, "Stopped feed");
        }
    }

    async fn poll_loop(
        feeds: FeedTable<T>,
        id: FeedId,
        epoch: u64,
        fetch: crate::core::feed::FetchFn<T>,
        interval: std::time::Duration,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            // The first tick completes immediately, giving the registration
            // its initial fetch.
            ticker.tick().await;

            let seq = {
                let mut feeds = feeds.write().await;
                let Some(slot) = feeds.get_mut(&id) else {
                    break;
                };
                if slot.epoch != epoch {
                    break;
                }
                if slot.in_flight {
                    debug!(feed = %id, "Previous fetch still in flight, skipping tick");
                    continue;
                }
                slot.issued_seq += 1;
                slot.in_flight = true;
                slot.state.loading = true;
                slot.issued_seq
            };

            // The ticker keeps running while the fetch is out; the
            // completion is applied by a detached task, so a stalled
            // upstream cannot block this loop. Aborting the loop leaves an
            // in-flight fetch to finish and be discarded by `apply`.
            let completion_feeds = Arc::clone(&feeds);
            let completion_id = id.clone();
            let fetch_future = fetch();
            tokio::spawn(async move {
                let outcome = fetch_future.await;
                Self::apply(
                    &completion_feeds,
                    FeedCompletion {
                        id: completion_id,
                        epoch,
                        seq,
                        outcome,
                    },
                )
                .await;
            });
        }
    }

    /// Single state-update routine for fetch completions.
    ///
    /// A completion is discarded when its feed is gone, its registration
    /// epoch is stale, or its sequence number is not newer than the last
    /// published one. Newer data is never overwritten by an older result.
    async fn apply(feeds: &RwLock<HashMap<FeedId, FeedSlot<T>>>, completion: FeedCompletion<T>) {
        let mut feeds = feeds.write().await;
        let Some(slot) = feeds.get_mut(&completion.id) else {
            debug!(feed = %completion.id, "Discarding completion for unregistered feed");
            return;
        };
        if slot.epoch != completion.epoch {
            debug!(feed = %completion.id, "Discarding completion from replaced registration");
            return;
        }
        if completion.seq <= slot.published_seq {
            debug!(
                feed = %completion.id,
                seq = completion.seq,
                published = slot.published_seq,
                "Discarding out-of-order completion"
            );
            return;
        }

        slot.published_seq = completion.seq;
        if completion.seq == slot.issued_seq {
            slot.in_flight = false;
        }
        slot.state.loading = false;
        match completion.outcome {
            Ok(data) => {
                slot.state.data = Some(data);
                slot.state.error = None;
                slot.state.last_updated = Some(Utc::now());
            }
            Err(error) => {
                // Keep the previous data so the view can stay on
                // last-known-good values.
                warn!(feed = %completion.id, error = %error, "Feed refresh failed");
                slot.state.error = Some(error);
            }
        }
    }
}
