//! Navigation session
//!
//! A `Session` owns the single cache, pagination and load state for one
//! browsing session. Fetches run as tokio tasks and report back over a
//! channel; every state change happens in `select` or `apply` on the owner.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::cache::{CacheKey, CacheStore};
use crate::config::EngineConfig;
use crate::data::{PaginationController, ResourceKey};
use crate::orchestrator::{Assembled, LoadError, RequestOrchestrator};
use crate::state::{LoadState, LoadStateMachine};

/// Message sent from a fetch task back to its session
#[derive(Debug)]
pub struct Completion {
    pub cache_key: CacheKey,
    pub outcome: Result<Assembled, LoadError>,
}

/// A fetch that has been launched and not yet applied
#[derive(Debug, Clone, Copy)]
struct InFlight {
    /// Epoch of the latest selection waiting on this fetch
    epoch: u64,
    started_at: DateTime<Utc>,
}

/// Long-lived navigation context
pub struct Session {
    orchestrator: RequestOrchestrator,
    cache: CacheStore,
    pagination: PaginationController,
    machine: LoadStateMachine,
    in_flight: HashMap<CacheKey, InFlight>,
    sender: mpsc::Sender<Completion>,
    receiver: mpsc::Receiver<Completion>,
}

impl Session {
    /// Creates a session talking to the configured APIs
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_orchestrator(RequestOrchestrator::from_config(config), config)
    }

    /// Creates a session with a custom orchestrator
    pub fn with_orchestrator(orchestrator: RequestOrchestrator, config: &EngineConfig) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        Self {
            orchestrator,
            cache: CacheStore::new(config.cache_ttl),
            pagination: PaginationController::new(config.page_size),
            machine: LoadStateMachine::new(),
            in_flight: HashMap::new(),
            sender,
            receiver,
        }
    }

    pub fn state(&self) -> &LoadState {
        self.machine.state()
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn pagination(&self) -> &PaginationController {
        &self.pagination
    }

    /// Number of fetches launched and not yet applied
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Switches page size; pages fetched with the old size are no longer reachable
    pub fn set_page_size(&mut self, page_size: u32) {
        self.pagination.set_page_size(page_size);
    }

    /// Selects `key` now
    pub fn select(&mut self, key: ResourceKey) -> &LoadState {
        self.select_at(key, Utc::now())
    }

    /// Selects `key`, judging cache freshness at `now`
    ///
    /// A fresh cache entry is shown immediately. Otherwise the state moves to
    /// `Loading`; a fetch already running for the same key is joined, else a
    /// new one is spawned. Must be called from within a tokio runtime.
    pub fn select_at(&mut self, key: ResourceKey, now: DateTime<Utc>) -> &LoadState {
        let page_size = self.pagination.page_size();
        let cache_key = CacheKey::scoped(key.clone(), page_size);

        if let Some(entry) = self.cache.get(&cache_key, now) {
            debug!(%key, "cache hit");
            let aggregate = entry.aggregate.clone();
            self.machine.show_cached(key, aggregate);
            return self.machine.state();
        }

        let epoch = self.machine.begin(key.clone());

        if let Some(flight) = self.in_flight.get_mut(&cache_key) {
            debug!(%key, epoch, "joining in-flight fetch");
            flight.epoch = epoch;
            return self.machine.state();
        }

        debug!(%key, epoch, "cache miss, fetching");
        self.in_flight.insert(
            cache_key.clone(),
            InFlight {
                epoch,
                started_at: now,
            },
        );

        let orchestrator = self.orchestrator.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let outcome = orchestrator.assemble(&key, page_size).await;
            // The session may be gone; nothing to report to then
            let _ = sender.send(Completion { cache_key, outcome }).await;
        });

        self.machine.state()
    }

    /// Applies a completed fetch
    ///
    /// Successful aggregates are cached even when the selection that launched
    /// them was superseded; the load state only changes for the latest selection.
    /// Returns whether the load state changed.
    pub fn apply(&mut self, completion: Completion) -> bool {
        let Completion { cache_key, outcome } = completion;
        let Some(flight) = self.in_flight.remove(&cache_key) else {
            debug!(key = %cache_key.resource, "completion for unknown fetch");
            return false;
        };

        let result = match outcome {
            Ok(assembled) => {
                if let Some(total) = assembled.total_count {
                    self.pagination.record_total(total);
                }
                self.cache
                    .put(cache_key.clone(), assembled.records.clone(), flight.started_at);
                Ok(assembled.records)
            }
            Err(e) => {
                error!(key = %cache_key.resource, error = %e, "load failed");
                Err(e.to_string())
            }
        };

        let applied = self.machine.finish(flight.epoch, result);
        if !applied {
            debug!(key = %cache_key.resource, epoch = flight.epoch, "discarding stale result");
        }
        applied
    }

    /// Applies pending completions without waiting
    ///
    /// # Returns
    /// The number of completions applied
    pub fn poll(&mut self) -> usize {
        let mut count = 0;
        while let Ok(completion) = self.receiver.try_recv() {
            self.apply(completion);
            count += 1;
        }
        count
    }

    /// Waits until the current selection is no longer loading
    pub async fn settle(&mut self) -> &LoadState {
        while self.machine.state().is_loading() {
            match self.receiver.recv().await {
                Some(completion) => {
                    self.apply(completion);
                }
                None => break,
            }
        }
        self.machine.state()
    }

    /// Waits until every launched fetch has been applied
    pub async fn settle_all(&mut self) -> &LoadState {
        while !self.in_flight.is_empty() {
            match self.receiver.recv().await {
                Some(completion) => {
                    self.apply(completion);
                }
                None => break,
            }
        }
        self.machine.state()
    }

    /// Selects `key` and waits for its outcome
    pub async fn load(&mut self, key: ResourceKey) -> &LoadState {
        self.select(key);
        self.settle().await
    }
}
