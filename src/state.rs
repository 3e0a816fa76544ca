//! Load state for the currently selected key
//!
//! Every selection bumps an epoch. A completion carries the epoch it was
//! launched under and only lands if no newer selection happened since.

use crate::data::{Aggregate, ResourceKey};

/// What the presentation layer should show
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// Nothing selected yet
    Idle,
    /// Fetch in progress for this key
    Loading(ResourceKey),
    /// Aggregate ready
    Success(ResourceKey, Aggregate),
    /// Fatal failure for this key
    Error(ResourceKey, String),
}

impl LoadState {
    pub fn key(&self) -> Option<&ResourceKey> {
        match self {
            LoadState::Idle => None,
            LoadState::Loading(key) | LoadState::Success(key, _) | LoadState::Error(key, _) => {
                Some(key)
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading(_))
    }

    /// The aggregate, when in `Success`
    pub fn aggregate(&self) -> Option<&Aggregate> {
        match self {
            LoadState::Success(_, aggregate) => Some(aggregate),
            _ => None,
        }
    }
}

/// Epoch-guarded state machine
#[derive(Debug, Clone)]
pub struct LoadStateMachine {
    state: LoadState,
    epoch: u64,
}

impl Default for LoadStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadStateMachine {
    pub fn new() -> Self {
        Self {
            state: LoadState::Idle,
            epoch: 0,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Epoch of the most recent selection
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Enters `Loading(key)` and returns the epoch the fetch must report back with
    pub fn begin(&mut self, key: ResourceKey) -> u64 {
        self.epoch += 1;
        self.state = LoadState::Loading(key);
        self.epoch
    }

    /// Shows a cached aggregate straight away
    pub fn show_cached(&mut self, key: ResourceKey, aggregate: Aggregate) -> u64 {
        self.epoch += 1;
        self.state = LoadState::Success(key, aggregate);
        self.epoch
    }

    /// Applies a completed fetch launched under `epoch`
    ///
    /// Returns `false` (state untouched) if a newer selection superseded it.
    pub fn finish(&mut self, epoch: u64, result: Result<Aggregate, String>) -> bool {
        if epoch != self.epoch {
            return false;
        }
        let LoadState::Loading(key) = &self.state else {
            return false;
        };

        let key = key.clone();
        self.state = match result {
            Ok(aggregate) => LoadState::Success(key, aggregate),
            Err(message) => LoadState::Error(key, message),
        };
        true
    }
}
