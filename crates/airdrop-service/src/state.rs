//! Shared Application State
//!
//! Thread-safe state for the claim API: one loaded distribution bundle per
//! network, plus uptime and last-error bookkeeping.

use alloy::primitives::{B256, U256};
use dashmap::DashMap;
use distribution_gen::{ClaimRecord, DistributionBundle};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

/// Summary of one loaded distribution, as reported by the API.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkSummary {
    /// Network name
    pub network: String,
    /// Published Merkle root
    pub merkle_root: B256,
    /// Number of claimable addresses
    pub claim_count: usize,
    /// Total requested for distribution, in base units
    pub requested_total: U256,
    /// Total actually allocated, in base units
    pub achieved_total: U256,
}

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    /// Loaded distributions by network name
    distributions: DashMap<String, Arc<DistributionBundle>>,
    /// Service start time
    start_time: std::time::Instant,
    /// Last error message
    last_error: RwLock<Option<String>>,
}

impl AppState {
    /// Create new application state
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                distributions: DashMap::new(),
                start_time: std::time::Instant::now(),
                last_error: RwLock::new(None),
            }),
        }
    }

    /// Register a distribution bundle under a network name
    pub fn insert_distribution(&self, network: impl Into<String>, bundle: DistributionBundle) {
        self.inner
            .distributions
            .insert(network.into(), Arc::new(bundle));
    }

    /// Number of loaded distributions
    #[must_use]
    pub fn network_count(&self) -> usize {
        self.inner.distributions.len()
    }

    /// Summaries of every loaded distribution
    #[must_use]
    pub fn network_summaries(&self) -> Vec<NetworkSummary> {
        let mut summaries: Vec<NetworkSummary> = self
            .inner
            .distributions
            .iter()
            .map(|entry| NetworkSummary {
                network: entry.key().clone(),
                merkle_root: entry.value().merkle_root,
                claim_count: entry.value().claim_count(),
                requested_total: entry.value().requested_total,
                achieved_total: entry.value().achieved_total,
            })
            .collect();
        summaries.sort_by(|a, b| a.network.cmp(&b.network));
        summaries
    }

    /// Get the loaded distribution for a network
    #[must_use]
    pub fn distribution(&self, network: &str) -> Option<Arc<DistributionBundle>> {
        self.inner.distributions.get(network).map(|d| d.clone())
    }

    /// Look up one address's claim on one network
    #[must_use]
    pub fn claim(&self, network: &str, address: &str) -> Option<ClaimRecord> {
        self.inner
            .distributions
            .get(network)
            .and_then(|bundle| bundle.claim(address).cloned())
    }

    /// Get uptime in seconds
    #[must_use]
    pub fn uptime_secs(&self) -> u64 {
        self.inner.start_time.elapsed().as_secs()
    }

    /// Set last error
    pub fn set_error(&self, error: Option<String>) {
        *self.inner.last_error.write() = error;
    }

    /// Get last error
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error.read().clone()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
