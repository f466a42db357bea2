//! Non-repeating selection over a changing candidate pool.
//!
//! The served-set only grows until every candidate of the latest pool has
//! been served; the next pick then clears it and starts over. "Exhausted"
//! is always judged against the pool passed to the current call, since the
//! upstream listing changes between fetches.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::types::{Fingerprint, MemeCandidate};

/// Owner of the served-set.
#[derive(Debug, Default)]
pub struct SelectionPolicy {
    served: HashSet<Fingerprint>,
}

impl SelectionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick one candidate using the thread-local RNG.
    pub fn select(&mut self, candidates: &[MemeCandidate]) -> Option<MemeCandidate> {
        self.select_with(candidates, &mut rand::thread_rng())
    }

    /// Pick uniformly among candidates not served yet; when all of them have
    /// been served, clear history and pick from the whole list.
    ///
    /// Returns `None` for an empty list, leaving the served-set untouched.
    pub fn select_with<R: Rng + ?Sized>(
        &mut self,
        candidates: &[MemeCandidate],
        rng: &mut R,
    ) -> Option<MemeCandidate> {
        if candidates.is_empty() {
            return None;
        }

        let fingerprinted: Vec<(Fingerprint, &MemeCandidate)> =
            candidates.iter().map(|c| (c.fingerprint(), c)).collect();

        let fresh: Vec<&(Fingerprint, &MemeCandidate)> = fingerprinted
            .iter()
            .filter(|(fp, _)| !self.served.contains(fp))
            .collect();

        let (fingerprint, chosen) = if fresh.is_empty() {
            info!(
                "All {} current candidates already served; resetting history of {}",
                candidates.len(),
                self.served.len()
            );
            self.served.clear();
            fingerprinted.choose(rng)?
        } else {
            *fresh.choose(rng)?
        };

        self.served.insert(fingerprint.clone());
        Some((*chosen).clone())
    }

    /// Size of the served-set.
    pub fn served_count(&self) -> usize {
        self.served.len()
    }

    pub fn is_served(&self, candidate: &MemeCandidate) -> bool {
        self.served.contains(&candidate.fingerprint())
    }

    /// Forget everything served so far.
    pub fn reset(&mut self) {
        self.served.clear();
    }
}
