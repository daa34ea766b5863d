//! Debounced location search with stale-result suppression.
//!
//! Every input bumps the generation. A request carries the generation it was
//! issued under, and its results are applied only if no newer input has
//! arrived since, so a slow response can never overwrite fresher
//! suggestions.

use warglobe_core::constants::{SEARCH_DEBOUNCE_MS, SEARCH_MIN_QUERY_LEN};
use warglobe_core::enums::LookupSide;
use warglobe_core::error::{Result, WarRoomError};

use crate::services::LocationCandidate;

/// A search ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// A newer input superseded this request; its results were dropped.
    Stale,
    Suggestions(Vec<LocationCandidate>),
    Failed(WarRoomError),
}

#[derive(Debug, Clone, PartialEq)]
struct PendingSearch {
    query: String,
    due_ms: f64,
}

#[derive(Debug, Default)]
pub struct SearchSession {
    generation: u64,
    pending: Option<PendingSearch>,
    in_flight: Option<SearchRequest>,
    suggestions: Vec<LocationCandidate>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn suggestions(&self) -> &[LocationCandidate] {
        &self.suggestions
    }

    /// Record new input text. Short queries clear the suggestions and
    /// schedule nothing; anything else restarts the debounce timer.
    pub fn on_input(&mut self, query: &str, now_ms: f64) {
        self.generation += 1;
        let query = query.trim();
        if query.chars().count() < SEARCH_MIN_QUERY_LEN {
            self.pending = None;
            self.suggestions.clear();
            return;
        }
        self.pending = Some(PendingSearch {
            query: query.to_string(),
            due_ms: now_ms + SEARCH_DEBOUNCE_MS,
        });
    }

    /// The request to send, once the debounce delay has passed.
    pub fn poll(&mut self, now_ms: f64) -> Option<SearchRequest> {
        if self.pending.as_ref()?.due_ms > now_ms {
            return None;
        }
        let pending = self.pending.take()?;
        let request = SearchRequest {
            query: pending.query,
            generation: self.generation,
        };
        self.in_flight = Some(request.clone());
        Some(request)
    }

    /// Apply the response to the request issued under `generation`.
    pub fn complete(
        &mut self,
        generation: u64,
        result: Result<Vec<LocationCandidate>>,
    ) -> SearchOutcome {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "stale search results dropped");
            return SearchOutcome::Stale;
        }
        let query = self
            .in_flight
            .take()
            .map(|request| request.query)
            .unwrap_or_default();

        match result {
            Ok(candidates) if candidates.is_empty() => {
                self.suggestions.clear();
                SearchOutcome::Failed(WarRoomError::unresolved(LookupSide::Location, query))
            }
            Ok(candidates) => {
                self.suggestions = candidates.clone();
                SearchOutcome::Suggestions(candidates)
            }
            Err(error) => {
                self.suggestions.clear();
                SearchOutcome::Failed(error)
            }
        }
    }
}
