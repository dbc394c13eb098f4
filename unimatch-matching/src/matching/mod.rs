//! Match engine.
//!
//! Two independent modes share the similarity scorer:
//! - [`pairing`]: greedy one-to-one pairing under the mutual-preference filter
//!   (mode a, in-memory, shown to the admin).
//! - [`candidates`]: every one-directional candidate above a threshold, stored
//!   with full-refresh semantics (mode b).
//!
//! The two modes use different gender filters and different text
//! comparisons, so they can disagree on the same population.

pub mod candidates;
mod error;
pub mod pairing;
pub mod similarity;

pub use candidates::{compute_and_store, score_candidates, validate_threshold};
pub use error::MatchError;
pub use pairing::{generate_pairs, MatchPair, PairingOutcome};
pub use similarity::SimilarityScorer;
