//! Mode (a): greedy one-to-one pairing.
//!
//! Participants are visited in store order. Each unmatched participant takes
//! the most similar later participant that passes the mutual-preference filter.
//! This is an order-dependent heuristic, not a maximum-weight matching: a
//! globally better assignment may exist.

use ndarray::Array2;
use serde::Serialize;
use unimatch_shared::models::User;

use super::similarity::{similarity_matrix, SimilarityScorer};
use crate::embedding::EmbeddingError;

/// Written to the diagonal so nobody pairs with themselves. Doubles as the
/// floor a candidate must strictly beat.
const SELF_SIMILARITY: f64 = -1.0;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchPair {
    pub user_a: User,
    pub user_b: User,
    /// Raw cosine similarity of the combined texts.
    pub score: f64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PairingOutcome {
    pub pairs: Vec<MatchPair>,
    pub unmatched: Vec<User>,
}

/// Text embedded for pairing: what they look for, then what they are.
pub fn combined_text(user: &User) -> String {
    format!("{} {}", user.looking_for_text(), user.about_me_text())
}

/// Each side's preference equals the other's gender. Missing values never match.
pub fn is_mutual(a: &User, b: &User) -> bool {
    matches!(
        (&a.interested_in, &b.gender, &b.interested_in, &a.gender),
        (Some(a_wants), Some(b_is), Some(b_wants), Some(a_is)) if a_wants == b_is && b_wants == a_is
    )
}

/// Greedy pass over a similarity matrix whose diagonal already holds
/// [`SELF_SIMILARITY`]. Returns `(i, j, score)` with `i < j`, in commit order.
pub fn greedy_pairs(users: &[User], similarity: &Array2<f64>) -> Vec<(usize, usize, f64)> {
    let mut matched = vec![false; users.len()];
    let mut pairs = Vec::new();

    for i in 0..users.len() {
        if matched[i] {
            continue;
        }

        let mut best: Option<usize> = None;
        let mut best_score = SELF_SIMILARITY;

        for j in (i + 1)..users.len() {
            if matched[j] || !is_mutual(&users[i], &users[j]) {
                continue;
            }
            let score = similarity[[i, j]];
            if score > best_score {
                best_score = score;
                best = Some(j);
            }
        }

        if let Some(j) = best {
            matched[i] = true;
            matched[j] = true;
            pairs.push((i, j, best_score));
        }
    }

    pairs
}

/// Embeds every participant once, then pairs them greedily.
pub async fn generate_pairs(
    scorer: &SimilarityScorer,
    users: &[User],
) -> Result<PairingOutcome, EmbeddingError> {
    if users.is_empty() {
        return Ok(PairingOutcome::default());
    }

    let texts: Vec<String> = users.iter().map(combined_text).collect();
    let refs: Vec<Option<&str>> = texts.iter().map(|t| Some(t.as_str())).collect();
    let embeddings = scorer.embed_texts(&refs).await?;

    let mut similarity = similarity_matrix(&embeddings);
    similarity.diag_mut().fill(SELF_SIMILARITY);

    let committed = greedy_pairs(users, &similarity);

    let mut is_paired = vec![false; users.len()];
    let pairs = committed
        .into_iter()
        .map(|(i, j, score)| {
            is_paired[i] = true;
            is_paired[j] = true;
            MatchPair {
                user_a: users[i].clone(),
                user_b: users[j].clone(),
                score,
            }
        })
        .collect::<Vec<_>>();

    let unmatched = users
        .iter()
        .zip(&is_paired)
        .filter(|(_, paired)| !**paired)
        .map(|(user, _)| user.clone())
        .collect::<Vec<_>>();

    tracing::info!(
        participants = users.len(),
        pairs = pairs.len(),
        unmatched = unmatched.len(),
        model = scorer.model(),
        "generated pairs"
    );

    Ok(PairingOutcome { pairs, unmatched })
}
