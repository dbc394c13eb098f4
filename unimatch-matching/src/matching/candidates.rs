//! Mode (b): full candidate scoring with full-refresh persistence.
//!
//! Unlike pairing, the filter here is one-directional (only the subject's
//! preference is checked) and the texts compared are asymmetric: the subject's
//! `looking_for` against the candidate's `about_me`. Reversed pairs are scored
//! and stored independently.

use std::time::Instant;

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use unimatch_shared::clients::db::DbPool;
use unimatch_shared::models::{load_users, replace_candidate_matches, NewCandidateMatch, User};

use super::similarity::{cosine_similarity, to_percent, SimilarityScorer};
use super::MatchError;
use crate::embedding::EmbeddingError;

/// The candidate's gender equals what the subject is interested in.
/// Missing values never match.
pub fn prefers(subject: &User, candidate: &User) -> bool {
    matches!(
        (&subject.interested_in, &candidate.gender),
        (Some(wants), Some(is)) if wants == is
    )
}

/// Thresholds are percentages.
pub fn validate_threshold(min_score: f64) -> Result<f64, MatchError> {
    if (0.0..=100.0).contains(&min_score) {
        Ok(min_score)
    } else {
        Err(MatchError::InvalidThreshold(min_score))
    }
}

/// Scores every one-directional candidate and keeps those at or above
/// `min_score` (a percentage). Every `looking_for` and `about_me` is embedded
/// in a single oracle call.
pub async fn score_candidates(
    scorer: &SimilarityScorer,
    users: &[User],
    min_score: f64,
    created_at: DateTime<Utc>,
) -> Result<Vec<NewCandidateMatch>, EmbeddingError> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let texts: Vec<Option<&str>> = users
        .iter()
        .map(|u| u.looking_for.as_deref())
        .chain(users.iter().map(|u| u.about_me.as_deref()))
        .collect();
    let embeddings = scorer.embed_texts(&texts).await?;
    let (looking_for, about_me) = embeddings.split_at(users.len());

    let mut rows = Vec::new();
    for (u, subject) in users.iter().enumerate() {
        for (c, candidate) in users.iter().enumerate() {
            if candidate.id == subject.id || !prefers(subject, candidate) {
                continue;
            }

            let raw = cosine_similarity(&looking_for[u], &about_me[c]);
            let score = to_percent(raw);
            // Negative similarity never clears a threshold.
            if raw >= 0.0 && score >= min_score {
                rows.push(NewCandidateMatch::new(subject.id, candidate.id, score, created_at));
            }
        }
    }

    Ok(rows)
}

/// Loads every participant, scores candidates, and replaces the stored set.
/// Returns the number of rows inserted.
pub async fn compute_and_store(
    pool: &DbPool,
    scorer: &SimilarityScorer,
    min_score: f64,
) -> Result<usize, MatchError> {
    let min_score = validate_threshold(min_score)?;
    let started = Instant::now();

    let users = {
        let mut conn = pool.get()?;
        load_users(&mut conn)?
    };

    let rows = score_candidates(scorer, &users, min_score, Utc::now()).await?;

    let inserted = {
        let mut conn = pool.get()?;
        replace_candidate_matches(&mut conn, &rows)?
    };

    counter!("matching_candidates_stored_total").increment(inserted as u64);
    histogram!("matching_run_duration_seconds", "mode" => "candidates")
        .record(started.elapsed().as_secs_f64());

    tracing::info!(
        participants = users.len(),
        inserted,
        min_score,
        "inserted {inserted} match rows into 'matches' table"
    );

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbedder;
    use diesel::prelude::*;
    use std::sync::Arc;
    use unimatch_shared::clients::db::create_pool;
    use unimatch_shared::models::{insert_user, CandidateMatch, NewUser};
    use unimatch_shared::schema::matches;

    fn new_user(name: &str, gender: &str, interested_in: &str, looking_for: &str, about_me: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            student_number: format!("s-{name}"),
            gender: Some(gender.to_string()),
            interested_in: Some(interested_in.to_string()),
            whatsapp: format!("wa-{name}"),
            looking_for: Some(looking_for.to_string()),
            about_me: Some(about_me.to_string()),
        }
    }

    fn scorer() -> SimilarityScorer {
        let embedder = MockEmbedder::new(vec![0.0, 0.0, 1.0])
            .with("an outdoorsy person", vec![1.0, 0.0, 0.0])
            .with("I hike every weekend", vec![0.9, 0.1, 0.0])
            .with("someone who reads", vec![0.0, 1.0, 0.0])
            .with("bookworm and tea lover", vec![0.1, 0.9, 0.0])
            .with("I hate the outdoors", vec![-1.0, 0.0, 0.0]);
        SimilarityScorer::new(Arc::new(embedder))
    }

    fn seeded_pool(dir: &tempfile::TempDir) -> DbPool {
        let pool = create_pool(dir.path().join("matchmaking.db").to_str().unwrap()).unwrap();
        let mut conn = pool.get().unwrap();
        for user in [
            new_user("ana", "F", "M", "an outdoorsy person", "bookworm and tea lover"),
            new_user("ben", "M", "F", "someone who reads", "I hike every weekend"),
            new_user("cas", "M", "F", "an outdoorsy person", "I hate the outdoors"),
            new_user("dee", "F", "F", "someone who reads", "bookworm and tea lover"),
        ] {
            insert_user(&mut conn, &user).unwrap();
        }
        pool
    }

    fn stored(pool: &DbPool) -> Vec<(i32, i32, f64)> {
        let mut conn = pool.get().unwrap();
        matches::table
            .order(matches::id.asc())
            .load::<CandidateMatch>(&mut conn)
            .unwrap()
            .into_iter()
            .map(|m| (m.user_id, m.candidate_id, m.score))
            .collect()
    }

    fn loaded(pool: &DbPool) -> Vec<User> {
        let mut conn = pool.get().unwrap();
        load_users(&mut conn).unwrap()
    }

    #[tokio::test]
    async fn only_stores_one_directional_matches() {
        let dir = tempfile::tempdir().unwrap();
        let pool = seeded_pool(&dir);
        let users = loaded(&pool);

        compute_and_store(&pool, &scorer(), 0.0).await.unwrap();

        let rows = stored(&pool);
        assert!(!rows.is_empty());
        for (user_id, candidate_id, score) in &rows {
            let subject = users.iter().find(|u| u.id == *user_id).unwrap();
            let candidate = users.iter().find(|u| u.id == *candidate_id).unwrap();
            assert_eq!(candidate.gender, subject.interested_in);
            assert_ne!(user_id, candidate_id);
            assert!((0.0..=100.0).contains(score));
        }

        // dee (F -> F) has ana as a candidate; ana (F -> M) does not have dee.
        let (ana, dee) = (users[0].id, users[3].id);
        assert!(rows.iter().any(|r| r.0 == dee && r.1 == ana));
        assert!(!rows.iter().any(|r| r.0 == ana && r.1 == dee));
    }

    #[tokio::test]
    async fn compares_looking_for_against_about_me() {
        let dir = tempfile::tempdir().unwrap();
        let pool = seeded_pool(&dir);
        let users = loaded(&pool);

        let rows = score_candidates(&scorer(), &users, 0.0, Utc::now()).await.unwrap();

        // ana wants "an outdoorsy person"; ben says "I hike every weekend".
        let ana_ben = rows
            .iter()
            .find(|r| r.user_id == users[0].id && r.candidate_id == users[1].id)
            .unwrap();
        assert_eq!(ana_ben.score, to_percent(cosine_similarity(&[1.0, 0.0, 0.0], &[0.9, 0.1, 0.0])));

        // cas is the opposite of what ana wants: never stored.
        assert!(!rows.iter().any(|r| r.user_id == users[0].id && r.candidate_id == users[2].id));
    }

    #[tokio::test]
    async fn threshold_filters_low_scores() {
        let dir = tempfile::tempdir().unwrap();
        let pool = seeded_pool(&dir);

        let all = compute_and_store(&pool, &scorer(), 0.0).await.unwrap();
        let strict = compute_and_store(&pool, &scorer(), 90.0).await.unwrap();

        assert!(strict < all);
        assert!(stored(&pool).iter().all(|r| r.2 >= 90.0));
    }

    #[tokio::test]
    async fn rerun_is_a_full_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let pool = seeded_pool(&dir);

        let first_count = compute_and_store(&pool, &scorer(), 10.0).await.unwrap();
        let first = stored(&pool);
        let second_count = compute_and_store(&pool, &scorer(), 10.0).await.unwrap();
        let second = stored(&pool);

        assert_eq!(first_count, second_count);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn empty_population_clears_previous_rows() {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_pool(dir.path().join("empty.db").to_str().unwrap()).unwrap();
        {
            let mut conn = pool.get().unwrap();
            replace_candidate_matches(&mut conn, &[NewCandidateMatch::new(7, 8, 42.0, Utc::now())])
                .unwrap();
        }
        let embedder = Arc::new(MockEmbedder::new(vec![1.0]));
        let scorer = SimilarityScorer::new(embedder.clone());

        let inserted = compute_and_store(&pool, &scorer, 0.0).await.unwrap();

        assert_eq!(inserted, 0);
        assert!(stored(&pool).is_empty());
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn embeds_everything_in_one_call() {
        let dir = tempfile::tempdir().unwrap();
        let pool = seeded_pool(&dir);
        let embedder = Arc::new(MockEmbedder::new(vec![1.0, 0.0, 0.0]));
        let scorer = SimilarityScorer::new(embedder.clone());

        compute_and_store(&pool, &scorer, 0.0).await.unwrap();

        assert_eq!(embedder.calls(), 1);
    }

    #[tokio::test]
    async fn rejects_out_of_range_thresholds() {
        let dir = tempfile::tempdir().unwrap();
        let pool = seeded_pool(&dir);

        let err = compute_and_store(&pool, &scorer(), 150.0).await.unwrap_err();
        assert!(matches!(err, MatchError::InvalidThreshold(v) if v == 150.0));
        assert!(validate_threshold(-1.0).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
    }

    #[test]
    fn missing_gender_is_never_a_candidate() {
        let subject = User {
            id: 1,
            name: "ana".into(),
            student_number: "1".into(),
            gender: Some("F".into()),
            interested_in: None,
            whatsapp: "wa".into(),
            looking_for: None,
            about_me: None,
        };
        let candidate = User { id: 2, gender: None, ..subject.clone() };
        assert!(!prefers(&subject, &candidate));
        assert!(!prefers(&candidate, &subject));
    }
}
