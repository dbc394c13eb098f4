use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap};
use axum::Json;
use diesel::prelude::*;
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};

use unimatch_shared::errors::{AppError, AppResult, ErrorCode};
use unimatch_shared::models::{load_users, CandidateMatch, User};
use unimatch_shared::schema::{matches, users};
use unimatch_shared::types::api::ApiResponse;
use unimatch_shared::types::pagination::{Paginated, PaginationParams};

use crate::matching::{self, MatchError, PairingOutcome};
use crate::AppState;

// --- Request / Response types ---

#[derive(Debug, Serialize)]
pub struct UsersSnapshot {
    pub count: usize,
    pub users: Vec<User>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    /// Percentage in 0..=100. Falls back to the configured default.
    pub min_score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub inserted: usize,
    pub min_score: f64,
}

#[derive(Debug, Serialize)]
pub struct CandidateView {
    pub candidate_id: i32,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub whatsapp: Option<String>,
    pub about_me: Option<String>,
    pub score: f64,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub a: Option<String>,
    #[serde(default)]
    pub b: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub raw: f64,
    pub percent: f64,
}

// --- GET /admin/users ---

pub async fn list_users(State(state): State<Arc<AppState>>) -> AppResult<Json<ApiResponse<UsersSnapshot>>> {
    let mut conn = state.db.get()?;
    let users = load_users(&mut conn)?;

    tracing::info!(count = users.len(), "loaded participants");

    Ok(Json(ApiResponse::ok(UsersSnapshot {
        count: users.len(),
        users,
    })))
}

// --- POST /admin/pairs ---

pub async fn generate_pairs(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<PairingOutcome>>> {
    let started = Instant::now();
    let users = {
        let mut conn = state.db.get()?;
        load_users(&mut conn)?
    };

    let outcome = matching::generate_pairs(&state.scorer, &users)
        .await
        .map_err(MatchError::from)?;

    counter!("matching_pairs_generated_total").increment(outcome.pairs.len() as u64);
    counter!("matching_unmatched_total").increment(outcome.unmatched.len() as u64);
    histogram!("matching_run_duration_seconds", "mode" => "pairs")
        .record(started.elapsed().as_secs_f64());

    Ok(Json(ApiResponse::ok(outcome)))
}

// --- POST /admin/candidates ---

pub async fn refresh_candidates(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<ApiResponse<RefreshResponse>>> {
    let req = parse_refresh_request(&headers, &body)?;
    let min_score = req.min_score.unwrap_or(state.config.default_min_score);

    let inserted = matching::compute_and_store(&state.db, &state.scorer, min_score).await?;

    Ok(Json(ApiResponse::ok_with_message(
        RefreshResponse { inserted, min_score },
        format!("inserted {inserted} match rows"),
    )))
}

/// An empty body means "use the configured threshold". Anything else must be
/// a well-formed JSON request; a refresh is destructive, so nothing is guessed.
fn parse_refresh_request(headers: &HeaderMap, body: &[u8]) -> AppResult<RefreshRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RefreshRequest::default());
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().starts_with("application/json"));
    if !is_json {
        return Err(AppError::new(
            ErrorCode::BadRequest,
            "expected request with `Content-Type: application/json`",
        ));
    }

    let Json(req) = Json::<RefreshRequest>::from_bytes(body)
        .map_err(|rejection| AppError::new(ErrorCode::BadRequest, rejection.body_text()))?;
    Ok(req)
}

// --- GET /admin/candidates ---

pub async fn list_candidates(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<CandidateMatch>>>> {
    let mut conn = state.db.get()?;

    let items = matches::table
        .order(matches::id.asc())
        .offset(i64::try_from(params.offset()).unwrap_or(i64::MAX))
        .limit(i64::try_from(params.limit()).unwrap_or(i64::MAX))
        .load::<CandidateMatch>(&mut conn)?;

    let total: i64 = matches::table.count().get_result(&mut conn)?;

    Ok(Json(ApiResponse::ok(Paginated::new(items, total as u64, &params))))
}

// --- GET /admin/candidates/:user_id ---

pub async fn user_candidates(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<ApiResponse<Vec<CandidateView>>>> {
    let mut conn = state.db.get()?;

    let exists: i64 = users::table
        .filter(users::id.eq(user_id))
        .count()
        .get_result(&mut conn)?;
    if exists == 0 {
        return Err(AppError::new(ErrorCode::ParticipantNotFound, "participant not found"));
    }

    let rows = matches::table
        .filter(matches::user_id.eq(user_id))
        .order((matches::score.desc(), matches::id.asc()))
        .load::<CandidateMatch>(&mut conn)?;

    let candidate_ids: Vec<i32> = rows.iter().map(|r| r.candidate_id).collect();
    let candidates: HashMap<i32, User> = users::table
        .filter(users::id.eq_any(candidate_ids))
        .load::<User>(&mut conn)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    // Rows can outlive their candidate; show what is stored.
    let views = rows
        .into_iter()
        .map(|row| {
            let candidate = candidates.get(&row.candidate_id);
            CandidateView {
                candidate_id: row.candidate_id,
                name: candidate.map(|c| c.name.clone()),
                gender: candidate.and_then(|c| c.gender.clone()),
                whatsapp: candidate.map(|c| c.whatsapp.clone()),
                about_me: candidate.and_then(|c| c.about_me.clone()),
                score: row.score,
                created_at: row.created_at,
            }
        })
        .collect();

    Ok(Json(ApiResponse::ok(views)))
}

// --- POST /admin/score ---

pub async fn score_texts(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScoreRequest>,
) -> AppResult<Json<ApiResponse<ScoreResponse>>> {
    let raw = state
        .scorer
        .score(req.a.as_deref(), req.b.as_deref())
        .await
        .map_err(MatchError::from)?;

    Ok(Json(ApiResponse::ok(ScoreResponse {
        raw,
        percent: matching::similarity::to_percent(raw),
    })))
}
