use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::{Deserialize, Serialize};

use crate::schema::{matches, users};

// --- Participant ---

/// One form submission. Preference and free-text columns are nullable so rows
/// written by older tooling still load; the matcher treats a missing value as
/// "matches nobody" (preferences) or the empty string (free text).
#[derive(Debug, Queryable, Identifiable, Serialize, Deserialize, Clone, PartialEq)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub student_number: String,
    pub gender: Option<String>,
    pub interested_in: Option<String>,
    pub whatsapp: String,
    pub looking_for: Option<String>,
    pub about_me: Option<String>,
}

impl User {
    pub fn looking_for_text(&self) -> &str {
        self.looking_for.as_deref().unwrap_or("")
    }

    pub fn about_me_text(&self) -> &str {
        self.about_me.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub name: String,
    pub student_number: String,
    pub gender: Option<String>,
    pub interested_in: Option<String>,
    pub whatsapp: String,
    pub looking_for: Option<String>,
    pub about_me: Option<String>,
}

/// All participants in store order.
pub fn load_users(conn: &mut SqliteConnection) -> QueryResult<Vec<User>> {
    users::table.order(users::id.asc()).load::<User>(conn)
}

pub fn insert_user(conn: &mut SqliteConnection, user: &NewUser) -> QueryResult<User> {
    diesel::insert_into(users::table)
        .values(user)
        .get_result::<User>(conn)
}

// --- Stored candidates ---

#[derive(Debug, Queryable, Identifiable, Serialize, Deserialize, Clone, PartialEq)]
#[diesel(table_name = matches)]
pub struct CandidateMatch {
    pub id: i32,
    pub user_id: i32,
    pub candidate_id: i32,
    pub score: f64,
    pub created_at: String,
}

#[derive(Debug, Insertable, Clone, PartialEq)]
#[diesel(table_name = matches)]
pub struct NewCandidateMatch {
    pub user_id: i32,
    pub candidate_id: i32,
    pub score: f64,
    pub created_at: String,
}

impl NewCandidateMatch {
    pub fn new(user_id: i32, candidate_id: i32, score: f64, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            candidate_id,
            score,
            created_at: iso_timestamp(created_at),
        }
    }
}

/// Naive UTC ISO-8601 with microseconds, e.g. `2024-03-01T18:04:05.123456`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Deletes every stored candidate row and inserts `rows` in one transaction.
/// Returns the number of rows inserted.
pub fn replace_candidate_matches(
    conn: &mut SqliteConnection,
    rows: &[NewCandidateMatch],
) -> QueryResult<usize> {
    conn.transaction(|conn| {
        let deleted = diesel::delete(matches::table).execute(conn)?;
        tracing::debug!(deleted, "cleared previous candidate matches");

        let mut inserted = 0;
        for row in rows {
            inserted += diesel::insert_into(matches::table)
                .values(row)
                .execute(conn)?;
        }
        Ok(inserted)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::db::create_pool;
    use chrono::TimeZone;

    fn new_user(name: &str, gender: &str, interested_in: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            student_number: format!("s-{name}"),
            gender: Some(gender.to_string()),
            interested_in: Some(interested_in.to_string()),
            whatsapp: "+31 6 0000 0000".to_string(),
            looking_for: None,
            about_me: Some("likes hiking".to_string()),
        }
    }

    #[test]
    fn users_load_in_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_pool(dir.path().join("t.db").to_str().unwrap()).unwrap();
        let mut conn = pool.get().unwrap();

        let first = insert_user(&mut conn, &new_user("ada", "female", "male")).unwrap();
        let second = insert_user(&mut conn, &new_user("bob", "male", "female")).unwrap();

        let loaded = load_users(&mut conn).unwrap();
        assert_eq!(loaded, vec![first, second]);
        assert_eq!(loaded[0].looking_for_text(), "");
        assert_eq!(loaded[0].about_me_text(), "likes hiking");
    }

    #[test]
    fn replace_discards_previous_rows() {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_pool(dir.path().join("t.db").to_str().unwrap()).unwrap();
        let mut conn = pool.get().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 18, 4, 5).unwrap();

        let first = vec![
            NewCandidateMatch::new(1, 2, 81.5, at),
            NewCandidateMatch::new(2, 1, 77.25, at),
        ];
        assert_eq!(replace_candidate_matches(&mut conn, &first).unwrap(), 2);

        let second = vec![NewCandidateMatch::new(3, 4, 12.0, at)];
        assert_eq!(replace_candidate_matches(&mut conn, &second).unwrap(), 1);

        let stored = matches::table.load::<CandidateMatch>(&mut conn).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!((stored[0].user_id, stored[0].candidate_id), (3, 4));
        assert_eq!(stored[0].created_at, "2024-03-01T18:04:05.000000");
    }

    #[test]
    fn replace_with_nothing_empties_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_pool(dir.path().join("t.db").to_str().unwrap()).unwrap();
        let mut conn = pool.get().unwrap();
        let at = Utc::now();

        replace_candidate_matches(&mut conn, &[NewCandidateMatch::new(1, 2, 50.0, at)]).unwrap();
        assert_eq!(replace_candidate_matches(&mut conn, &[]).unwrap(), 0);

        let remaining: i64 = matches::table.count().get_result(&mut conn).unwrap();
        assert_eq!(remaining, 0);
    }
}
