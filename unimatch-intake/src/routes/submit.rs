use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::Html;
use axum::Form;
use metrics::counter;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use unimatch_shared::errors::{AppError, AppResult, ErrorCode};
use unimatch_shared::models::{insert_user, NewUser};

use crate::pages;
use crate::AppState;

/// All seven fields are required by the form; only the free-text answers may
/// be left empty.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitForm {
    #[validate(length(min = 1, message = "name must not be blank"))]
    pub name: String,
    #[validate(length(min = 1, message = "student number must not be blank"))]
    pub student_number: String,
    #[validate(length(min = 1, message = "gender must not be blank"))]
    pub gender: String,
    #[validate(length(min = 1, message = "interested_in must not be blank"))]
    pub interested_in: String,
    #[validate(length(min = 1, message = "whatsapp must not be blank"))]
    pub whatsapp: String,
    pub looking_for: String,
    pub about_me: String,
}

impl SubmitForm {
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            student_number: self.student_number.trim().to_string(),
            gender: self.gender.trim().to_string(),
            interested_in: self.interested_in.trim().to_string(),
            whatsapp: self.whatsapp.trim().to_string(),
            looking_for: self.looking_for.trim().to_string(),
            about_me: self.about_me.trim().to_string(),
        }
    }
}

impl From<SubmitForm> for NewUser {
    fn from(form: SubmitForm) -> Self {
        NewUser {
            name: form.name,
            student_number: form.student_number,
            gender: Some(form.gender),
            interested_in: Some(form.interested_in),
            whatsapp: form.whatsapp,
            looking_for: Some(form.looking_for),
            about_me: Some(form.about_me),
        }
    }
}

// --- POST /submit ---

pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    form: Result<Form<SubmitForm>, FormRejection>,
) -> AppResult<Html<String>> {
    let Form(form) =
        form.map_err(|rejection| AppError::new(ErrorCode::MissingField, rejection.body_text()))?;

    let form = form.trimmed();
    form.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let mut conn = state.db.get()?;
    let user = insert_user(&mut conn, &NewUser::from(form))?;

    counter!("intake_submissions_total").increment(1);
    tracing::info!(user_id = user.id, "participant registered");

    Ok(Html(pages::index(true)))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    use unimatch_shared::clients::db::create_pool;
    use unimatch_shared::middleware::detached_metrics_handle;
    use unimatch_shared::models::load_users;

    use crate::config::AppConfig;
    use crate::{build_router, AppState};

    struct Fixture {
        _dir: tempfile::TempDir,
        state: Arc<AppState>,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let db_path = dir.path().join("matchmaking.db");
            let static_dir = dir.path().join("static");
            std::fs::create_dir(&static_dir).unwrap();
            std::fs::write(static_dir.join("style.css"), "body { color: red; }").unwrap();

            let config = AppConfig {
                port: 0,
                database_url: db_path.to_str().unwrap().to_string(),
                static_dir: static_dir.to_str().unwrap().to_string(),
            };
            let state = Arc::new(AppState {
                db: create_pool(&config.database_url).unwrap(),
                config,
                metrics_handle: detached_metrics_handle(),
            });
            Self { _dir: dir, state }
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
            let response = build_router(self.state.clone()).oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            (status, String::from_utf8(bytes.to_vec()).unwrap())
        }
    }

    fn submit(body: &str) -> Request<Body> {
        Request::post("/submit")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    const COMPLETE: &str = "name=%20Ana%20&student_number=s1234567&gender=female\
        &interested_in=male&whatsapp=%2B31612345678\
        &looking_for=someone+who+hikes&about_me=";

    #[tokio::test]
    async fn stores_trimmed_submission_and_confirms() {
        let fixture = Fixture::new();

        let (status, page) = fixture.send(submit(COMPLETE)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(page.contains("class=\"notice\""));

        let mut conn = fixture.state.db.get().unwrap();
        let users = load_users(&mut conn).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Ana");
        assert_eq!(users[0].whatsapp, "+31612345678");
        assert_eq!(users[0].interested_in.as_deref(), Some("male"));
        assert_eq!(users[0].looking_for.as_deref(), Some("someone who hikes"));
        assert_eq!(users[0].about_me.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn missing_field_is_rejected() {
        let fixture = Fixture::new();

        let (status, body) = fixture
            .send(submit("name=Ana&student_number=1&gender=female&interested_in=male"))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["error"]["code"], "E1001");

        let mut conn = fixture.state.db.get().unwrap();
        assert!(load_users(&mut conn).unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_identity_field_is_rejected() {
        let fixture = Fixture::new();

        let (status, body) = fixture
            .send(submit(
                "name=+++&student_number=1&gender=female&interested_in=male\
                 &whatsapp=1&looking_for=x&about_me=y",
            ))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["error"]["code"], "E0002");
    }

    #[tokio::test]
    async fn serves_form_roadmap_and_assets() {
        let fixture = Fixture::new();

        let (status, page) = fixture.send(Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(page.contains("action=\"/submit\""));
        assert!(!page.contains("class=\"notice\""));

        let (status, page) =
            fixture.send(Request::get("/roadmap").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(page.contains("Roadmap"));

        let (status, css) = fixture
            .send(Request::get("/static/style.css").body(Body::empty()).unwrap())
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(css, "body { color: red; }");
    }

    #[tokio::test]
    async fn health_probes_database() {
        let fixture = Fixture::new();

        let (status, body) =
            fixture.send(Request::get("/health").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["service"], "unimatch-intake");
        assert_eq!(body["checks"][0]["status"], "healthy");
    }
}
