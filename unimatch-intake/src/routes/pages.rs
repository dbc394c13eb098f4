use axum::response::Html;

use crate::pages;

// --- GET / ---

pub async fn index() -> Html<String> {
    Html(pages::index(false))
}

// --- GET /roadmap ---

pub async fn roadmap() -> Html<String> {
    Html(pages::roadmap())
}
