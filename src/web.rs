use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use log::warn;
use serde::Deserialize;
use serde_json::json;

use crate::{ErrorKind, extract_video_id};
use crate::page::{PageState, PageView, render};
use crate::pipeline::Summarizer;

#[derive(Clone)]
pub struct AppState {
    pub summarizer: Summarizer,
}

#[derive(Debug, Default, Deserialize)]
pub struct UrlForm {
    #[serde(default)]
    pub url: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/summarize", post(summarize))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Page with the URL field; a `?url=` value gets a thumbnail preview
async fn index(Query(form): Query<UrlForm>) -> Html<String> {
    Html(render(&PageView {
        thumbnail_url: preview_for(&form.url),
        url: form.url,
        state: PageState::Idle,
    }))
}

async fn summarize(State(state): State<AppState>, Form(form): Form<UrlForm>) -> Response {
    if form.url.trim().is_empty() {
        return Html(render(&PageView::idle())).into_response();
    }

    match state.summarizer.run(&form.url).await {
        Ok(outcome) => {
            let view_state = match outcome.summary {
                Some(summary) => PageState::Displaying {
                    title: outcome.title,
                    summary,
                },
                None => PageState::Notice(
                    "This video has an empty transcript, so there is nothing to summarize.".to_string(),
                ),
            };
            let view = PageView {
                thumbnail_url: Some(outcome.video_id.thumbnail_url()),
                url: form.url,
                state: view_state,
            };
            Html(render(&view)).into_response()
        }
        Err(e) => {
            warn!("Summarize failed for {:?}: {e}", form.url);
            let status = match e.kind() {
                ErrorKind::MalformedInput => StatusCode::BAD_REQUEST,
                ErrorKind::TranscriptUnavailable | ErrorKind::ModelCallFailed => {
                    StatusCode::BAD_GATEWAY
                }
            };
            let view = PageView {
                thumbnail_url: preview_for(&form.url),
                url: form.url,
                state: PageState::Failed {
                    kind: e.kind(),
                    message: e.user_message().to_string(),
                },
            };
            (status, Html(render(&view))).into_response()
        }
    }
}

fn preview_for(url: &str) -> Option<String> {
    if url.trim().is_empty() {
        return None;
    }
    extract_video_id(url).ok().map(|id| id.thumbnail_url())
}
