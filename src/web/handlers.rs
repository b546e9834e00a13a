use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::directory::{all_languages, check_missing, language_name, primary_code};
use crate::models::normalize_url;
use crate::error::AppError;

use super::{render, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ToplistQuery {
    lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MissingQuery {
    q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscribeQuery {
    url: Option<String>,
}

fn internal_error(context: &str, err: AppError) -> Response {
    tracing::warn!("{} failed: {}", context, err);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// GET /toplist: podcasts ranked by subscribers, with the language list
pub async fn toplist(State(state): State<AppState>, Query(query): Query<ToplistQuery>) -> Response {
    let languages = match state.repository.podcast_languages().await {
        Ok(codes) => all_languages(codes),
        Err(err) => return internal_error("toplist languages", err),
    };

    // Unknown languages fall back to the unfiltered list
    let selected = query
        .lang
        .as_deref()
        .and_then(primary_code)
        .filter(|code| language_name(code).is_some());

    let podcasts = match state
        .repository
        .toplist(selected.as_deref(), state.config.toplist_size)
        .await
    {
        Ok(podcasts) => podcasts,
        Err(err) => return internal_error("toplist", err),
    };

    Html(render::toplist_page(&languages, selected.as_deref(), &podcasts)).into_response()
}

/// GET /missing?q=URL: check whether a podcast can be submitted
pub async fn missing(State(state): State<AppState>, Query(query): Query<MissingQuery>) -> Response {
    match check_missing(&state.repository, state.updater.as_ref(), query.q.as_deref()).await {
        Ok(result) => Html(render::missing_page(&result)).into_response(),
        Err(err) => internal_error("missing podcast lookup", err),
    }
}

/// GET /podcast/:id
pub async fn podcast(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let podcast = match state.repository.get_podcast(&id).await {
        Ok(Some(podcast)) => podcast,
        Ok(None) => return (StatusCode::NOT_FOUND, "Not Found").into_response(),
        Err(err) => return internal_error("podcast lookup", err),
    };

    match state.repository.get_episodes(&podcast.id).await {
        Ok(episodes) => Html(render::podcast_page(&podcast, &episodes)).into_response(),
        Err(err) => internal_error("episode listing", err),
    }
}

/// GET /subscribe?url=URL: target of the "Add Podcast" link. Sends the user
/// to the podcast once it is stored, or back to the missing-podcast check.
pub async fn subscribe(
    State(state): State<AppState>,
    Query(query): Query<SubscribeQuery>,
) -> Response {
    let Some(url) = normalize_url(query.url.as_deref()) else {
        return Redirect::to("/missing").into_response();
    };

    match state.repository.find_podcast_by_url(&url).await {
        Ok(Some(podcast)) => {
            Redirect::to(&format!("/podcast/{}", urlencoding::encode(&podcast.id))).into_response()
        }
        Ok(None) => {
            Redirect::to(&format!("/missing?q={}", urlencoding::encode(&url))).into_response()
        }
        Err(err) => internal_error("subscribe lookup", err),
    }
}
