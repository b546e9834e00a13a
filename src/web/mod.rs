mod handlers;
mod render;
mod state;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub use state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/toplist", get(handlers::toplist))
        .route("/missing", get(handlers::missing))
        .route("/podcast/:id", get(handlers::podcast))
        .route("/subscribe", get(handlers::subscribe))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::db::Repository;
    use crate::feed::testing::RecordingUpdater;
    use crate::models::{NewPodcast, NewSubscription};

    struct Harness {
        _dir: tempfile::TempDir,
        repository: Arc<Repository>,
        updater: Arc<RecordingUpdater>,
        router: Router,
    }

    async fn harness(updater: RecordingUpdater) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("directory.db");
        let repository = Arc::new(Repository::new(path.to_str().unwrap()).await.unwrap());
        let updater = Arc::new(updater);
        let config = Config {
            db_path: path.to_string_lossy().to_string(),
            ..Config::default()
        };
        let state = AppState::new(Arc::clone(&repository), updater.clone(), config);
        Harness {
            _dir: dir,
            repository,
            updater,
            router: create_router(state),
        }
    }

    async fn get_page(router: &Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let h = harness(RecordingUpdater::default()).await;
        let (status, body) = get_page(&h.router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#""status":"ok""#));
    }

    #[tokio::test]
    async fn toplist_shows_recognised_languages() {
        let h = harness(RecordingUpdater::default()).await;
        for lang in ["de", "de_AT", "en", "xx"] {
            h.repository
                .insert_podcast(NewPodcast {
                    title: Some(format!("Podcast {lang}")),
                    language: Some(lang.to_string()),
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        let (status, body) = get_page(&h.router, "/toplist").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(">Deutsch</a>"));
        assert!(body.contains(">English</a>"));
        assert!(!body.contains("lang=xx"));
        assert!(body.contains("Podcast xx"));
    }

    #[tokio::test]
    async fn toplist_filters_by_language() {
        let h = harness(RecordingUpdater::default()).await;
        let german = h
            .repository
            .insert_podcast(NewPodcast {
                title: Some("Deutscher Podcast".to_string()),
                language: Some("de_AT".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        h.repository
            .insert_podcast(NewPodcast {
                title: Some("English Podcast".to_string()),
                language: Some("en".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        h.repository
            .insert_subscription(NewSubscription {
                user_id: 1,
                podcast_id: german.id.clone(),
                ref_url: "https://deutsch.example/feed".to_string(),
            })
            .await
            .unwrap();

        let (_, body) = get_page(&h.router, "/toplist?lang=de").await;
        assert!(body.contains("Deutscher Podcast"));
        assert!(body.contains("1 subscribers"));
        assert!(!body.contains("English Podcast"));

        let (_, body) = get_page(&h.router, "/toplist?lang=zz").await;
        assert!(body.contains("English Podcast"));
    }

    #[tokio::test]
    async fn missing_without_url_offers_nothing() {
        let h = harness(RecordingUpdater::default()).await;
        let (status, body) = get_page(&h.router, "/missing").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("Add Podcast"));
        assert!(h.updater.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_known_podcast_is_not_addable() {
        let h = harness(RecordingUpdater::default()).await;
        h.repository
            .insert_podcast(NewPodcast {
                url: Some("https://mypodcast.com/feed".to_string()),
                title: Some("My Podcast".to_string()),
                link: Some("https://mypodcast.com".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let (_, body) = get_page(&h.router, "/missing?q=https://mypodcast.com/feed").await;
        assert!(!body.contains("Add Podcast"));
        assert!(body.contains("My Podcast is already in the directory"));
        assert!(h.updater.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_unknown_podcast_is_addable() {
        let h = harness(RecordingUpdater::default()).await;
        let (_, body) = get_page(&h.router, "/missing?q=https://mypodcast.com/feed").await;
        assert!(body.contains("Add Podcast"));
        assert_eq!(h.updater.calls(), vec!["https://mypodcast.com/feed".to_string()]);
    }

    #[tokio::test]
    async fn podcast_page_shows_stored_podcast() {
        let h = harness(RecordingUpdater::default()).await;
        let podcast = h
            .repository
            .insert_podcast(NewPodcast {
                title: Some("Stored Show".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let (status, body) = get_page(&h.router, &format!("/podcast/{}", podcast.id)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Stored Show</h1>"));

        let (status, _) = get_page(&h.router, "/podcast/does-not-exist").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn subscribe_redirects_to_known_podcast() {
        let h = harness(RecordingUpdater::default()).await;
        let podcast = h
            .repository
            .insert_podcast(NewPodcast {
                url: Some("https://mypodcast.com/feed".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let response = h
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/subscribe?url=https%3A%2F%2Fmypodcast.com%2Ffeed")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()["location"],
            format!("/podcast/{}", podcast.id).as_str()
        );

        let response = h
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/subscribe?url=https%3A%2F%2Fother.example%2Ffeed")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()["location"],
            "/missing?q=https%3A%2F%2Fother.example%2Ffeed"
        );
    }

    #[tokio::test]
    async fn missing_feed_without_episodes_shows_error() {
        let h = harness(RecordingUpdater::failing_for(&["https://mypodcast.com/feed"])).await;
        let (status, body) = get_page(&h.router, "/missing?q=https://mypodcast.com/feed").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("Add Podcast"));
        assert!(body.contains(r#"class="alert alert-error""#));
        assert_eq!(h.updater.calls().len(), 1);
    }

    #[tokio::test]
    async fn missing_unreachable_feed_is_still_addable() {
        let h = harness(RecordingUpdater::unreachable_for(&["https://mypodcast.com/feed"])).await;
        let (status, body) = get_page(&h.router, "/missing?q=https://mypodcast.com/feed").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Add Podcast"));
        assert!(!body.contains(r#"class="alert alert-error""#));
        assert_eq!(h.updater.calls().len(), 1);
    }
}
