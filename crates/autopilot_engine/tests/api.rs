use std::time::Duration;

use autopilot_core::{CreationMode, JobConfig, JobStatus, Mode, PresetSettings, SceneCount};
use autopilot_engine::{ApiSettings, FailureKind, ReqwestApi, WorkflowApi};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestApi {
    ReqwestApi::new(&ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    })
    .expect("valid base url")
}

#[tokio::test]
async fn start_job_posts_flat_body_and_returns_project_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/autopilot/start"))
        .and(body_partial_json(json!({
            "keyword": "Deep sea creatures",
            "mode": "longform",
            "video_scene_count": 10,
            "all_video": false,
            "duration_seconds": 600,
            "upload_privacy": "private",
            "creation_mode": "default",
            "upload_schedule_at": null,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "project_id": 42,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = JobConfig {
        topic: "  Deep sea creatures ".to_string(),
        ..JobConfig::default()
    };
    let project_id = api_for(&server).start_job(&config).await.expect("started");
    assert_eq!(project_id, 42);
}

#[tokio::test]
async fn commerce_job_sends_prefixed_keyword_and_all_scenes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/autopilot/start"))
        .and(body_partial_json(json!({
            "keyword": "[Commerce] https://shop.example/item/7",
            "mode": "shorts",
            "creation_mode": "commerce",
            "product_url": "https://shop.example/item/7",
            "video_scene_count": 0,
            "all_video": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "project_id": 7,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = JobConfig {
        mode: Mode::Shorts,
        creation_mode: CreationMode::Commerce,
        product_url: "https://shop.example/item/7".to_string(),
        scene_count: SceneCount::All,
        duration_seconds: 60,
        ..JobConfig::default()
    };
    assert_eq!(api_for(&server).start_job(&config).await, Ok(7));
}

#[tokio::test]
async fn start_job_rejection_carries_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/autopilot/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "error": "quota exceeded",
        })))
        .mount(&server)
        .await;

    let config = JobConfig {
        topic: "topic".to_string(),
        ..JobConfig::default()
    };
    let err = api_for(&server).start_job(&config).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Rejected);
    assert_eq!(err.user_message(), "quota exceeded");
}

#[tokio::test]
async fn start_job_without_error_text_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/autopilot/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "error" })))
        .mount(&server)
        .await;

    let config = JobConfig {
        topic: "topic".to_string(),
        ..JobConfig::default()
    };
    let err = api_for(&server).start_job(&config).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Rejected);
    assert_eq!(err.message, "Failed to start");
}

#[tokio::test]
async fn http_error_prefers_body_error_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/autopilot/start"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "worker crashed" })),
        )
        .mount(&server)
        .await;

    let config = JobConfig {
        topic: "topic".to_string(),
        ..JobConfig::default()
    };
    let err = api_for(&server).start_job(&config).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert_eq!(err.message, "worker crashed");
}

#[tokio::test]
async fn non_json_body_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/autopilot/start"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let config = JobConfig {
        topic: "topic".to_string(),
        ..JobConfig::default()
    };
    let err = api_for(&server).start_job(&config).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn project_status_reads_nested_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/42/full"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "project": { "id": 42, "status": "scripting", "topic": "x" },
            "scenes": [],
        })))
        .mount(&server)
        .await;

    let status = api_for(&server).project_status(42).await.expect("status");
    assert_eq!(status, JobStatus::Scripting);
    assert_eq!(status.progress(), 55);
}

#[tokio::test]
async fn project_status_missing_maps_to_processing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/9/full"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "project": {} })))
        .mount(&server)
        .await;

    let status = api_for(&server).project_status(9).await.expect("status");
    assert_eq!(status, JobStatus::processing());
    assert_eq!(status.progress(), 10);
}

#[tokio::test]
async fn queue_lists_projects_and_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/autopilot/queue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [
                { "id": 3, "topic": "first", "status": "queued", "created_at": "2026-10-19T08:00:00" },
                { "id": 4, "topic": null, "status": "queued" },
            ],
            "count": 2,
        })))
        .mount(&server)
        .await;

    let snapshot = api_for(&server).queue().await.expect("queue");
    assert_eq!(snapshot.count, 2);
    assert_eq!(snapshot.entries.len(), 2);
    assert_eq!(snapshot.entries[0].topic.as_deref(), Some("first"));
    assert!(snapshot.entries.iter().all(|entry| entry.is_queued()));
}

#[tokio::test]
async fn batch_start_requires_started_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/autopilot/batch-start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "started",
            "message": "Batch processing started",
        })))
        .mount(&server)
        .await;

    assert_eq!(api_for(&server).start_batch().await, Ok(()));
}

#[tokio::test]
async fn batch_start_reports_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/autopilot/batch-start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "message": "already running",
        })))
        .mount(&server)
        .await;

    let err = api_for(&server).start_batch().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Rejected);
    assert_eq!(err.message, "already running");
}

#[tokio::test]
async fn dequeue_patches_status_back_to_planning() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/projects/5"))
        .and(body_json(json!({ "status": "planning" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 5 })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(api_for(&server).dequeue(5).await, Ok(()));
}

#[tokio::test]
async fn presets_round_trip_through_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/autopilot/presets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "presets": [
                { "id": 1, "name": "Weekly", "settings": { "mode": "shorts", "visual_style": "anime" } },
                { "id": 2, "name": "Partly broken", "settings": { "mode": 17, "voice_id": "v2" } },
                { "id": 3, "name": "Empty" },
            ],
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/autopilot/presets"))
        .and(body_partial_json(json!({
            "name": "Mine",
            "settings": { "mode": "longform", "image_style": "watercolor" },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/autopilot/presets/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let presets = api.list_presets().await.expect("presets");
    assert_eq!(presets.len(), 3);
    assert_eq!(presets[0].settings.mode, Some(Mode::Shorts));
    assert_eq!(presets[0].settings.visual_style.as_deref(), Some("anime"));
    assert_eq!(
        presets[1].settings,
        PresetSettings {
            voice_id: Some("v2".to_string()),
            ..PresetSettings::default()
        }
    );
    assert_eq!(presets[2].settings, PresetSettings::default());

    let settings = PresetSettings {
        mode: Some(Mode::Longform),
        image_style: Some("watercolor".to_string()),
        ..PresetSettings::default()
    };
    assert_eq!(api.save_preset("Mine", &settings).await, Ok(()));
    assert_eq!(api.delete_preset(1).await, Ok(()));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/autopilot/queue"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "projects": [], "count": 0 }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let api = ReqwestApi::new(&ApiSettings {
        base_url: server.uri(),
        connect_timeout: Duration::from_secs(1),
        request_timeout: Duration::from_millis(50),
    })
    .expect("valid base url");
    let err = api.queue().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[test]
fn rejects_non_http_base_url() {
    let err = ReqwestApi::new(&ApiSettings {
        base_url: "ftp://example.com".to_string(),
        ..ApiSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidBaseUrl);

    let err = ReqwestApi::new(&ApiSettings {
        base_url: "not a url".to_string(),
        ..ApiSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidBaseUrl);
}

#[test]
fn trailing_slash_is_trimmed() {
    let api = ReqwestApi::new(&ApiSettings {
        base_url: "http://localhost:8000/".to_string(),
        ..ApiSettings::default()
    })
    .expect("valid base url");
    assert_eq!(api.base_url(), "http://localhost:8000");
}
