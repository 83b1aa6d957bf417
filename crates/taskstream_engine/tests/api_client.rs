use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use taskstream_engine::{
    ActionError, ApiClient, ApiError, CancelJobAction, ClientSettings, DriveRequest, DriveStatus,
    OutputItem, ReqwestApiClient, RowAction,
};
use wiremock::matchers::{body_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ReqwestApiClient {
    ReqwestApiClient::new(ClientSettings {
        base_url: format!("{}/tvbextunicore", server.uri()),
        ..ClientSettings::default()
    })
    .unwrap()
}

fn job_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "simulation",
        "owner": "alice",
        "site": "JUDAC",
        "status": "RUNNING",
        "resource_url": format!("https://hpc.example/rest/core/jobs/{id}"),
        "start_time": "10.02.2026, 09:15:00",
        "finish_time": "10.02.2026, 09:15:00",
        "is_cancelable": true,
        "logs": ["queued", "started"]
    })
}

#[tokio::test]
async fn sites_returns_names_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tvbextunicore/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sites": {"JUDAC": "https://judac/rest", "DAINT-CSCS": "https://daint/rest"},
            "message": "Sites are in maintenance tonight"
        })))
        .mount(&server)
        .await;

    let sites = client(&server).sites().await.unwrap();
    assert_eq!(sites.names(), vec!["DAINT-CSCS", "JUDAC"]);
    assert_eq!(sites.message, "Sites are in maintenance tonight");
}

#[tokio::test]
async fn sites_accepts_bare_name_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tvbextunicore/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["JUDAC"])))
        .mount(&server)
        .await;

    let sites = client(&server).sites().await.unwrap();
    assert_eq!(sites.names(), vec!["JUDAC"]);
    assert_eq!(sites.message, "");
}

#[tokio::test]
async fn jobs_query_carries_site_and_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tvbextunicore/jobs"))
        .and(query_param("site", "JUDAC"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "",
            "jobs": [job_json("a1"), job_json("b2")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let listing = client(&server).jobs("JUDAC", 2).await.unwrap();
    assert_eq!(listing.jobs.len(), 2);
    let first = &listing.jobs[0];
    assert_eq!(first.id, "a1");
    assert_eq!(first.resource_url, "https://hpc.example/rest/core/jobs/a1");
    assert!(first.is_cancelable);
    assert_eq!(
        first.logs.as_deref(),
        Some(&["queued".to_string(), "started".to_string()][..])
    );
}

#[tokio::test]
async fn bearer_token_is_sent_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tvbextunicore/jobs"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "", "jobs": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ReqwestApiClient::new(ClientSettings {
        base_url: format!("{}/tvbextunicore", server.uri()),
        token: Some("s3cret".to_string()),
        ..ClientSettings::default()
    })
    .unwrap();
    let listing = client.jobs("JUDAC", 1).await.unwrap();
    assert!(listing.jobs.is_empty());
}

#[tokio::test]
async fn error_status_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tvbextunicore/jobs"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "UNICORE unreachable"})),
        )
        .mount(&server)
        .await;

    let err = client(&server).jobs("JUDAC", 1).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Response {
            status: 500,
            message: "UNICORE unreachable".to_string(),
        }
    );
    assert_eq!(err.to_string(), "UNICORE unreachable");
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tvbextunicore/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = client(&server).jobs("JUDAC", 1).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn slow_server_times_out_when_limit_is_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tvbextunicore/sites"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"sites": {}, "message": ""}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = ReqwestApiClient::new(ClientSettings {
        base_url: format!("{}/tvbextunicore", server.uri()),
        request_timeout: Some(Duration::from_millis(100)),
        ..ClientSettings::default()
    })
    .unwrap();
    assert_eq!(client.sites().await.unwrap_err(), ApiError::Timeout);
}

#[tokio::test]
async fn cancel_posts_resource_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tvbextunicore/jobs"))
        .and(body_json(json!({"resource_url": "https://hpc.example/rest/core/jobs/a1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"job": job_json("a1"), "message": ""})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let action = CancelJobAction::new(Arc::new(client(&server)));
    let reply = action
        .invoke(&["https://hpc.example/rest/core/jobs/a1".to_string()])
        .await
        .unwrap();
    assert_eq!(reply.job.map(|job| job.id), Some("a1".to_string()));
    assert_eq!(reply.message, "");
}

#[tokio::test]
async fn refused_cancel_is_an_action_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tvbextunicore/jobs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Job could not be cancelled!"})),
        )
        .mount(&server)
        .await;

    let action = CancelJobAction::new(Arc::new(client(&server)));
    let err = action
        .invoke(&["https://hpc.example/rest/core/jobs/a1".to_string()])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ActionError::Rejected("Job could not be cancelled!".to_string())
    );
}

#[tokio::test]
async fn cancel_without_arguments_never_calls_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let action = CancelJobAction::new(Arc::new(client(&server)));
    assert_eq!(action.label(), "Cancel Job");
    assert_eq!(
        action.invoke(&[]).await.unwrap_err(),
        ActionError::MissingArgument(0)
    );
}

#[tokio::test]
async fn job_outputs_maps_is_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tvbextunicore/job_output"))
        .and(query_param("job_url", "https://hpc.example/rest/core/jobs/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stdout": {"is_file": true},
            "results": {"is_file": false}
        })))
        .mount(&server)
        .await;

    let outputs = client(&server)
        .job_outputs("https://hpc.example/rest/core/jobs/a1")
        .await
        .unwrap();
    assert_eq!(
        outputs,
        vec![
            OutputItem {
                name: "results".to_string(),
                is_file: false,
            },
            OutputItem {
                name: "stdout".to_string(),
                is_file: true,
            },
        ]
    );
}

#[tokio::test]
async fn drive_download_posts_full_request() {
    let server = MockServer::start().await;
    let request = DriveRequest {
        job_url: "https://hpc.example/rest/core/jobs/a1".to_string(),
        in_file: "stdout".to_string(),
        path: "notebooks".to_string(),
        out_file: "stdout_a1".to_string(),
    };
    Mock::given(method("POST"))
        .and(path_regex(r"^/tvbextunicore/drive/[^/]+/stdout$"))
        .and(body_json(json!({
            "job_url": "https://hpc.example/rest/core/jobs/a1",
            "in_file": "stdout",
            "path": "notebooks",
            "out_file": "stdout_a1"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "warning", "message": "File replaced"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reply = client(&server).download_to_drive(&request).await.unwrap();
    assert_eq!(reply.status, DriveStatus::Warning);
    assert_eq!(reply.message, "File replaced");
}

#[tokio::test]
async fn unknown_drive_status_counts_as_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/tvbextunicore/drive/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "pending", "message": "?"})),
        )
        .mount(&server)
        .await;

    let reply = client(&server)
        .download_to_drive(&DriveRequest {
            job_url: "u".to_string(),
            in_file: "f".to_string(),
            path: "p".to_string(),
            out_file: "o".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(reply.status, DriveStatus::Error);
}

#[tokio::test]
async fn stream_returns_file_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/tvbextunicore/stream/[^/]+/results\.h5$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8, 1, 2, 3, 255]))
        .mount(&server)
        .await;

    let data = client(&server)
        .stream_file("https://hpc.example/rest/core/jobs/a1", "results.h5")
        .await
        .unwrap();
    assert_eq!(&data[..], &[0u8, 1, 2, 3, 255]);
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let client = ReqwestApiClient::new(ClientSettings {
        base_url: "http://127.0.0.1:9/tvbextunicore".to_string(),
        ..ClientSettings::default()
    })
    .unwrap();
    assert!(matches!(
        client.sites().await.unwrap_err(),
        ApiError::Network(_)
    ));
}
