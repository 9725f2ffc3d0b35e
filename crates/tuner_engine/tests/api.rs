use std::time::Duration;

use serde_json::json;
use tuner_engine::{
    HttpServiceClient, JobStatus, ServiceApi, ServiceErrorKind, ServiceSettings,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpServiceClient {
    HttpServiceClient::new(ServiceSettings {
        base_url: server.uri(),
        ..ServiceSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn fetch_job_decodes_server_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "dataset_id": 3,
            "base_model": "gpt2",
            "status": "running",
            "adapter_path": null,
            "epochs": 2,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": null
        })))
        .mount(&server)
        .await;

    let job = client_for(&server).fetch_job(7).await.expect("job");
    assert_eq!(job.id, 7);
    assert_eq!(job.status, JobStatus::Running);
    assert_eq!(job.dataset_id, 3);
    assert_eq!(job.base_model, "gpt2");
    assert_eq!(job.epochs, 2);
    assert_eq!(job.adapter_path, None);
}

#[tokio::test]
async fn unknown_status_decodes_without_failing_the_row() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "dataset_id": 3,
            "base_model": "gpt2",
            "status": "paused",
            "epochs": 1
        })))
        .mount(&server)
        .await;

    let job = client_for(&server).fetch_job(7).await.expect("job");
    assert_eq!(job.status, JobStatus::Unknown);
}

#[tokio::test]
async fn missing_job_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/9"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_job(9).await.unwrap_err();
    assert_eq!(err.kind, ServiceErrorKind::NotFound);
}

#[tokio::test]
async fn server_error_maps_to_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/9"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_job(9).await.unwrap_err();
    assert_eq!(err.kind, ServiceErrorKind::HttpStatus(500));
}

#[tokio::test]
async fn slow_response_maps_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"id": 1, "dataset_id": 1, "status": "queued"})),
        )
        .mount(&server)
        .await;

    let client = HttpServiceClient::new(ServiceSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ServiceSettings::default()
    })
    .expect("client");

    let err = client.fetch_job(1).await.unwrap_err();
    assert_eq!(err.kind, ServiceErrorKind::Timeout);
}

#[tokio::test]
async fn garbage_body_maps_to_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_job(1).await.unwrap_err();
    assert_eq!(err.kind, ServiceErrorKind::Decode);
}

#[tokio::test]
async fn trained_listing_preserves_server_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models/trained"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"job_id": 7, "base_model": "llama-7b", "dataset_id": 1, "status": "completed"},
            {"job_id": 3, "base_model": "llama-3b", "dataset_id": 2, "status": "completed"}
        ])))
        .mount(&server)
        .await;

    let models = client_for(&server)
        .list_trained_models()
        .await
        .expect("listing");
    let ids: Vec<_> = models.iter().map(|m| m.job_id).collect();
    assert_eq!(ids, vec![7, 3]);
    assert_eq!(models[0].base_model, "llama-7b");
}

#[tokio::test]
async fn empty_trained_listing_is_ok() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models/trained"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let models = client_for(&server)
        .list_trained_models()
        .await
        .expect("listing");
    assert!(models.is_empty());
}

#[tokio::test]
async fn base_model_catalog_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                {"id": "gpt2", "name": "GPT-2 Base"},
                {"id": "distilgpt2", "name": "DistilGPT-2"}
            ]
        })))
        .mount(&server)
        .await;

    let models = client_for(&server).list_base_models().await.expect("models");
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].id, "gpt2");
    assert_eq!(models[1].name, "DistilGPT-2");
}

#[tokio::test]
async fn start_training_posts_multipart_fields_and_parses_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start_training/"))
        .and(body_string_contains("name=\"dataset_id\""))
        .and(body_string_contains("name=\"base_model\""))
        .and(body_string_contains("name=\"epochs\""))
        .and(body_string_contains("ds1"))
        .and(body_string_contains("gpt2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "dataset_id": 1,
            "base_model": "gpt2",
            "status": "queued",
            "adapter_path": null,
            "epochs": 2,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": null
        })))
        .mount(&server)
        .await;

    let id = client_for(&server)
        .start_training("ds1", "gpt2", 2)
        .await
        .expect("job id");
    assert_eq!(id, 42);
}

#[tokio::test]
async fn rejected_training_surfaces_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start_training/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .start_training("ds-missing", "gpt2", 1)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ServiceErrorKind::NotFound);
}

#[tokio::test]
async fn inference_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/infer"))
        .and(body_string_contains("name=\"adapter_job_id\""))
        .and(body_string_contains("name=\"prompt\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "hello from the adapter"
        })))
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .run_inference("llama-3b", 3, "hi")
        .await
        .expect("reply");
    assert_eq!(reply, "hello from the adapter");
}

#[tokio::test]
async fn upload_parses_dataset_id_from_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/datasets/upload"))
        .and(body_string_contains("name=\"name\""))
        .and(body_string_contains("name=\"file\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "name": "pairs",
            "filename": "abc_pairs.jsonl",
            "path": "/data/uploads/abc_pairs.jsonl",
            "uploaded_at": "2024-05-01T10:00:00Z"
        })))
        .mount(&server)
        .await;

    let dataset_id = client_for(&server)
        .upload_dataset("pairs", "pairs.jsonl", b"{}\n".to_vec())
        .await
        .expect("dataset id");
    assert_eq!(dataset_id, "5");
}

#[tokio::test]
async fn adapter_download_streams_binary_body() {
    let server = MockServer::start().await;
    let artifact = vec![0x50u8, 0x4b, 0x03, 0x04, 0x00, 0x01, 0x02];
    Mock::given(method("GET"))
        .and(path("/download/adapter/7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(artifact.clone(), "application/zip"),
        )
        .mount(&server)
        .await;

    let bytes = client_for(&server).download_adapter(7).await.expect("bytes");
    assert_eq!(bytes, artifact);
}

#[tokio::test]
async fn unready_adapter_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/adapter/8"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).download_adapter(8).await.unwrap_err();
    assert_eq!(err.kind, ServiceErrorKind::NotFound);
}
