//! Heroku app setup client against a mock Platform API.

mod support;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bothan_deploy_core::error::{LookupError, ProvisioningError};
use bothan_deploy_core::license::LicenseTable;
use bothan_deploy_core::params::{CreationRequest, ParameterBuilder};
use bothan_deploy_core::provision::{HerokuClient, ProvisioningClient, StatusReport};

use support::form_params;

fn request() -> CreationRequest {
    let table = LicenseTable::builtin();
    ParameterBuilder::new(&table).build(&form_params()).unwrap()
}

async fn client(server: &MockServer) -> HerokuClient {
    HerokuClient::connect_oauth("some-token", server.uri()).unwrap()
}

#[tokio::test]
async fn create_posts_app_setup_body_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/app-setups"))
        .and(header("authorization", "Bearer some-token"))
        .and(header("accept", "application/vnd.heroku+json; version=3"))
        .and(body_json(json!({
            "app": { "name": "my-awesome-app" },
            "source_blob": { "url": "https://github.com/theodi/bothan/tarball/master" },
            "overrides": {
                "env": {
                    "METRICS_API_USERNAME": "username",
                    "METRICS_API_PASSWORD": "password",
                    "METRICS_API_TITLE": "This is a title",
                    "METRICS_API_DESCRIPTION": "Here is a description",
                    "METRICS_API_LICENSE_NAME": "Creative Commons Attribution 4.0",
                    "METRICS_API_LICENSE_URL": "https://creativecommons.org/licenses/by/4.0/",
                    "METRICS_API_PUBLISHER_NAME": "Me",
                    "METRICS_API_PUBLISHER_URL": "http://example.com",
                    "METRICS_API_CERTIFICATE_URL": "#"
                }
            }
        })))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(json!({ "id": "foo-bar", "status": "pending" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = client(&server).await.create(&request()).await.unwrap();
    assert_eq!(created.id, "foo-bar");
}

#[tokio::test]
async fn create_accepts_a_response_carrying_only_the_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/app-setups"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "foo-bar" })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client(&server).await.create(&request()).await.unwrap();
    assert_eq!(created.id, "foo-bar");
}

#[tokio::test]
async fn create_surfaces_api_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/app-setups"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "id": "unauthorized",
            "message": "Invalid credentials provided."
        })))
        .mount(&server)
        .await;

    let err = client(&server).await.create(&request()).await.unwrap_err();
    match err {
        ProvisioningError::Api {
            status,
            id,
            message,
        } => {
            assert_eq!(status, 401);
            assert_eq!(id.as_deref(), Some("unauthorized"));
            assert_eq!(message, "Invalid credentials provided.");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn create_without_id_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/app-setups"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "status": "pending" })))
        .mount(&server)
        .await;

    let err = client(&server).await.create(&request()).await.unwrap_err();
    assert!(matches!(err, ProvisioningError::MalformedResponse(_)));
}

#[tokio::test]
async fn info_classifies_app_setup_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app-setups/done"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "done",
            "status": "succeeded",
            "resolved_success_url": "http://example.org",
            "failure_message": null
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/app-setups/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "broken",
            "status": "failed",
            "failure_message": "This didn't work"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/app-setups/waiting"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "waiting", "status": "pending" })),
        )
        .mount(&server)
        .await;

    let client = client(&server).await;
    assert_eq!(
        client.info("done").await.unwrap(),
        StatusReport::Succeeded {
            url: "http://example.org".into()
        }
    );
    assert_eq!(
        client.info("broken").await.unwrap(),
        StatusReport::Failed {
            message: "This didn't work".into()
        }
    );
    assert_eq!(client.info("waiting").await.unwrap(), StatusReport::Pending);
}

#[tokio::test]
async fn info_encodes_the_setup_id_into_one_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app-setups/a%2Fb%20c"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "a/b c", "status": "pending" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let status = client(&server).await.info("a/b c").await.unwrap();
    assert_eq!(status, StatusReport::Pending);
}

#[tokio::test]
async fn info_server_error_is_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app-setups/foo-bar"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let err = client(&server).await.info("foo-bar").await.unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(err, LookupError::Api { status: 503, ref message, .. } if message == "Service Unavailable"));
}

#[tokio::test]
async fn info_not_found_is_not_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app-setups/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "id": "not_found",
            "message": "Couldn't find that app setup."
        })))
        .mount(&server)
        .await;

    let err = client(&server).await.info("missing").await.unwrap_err();
    assert!(!err.is_retryable());
}
