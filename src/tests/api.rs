use std::sync::Arc;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use bytes::Bytes;
use object_store::{memory::InMemory, path::Path, ObjectStore};
use tower::ServiceExt;
use crate::api::with_layers;
use crate::{router, AppState, ErrorResponse, HealthResponse, HousingModel};
use crate::tests::training_data;

const MODEL_PATH: &str = "capita_model.json";

async fn app_with_model(artifact: Option<Vec<u8>>) -> Router {
    let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
    if let Some(bytes) = artifact {
        store
            .put(&Path::from(MODEL_PATH), Bytes::from(bytes).into())
            .await
            .unwrap();
    }
    router(Arc::new(AppState::new(store, MODEL_PATH)))
}

fn fitted_artifact() -> Vec<u8> {
    let (rows, targets) = training_data();
    HousingModel::fit(&rows, &targets, "Median Value Housing Units 2017")
        .unwrap()
        .to_bytes()
        .unwrap()
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn error_message(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice::<ErrorResponse>(&bytes).unwrap().error
}

#[tokio::test]
async fn test_healthcheck_is_fixed() {
    let app = app_with_model(None).await;

    for uri in ["/healtcheck", "/healthcheck"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_text(response).await;
        assert_eq!(body, r#"{"name":"API","version":"1.0.0"}"#);
        let parsed: HealthResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.name, "API");
    }
}

#[tokio::test]
async fn test_hello_greets_without_content_type() {
    let app = app_with_model(None).await;

    let response = app.oneshot(post("/hello", r#"{"name":"Ada"}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Hello Ada");
}

#[tokio::test]
async fn test_hello_missing_name_is_bad_request() {
    let app = app_with_model(None).await;

    let response = app.clone().oneshot(post("/hello", r#"{"nom":"Ada"}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(error_message(response).await.contains("name"));

    let response = app.clone().oneshot(post("/hello", "{not json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The service keeps answering after rejected requests
    let response = app.oneshot(post("/hello", r#"{"name":"Grace"}"#)).await.unwrap();
    assert_eq!(body_text(response).await, "Hello Grace");
}

#[tokio::test]
async fn test_predict_formats_currency() {
    let app = app_with_model(Some(fitted_artifact())).await;

    for body in [
        r#"{"county": 121, "percapita": 30000}"#,
        r#"{"county": "121", "percapita": 30000.0}"#,
        r#"{"county": "121", "percapita": "30000"}"#,
    ] {
        let response = app
            .clone()
            .oneshot(post("/LinearRegressionPredict", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_text(response).await,
            r#"Price predicted based on per capita income: ["$96,210.00"]"#
        );
    }
}

#[tokio::test]
async fn test_predict_rejects_bad_payloads() {
    let app = app_with_model(Some(fitted_artifact())).await;

    for body in [
        r#"{"county": 121}"#,
        r#"{"percapita": 30000}"#,
        r#"{"county": "Fulton", "percapita": 30000}"#,
        r#"{"county": 121, "percapita": "lots"}"#,
        "",
    ] {
        let response = app
            .clone()
            .oneshot(post("/LinearRegressionPredict", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
    }
}

#[tokio::test]
async fn test_predict_without_model_is_server_error() {
    let app = app_with_model(None).await;

    let response = app
        .oneshot(post("/LinearRegressionPredict", r#"{"county": 121, "percapita": 30000}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(response).await, "Model unavailable");
}

#[tokio::test]
async fn test_predict_with_incompatible_model_is_server_error() {
    let mut artifact: serde_json::Value = serde_json::from_slice(&fitted_artifact()).unwrap();
    artifact["features"] = serde_json::json!(["Per Capita Income", "Population"]);
    let app = app_with_model(Some(serde_json::to_vec(&artifact).unwrap())).await;

    let response = app
        .oneshot(post("/LinearRegressionPredict", r#"{"county": 121, "percapita": 30000}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(response).await, "Model unavailable");
}

#[tokio::test]
async fn test_cross_origin_headers() {
    let app = app_with_model(None).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/hello")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::from(r#"{"name":"Ada"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/LinearRegressionPredict")
        .header(header::ORIGIN, "http://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(preflight).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
    assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));

    let bare = Request::builder()
        .method(Method::OPTIONS)
        .uri("/hello")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(bare).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

async fn exploding_handler() -> &'static str {
    panic!("handler exploded")
}

#[tokio::test]
async fn test_panicking_handler_answers_with_cors_json() {
    let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
    let routes = Router::new().route("/explode", get(exploding_handler));
    let app = with_layers(routes).with_state(Arc::new(AppState::new(store, MODEL_PATH)));

    let request = Request::builder()
        .uri("/explode")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
    assert_eq!(error_message(response).await, "Internal server error");
}
