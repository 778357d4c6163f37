//! End-to-end tests: a second in-process axum app stands in for the remote
//! host serving the OpenAPI document.

use axum::{Json, Router, routing::get};
use mockbird_server::{AppState, router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct TestServer {
    base_url: String,
    _shutdown: oneshot::Sender<()>,
}

async fn serve(app: Router) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local_addr");

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = shutdown_rx.await;
    });
    tokio::spawn(async move {
        let _ = server.await;
    });

    TestServer {
        base_url: format!("http://{addr}"),
        _shutdown: shutdown_tx,
    }
}

fn petstore_doc() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {"title": "Petstore", "description": "A pet shop", "version": "1.0.0"},
        "servers": [{"url": "https://pets.example.com/v1"}],
        "components": {
            "schemas": {
                "Pet": {
                    "type": "object",
                    "required": ["id", "name"],
                    "properties": {
                        "id": {"type": "integer"},
                        "name": {"type": "string", "example": "rex"},
                        "available": {"type": "boolean"}
                    }
                }
            },
            "securitySchemes": {
                "apiKey": {"type": "apiKey", "in": "header", "name": "x-api-key"}
            }
        },
        "paths": {
            "/pets/{petId}": {
                "get": {
                    "operationId": "getPet",
                    "tags": ["pets"],
                    "parameters": [{
                        "name": "petId",
                        "in": "path",
                        "required": true,
                        "schema": {"type": "integer"}
                    }],
                    "responses": {
                        "200": {
                            "description": "ok",
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/Pet"}
                                }
                            }
                        }
                    }
                }
            },
            "/admin/reset": {
                "post": {
                    "operationId": "resetStore",
                    "tags": ["admin"],
                    "responses": {"204": {"description": "done"}}
                }
            }
        }
    })
}

async fn spec_host() -> TestServer {
    let app = Router::new().route("/openapi.json", get(|| async { Json(petstore_doc()) }));
    serve(app).await
}

#[tokio::test]
async fn endpoints_requires_a_loaded_document() {
    let app = serve(router(AppState::new())).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/endpoints", app.base_url))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.expect("json body");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn load_swagger_requires_url() {
    let app = serve(router(AppState::new())).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/load-swagger", app.base_url))
        .json(&json!({}))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body["message"], json!("url is required"));
}

#[tokio::test]
async fn load_swagger_surfaces_fetch_errors() {
    let app = serve(router(AppState::new())).await;
    let client = reqwest::Client::new();

    // Discard port; nothing listens there.
    let resp = client
        .post(format!("{}/load-swagger", app.base_url))
        .json(&json!({"url": "http://127.0.0.1:9/openapi.json"}))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body["message"], json!("Failed to load Swagger document"));
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn load_then_mock_and_catalog_roundtrip() {
    let spec = spec_host().await;
    let app = serve(router(AppState::new())).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/load-swagger", app.base_url))
        .json(&json!({"url": format!("{}/openapi.json", spec.base_url)}))
        .send()
        .await
        .expect("load request");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("load body");

    assert_eq!(body["info"]["title"], json!("Petstore"));
    assert_eq!(body["pagination"]["total"], json!(2));
    assert_eq!(body["pagination"]["page"], json!(1));
    assert!(
        body["mockBaseUrl"]
            .as_str()
            .expect("mockBaseUrl")
            .starts_with("http://127.0.0.1")
    );
    assert!(body["securitySchemes"]["apiKey"].is_object());
    assert_eq!(body["servers"][0]["url"], json!("https://pets.example.com/v1"));
    assert_eq!(body["endpoints"].as_array().map(Vec::len), Some(2));

    // The declared 200 JSON schema drives the mock response.
    let resp = client
        .get(format!("{}/pets/42", app.base_url))
        .send()
        .await
        .expect("mock request");
    assert_eq!(resp.status(), 200);
    let pet: Value = resp.json().await.expect("mock body");
    assert_eq!(
        pet,
        json!({"id": 123, "name": "rex", "available": true})
    );

    // No 200 JSON schema: generic mocked envelope.
    let resp = client
        .post(format!("{}/admin/reset", app.base_url))
        .send()
        .await
        .expect("mock request");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("mock body");
    assert_eq!(body["message"], json!("Mocked POST /admin/reset"));

    // Unknown mock paths stay 404.
    let resp = client
        .get(format!("{}/owners/42", app.base_url))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 404);

    // Catalog filters.
    let resp = client
        .get(format!("{}/endpoints?tag=admin", app.base_url))
        .send()
        .await
        .expect("filter request");
    let body: Value = resp.json().await.expect("filter body");
    let endpoints = body["endpoints"].as_array().expect("endpoints");
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0]["operationId"], json!("resetStore"));

    let resp = client
        .get(format!("{}/endpoints?method=get", app.base_url))
        .send()
        .await
        .expect("filter request");
    let body: Value = resp.json().await.expect("filter body");
    assert_eq!(body["endpoints"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["endpoints"][0]["method"], json!("GET"));
}

#[tokio::test]
async fn failed_load_leaves_prior_state_untouched() {
    let spec = spec_host().await;
    let app = serve(router(AppState::new())).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/load-swagger", app.base_url))
        .json(&json!({"url": format!("{}/openapi.json", spec.base_url)}))
        .send()
        .await
        .expect("load request");
    assert_eq!(resp.status(), 200);

    let resp = client
        .post(format!("{}/load-swagger", app.base_url))
        .json(&json!({"url": "http://127.0.0.1:9/openapi.json"}))
        .send()
        .await
        .expect("failing load");
    assert_eq!(resp.status(), 500);

    // The previous document still serves.
    let resp = client
        .get(format!("{}/endpoints", app.base_url))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body["pagination"]["total"], json!(2));

    let resp = client
        .get(format!("{}/pets/7", app.base_url))
        .send()
        .await
        .expect("mock request");
    assert_eq!(resp.status(), 200);
}
