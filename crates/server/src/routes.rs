use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use common::GREETING;
use store::Store;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod records;

use records::{create_record, delete_record, get_record, list_records, update_record, Resource};

/// Shared handler state: the store every route family reads and writes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
}

impl AppState {
    pub fn new(store: Arc<Store>) -> Self { Self { store } }
}

pub async fn greeting() -> &'static str {
    GREETING
}

/// Routes for one resource, mounted under `/{resource}`.
fn resource_routes(resource: &str) -> Router<AppState> {
    Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/:id", get(get_record).post(update_record).delete(delete_record))
        .layer(Extension(Resource(Arc::from(resource))))
}

/// Build the application router: the root greeting plus five routes per declared resource
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let mut app = Router::new().route("/", get(greeting));
    for resource in state.store.resources() {
        app = app.nest(&format!("/{resource}"), resource_routes(resource));
    }

    app.with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app(resources: &[&str]) -> (Router, std::path::PathBuf) {
        let root = std::env::temp_dir().join(format!("devapi_routes_{}", uuid::Uuid::new_v4()));
        let store = Store::open(root.join("app.json"), resources.iter().copied())
            .await
            .expect("store init");
        (build_router(AppState::new(store), CorsLayer::permissive()), root)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn json_of(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn root_serves_greeting() {
        let (app, root) = app(&["users"]).await;
        let (status, body) = call(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Dev API");
        let _ = tokio::fs::remove_dir_all(root).await;
    }

    #[tokio::test]
    async fn each_resource_gets_its_own_collection() {
        let (app, root) = app(&["users", "dishes"]).await;

        let (status, _) = call(&app, Method::POST, "/users", Some(json!({ "name": "Ann" }))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, users) = call(&app, Method::GET, "/users", None).await;
        let (_, dishes) = call(&app, Method::GET, "/dishes", None).await;
        assert_eq!(json_of(&users)["data"].as_array().unwrap().len(), 1);
        assert_eq!(json_of(&dishes), json!({ "data": [] }));
        let _ = tokio::fs::remove_dir_all(root).await;
    }

    #[tokio::test]
    async fn undeclared_resource_is_not_found() {
        let (app, root) = app(&["users"]).await;
        let (status, _) = call(&app, Method::GET, "/posts", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, Method::POST, "/posts", Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let _ = tokio::fs::remove_dir_all(root).await;
    }

    #[tokio::test]
    async fn non_object_body_is_rejected() {
        let (app, root) = app(&["users"]).await;
        let (status, _) = call(&app, Method::POST, "/users", Some(json!([1, 2]))).await;
        assert!(status.is_client_error());
        let (_, list) = call(&app, Method::GET, "/users", None).await;
        assert_eq!(json_of(&list), json!({ "data": [] }));
        let _ = tokio::fs::remove_dir_all(root).await;
    }

    #[tokio::test]
    async fn duplicate_id_is_conflict() {
        let (app, root) = app(&["users"]).await;
        call(&app, Method::POST, "/users", Some(json!({ "id": "a" }))).await;
        let (status, body) = call(&app, Method::POST, "/users", Some(json!({ "id": "a" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(json_of(&body)["error"].is_string());
        let _ = tokio::fs::remove_dir_all(root).await;
    }
}
