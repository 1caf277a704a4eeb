use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::types::ApiError;
use super::users;
use crate::config::CorsSettings;

/// Create the full router with application state
pub fn create_router(state: AppState, cors: &CorsSettings) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .route(
            "/users",
            get(users::list_users)
                .post(users::create_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors_layer(cors))
}

/// Unknown paths answer with the same `{"message"}` body as every other error
async fn not_found() -> ApiError {
    ApiError::not_found("Page not found")
}

/// Listed origins get credentialed access; with no list any origin may
/// call, without credentials.
fn cors_layer(settings: &CorsSettings) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::infrastructure::note::InMemoryNoteRepository;
    use crate::infrastructure::user::{Argon2Hasher, InMemoryUserRepository, UserService};

    fn create_test_router() -> Router {
        let service = UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryNoteRepository::new()),
            Arc::new(Argon2Hasher::new()),
        );
        create_router(AppState::new(Arc::new(service)), &CorsSettings::default())
    }

    fn json_request(method: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri("/users")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let router = create_test_router();

        for uri in ["/health", "/live", "/ready"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let (status, _) = send(&router, request).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_user_lifecycle_over_http() {
        let router = create_test_router();

        let (status, body) = send(
            &router,
            json_request("POST", json!({"username": "alice", "password": "pw123"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"message": "New user alice created"}));

        let list = Request::builder().uri("/users").body(Body::empty()).unwrap();
        let (status, body) = send(&router, list).await;
        assert_eq!(status, StatusCode::OK);
        let id = body[0]["id"].as_str().unwrap().to_string();
        assert_eq!(body[0]["username"], "alice");
        assert_eq!(body[0]["roles"], json!([]));
        assert!(body[0].get("password_hash").is_none());

        let (status, body) = send(
            &router,
            json_request(
                "PATCH",
                json!({"id": id, "username": "alice", "roles": ["Manager"], "active": true}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "alice updated"}));

        let (status, body) = send(&router, json_request("DELETE", json!({"id": id}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"message": format!("Username alice with ID {} deleted", id)})
        );
    }

    #[tokio::test]
    async fn test_empty_list_is_bad_request() {
        let router = create_test_router();

        let list = Request::builder().uri("/users").body(Body::empty()).unwrap();
        let (status, body) = send(&router, list).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "No users found"}));
    }

    #[tokio::test]
    async fn test_missing_fields_is_bad_request() {
        let router = create_test_router();

        let (status, body) = send(&router, json_request("POST", json!({"username": "alice"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "All fields are required"}));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let router = create_test_router();

        send(
            &router,
            json_request("POST", json!({"username": "alice", "password": "pw123"})),
        )
        .await;
        let (status, body) = send(
            &router,
            json_request("POST", json!({"username": "Alice", "password": "other"})),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({"message": "User already exists"}));
    }

    #[tokio::test]
    async fn test_malformed_json_uses_message_body() {
        let router = create_test_router();

        let request = Request::builder()
            .method("POST")
            .uri("/users")
            .header("content-type", "application/json")
            .body(Body::from("{\"username\": "))
            .unwrap();
        let (status, body) = send(&router, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let router = create_test_router();

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_json_not_found() {
        let router = create_test_router();

        let request = Request::builder().uri("/nope").body(Body::empty()).unwrap();
        let (status, body) = send(&router, request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "Page not found"}));
    }

    #[tokio::test]
    async fn test_unsupported_method_on_users_is_405() {
        let router = create_test_router();

        let request = Request::builder()
            .method("PUT")
            .uri("/users")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/users")
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap()
    }

    fn router_with_cors(settings: &CorsSettings) -> Router {
        let service = UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryNoteRepository::new()),
            Arc::new(Argon2Hasher::new()),
        );
        create_router(AppState::new(Arc::new(service)), settings)
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_configured_origin_with_credentials() {
        let settings = CorsSettings {
            allowed_origins: vec!["http://localhost:3000".to_string(), "bad\norigin".to_string()],
        };
        let router = router_with_cors(&settings);

        let response = router.oneshot(preflight("http://localhost:3000")).await.unwrap();
        let headers = response.headers();

        assert!(response.status().is_success());
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
        let methods = headers
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(methods.contains("PATCH"));
        assert!(methods.contains("DELETE"));
    }

    #[tokio::test]
    async fn test_cors_preflight_rejects_unlisted_origin() {
        let settings = CorsSettings {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        };
        let router = router_with_cors(&settings);

        let response = router.oneshot(preflight("http://evil.example")).await.unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_cors_without_origins_allows_any_without_credentials() {
        let router = create_test_router();

        let response = router.oneshot(preflight("http://anywhere.example")).await.unwrap();
        let headers = response.headers();

        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).is_none());
    }
}
