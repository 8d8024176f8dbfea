// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use cob_web_api::{
    ApiError, AuthError, AuthenticationService,
    handlers::{
        delete_exception, delete_my_order, delete_recurring_order, get_history, get_my_order,
        get_recurring_order, get_week_orders, post_exception, post_my_order, post_recurring_order,
    },
    request_response::{
        DeleteOrderQuery, ExceptionResponse, HistoryQuery, HistoryResponse, LoginRequest,
        MessageResponse, OrderResponse, RecurringOrderRequest, RecurringOrderResponse,
        SignupRequest, SingleOrderRequest, TokenResponse, UserResponse, WeekOrdersResponse,
        WeekQuery,
    },
};
use cob_web_domain::{Clock, SystemClock};
use cob_web_persistence::Persistence;
use cob_web_persistence::data_models::UserRecord;

/// Cob Web Server - HTTP server for the lunch-order tracker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind a Mutex; the clock is injectable so
/// tests can pin the current week.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for users, tokens, and orders.
    persistence: Arc<Mutex<Persistence>>,
    /// Source of "today" for week-defaulting.
    clock: Arc<dyn Clock>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Human-readable error message.
    message: String,
}

/// An HTTP-level error with a status code and message.
#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::OrderExcepted { .. } => StatusCode::GONE,
            ApiError::UnrepresentableWeek { .. } => StatusCode::FAILED_DEPENDENCY,
            ApiError::Internal { message } => {
                error!("Internal error: {}", message);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<AuthError> for HttpError {
    fn from(err: AuthError) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: err.to_string(),
        }
    }
}

/// Extracts and validates the bearer token, returning the owning user.
async fn authenticate(app_state: &AppState, headers: &HeaderMap) -> Result<UserRecord, HttpError> {
    let header_value: &str = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: String::from("Missing Authorization header"),
        })?;

    let token: &str = header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: String::from("Authorization header must carry a bearer token"),
        })?;

    let mut persistence = app_state.persistence.lock().await;
    AuthenticationService::validate_token(&mut persistence, token).map_err(HttpError::from)
}

/// POST /users/signup endpoint.
async fn handle_signup(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<UserResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let user: UserRecord = AuthenticationService::signup(&mut persistence, &request)?;

    Ok(Json(UserResponse {
        user_id: user.user_id,
        name: user.name,
        email: user.email,
    }))
}

/// POST /users/login endpoint.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let (token, _user) =
        AuthenticationService::login(&mut persistence, &request.login, &request.password)?;

    Ok(Json(TokenResponse {
        token: token.token_value,
        expires_at: token.expires_at,
    }))
}

/// POST /users/logout endpoint. Idempotent.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, HttpError> {
    let header_value: Option<&str> = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if let Some(token) = header_value {
        let mut persistence = app_state.persistence.lock().await;
        AuthenticationService::logout(&mut persistence, token)?;
    }

    Ok(Json(MessageResponse {
        message: String::from("Logged out"),
    }))
}

/// GET /orders endpoint: the public week aggregate.
async fn handle_get_week_orders(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekOrdersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: WeekOrdersResponse =
        get_week_orders(&mut persistence, app_state.clock.as_ref(), query)?;

    Ok(Json(response))
}

/// GET /orders/me endpoint.
async fn handle_get_my_order(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<WeekQuery>,
) -> Result<Json<OrderResponse>, HttpError> {
    let user: UserRecord = authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let response: OrderResponse = get_my_order(
        &mut persistence,
        app_state.clock.as_ref(),
        user.user_id,
        query,
    )?;

    Ok(Json(response))
}

/// POST /orders/me endpoint.
async fn handle_post_my_order(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<WeekQuery>,
    Json(request): Json<SingleOrderRequest>,
) -> Result<Json<OrderResponse>, HttpError> {
    let user: UserRecord = authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let response: OrderResponse = post_my_order(
        &mut persistence,
        app_state.clock.as_ref(),
        user.user_id,
        query,
        &request,
    )?;

    Ok(Json(response))
}

/// DELETE /orders/me endpoint.
async fn handle_delete_my_order(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<DeleteOrderQuery>,
) -> Result<Json<MessageResponse>, HttpError> {
    let user: UserRecord = authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = delete_my_order(
        &mut persistence,
        app_state.clock.as_ref(),
        user.user_id,
        query,
    )?;

    Ok(Json(response))
}

/// GET /orders/me/recurring endpoint.
async fn handle_get_recurring_order(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<RecurringOrderResponse>, HttpError> {
    let user: UserRecord = authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let response: RecurringOrderResponse = get_recurring_order(&mut persistence, user.user_id)?;

    Ok(Json(response))
}

/// POST /orders/me/recurring endpoint.
async fn handle_post_recurring_order(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<RecurringOrderRequest>,
) -> Result<Json<RecurringOrderResponse>, HttpError> {
    let user: UserRecord = authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let response: RecurringOrderResponse = post_recurring_order(
        &mut persistence,
        app_state.clock.as_ref(),
        user.user_id,
        &request,
    )?;

    Ok(Json(response))
}

/// DELETE /orders/me/recurring endpoint.
async fn handle_delete_recurring_order(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, HttpError> {
    let user: UserRecord = authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = delete_recurring_order(&mut persistence, user.user_id)?;

    Ok(Json(response))
}

/// POST /orders/me/exceptions endpoint.
async fn handle_post_exception(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<WeekQuery>,
) -> Result<Json<ExceptionResponse>, HttpError> {
    let user: UserRecord = authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let response: ExceptionResponse = post_exception(
        &mut persistence,
        app_state.clock.as_ref(),
        user.user_id,
        query,
    )?;

    Ok(Json(response))
}

/// DELETE /orders/me/exceptions/{exception_id} endpoint.
async fn handle_delete_exception(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Path(exception_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    let user: UserRecord = authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = delete_exception(&mut persistence, user.user_id, exception_id)?;

    Ok(Json(response))
}

/// GET /orders/me/history endpoint.
async fn handle_get_history(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, HttpError> {
    let user: UserRecord = authenticate(&app_state, &headers).await?;

    let mut persistence = app_state.persistence.lock().await;
    let response: HistoryResponse = get_history(
        &mut persistence,
        app_state.clock.as_ref(),
        user.user_id,
        query,
    )?;

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/users/signup", post(handle_signup))
        .route("/users/login", post(handle_login))
        .route("/users/logout", post(handle_logout))
        .route("/orders", get(handle_get_week_orders))
        .route(
            "/orders/me",
            get(handle_get_my_order)
                .post(handle_post_my_order)
                .delete(handle_delete_my_order),
        )
        .route(
            "/orders/me/recurring",
            get(handle_get_recurring_order)
                .post(handle_post_recurring_order)
                .delete(handle_delete_recurring_order),
        )
        .route("/orders/me/exceptions", post(handle_post_exception))
        .route(
            "/orders/me/exceptions/{exception_id}",
            delete(handle_delete_exception),
        )
        .route("/orders/me/history", get(handle_get_history))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Cob Web Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        clock: Arc::new(SystemClock),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            clock: Arc::new(SystemClock),
        }
    }

    /// Helper to create a valid signup request body.
    fn create_signup_request(name: &str, email: &str) -> SignupRequest {
        SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: String::from("correct-horse"),
            confirm_password: String::from("correct-horse"),
        }
    }

    /// Signs up and logs in a user over HTTP, returning the bearer token.
    async fn signup_and_login(app: &Router, name: &str, email: &str) -> String {
        let signup_req: SignupRequest = create_signup_request(name, email);
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users/signup")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&signup_req).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let login_body: String = serde_json::json!({
            "login": name,
            "password": "correct-horse",
        })
        .to_string();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users/login")
                    .header("content-type", "application/json")
                    .body(Body::from(login_body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        parsed["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_signup_returns_user_without_credential() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        let signup_req: SignupRequest = create_signup_request("alice", "alice@example.com");
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users/signup")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&signup_req).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(parsed["name"], "alice");
        assert_eq!(parsed["email"], "alice@example.com");
        assert!(parsed.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_signup_is_conflict() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        let signup_req: SignupRequest = create_signup_request("alice", "alice@example.com");
        let body: String = serde_json::to_string(&signup_req).unwrap();

        let first = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users/signup")
                    .header("content-type", "application/json")
                    .body(Body::from(body.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(first.status(), HttpStatusCode::OK);

        let second = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users/signup")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(second.status(), HttpStatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_unauthorized() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);
        signup_and_login(&app, "alice", "alice@example.com").await;

        let login_body: String = serde_json::json!({
            "login": "alice",
            "password": "wrong-password",
        })
        .to_string();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users/login")
                    .header("content-type", "application/json")
                    .body(Body::from(login_body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_orders_me_requires_bearer_token() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/orders/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logged_out_token_is_rejected() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);
        let token: String = signup_and_login(&app, "alice", "alice@example.com").await;

        let logout = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users/logout")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(logout.status(), HttpStatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/orders/me")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_post_and_get_my_order_roundtrip() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);
        let token: String = signup_and_login(&app, "alice", "alice@example.com").await;

        let order_body: String = serde_json::json!({
            "filling": "bacon",
            "bread": "white",
            "sauce": "red",
        })
        .to_string();
        let posted = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/orders/me")
                    .header("content-type", "application/json")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::from(order_body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(posted.status(), HttpStatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/orders/me")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(parsed["filling"], "bacon");
        assert_eq!(parsed["bread"], "white");
        assert_eq!(parsed["sauce"], "red");
        assert_eq!(parsed["recurring"], false);
    }

    #[tokio::test]
    async fn test_get_without_order_is_not_found() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);
        let token: String = signup_and_login(&app, "alice", "alice@example.com").await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/orders/me")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_excepted_week_maps_to_gone() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);
        let token: String = signup_and_login(&app, "alice", "alice@example.com").await;

        let recurring_body: String = serde_json::json!({
            "filling": "egg",
            "bread": "white",
            "sauce": "brown",
        })
        .to_string();
        let posted = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/orders/me/recurring")
                    .header("content-type", "application/json")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::from(recurring_body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(posted.status(), HttpStatusCode::OK);

        // Deleting the recurring occurrence records an exception.
        let deleted = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/orders/me")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(deleted.status(), HttpStatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/orders/me")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::GONE);
    }

    #[tokio::test]
    async fn test_unrepresentable_week_maps_to_failed_dependency() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        // 2023 has no week 53.
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/orders?week=53&year=2023")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::FAILED_DEPENDENCY);
    }

    #[tokio::test]
    async fn test_partial_week_selector_is_bad_request() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/orders?week=10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_week_aggregate_is_public_and_lists_orders() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);
        let token: String = signup_and_login(&app, "alice", "alice@example.com").await;

        let order_body: String = serde_json::json!({
            "filling": "sausage",
            "bread": "brown",
            "sauce": "brown",
        })
        .to_string();
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/orders/me")
                    .header("content-type", "application/json")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::from(order_body))
                    .unwrap(),
            )
            .await
            .unwrap();

        // No Authorization header: the aggregate is public.
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/orders")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        let orders = parsed["orders"].as_array().unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0]["name"], "alice");
        assert_eq!(orders[0]["filling"], "sausage");
    }

    #[tokio::test]
    async fn test_delete_missing_recurring_is_not_found() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);
        let token: String = signup_and_login(&app, "alice", "alice@example.com").await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/orders/me/recurring")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_exception_lifecycle_over_http() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);
        let token: String = signup_and_login(&app, "alice", "alice@example.com").await;

        let created = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/orders/me/exceptions")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(created.status(), HttpStatusCode::OK);

        let body_bytes = axum::body::to_bytes(created.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        let exception_id: i64 = parsed["exception_id"].as_i64().unwrap();

        let duplicate = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/orders/me/exceptions")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(duplicate.status(), HttpStatusCode::CONFLICT);

        let deleted = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/orders/me/exceptions/{exception_id}"))
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(deleted.status(), HttpStatusCode::OK);
    }

    #[tokio::test]
    async fn test_history_page_has_ten_entries() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);
        let token: String = signup_and_login(&app, "alice", "alice@example.com").await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/orders/me/history?page=0")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(parsed["page"], 0);
        assert_eq!(parsed["entries"].as_array().unwrap().len(), 10);
    }
}
