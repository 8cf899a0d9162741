//! Serve command - runs the tokenlist HTTP server.

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{FromRequestParts, Query, Request, State},
    http::{
        HeaderValue, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION,
        },
        request::Parts,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tokio::signal::unix::{SignalKind, signal};

use tokenlist::{Collection, Item, ItemId, ItemPayload, ItemUpdate, Registry, Token};

use crate::cli::ServeArgs;

const ALLOW_HEADERS: &str = "Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, \
     Authorization, accept, origin, Cache-Control, X-Requested-With";
const ALLOW_METHODS: &str = "POST, GET, OPTIONS, PUT, DELETE";

/// Shared application state
#[derive(Clone)]
struct AppState {
    registry: Arc<Registry>,
    allow_origin: HeaderValue,
}

/// Run the tokenlist server
pub async fn run(args: &ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState {
        registry: Arc::new(Registry::new()),
        allow_origin: HeaderValue::from_str(&args.allow_origin)?,
    };
    let app = router(state);

    // Bind server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!("Listening on {local_addr}");

    println!("tokenlist server listening on http://{local_addr}");
    println!();
    println!("Available endpoints:");
    println!("  GET    /api/list   - Create a list and return its token");
    println!("  GET    /api/todo   - All todos, or one with ?id=N");
    println!("  POST   /api/todo   - Add a todo");
    println!("  PUT    /api/todo   - Update and optionally move a todo");
    println!("  DELETE /api/todo   - Remove the todo given by ?id=N");
    println!("  GET    /health     - Health check");
    println!();
    println!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("Server shut down");
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/list", get(handle_create_list).options(handle_preflight))
        .route(
            "/api/todo",
            get(handle_get_todos)
                .post(handle_post_todo)
                .put(handle_put_todo)
                .delete(handle_delete_todo)
                .options(handle_preflight),
        )
        .route("/health", get(handle_health_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), cors))
        .with_state(state)
}

async fn shutdown_signal() {
    let sigterm = async {
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to set up SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    let sigint = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to set up SIGINT handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = sigterm => tracing::info!("Received SIGTERM, initiating graceful shutdown..."),
        _ = sigint => tracing::info!("Received SIGINT, initiating graceful shutdown..."),
    }
}

// ============================================================================
// Middleware, Extractors and Errors
// ============================================================================

/// Adds the CORS headers to every response.
async fn cors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, state.allow_origin.clone());
    headers.insert(
        ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    response
}

/// The collection named by the request's bearer token.
///
/// Rejects with 403 unless the `Authorization` header carries a well-formed
/// token that the registry issued.
struct Authorized(Arc<Collection>);

impl FromRequestParts<AppState> for Authorized {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::Forbidden)?;
        let token = Token::parse(token).map_err(|_| ApiError::Forbidden)?;

        state
            .registry
            .resolve(token.as_str())
            .map(Authorized)
            .map_err(|_| {
                tracing::debug!(token = %token.log_prefix(), "Rejected unknown token");
                ApiError::Forbidden
            })
    }
}

/// Error responses of the HTTP API, rendered as plain text.
#[derive(Debug)]
enum ApiError {
    Forbidden,
    BadRequest(&'static str),
    NotFound(&'static str),
    Internal(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
        }
    }
}

/// Maps a library error, turning not-found into `not_found`.
fn item_error(err: tokenlist::Error, not_found: ApiError) -> ApiError {
    if err.is_not_found() {
        not_found
    } else {
        tracing::error!("Collection operation failed: {err}");
        ApiError::Internal("server error")
    }
}

#[derive(Deserialize)]
struct IdQuery {
    id: Option<String>,
}

impl IdQuery {
    fn item_id(&self) -> Result<ItemId, ApiError> {
        match self.id.as_deref() {
            None | Some("") => Err(ApiError::BadRequest("no ID found in the URL")),
            Some(raw) => raw
                .parse()
                .map_err(|_| ApiError::BadRequest("value for id was not a number")),
        }
    }
}

fn decode_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Error while decoding body: {e}");
        ApiError::BadRequest("Body is corrupted")
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler for OPTIONS preflight requests
async fn handle_preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Handler for GET /api/list - creates a list and returns its token
async fn handle_create_list(State(state): State<AppState>) -> Result<String, ApiError> {
    let token = state.registry.create().map_err(|e| {
        tracing::error!("Error while creating new todo list: {e}");
        ApiError::Internal("server error")
    })?;
    Ok(format!("{token}\n"))
}

/// Handler for GET /api/todo - all todos, or a single one with `?id=`
async fn handle_get_todos(
    Authorized(collection): Authorized,
    Query(query): Query<IdQuery>,
) -> Result<Response, ApiError> {
    if query.id.is_none() {
        let items = collection
            .get_all()
            .map_err(|e| item_error(e, ApiError::Internal("server error")))?;
        tracing::debug!(count = items.len(), "GET /api/todo (200 OK)");
        return Ok(axum::Json(items).into_response());
    }

    let id = query.item_id()?;
    let item = collection
        .get_by_id(id)
        .map_err(|e| item_error(e, ApiError::NotFound("todo with given id not found")))?;
    tracing::debug!(%id, "GET /api/todo?id (200 OK)");
    Ok(axum::Json(item).into_response())
}

/// Handler for POST /api/todo - adds a todo at the head of the list
async fn handle_post_todo(
    Authorized(collection): Authorized,
    body: Bytes,
) -> Result<axum::Json<Item>, ApiError> {
    let payload: ItemPayload = decode_body(&body)?;
    let item = collection
        .add(payload)
        .map_err(|e| item_error(e, ApiError::Internal("server error")))?;
    tracing::debug!(id = %item.id, "POST /api/todo (200 OK)");
    Ok(axum::Json(item))
}

/// Handler for PUT /api/todo - replaces a todo's content, then applies `upOrDown`
async fn handle_put_todo(
    Authorized(collection): Authorized,
    body: Bytes,
) -> Result<axum::Json<Item>, ApiError> {
    let update: ItemUpdate = decode_body(&body)?;
    let id = update.id;
    let item = collection
        .apply(update)
        .map_err(|e| item_error(e, ApiError::BadRequest("Todo with given id not found")))?;
    tracing::debug!(%id, "PUT /api/todo (200 OK)");
    Ok(axum::Json(item))
}

/// Handler for DELETE /api/todo?id= - removes a todo and returns it
async fn handle_delete_todo(
    Authorized(collection): Authorized,
    Query(query): Query<IdQuery>,
) -> Result<axum::Json<Item>, ApiError> {
    let id = query.item_id()?;
    let item = collection
        .remove(id)
        .map_err(|e| item_error(e, ApiError::NotFound("Todo with given id not found")))?;
    tracing::debug!(%id, "DELETE /api/todo (200 OK)");
    Ok(axum::Json(item))
}

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    collections: usize,
}

/// Handler for GET /health - Health check endpoint
async fn handle_health_endpoint(State(state): State<AppState>) -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "healthy",
        collections: state.registry.len(),
    })
}
