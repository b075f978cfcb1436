//! LedgerLens Web Server
//!
//! Axum-based REST API for the LedgerLens spending analytics service.
//!
//! Security features:
//! - Bearer authentication (API keys or HS256 JWTs; secure by default, use --no-auth for local dev)
//! - Every ledger operation is scoped to the authenticated owner
//! - Restrictive CORS policy
//! - Sanitized error responses for unexpected failures

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};

use ledgerlens_core::identity::IdentityProvider;
use ledgerlens_core::{Database, LedgerService};

pub mod auth;
mod handlers;

pub use auth::{parse_api_keys, ApiKey, ApiKeyIdentity, JwtIdentity, LOCAL_DEV_OWNER};

/// Authorization header for bearer credentials
const AUTHORIZATION_HEADER: &str = "authorization";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Static API keys, each bound to an owner
    /// Format: "Bearer <key>" in Authorization header
    pub api_keys: Vec<ApiKey>,
    /// Shared secret for HS256 bearer JWTs (the `sub` claim is the owner id)
    pub jwt_secret: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            api_keys: vec![],
            jwt_secret: None,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub service: LedgerService<Database>,
    pub identity: Box<dyn IdentityProvider>,
    pub config: ServerConfig,
    pub started_at: std::time::Instant,
}

/// The authenticated principal, inserted by [`auth_middleware`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner(pub String);

/// Authentication middleware - resolves the bearer credential to an owner
///
/// Runs before every `/api` handler, so an unauthenticated request never
/// reaches the ledger.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let resolved = {
        let credential = request
            .headers()
            .get(AUTHORIZATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|auth| auth.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty());
        state.identity.resolve(credential)
    };

    match resolved {
        Ok(owner) => {
            if state.config.require_auth {
                info!(owner = %owner, path = %request.uri().path(), "Authenticated request");
            } else {
                debug!(owner = %owner, path = %request.uri().path(), "Unauthenticated dev request");
            }
            request.extensions_mut().insert(Owner(owner));
            next.run(request).await
        }
        Err(e) => {
            warn!(path = %request.uri().path(), "Unauthorized request - no valid auth");
            AppError::from(e).into_response()
        }
    }
}

/// Create the application router
pub fn create_router(db: Database, config: ServerConfig) -> Router {
    create_router_with_service(LedgerService::new(db), config)
}

/// Create the application router around an existing service (for testing)
pub fn create_router_with_service(
    service: LedgerService<Database>,
    config: ServerConfig,
) -> Router {
    let identity = auth::identity_from_config(&config);

    let state = Arc::new(AppState {
        service,
        identity,
        config: config.clone(),
        started_at: std::time::Instant::now(),
    });

    let api_routes = Router::new()
        // Transactions
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        // Analysis
        .route(
            "/transactions/analysis/summary",
            get(handlers::spending_summary),
        )
        .route(
            "/transactions/analysis/spending",
            get(handlers::spending_analysis),
        )
        .route(
            "/transactions/analysis/categories",
            get(handlers::category_analysis),
        )
        .route(
            "/transactions/:id",
            get(handlers::get_transaction)
                .put(handlers::update_transaction)
                .delete(handlers::delete_transaction),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Build CORS layer
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        // Allow specified origins
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .fallback(handlers::route_not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
}

/// Start the server
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!(
            "⚠️  Authentication disabled - every request acts as '{}'",
            LOCAL_DEV_OWNER
        );
    }

    let app = create_router(db, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
///
/// Renders as `{"success": false, "message": ...}`.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "success": false,
            "message": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        use ledgerlens_core::Error as CoreError;

        let err = err.into();
        match err.downcast_ref::<CoreError>() {
            Some(CoreError::Validation(msg)) => Self::bad_request(msg),
            Some(CoreError::Unauthenticated(msg)) => Self::unauthorized(msg),
            Some(CoreError::NotFound(msg)) => Self::not_found(msg),
            // Store failures keep their detail for the caller
            _ => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: err.to_string(),
                internal: Some(err),
            },
        }
    }
}
