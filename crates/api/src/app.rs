//! Router assembly and HTTP handlers.
//!
//! The route guard runs as middleware in front of each protected region; it
//! turns guard decisions into redirects (`303`) or a pending response, and
//! never leaks denial details to the client.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Extension, Path, State},
    http::{HeaderMap, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower::ServiceBuilder;

use scopegate_auth::{decode_principal, PrincipalDoc, Role};
use scopegate_core::{CustomerId, TenantId};
use scopegate_session::{
    guard, GuardConfig, GuardDecision, Requirement, ScopeError, ScopeSnapshot, SessionState,
    TenantDirectory,
};

use crate::config::AppConfig;
use crate::registry::SessionRegistry;

pub struct AppState {
    pub registry: SessionRegistry,
    pub config: AppConfig,
}

/// Build the full router. The same construction serves production and the
/// black-box tests.
pub fn build_app(config: AppConfig, directory: Arc<dyn TenantDirectory>) -> Router {
    let state = Arc::new(AppState {
        registry: SessionRegistry::new(directory),
        config: config.clone(),
    });

    let admin_guard = Arc::new(
        GuardConfig::new(config.sign_in_path.clone(), config.unauthorized_path.clone()).require(
            Requirement::Platform {
                role: Role::SUPER_ADMIN,
            },
        ),
    );

    // Authenticated-is-sufficient region: a guard with zero requirements.
    let account_guard = Arc::new(GuardConfig::new(
        config.sign_in_path.clone(),
        config.unauthorized_path.clone(),
    ));

    let admin_region = Router::new().route("/admin/overview", get(admin_overview)).layer(
        ServiceBuilder::new()
            .layer(Extension(admin_guard))
            .layer(middleware::from_fn_with_state(state.clone(), guard_middleware)),
    );

    let account_region = Router::new().route("/account", get(account_home)).layer(
        ServiceBuilder::new()
            .layer(Extension(account_guard))
            .layer(middleware::from_fn_with_state(state.clone(), guard_middleware)),
    );

    Router::new()
        .route("/healthz", get(healthz))
        .route("/session", post(sign_in).delete(sign_out))
        .route("/whoami", get(whoami))
        .route("/scope", get(current_scope))
        .route("/scope/customer", put(set_customer))
        .route("/scope/tenant", put(set_tenant))
        .route("/customers/accessible", get(accessible_customers))
        .route("/customers/:customer_id/settings", get(customer_settings))
        .route("/tenants", get(tenant_page))
        .merge(admin_region)
        .merge(account_region)
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Route guard middleware
// ─────────────────────────────────────────────────────────────────────────────

async fn guard_middleware(
    State(state): State<Arc<AppState>>,
    Extension(config): Extension<Arc<GuardConfig>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let requested = req.uri().path().to_string();
    let token = bearer_token(req.headers()).map(str::to_string);

    let decision = match token {
        None => guard::evaluate(&config, SessionState::Anonymous, &requested),
        Some(token) => state
            .registry
            .with_session(&token, |facade| {
                guard::evaluate(&config, facade.session_state(), &requested)
            })
            .unwrap_or_else(|| guard::evaluate(&config, SessionState::Anonymous, &requested)),
    };

    match decision {
        GuardDecision::Granted => next.run(req).await,
        GuardDecision::Resolving => pending_response(),
        GuardDecision::Denied { redirect } => redirect_response(&redirect),
    }
}

fn pending_response() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, [("Retry-After", "1")], "resolving").into_response()
}

fn redirect_response(redirect: &guard::Redirect) -> Response {
    let location = match &redirect.return_to {
        Some(return_to) => {
            let query = serde_urlencoded::to_string([("next", return_to.as_str())])
                .unwrap_or_default();
            format!("{}?{}", redirect.to, query)
        }
        None => redirect.to.clone(),
    };
    Redirect::to(&location).into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SessionResponse {
    token: String,
}

async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(doc): Json<PrincipalDoc>,
) -> Result<Json<SessionResponse>, StatusCode> {
    let principal = decode_principal(doc);
    if !principal.is_active {
        // Inactive accounts never become a session's ambient principal.
        return Err(StatusCode::FORBIDDEN);
    }

    let token = state.registry.sign_in(principal);
    Ok(Json(SessionResponse { token }))
}

async fn sign_out(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let token = bearer_token(&headers).ok_or(StatusCode::UNAUTHORIZED)?;
    if state.registry.sign_out(token) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn healthz() -> &'static str {
    "ok"
}

// ─────────────────────────────────────────────────────────────────────────────
// Scope and resolver surface
// ─────────────────────────────────────────────────────────────────────────────

fn with_session<R>(
    state: &AppState,
    headers: &HeaderMap,
    f: impl FnOnce(&mut scopegate_session::ScopeFacade) -> R,
) -> Result<R, StatusCode> {
    let token = bearer_token(headers).ok_or(StatusCode::UNAUTHORIZED)?;
    state
        .registry
        .with_session(token, f)
        .ok_or(StatusCode::UNAUTHORIZED)
}

async fn whoami(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let established_at = bearer_token(&headers).and_then(|t| state.registry.established_at(t));
    with_session(&state, &headers, |facade| {
        let principal = facade.principal();
        json!({
            "principalId": principal.map(|p| p.id.to_string()),
            "displayName": principal.map(|p| p.display_name.clone()),
            "isSuperAdmin": facade.is_super_admin(),
            "scope": facade.current_scope(),
            "sessionEstablishedAt": established_at,
        })
    })
    .map(Json)
}

async fn current_scope(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ScopeSnapshot>, StatusCode> {
    with_session(&state, &headers, |facade| facade.current_scope()).map(Json)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetCustomerBody {
    customer_id: CustomerId,
}

async fn set_customer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<SetCustomerBody>,
) -> Result<Json<ScopeSnapshot>, StatusCode> {
    with_session(&state, &headers, |facade| {
        facade.switch_customer(body.customer_id);
        facade.current_scope()
    })
    .map(Json)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetTenantBody {
    tenant_id: Option<TenantId>,
    tenant_name: Option<String>,
}

async fn set_tenant(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<SetTenantBody>,
) -> Result<Json<ScopeSnapshot>, Response> {
    let selection = match (body.tenant_id, body.tenant_name) {
        (Some(id), Some(name)) => Some((id, name)),
        (None, _) => None,
        // Id and name travel together; one without the other is malformed.
        (Some(_), None) => return Err(StatusCode::BAD_REQUEST.into_response()),
    };

    let result = with_session(&state, &headers, |facade| {
        facade.switch_tenant(selection).map(|()| facade.current_scope())
    })
    .map_err(IntoResponse::into_response)?;

    result.map(Json).map_err(scope_error_response)
}

fn scope_error_response(err: ScopeError) -> Response {
    let status = match err {
        ScopeError::NoCustomerSelected => StatusCode::CONFLICT,
        ScopeError::TenantNotEligible(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

async fn accessible_customers(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<CustomerId>>, StatusCode> {
    with_session(&state, &headers, |facade| facade.accessible_customer_ids()).map(Json)
}

async fn tenant_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    with_session(&state, &headers, |facade| match facade.tenants() {
        Some(page) => Json(page.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Protected regions
// ─────────────────────────────────────────────────────────────────────────────

async fn admin_overview() -> Json<serde_json::Value> {
    Json(json!({ "region": "platform-admin" }))
}

async fn account_home() -> Json<serde_json::Value> {
    Json(json!({ "region": "account" }))
}

/// Customer settings: the required role depends on the customer in the path,
/// so the guard is evaluated in-handler with a requirement built per request.
async fn customer_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(customer_id): Path<CustomerId>,
) -> Response {
    let config = GuardConfig::new(
        state.config.sign_in_path.clone(),
        state.config.unauthorized_path.clone(),
    )
    .require(Requirement::Customer {
        customer_id: customer_id.clone(),
        role: Role::CUSTOMER_ADMIN,
    });

    let requested = format!("/customers/{}/settings", customer_id);
    let token = bearer_token(&headers).map(str::to_string);

    let decision = match token {
        None => guard::evaluate(&config, SessionState::Anonymous, &requested),
        Some(token) => state
            .registry
            .with_session(&token, |facade| {
                guard::evaluate(&config, facade.session_state(), &requested)
            })
            .unwrap_or_else(|| guard::evaluate(&config, SessionState::Anonymous, &requested)),
    };

    match decision {
        GuardDecision::Granted => {
            Json(json!({ "region": "customer-settings", "customerId": customer_id })).into_response()
        }
        GuardDecision::Resolving => pending_response(),
        GuardDecision::Denied { redirect } => redirect_response(&redirect),
    }
}
