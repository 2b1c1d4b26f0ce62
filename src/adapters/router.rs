//! Request pipeline and prefix dispatch.
//!
//! Every request runs, in order: tracing, body size limit, CORS, security
//! headers, rate limiting, panic capture, routing. Each `Router::layer` call
//! wraps the ones applied before it, so a 429 still carries CORS and security
//! headers.

use {
    super::{
        api_errors::{handle_panic, route_not_found},
        rate_limit::{RateLimiter, rate_limit},
        routes::{doctor, health, status::health_check},
        security_headers::with_security_headers,
    },
    crate::{AppState, config::Config},
    axum::{
        Router,
        extract::DefaultBodyLimit,
        http::Method,
        middleware::from_fn_with_state,
        routing::get,
    },
    std::{collections::BTreeMap, sync::Arc},
    tower::ServiceBuilder,
    tower_http::{
        catch_panic::CatchPanicLayer,
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    },
};

pub const AUTH_PREFIX: &str = "/api/auth";
pub const HEALTH_PREFIX: &str = "/api/health";
pub const ALERTS_PREFIX: &str = "/api/alerts";
pub const DASHBOARD_PREFIX: &str = "/api/dashboard";
pub const DOCTOR_PREFIX: &str = "/api/doctor";

/// Route collaborators keyed by URL prefix. Doctor and health routes are
/// built in; auth, alerts and dashboard are supplied by whoever embeds the
/// server and answer 404 until mounted.
pub struct ApiRoutes {
    mounts: BTreeMap<&'static str, Router<AppState>>,
}

impl Default for ApiRoutes {
    fn default() -> Self {
        Self::empty()
            .mount(DOCTOR_PREFIX, doctor::router())
            .mount(HEALTH_PREFIX, health::router())
    }
}

impl ApiRoutes {
    pub fn empty() -> Self {
        Self {
            mounts: BTreeMap::new(),
        }
    }

    /// Mounts `router` under `prefix`, merging with anything already there.
    pub fn mount(mut self, prefix: &'static str, router: Router<AppState>) -> Self {
        let merged = match self.mounts.remove(prefix) {
            Some(existing) => existing.merge(router),
            None => router,
        };
        self.mounts.insert(prefix, merged);
        self
    }
}

/// Pipeline settings shared by the router and the background sweeper.
#[derive(Clone)]
pub struct Pipeline {
    pub limiter: Arc<RateLimiter>,
    pub body_limit: usize,
}

impl Pipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::new(config.rate_limit)),
            body_limit: config.body_limit,
        }
    }
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(Any)
}

pub fn build_app(state: AppState, routes: ApiRoutes, pipeline: Pipeline) -> Router {
    let mut router = Router::new().route("/health", get(health_check));
    for (prefix, mounted) in routes.mounts {
        router = router.nest(prefix, mounted);
    }

    let routed = router
        .fallback(route_not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn_with_state(pipeline.limiter, rate_limit))
                .layer(CatchPanicLayer::custom(handle_panic)),
        );

    with_security_headers(routed).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(DefaultBodyLimit::max(pipeline.body_limit))
            .layer(cors()),
    )
}
