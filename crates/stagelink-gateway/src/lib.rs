// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Panasonic AW camera HTTP surface.
//!
//! Serves the endpoint set an AW camera exposes, backed by a user-supplied
//! [`CameraHandler`], so the same control panels and clients that drive a
//! real camera can drive an emulator or a protocol proxy:
//!
//! | Endpoint | Behavior |
//! |----------|----------|
//! | `/cgi-bin/aw_ptz` | `#`-prefixed commands, dispatched to the handler |
//! | `/cgi-bin/aw_cam` | unprefixed commands, dispatched to the handler |
//! | `/cgi-bin/event` | notification subscribe/unsubscribe |
//! | `/cgi-bin/man_session` | subscriber count readback |
//! | `/cgi-bin/set_basic` | Basic-authenticated camera title |
//! | `/live/camdata.html` | batch state page, one token per line |
//!
//! Handler results are re-packed with the per-endpoint quirks applied, so a
//! returned error reply is capitalized exactly the way a camera would
//! capitalize it on that endpoint. A handler panic answers 500 without
//! taking the server down.
//!
//! ```rust,no_run
//! use stagelink_gateway::{Gateway, HandlerError};
//! use stagelink::panasonic::AwRequest;
//!
//! fn main() -> std::io::Result<()> {
//!     let gateway = Gateway::new(|req: Box<dyn AwRequest>| {
//!         // Echo the expected response shape for every command.
//!         Ok::<_, HandlerError>(req.expected_response())
//!     });
//!     gateway.serve("0.0.0.0:80".parse().unwrap())
//! }
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use axum::extract::{ConnectInfo, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use stagelink::panasonic::{
    new_request, AwClient, AwEndpoint, AwRequest, AwResponse, CommandError, ErrorReply,
    NotifySessions, PackContext,
};

/// Factory default credentials for `/cgi-bin/set_basic`.
const DEFAULT_USER: &str = "admin";
const DEFAULT_PASSWORD: &str = "12345";

/// What a handler can fail with.
#[derive(Debug)]
pub enum HandlerError {
    /// A vendor error reply: answered 200 with the error wire form, the
    /// way a camera rejects a command.
    Device(ErrorReply),
    /// Anything else: answered 502.
    Failed(String),
}

impl From<ErrorReply> for HandlerError {
    fn from(e: ErrorReply) -> Self {
        Self::Device(e)
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Device(e) => write!(f, "{}", e),
            Self::Failed(s) => write!(f, "handler failed: {}", s),
        }
    }
}

impl std::error::Error for HandlerError {}

/// The application side of the gateway.
///
/// `handle` receives every typed command (unknown tokens arrive as
/// `UnknownRequest`); `batch` backs the `/live/camdata.html` page.
/// Any plain function with the `handle` shape is a handler.
pub trait CameraHandler: Send + Sync + 'static {
    fn handle(&self, req: Box<dyn AwRequest>) -> Result<Box<dyn AwResponse>, HandlerError>;

    /// State tokens for the batch page; empty by default.
    fn batch(&self) -> Vec<Box<dyn AwResponse>> {
        Vec::new()
    }
}

impl<F> CameraHandler for F
where
    F: Fn(Box<dyn AwRequest>) -> Result<Box<dyn AwResponse>, HandlerError>
        + Send
        + Sync
        + 'static,
{
    fn handle(&self, req: Box<dyn AwRequest>) -> Result<Box<dyn AwResponse>, HandlerError> {
        self(req)
    }
}

/// Forward every command to a real camera, turning the gateway into a
/// transparent protocol proxy.
///
/// Unknown tokens pass through byte-for-byte: the dispatch fallback keeps
/// the raw string, and the upstream client sends it unchanged, so a panel
/// can drive firmware features this crate has no types for.
pub struct CameraProxy {
    upstream: AwClient,
}

impl CameraProxy {
    #[must_use]
    pub fn new(upstream: AwClient) -> Self {
        Self { upstream }
    }
}

impl CameraHandler for CameraProxy {
    fn handle(&self, req: Box<dyn AwRequest>) -> Result<Box<dyn AwResponse>, HandlerError> {
        match self.upstream.command(req.as_ref()) {
            Ok(res) => Ok(res),
            Err(CommandError::Device(e)) => Err(HandlerError::Device(e)),
            Err(e) => Err(HandlerError::Failed(e.to_string())),
        }
    }

    fn batch(&self) -> Vec<Box<dyn AwResponse>> {
        self.upstream.batch().unwrap_or_default()
    }
}

struct Inner {
    handler: Arc<dyn CameraHandler>,
    sessions: Arc<NotifySessions>,
    user: String,
    password: String,
}

/// The camera HTTP surface.
pub struct Gateway {
    handler: Arc<dyn CameraHandler>,
    sessions: Arc<NotifySessions>,
    user: String,
    password: String,
}

impl Gateway {
    /// Gateway over `handler` with a fresh subscriber registry.
    pub fn new(handler: impl CameraHandler) -> Self {
        Self::with_sessions(handler, Arc::new(NotifySessions::new()))
    }

    /// Gateway sharing an externally owned subscriber registry, so the
    /// application can push notifications through it.
    pub fn with_sessions(handler: impl CameraHandler, sessions: Arc<NotifySessions>) -> Self {
        Self {
            handler: Arc::new(handler),
            sessions,
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }

    /// Override the factory default credentials for `/cgi-bin/set_basic`.
    #[must_use]
    pub fn with_credentials(mut self, user: &str, password: &str) -> Self {
        self.user = user.to_string();
        self.password = password.to_string();
        self
    }

    /// The subscriber registry served by `/cgi-bin/event`.
    #[must_use]
    pub fn sessions(&self) -> Arc<NotifySessions> {
        self.sessions.clone()
    }

    fn inner(&self) -> Arc<Inner> {
        Arc::new(Inner {
            handler: self.handler.clone(),
            sessions: self.sessions.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
        })
    }

    /// The routing table, for embedding into an existing axum app.
    ///
    /// The event endpoint reads the peer address, so the embedding app must
    /// serve with `into_make_service_with_connect_info::<SocketAddr>()`.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route("/cgi-bin/aw_ptz", get(aw_ptz))
            .route("/cgi-bin/aw_cam", get(aw_cam))
            .route("/cgi-bin/event", get(event))
            .route("/cgi-bin/man_session", get(man_session))
            .route("/cgi-bin/set_basic", get(set_basic))
            .route("/live/camdata.html", get(camdata))
            .with_state(self.inner())
    }

    /// Serve on `addr` until the process ends. Owns its runtime; blocks the
    /// calling thread.
    pub fn serve(&self, addr: SocketAddr) -> std::io::Result<()> {
        let listener = std::net::TcpListener::bind(addr)?;
        self.serve_listener(listener)
    }

    /// Serve on an already bound listener (useful for ephemeral test ports).
    pub fn serve_listener(&self, listener: std::net::TcpListener) -> std::io::Result<()> {
        let router = self.router();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(async move {
            listener.set_nonblocking(true)?;
            let listener = tokio::net::TcpListener::from_std(listener)?;
            log::debug!("[gateway] serving on {}", listener.local_addr()?);
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
        })
    }
}

fn text_reply(status: StatusCode, body: String) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, "text/plain"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}

/// Run one command through the handler with the endpoint's packing quirk.
fn dispatch(inner: &Inner, endpoint: AwEndpoint, params: &HashMap<String, String>) -> Response {
    if params.get("res").map(String::as_str) != Some("1") {
        return text_reply(StatusCode::BAD_REQUEST, String::new());
    }
    let cmd = match params.get("cmd") {
        Some(cmd) if !cmd.is_empty() => cmd,
        _ => return text_reply(StatusCode::BAD_REQUEST, String::new()),
    };
    let prefixed = cmd.starts_with('#');
    if prefixed != (endpoint == AwEndpoint::Ptz) {
        return text_reply(StatusCode::BAD_REQUEST, String::new());
    }

    let req = new_request(cmd);
    let ctx = PackContext::Endpoint(endpoint);
    let outcome = catch_unwind(AssertUnwindSafe(|| inner.handler.handle(req)));
    match outcome {
        Ok(Ok(res)) => text_reply(StatusCode::OK, res.pack_for(ctx)),
        Ok(Err(HandlerError::Device(err))) => text_reply(StatusCode::OK, err.pack_for(ctx)),
        Ok(Err(HandlerError::Failed(reason))) => {
            log::warn!("[gateway] handler failed for {:?}: {}", cmd, reason);
            text_reply(StatusCode::BAD_GATEWAY, String::new())
        }
        Err(_) => {
            log::warn!("[gateway] handler panicked for {:?}", cmd);
            text_reply(StatusCode::INTERNAL_SERVER_ERROR, String::new())
        }
    }
}

async fn aw_ptz(
    State(inner): State<Arc<Inner>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    dispatch(&inner, AwEndpoint::Ptz, &params)
}

async fn aw_cam(
    State(inner): State<Arc<Inner>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    dispatch(&inner, AwEndpoint::Cam, &params)
}

async fn event(
    State(inner): State<Arc<Inner>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let my_port = params
        .get("my_port")
        .and_then(|p| p.parse::<u16>().ok())
        .filter(|&p| p != 0);
    let subscriber = match my_port {
        Some(port) => SocketAddr::new(peer.ip(), port),
        None => return text_reply(StatusCode::BAD_REQUEST, String::new()),
    };
    match params.get("connect").map(String::as_str) {
        Some("start") => {
            if let Err(e) = inner.sessions.add(subscriber) {
                log::warn!("[gateway] subscribe {} failed: {}", subscriber, e);
                return text_reply(StatusCode::BAD_GATEWAY, String::new());
            }
        }
        Some("stop") => inner.sessions.remove(subscriber),
        _ => return text_reply(StatusCode::BAD_REQUEST, String::new()),
    }
    StatusCode::NO_CONTENT.into_response()
}

/// Subscriber count readback. One shipped Panasonic panel polls this
/// before it is willing to subscribe.
async fn man_session(
    State(inner): State<Arc<Inner>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if params.get("command").map(String::as_str) != Some("get") {
        return text_reply(StatusCode::BAD_REQUEST, String::new());
    }
    text_reply(
        StatusCode::OK,
        format!("Event session:{}", inner.sessions.len()),
    )
}

async fn set_basic(
    State(inner): State<Arc<Inner>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !basic_auth_ok(&inner, &headers) {
        return (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Basic realm=\"camera\"")],
            String::new(),
        )
            .into_response();
    }
    match params.get("cam_title") {
        Some(title) => text_reply(StatusCode::OK, format!("cam_title={}\r\n", title)),
        None => text_reply(StatusCode::BAD_REQUEST, String::new()),
    }
}

fn basic_auth_ok(inner: &Inner, headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let Some(encoded) = value.strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = BASE64.decode(encoded.trim()) else {
        return false;
    };
    let expected = format!("{}:{}", inner.user, inner.password);
    decoded == expected.as_bytes()
}

async fn camdata(State(inner): State<Arc<Inner>>) -> Response {
    let outcome = catch_unwind(AssertUnwindSafe(|| inner.handler.batch()));
    match outcome {
        Ok(tokens) => {
            let mut body = String::new();
            for token in tokens {
                body.push_str(&token.pack_for(PackContext::Batch));
                body.push_str("\r\n");
            }
            text_reply(StatusCode::OK, body)
        }
        Err(_) => {
            log::warn!("[gateway] batch handler panicked");
            text_reply(StatusCode::INTERNAL_SERVER_ERROR, String::new())
        }
    }
}
