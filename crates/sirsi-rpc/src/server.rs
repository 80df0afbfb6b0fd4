// crates/sirsi-rpc/src/server.rs
//
// RPC server setup: SirsiRpcServer, RpcConfig, and the per-service
// endpoints mounted on tonic.
//
// Connect-style unary JSON over tonic's transport: a call is
// `POST /<service>/<method>` with the JSON params as the body. Each logical
// service is a hand-written tower service mounted under its own name, so
// tonic does the path prefix routing and the shared RpcRouter resolves the
// method. Paths outside every mounted service fall through to a `Gateway`
// that still answers with the JSON envelope. HTTP/1.1 and HTTP/2 cleartext
// are both accepted.

use std::future::Future;
use std::marker::PhantomData;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http_body::Body as HttpBody;
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use tonic::service::interceptor::InterceptedService;
use tonic::service::Routes;
use tonic::transport::Server;
use tonic::Status;

use sirsi_core::error::AdminError;
use sirsi_facade::ControlPlane;

use crate::handlers;
use crate::middleware;
use crate::router::RpcRouter;

// ---------------------------------------------------------------------------
// RpcConfig
// ---------------------------------------------------------------------------

/// Configuration for the RPC server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Host to bind to (e.g., "127.0.0.1" or "0.0.0.0").
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Deadline applied when the caller sends no `connect-timeout-ms`.
    pub request_timeout_ms: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_ms: 5_000,
        }
    }
}

impl RpcConfig {
    pub fn addr(&self) -> Result<SocketAddr, AdminError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AdminError::Validation(format!("Invalid listen address: {}", e)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// Error body of a failed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Stable error code, e.g. "not_found".
    pub code: String,
    pub message: String,
}

/// Envelope of every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// The result data (if success).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error details (if not success).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn ok(result: serde_json::Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(error: &AdminError) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(JsonRpcError {
                code: error.code().to_string(),
                message: error.to_string(),
            }),
        }
    }
}

/// HTTP status for an error code.
pub fn http_status(error: &AdminError) -> http::StatusCode {
    match error {
        AdminError::NotFound(_) => http::StatusCode::NOT_FOUND,
        AdminError::Validation(_) => http::StatusCode::BAD_REQUEST,
        AdminError::Unimplemented(_) | AdminError::NotImplemented(_) => {
            http::StatusCode::NOT_IMPLEMENTED
        }
        AdminError::Cancelled(_) => {
            // 499 Client Closed Request.
            http::StatusCode::from_u16(499).unwrap_or(http::StatusCode::REQUEST_TIMEOUT)
        }
        AdminError::Io(_) | AdminError::Internal(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ---------------------------------------------------------------------------
// Service names
// ---------------------------------------------------------------------------

/// A logical service mounted on the transport.
pub trait ServiceName: Send + Sync + 'static {
    const NAME: &'static str;
}

/// `sirsi.admin.v1.AdminService`
#[derive(Debug, Clone, Copy)]
pub struct AdminV1;

/// `sirsi.admin.v2.AdminService`
#[derive(Debug, Clone, Copy)]
pub struct AdminV2;

/// `sirsi.admin.v2.TenantService`
#[derive(Debug, Clone, Copy)]
pub struct TenantV2;

/// `sirsi.admin.v2.NotificationService`
#[derive(Debug, Clone, Copy)]
pub struct NotificationV2;

/// `sirsi.contracts.v1.ContractsService`
#[derive(Debug, Clone, Copy)]
pub struct ContractsV1;

impl ServiceName for AdminV1 {
    const NAME: &'static str = handlers::ADMIN_SERVICE_V1;
}

impl ServiceName for AdminV2 {
    const NAME: &'static str = handlers::ADMIN_SERVICE_V2;
}

impl ServiceName for TenantV2 {
    const NAME: &'static str = handlers::TENANT_SERVICE;
}

impl ServiceName for NotificationV2 {
    const NAME: &'static str = handlers::NOTIFICATION_SERVICE;
}

impl ServiceName for ContractsV1 {
    const NAME: &'static str = handlers::CONTRACTS_SERVICE;
}

// ---------------------------------------------------------------------------
// SirsiRpcServer
// ---------------------------------------------------------------------------

/// The RPC server for the Sirsi admin control plane.
#[derive(Clone)]
pub struct SirsiRpcServer {
    config: RpcConfig,
    router: Arc<RpcRouter>,
}

impl std::fmt::Debug for SirsiRpcServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SirsiRpcServer")
            .field("config", &self.config)
            .field("router", &self.router)
            .finish()
    }
}

impl SirsiRpcServer {
    /// Build a server with every admin service registered against `plane`.
    pub fn new(config: RpcConfig, plane: ControlPlane) -> Self {
        Self::with_router(config, handlers::build_router(&plane))
    }

    pub fn with_router(config: RpcConfig, router: RpcRouter) -> Self {
        Self {
            config,
            router: Arc::new(router),
        }
    }

    pub fn router(&self) -> Arc<RpcRouter> {
        self.router.clone()
    }

    /// Endpoint for one logical service, sharing this server's router.
    pub fn endpoint<S: ServiceName>(&self) -> Endpoint<S> {
        Endpoint::new(self.router.clone(), self.config.request_timeout())
    }

    /// Catch-all service for paths no mounted endpoint claims.
    pub fn gateway(&self) -> Gateway {
        Gateway {
            router: self.router.clone(),
            default_timeout: self.config.request_timeout(),
        }
    }

    /// Every mounted service, plus the JSON fallback in place of tonic's
    /// gRPC `unimplemented` answer.
    pub fn routes(&self) -> Routes {
        let mut builder = Routes::builder();
        builder
            .add_service(InterceptedService::new(
                self.endpoint::<AdminV1>(),
                middleware::logging_interceptor,
            ))
            .add_service(InterceptedService::new(
                self.endpoint::<AdminV2>(),
                middleware::logging_interceptor,
            ))
            .add_service(InterceptedService::new(
                self.endpoint::<TenantV2>(),
                middleware::logging_interceptor,
            ))
            .add_service(InterceptedService::new(
                self.endpoint::<NotificationV2>(),
                middleware::logging_interceptor,
            ))
            .add_service(InterceptedService::new(
                self.endpoint::<ContractsV1>(),
                middleware::logging_interceptor,
            ));

        let router = builder
            .routes()
            .into_axum_router()
            .fallback_service(self.gateway());
        Routes::from(router)
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn serve_with_shutdown<F>(&self, shutdown: F) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Future<Output = ()> + Send,
    {
        let addr = self.config.addr()?;

        tracing::info!("Sirsi admin RPC server starting on {}", addr);

        Server::builder()
            .accept_http1(true)
            .add_routes(self.routes())
            .serve_with_shutdown(addr, shutdown)
            .await?;

        tracing::info!("Sirsi admin RPC server stopped");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tonic Service Wiring
// ---------------------------------------------------------------------------

/// Tower service for one logical service. Reads the method from the path,
/// the params from the body, and answers with a `JsonRpcResponse`.
pub struct Endpoint<S> {
    router: Arc<RpcRouter>,
    default_timeout: Duration,
    _service: PhantomData<fn() -> S>,
}

impl<S> Clone for Endpoint<S> {
    fn clone(&self) -> Self {
        Self {
            router: self.router.clone(),
            default_timeout: self.default_timeout,
            _service: PhantomData,
        }
    }
}

impl<S: ServiceName> std::fmt::Debug for Endpoint<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint").field("service", &S::NAME).finish()
    }
}

impl<S: ServiceName> Endpoint<S> {
    pub fn new(router: Arc<RpcRouter>, default_timeout: Duration) -> Self {
        Self {
            router,
            default_timeout,
            _service: PhantomData,
        }
    }
}

impl<S: ServiceName> tonic::server::NamedService for Endpoint<S> {
    const NAME: &'static str = S::NAME;
}

impl<S, B> tower_service::Service<http::Request<B>> for Endpoint<S>
where
    S: ServiceName,
    B: HttpBody + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + Send,
    B::Data: Send,
{
    type Response = http::Response<tonic::body::BoxBody>;
    type Error = std::convert::Infallible;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let router = self.router.clone();
        let default_timeout = self.default_timeout;

        Box::pin(async move {
            Ok(respond(router, default_timeout, req, |path| {
                method_from_path::<S>(path).map(|m| (S::NAME.to_string(), m.to_string()))
            })
            .await)
        })
    }
}

/// Fallback for paths outside every mounted service. Splits
/// `/<service>/<method>` itself and lets the router reject what it does not
/// know, so unknown services get the same `unimplemented` envelope as
/// unknown methods.
#[derive(Clone)]
pub struct Gateway {
    router: Arc<RpcRouter>,
    default_timeout: Duration,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

impl<B> tower_service::Service<http::Request<B>> for Gateway
where
    B: HttpBody + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + Send,
    B::Data: Send,
{
    type Response = http::Response<tonic::body::BoxBody>;
    type Error = std::convert::Infallible;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let router = self.router.clone();
        let default_timeout = self.default_timeout;

        Box::pin(async move {
            Ok(respond(router, default_timeout, req, |path| {
                split_path(path).map(|(svc, m)| (svc.to_string(), m.to_string()))
            })
            .await)
        })
    }
}

/// Read the request, run the call, and encode the envelope.
async fn respond<B, F>(
    router: Arc<RpcRouter>,
    default_timeout: Duration,
    req: http::Request<B>,
    resolve: F,
) -> http::Response<tonic::body::BoxBody>
where
    B: HttpBody + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + Send,
    B::Data: Send,
    F: FnOnce(&str) -> Option<(String, String)>,
{
    let (parts, body) = req.into_parts();
    let path = parts.uri.path().to_string();
    let target = resolve(&path);

    let (status, envelope) = match collect_body(body).await {
        Ok(bytes) => handle(router, default_timeout, path, target, parts.headers, bytes).await,
        Err(e) => {
            tracing::error!("Failed to read request body: {}", e);
            let err = AdminError::Io(format!("Failed to read request body: {}", e));
            (http_status(&err), JsonRpcResponse::err(&err))
        }
    };

    let json = serde_json::to_vec(&envelope).unwrap_or_default();
    build_response(status, json)
}

/// Run one call end to end and produce the status and envelope.
async fn handle(
    router: Arc<RpcRouter>,
    default_timeout: Duration,
    path: String,
    target: Option<(String, String)>,
    headers: http::HeaderMap,
    body: Vec<u8>,
) -> (http::StatusCode, JsonRpcResponse) {
    let started = Instant::now();

    let result = match (target, middleware::request_timeout(&headers, default_timeout)) {
        (None, _) => Err(AdminError::Unimplemented(format!("Unknown path: {}", path))),
        (_, Err(e)) => Err(e),
        (Some((service, method)), Ok(deadline)) => match parse_params(&body) {
            Err(e) => Err(e),
            Ok(params) => {
                match tokio::time::timeout(deadline, router.dispatch(&service, &method, params))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(AdminError::Cancelled(format!(
                        "Deadline of {}ms exceeded",
                        deadline.as_millis()
                    ))),
                }
            }
        },
    };

    match result {
        Ok(value) => {
            tracing::debug!("{} ok in {:?}", path, started.elapsed());
            (http::StatusCode::OK, JsonRpcResponse::ok(value))
        }
        Err(err) => {
            match &err {
                AdminError::Io(_) | AdminError::Internal(_) => {
                    tracing::error!("{} failed: {}", path, err)
                }
                _ => tracing::debug!("{} -> {} in {:?}", path, err.code(), started.elapsed()),
            }
            (http_status(&err), JsonRpcResponse::err(&err))
        }
    }
}

/// `/<service>/<method>` -> `(service, method)`.
fn split_path(path: &str) -> Option<(&str, &str)> {
    let (service, method) = path.strip_prefix('/')?.split_once('/')?;
    if service.is_empty() || method.is_empty() || method.contains('/') {
        return None;
    }
    Some((service, method))
}

/// `/<service>/<method>` -> `<method>`, if the path belongs to `S`.
fn method_from_path<S: ServiceName>(path: &str) -> Option<&str> {
    path.strip_prefix('/')
        .and_then(|p| p.strip_prefix(S::NAME))
        .and_then(|p| p.strip_prefix('/'))
        .filter(|m| !m.is_empty() && !m.contains('/'))
}

/// Parse a request body. An empty body means `{}`.
fn parse_params(body: &[u8]) -> Result<serde_json::Value, AdminError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::Value::Object(Default::default()));
    }
    serde_json::from_slice(body)
        .map_err(|e| AdminError::Validation(format!("Invalid JSON request body: {}", e)))
}

/// Collect the body of an HTTP request into bytes.
async fn collect_body<B>(body: B) -> Result<Vec<u8>, String>
where
    B: HttpBody + Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    B::Data: Send,
{
    let mut collected = Vec::new();
    let mut body = std::pin::pin!(body);

    loop {
        match std::future::poll_fn(|cx| HttpBody::poll_frame(body.as_mut(), cx)).await {
            Some(Ok(frame)) => {
                if let Ok(data) = frame.into_data() {
                    use bytes::Buf;
                    collected.extend_from_slice(data.chunk());
                }
            }
            Some(Err(e)) => return Err(e.into().to_string()),
            None => break,
        }
    }

    Ok(collected)
}

/// Build an HTTP response with the given status and JSON body.
fn build_response(status: http::StatusCode, json: Vec<u8>) -> http::Response<tonic::body::BoxBody> {
    let body = tonic::body::BoxBody::new(
        http_body_util::Full::new(bytes::Bytes::from(json))
            .map_err(|e| Status::internal(format!("body error: {}", e))),
    );

    let mut response = http::Response::new(body);
    *response.status_mut() = status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AdminError::NotFound(String::new()), 404),
            (AdminError::Validation(String::new()), 400),
            (AdminError::Unimplemented(String::new()), 501),
            (AdminError::NotImplemented(String::new()), 501),
            (AdminError::Io(String::new()), 500),
            (AdminError::Cancelled(String::new()), 499),
            (AdminError::Internal(String::new()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(http_status(&err).as_u16(), status, "{:?}", err);
        }
    }

    #[test]
    fn test_method_from_path() {
        assert_eq!(
            method_from_path::<AdminV2>("/sirsi.admin.v2.AdminService/GetSettings"),
            Some("GetSettings")
        );
        assert_eq!(
            method_from_path::<AdminV2>("/sirsi.admin.v1.AdminService/GetSettings"),
            None
        );
        assert_eq!(method_from_path::<AdminV2>("/sirsi.admin.v2.AdminService/"), None);
        assert_eq!(
            method_from_path::<AdminV2>("/sirsi.admin.v2.AdminService/a/b"),
            None
        );
    }

    #[test]
    fn test_split_path() {
        assert_eq!(
            split_path("/sirsi.admin.v3.AdminService/GetSettings"),
            Some(("sirsi.admin.v3.AdminService", "GetSettings"))
        );
        assert_eq!(split_path("/GetSettings"), None);
        assert_eq!(split_path("//GetSettings"), None);
        assert_eq!(split_path("/svc/"), None);
        assert_eq!(split_path("/svc/a/b"), None);
    }

    #[test]
    fn test_empty_body_is_empty_object() {
        assert_eq!(parse_params(b"").unwrap(), serde_json::json!({}));
        assert_eq!(parse_params(b" \n").unwrap(), serde_json::json!({}));
        assert!(matches!(parse_params(b"{oops"), Err(AdminError::Validation(_))));
    }

    #[test]
    fn test_error_envelope_shape() {
        let envelope = JsonRpcResponse::err(&AdminError::not_found("tenant", "t1"));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "not_found");
        assert!(json.get("result").is_none());
    }

    #[test]
    fn test_default_config() {
        let config = RpcConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert!(config.addr().is_ok());
    }
}
