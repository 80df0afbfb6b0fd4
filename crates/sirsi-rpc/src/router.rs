// crates/sirsi-rpc/src/router.rs
//
// RpcRouter: maps (service, method) to type-erased async handlers.
//
// Every handler has the uniform shape `serde_json::Value -> Result<Value,
// AdminError>`. Services register independently through a builder:
//
//     router
//         .service("sirsi.admin.v2.TenantService")
//         .with_state(plane.clone())
//         .method("GetTenant", |p, req: GetTenantRequest| async move {
//             p.get_tenant(req).await
//         })
//         .pending("ArchiveTenant");
//
// A method registered with `pending` is known but has no logic yet and
// answers `NotImplemented`; anything not registered at all answers
// `Unimplemented`.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use sirsi_core::error::AdminError;

/// Boxed future returned by every registered handler.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Value, AdminError>> + Send>>;

/// A type-erased handler.
pub type Handler = Arc<dyn Fn(Value) -> HandlerFuture + Send + Sync>;

/// Params type for methods that take no arguments. Accepts `{}` and ignores
/// any fields.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Empty {}

#[derive(Clone)]
enum Route {
    Ready(Handler),
    Pending,
}

#[derive(Clone, Default)]
pub struct RpcRouter {
    services: HashMap<String, HashMap<String, Route>>,
}

impl std::fmt::Debug for RpcRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.service_names().collect();
        names.sort_unstable();
        f.debug_struct("RpcRouter").field("services", &names).finish()
    }
}

impl RpcRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or extend) the registration of a service.
    pub fn service(&mut self, name: &str) -> ServiceBuilder<'_, ()> {
        let methods = self.services.entry(name.to_string()).or_default();
        ServiceBuilder {
            service: name.to_string(),
            methods,
            state: (),
        }
    }

    pub fn has_service(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    /// Route one call.
    pub async fn dispatch(
        &self,
        service: &str,
        method: &str,
        params: Value,
    ) -> Result<Value, AdminError> {
        let methods = self
            .services
            .get(service)
            .ok_or_else(|| AdminError::Unimplemented(format!("Unknown service: {}", service)))?;

        match methods.get(method) {
            Some(Route::Ready(handler)) => handler(params).await,
            Some(Route::Pending) => Err(AdminError::NotImplemented(format!(
                "{}/{} is not implemented",
                service, method
            ))),
            None => Err(AdminError::Unimplemented(format!(
                "Unknown method: {}/{}",
                service, method
            ))),
        }
    }
}

/// Registers methods on one service. `S` is the state handed to every
/// handler registered through this builder.
pub struct ServiceBuilder<'a, S> {
    service: String,
    methods: &'a mut HashMap<String, Route>,
    state: S,
}

impl<'a, S> ServiceBuilder<'a, S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Switch the state passed to subsequently registered handlers.
    pub fn with_state<T>(self, state: T) -> ServiceBuilder<'a, T>
    where
        T: Clone + Send + Sync + 'static,
    {
        ServiceBuilder {
            service: self.service,
            methods: self.methods,
            state,
        }
    }

    /// Register a typed handler. Params are deserialized into `Req`; a
    /// failure there is a `Validation` error and the handler is not called.
    pub fn method<Req, Resp, F, Fut>(self, name: &str, handler: F) -> Self
    where
        Req: DeserializeOwned + Send + 'static,
        Resp: Serialize + Send + 'static,
        F: Fn(S, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp, AdminError>> + Send + 'static,
    {
        let state = self.state.clone();
        let erased: Handler = Arc::new(move |params: Value| -> HandlerFuture {
            let request: Req = match serde_json::from_value(params) {
                Ok(r) => r,
                Err(e) => {
                    return Box::pin(std::future::ready(Err(AdminError::Validation(format!(
                        "Failed to deserialize request: {}",
                        e
                    )))))
                }
            };
            let fut = handler(state.clone(), request);
            Box::pin(async move { encode(fut.await?) })
        });
        tracing::debug!("Registered {}/{}", self.service, name);
        self.methods.insert(name.to_string(), Route::Ready(erased));
        self
    }

    /// Declare a known method whose logic is not supplied.
    pub fn pending(self, name: &str) -> Self {
        tracing::debug!("Registered {}/{} (pending)", self.service, name);
        self.methods.insert(name.to_string(), Route::Pending);
        self
    }
}

fn encode<Resp: Serialize>(response: Resp) -> Result<Value, AdminError> {
    serde_json::to_value(response)
        .map_err(|e| AdminError::Internal(format!("Failed to serialize response: {}", e)))
}
