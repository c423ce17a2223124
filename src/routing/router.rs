//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store routes per HTTP method in registration order
//! - Look up the first route whose pattern matches the request path
//! - Attach extracted parameters to the request and invoke the handler
//! - Answer 405 for unknown methods and 404 for unknown paths
//!
//! # Design Decisions
//! - Registration takes `&mut self`, dispatch takes `&self`: once the router
//!   is frozen behind `Arc` the table cannot change (thread-safe without locks)
//! - O(1) method lookup via HashMap, O(n) pattern scan per method
//! - First match wins; duplicates are kept and shadowed, not rejected

use std::collections::HashMap;
use std::future;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use futures_util::future::BoxFuture;

use crate::http::handler::{BoxHandler, Handler};
use crate::http::response;
use crate::routing::matcher::PathPattern;
use crate::routing::params::PathParams;

/// A single (method, pattern, handler) registration.
pub struct Route {
    method: Method,
    pattern: PathPattern,
    handler: BoxHandler,
}

impl Route {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Outcome of a route lookup.
pub enum RouteMatch<'a> {
    /// A route matched; the parameters are fresh for this lookup.
    Found {
        route: &'a Route,
        params: PathParams,
    },
    /// The method has routes, but none matched the path.
    NotFound,
    /// No route at all is registered for the method.
    MethodNotAllowed,
}

/// Method-keyed route table with first-match dispatch.
#[derive(Debug, Default)]
pub struct Router {
    routes: HashMap<Method, Vec<Route>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Earlier registrations take priority at dispatch time.
    pub fn register(&mut self, method: Method, pattern: &str, handler: BoxHandler) -> &mut Self {
        let pattern = PathPattern::parse(pattern);
        let routes = self.routes.entry(method.clone()).or_default();

        if routes.iter().any(|r| r.pattern == pattern) {
            tracing::debug!(
                method = %method,
                pattern = %pattern.as_str(),
                "Duplicate route registered; earlier registration wins"
            );
        }

        routes.push(Route {
            method,
            pattern,
            handler,
        });
        self
    }

    pub fn get(&mut self, pattern: &str, handler: BoxHandler) -> &mut Self {
        self.register(Method::GET, pattern, handler)
    }

    pub fn post(&mut self, pattern: &str, handler: BoxHandler) -> &mut Self {
        self.register(Method::POST, pattern, handler)
    }

    /// Number of registered routes across all methods.
    pub fn len(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find the first route for `method` whose pattern matches `path`.
    pub fn lookup(&self, method: &Method, path: &str) -> RouteMatch<'_> {
        let Some(routes) = self.routes.get(method) else {
            return RouteMatch::MethodNotAllowed;
        };

        routes
            .iter()
            .find_map(|route| {
                route
                    .pattern
                    .matches(path)
                    .map(|params| RouteMatch::Found { route, params })
            })
            .unwrap_or(RouteMatch::NotFound)
    }

    /// Route a request to its handler.
    pub fn dispatch(&self, mut request: Request<Body>) -> BoxFuture<'static, Response> {
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        match self.lookup(&method, &path) {
            RouteMatch::Found { route, params } => {
                tracing::trace!(
                    method = %method,
                    path = %path,
                    pattern = %route.pattern.as_str(),
                    params = params.len(),
                    "Route matched"
                );
                request.extensions_mut().insert(params);
                route.handler.call(request)
            }
            RouteMatch::NotFound => {
                tracing::debug!(method = %method, path = %path, "No route matched");
                Box::pin(future::ready(response::not_found()))
            }
            RouteMatch::MethodNotAllowed => {
                tracing::debug!(method = %method, path = %path, "Method has no routes");
                Box::pin(future::ready(response::method_not_allowed()))
            }
        }
    }
}

impl Handler for Router {
    fn call(&self, request: Request<Body>) -> BoxFuture<'static, Response> {
        self.dispatch(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handler::handler_fn;
    use crate::routing::params::PathParamsExt;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn tagged(tag: &'static str) -> BoxHandler {
        handler_fn(move |_req: Request<Body>| async move { tag.into_response() })
    }

    async fn echo_id(req: Request<Body>) -> Response {
        req.path_param("id").unwrap_or("<none>").to_string().into_response()
    }

    fn request(method: Method, path: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn dispatches_to_matching_route() {
        let mut router = Router::new();
        router.get("/a", tagged("a")).get("/b", tagged("b"));

        let response = router.dispatch(request(Method::GET, "/b")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "b");
    }

    #[tokio::test]
    async fn parameters_reach_the_handler() {
        let mut router = Router::new();
        router.get("/users/:id", handler_fn(echo_id));

        let response = router.dispatch(request(Method::GET, "/users/42")).await;
        assert_eq!(body_text(response).await, "42");
    }

    #[tokio::test]
    async fn first_registration_wins() {
        let mut router = Router::new();
        router.get("/a/:id", tagged("param")).get("/a/b", tagged("literal"));

        let response = router.dispatch(request(Method::GET, "/a/b")).await;
        assert_eq!(body_text(response).await, "param");

        let mut router = Router::new();
        router.get("/a/b", tagged("literal")).get("/a/:id", tagged("param"));

        let response = router.dispatch(request(Method::GET, "/a/b")).await;
        assert_eq!(body_text(response).await, "literal");
    }

    #[tokio::test]
    async fn duplicate_routes_are_kept_and_shadowed() {
        let mut router = Router::new();
        router.get("/dup", tagged("first")).get("/dup", tagged("second"));
        assert_eq!(router.len(), 2);

        let response = router.dispatch(request(Method::GET, "/dup")).await;
        assert_eq!(body_text(response).await, "first");
    }

    #[tokio::test]
    async fn unknown_method_is_405() {
        let mut router = Router::new();
        router.get("/a", tagged("a"));

        let response = router.dispatch(request(Method::DELETE, "/a")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let mut router = Router::new();
        router.get("/a", tagged("a"));

        let response = router.dispatch(request(Method::GET, "/nope")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn lookup_reports_outcome() {
        let mut router = Router::new();
        router.post("/items/:id", tagged("item"));

        match router.lookup(&Method::POST, "/items/3") {
            RouteMatch::Found { route, params } => {
                assert_eq!(route.method(), &Method::POST);
                assert_eq!(route.pattern().as_str(), "/items/:id");
                assert_eq!(params.get("id"), Some("3"));
            }
            _ => panic!("expected a match"),
        }
        assert!(matches!(
            router.lookup(&Method::POST, "/items"),
            RouteMatch::NotFound
        ));
        assert!(matches!(
            router.lookup(&Method::GET, "/items/3"),
            RouteMatch::MethodNotAllowed
        ));
    }

    #[tokio::test]
    async fn params_are_fresh_per_dispatch() {
        let mut router = Router::new();
        router.get("/users/:id", handler_fn(echo_id));

        let first = router.dispatch(request(Method::GET, "/users/1")).await;
        let second = router.dispatch(request(Method::GET, "/users/2")).await;
        assert_eq!(body_text(first).await, "1");
        assert_eq!(body_text(second).await, "2");
    }
}
