//! Path parameters extracted by a successful route match.
//!
//! A fresh `PathParams` is built for every dispatch and stored in the
//! request's extensions. Handlers only ever see it by shared reference, so
//! the bindings cannot change once the router has attached them.

use std::collections::HashMap;

use axum::body::Body;
use axum::http::Request;

/// Named parameter bindings, e.g. `{"id": "42"}` for `/users/:id` and `/users/42`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    bindings: HashMap<String, String>,
}

impl PathParams {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            bindings: HashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn bind(&mut self, name: &str, value: &str) {
        self.bindings.insert(name.to_string(), value.to_string());
    }

    /// Value bound to `name`, if the matched pattern declared it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Extension trait for reading router-attached parameters off a request.
pub trait PathParamsExt {
    /// Parameters attached by the router, or `None` if the request was not routed.
    fn path_params(&self) -> Option<&PathParams>;

    /// Shorthand for `path_params().and_then(|p| p.get(name))`.
    fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params().and_then(|p| p.get(name))
    }
}

impl PathParamsExt for Request<Body> {
    fn path_params(&self) -> Option<&PathParams> {
        self.extensions().get::<PathParams>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        let mut params = PathParams::with_capacity(2);
        params.bind("user", "alice");
        params.bind("post", "7");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("user"), Some("alice"));
        assert_eq!(params.get("post"), Some("7"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn request_extension_lookup() {
        let mut req = Request::builder().uri("/x").body(Body::empty()).unwrap();
        assert!(req.path_params().is_none());
        assert_eq!(req.path_param("id"), None);

        let mut params = PathParams::default();
        params.bind("id", "9");
        req.extensions_mut().insert(params);

        assert_eq!(req.path_param("id"), Some("9"));
    }
}
