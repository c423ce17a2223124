//! Endpoint handlers.
//!
//! Message endpoints answer `{"message": ...}`. `/echo` decodes its body
//! itself so that malformed JSON, oversized bodies and wrong methods each map
//! to their own status.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::FromRequest;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::handler::Handler;
use crate::http::response::{self, error_response};
use crate::routing::PathParamsExt;

/// Response body of the message endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EchoRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EchoResponse {
    pub echo: String,
}

fn message(text: impl Into<String>) -> Response {
    Json(MessageResponse {
        message: text.into(),
    })
    .into_response()
}

pub async fn hello(_req: Request<Body>) -> Response {
    message("Hello, world!")
}

pub async fn greet(req: Request<Body>) -> Response {
    match req.path_param("name") {
        Some(name) => message(format!("Hello, {name}!")),
        // Only reachable if mounted on a pattern without `:name`.
        None => response::internal_error(),
    }
}

pub async fn time(_req: Request<Body>) -> Response {
    message(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Why an echo request was rejected.
#[derive(Debug, Error)]
pub enum EchoError {
    #[error("method {0} not allowed")]
    MethodNotAllowed(Method),

    #[error("request body too large")]
    TooLarge,

    #[error("failed to read request body")]
    Unreadable,

    #[error("malformed JSON body: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl IntoResponse for EchoError {
    fn into_response(self) -> Response {
        match self {
            EchoError::MethodNotAllowed(_) => {
                let mut response =
                    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
                response
                    .headers_mut()
                    .insert(header::ALLOW, header::HeaderValue::from_static("POST"));
                response
            }
            EchoError::TooLarge => error_response(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large"),
            EchoError::Unreadable => error_response(StatusCode::BAD_REQUEST, "Bad Request"),
            // Parser positions stay in the log, not in the response.
            EchoError::Malformed(_) => error_response(StatusCode::BAD_REQUEST, "Invalid JSON body"),
        }
    }
}

/// `POST /echo`: returns the `message` field of the JSON body as `echo`.
///
/// Rejects other methods itself, so it can be mounted under more than one
/// method and still answer 405 for anything but POST.
#[derive(Debug, Clone, Copy, Default)]
pub struct Echo;

impl Echo {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self)
    }

    async fn handle(request: Request<Body>) -> Result<Json<EchoResponse>, EchoError> {
        if request.method() != Method::POST {
            return Err(EchoError::MethodNotAllowed(request.method().clone()));
        }

        // Honours the body limit installed by the transport layer.
        let body = Bytes::from_request(request, &()).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                EchoError::TooLarge
            } else {
                EchoError::Unreadable
            }
        })?;

        let payload: EchoRequest = serde_json::from_slice(&body)?;
        Ok(Json(EchoResponse {
            echo: payload.message,
        }))
    }
}

impl Handler for Echo {
    fn call(&self, request: Request<Body>) -> BoxFuture<'static, Response> {
        Box::pin(async move {
            match Self::handle(request).await {
                Ok(body) => body.into_response(),
                Err(e) => {
                    tracing::debug!(error = %e, "Echo request rejected");
                    e.into_response()
                }
            }
        })
    }
}
