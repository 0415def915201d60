//! Uniform 500 responses for faults the handlers do not deal with.
//!
//! Handlers (via [`crate::error::ApiError`]) and the panic catcher only tag
//! a bare 500 response with a [`Fault`]. [`error_boundary`] runs outermost,
//! knows the request path, and renders the tagged response as
//! `{status, title, instance}`. Fault details never reach the client.

use std::any::Any;

use axum::{
    Json,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Class of an unhandled fault, carried as a response extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Storage,
    Unexpected,
}

impl Fault {
    pub fn title(self) -> &'static str {
        match self {
            Fault::Storage => "A database error occurred.",
            Fault::Unexpected => "An unexpected error occurred.",
        }
    }
}

#[derive(Debug, Serialize)]
struct ProblemDetails {
    status: u16,
    title: &'static str,
    instance: String,
}

/// A 500 response tagged with `fault`, to be rendered by [`error_boundary`].
pub fn fault_response(fault: Fault) -> Response {
    let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
    response.extensions_mut().insert(fault);
    response
}

/// Panic handler for `tower_http::catch_panic::CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = detail, "handler panicked");
    fault_response(Fault::Unexpected)
}

pub async fn error_boundary(request: Request, next: Next) -> Response {
    let instance = request.uri().path().to_string();
    let response = next.run(request).await;

    match response.extensions().get::<Fault>().copied() {
        Some(fault) => {
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            let body = ProblemDetails {
                status: status.as_u16(),
                title: fault.title(),
                instance,
            };
            (status, Json(body)).into_response()
        }
        None => response,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn titles_do_not_leak_detail() {
        assert_eq!(Fault::Storage.title(), "A database error occurred.");
        assert_eq!(Fault::Unexpected.title(), "An unexpected error occurred.");
    }

    #[test]
    fn panic_response_accepts_any_payload() {
        let response = panic_response(Box::new(42_u8));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.extensions().get::<Fault>(), Some(&Fault::Unexpected));
    }

    #[test]
    fn problem_details_field_names() {
        let json = serde_json::to_value(ProblemDetails {
            status: 500,
            title: Fault::Storage.title(),
            instance: "/api/tax/all".to_string(),
        })
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": 500,
                "title": "A database error occurred.",
                "instance": "/api/tax/all",
            })
        );
    }
}
