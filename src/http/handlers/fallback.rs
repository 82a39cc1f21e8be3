//! Last-resort responses: unknown routes and panicking handlers.
//! Neither asks the auxiliary service for its version.

use std::any::Any;

use axum::{
    body::Body,
    extract::State,
    http::StatusCode,
    response::Response,
};
use tower_http::catch_panic::ResponseForPanic;

use crate::auxiliary::{Versions, UNKNOWN_VERSION};
use crate::http::response::Envelope;
use crate::http::server::AppState;

/// Unmatched path or method.
pub async fn not_found(State(state): State<AppState>) -> Response {
    Envelope::failure("Endpoint not found", state.versions.without_auxiliary())
        .with_status(StatusCode::NOT_FOUND)
}

/// Turns a handler panic into a generic 500 envelope.
#[derive(Debug, Clone)]
pub struct UnhandledPanic {
    main_version: String,
}

impl UnhandledPanic {
    pub fn new(main_version: impl Into<String>) -> Self {
        Self {
            main_version: main_version.into(),
        }
    }
}

impl ResponseForPanic for UnhandledPanic {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Self::ResponseBody> {
        let message = err
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| err.downcast_ref::<&str>().copied())
            .unwrap_or("<non-string panic payload>");
        tracing::error!(panic = %message, "Unhandled error");

        let versions = Versions::new(self.main_version.clone(), UNKNOWN_VERSION);
        Envelope::failure("Internal server error", versions).with_status(StatusCode::INTERNAL_SERVER_ERROR)
    }
}
