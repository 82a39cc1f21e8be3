//! Parameter store routes.

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::Response,
};

use crate::auxiliary::DownstreamError;
use crate::http::handlers::{forward, internal_error};
use crate::http::server::AppState;

/// Forwarded in place of a missing `name` query parameter.
pub const MISSING_NAME: &str = "undefined";

/// GET /api/parameters/list
pub async fn list_parameters(State(state): State<AppState>) -> Response {
    forward(&state, "/aws/parameters/list", internal_error).await
}

/// GET /api/parameters?name=<name>
pub async fn get_parameter_value(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let name = parameter_name(query.as_deref());
    let endpoint = format!("/aws/parameters?name={name}");
    forward(&state, &endpoint, lookup_status).await
}

/// First `name` value of the query string, or [`MISSING_NAME`].
fn parameter_name(query: Option<&str>) -> String {
    query
        .and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "name")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_else(|| MISSING_NAME.to_string())
}

/// 404 when the downstream message says "not found", 500 otherwise.
///
/// Case-sensitive substring match on the rendered error.
// TODO: dispatch on a typed not-found failure once the auxiliary service
// reports one in a structured field.
pub fn lookup_status(err: &DownstreamError) -> StatusCode {
    if err.to_string().contains("not found") {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auxiliary::DownstreamFailure;

    #[test]
    fn test_parameter_name() {
        assert_eq!(parameter_name(None), "undefined");
        assert_eq!(parameter_name(Some("other=1")), "undefined");
        assert_eq!(parameter_name(Some("name=")), "");
        assert_eq!(parameter_name(Some("name=db%2Fpassword")), "db/password");
        assert_eq!(parameter_name(Some("name=first&name=second")), "first");
    }

    #[test]
    fn test_lookup_status() {
        let not_found = DownstreamError::new(
            "/aws/parameters?name=x",
            DownstreamFailure::Unavailable("dns error: host not found".to_string()),
        );
        assert_eq!(lookup_status(&not_found), StatusCode::NOT_FOUND);

        // Case-sensitive
        let shouting = DownstreamError::new(
            "/aws/parameters?name=x",
            DownstreamFailure::Unavailable("Host Not Found".to_string()),
        );
        assert_eq!(lookup_status(&shouting), StatusCode::INTERNAL_SERVER_ERROR);

        let unavailable = DownstreamError::new(
            "/aws/parameters?name=x",
            DownstreamFailure::Unavailable("connection refused".to_string()),
        );
        assert_eq!(lookup_status(&unavailable), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_downstream_404_body_does_not_make_a_404() {
        // Only the status line reaches the message, never the body
        let err = DownstreamError::new(
            "/aws/parameters?name=x",
            DownstreamFailure::from_status(404, r#"{"error":"Parameter x not found"}"#),
        );
        assert_eq!(lookup_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
