//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bodies longer than this many characters are truncated in `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body = match buffer_body(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    log_body(&format!("Received request: {parts:#?}"), &body);

    let request = Request::from_parts(parts, Body::from(body));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body = match buffer_body(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_body(&format!("Sending response: {parts:#?}"), &body);

    Response::from_parts(parts, Body::from(body))
}

async fn buffer_body(body: Body) -> Result<Bytes, axum::Error> {
    axum::body::to_bytes(body, usize::MAX).await
}

fn log_body(message: &str, body: &Bytes) {
    let text = String::from_utf8_lossy(body);

    match truncate(&text, LOG_BODY_LENGTH_LIMIT) {
        Some(truncated) => {
            tracing::info!("{message}\nbody: {truncated}...");
            tracing::debug!("Full body: {text:?}");
        }
        None => tracing::info!("{message}\nbody: {text:?}"),
    }
}

/// The first `limit` characters of `text`, or `None` if `text` is not longer than that.
fn truncate(text: &str, limit: usize) -> Option<&str> {
    text.char_indices()
        .nth(limit)
        .map(|(byte_index, _)| &text[..byte_index])
}

#[cfg(test)]
mod tests {
    use axum::{Router, middleware, routing::post};
    use axum_test::TestServer;

    use super::{logging_middleware, truncate};

    #[test]
    fn short_text_is_not_truncated() {
        assert_eq!(truncate("Salário", 64), None);
    }

    #[test]
    fn truncates_on_character_boundaries() {
        assert_eq!(truncate("ééééé", 3), Some("ééé"));
    }

    #[tokio::test]
    async fn passes_bodies_through_unchanged() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let body = "description=Farmácia&category=Saúde&value=12,50&date=2024-03-15";

        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server.post("/echo").text(body).await;

        response.assert_status_ok();
        response.assert_text(body);
    }
}
