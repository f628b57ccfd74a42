// ABOUTME: Index page listing the registered spec files for the Swagger UI spec selector.
// ABOUTME: Renders the compiled Askama template fully before responding so failures never leak partial HTML.

use std::fmt::Display;

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use specgate_core::RegisteredSpec;

use crate::response::status_response;

/// Gateway landing page. Each spec becomes a link the page script turns into
/// an entry of the UI's spec selector.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub specs: &'a [RegisteredSpec],
}

/// Render the index page for the given entries.
pub fn render_index(specs: &[RegisteredSpec]) -> Response {
    match (IndexTemplate { specs }).render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => render_failure(&err),
    }
}

/// Log a render error and answer with a bare 500; the error stays server-side.
fn render_failure(err: &dyn Display) -> Response {
    tracing::error!(error = %err, "failed to render index page");
    status_response(StatusCode::INTERNAL_SERVER_ERROR)
}
