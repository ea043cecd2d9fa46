//! The chat page, compiled into the binary with `include_str!`.

use axum::{
    Router,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};

const INDEX_HTML: &str = include_str!("../frontend/index.html");
const STYLE_CSS: &str = include_str!("../frontend/style.css");
const APP_JS: &str = include_str!("../frontend/app.js");

/// Routes for `/` and the two static assets it loads.
pub fn frontend_router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route(
            "/static/style.css",
            get(|| async { static_asset("text/css; charset=utf-8", STYLE_CSS) }),
        )
        .route(
            "/static/app.js",
            get(|| async { static_asset("application/javascript; charset=utf-8", APP_JS) }),
        )
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

fn static_asset(content_type: &'static str, body: &'static str) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
}
