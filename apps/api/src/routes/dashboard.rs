use axum::response::Html;

const DASHBOARD_HTML: &str = include_str!("../../static/index.html");

/// GET /
/// Serves the bundled single-page dashboard, which posts to `/api/generate`.
pub async fn dashboard_handler() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}
