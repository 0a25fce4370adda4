use axum::Router;
use axum::response::Html;
use axum::routing::get;

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Jobfinder</title>
</head>
<body>
    <h1>Jobfinder</h1>
    <p>Scored job listings from Dutch job boards.</p>
    <ul>
        <li><a href="/api/jobs">/api/jobs</a>: listings, best match first</li>
        <li><a href="/api/filters">/api/filters</a>: filter counts</li>
        <li><a href="/api/stats">/api/stats</a>: totals and last scrape</li>
        <li><a href="/api/applications">/api/applications</a>: application tracker</li>
        <li>POST /api/scrape: run a scrape now</li>
    </ul>
    <p>Health: <a href="/healthz">/healthz</a> | <a href="/readyz">/readyz</a></p>
</body>
</html>"#,
    )
}
