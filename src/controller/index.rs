// Landing page controller.

use axum::{response::Html, routing::get, Router};

use crate::http::Controller;

/// Static landing page body.
const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>FreshTally</title>
</head>
<body>
  <h1>FreshTally</h1>
  <p>Daily fresh/rotten classification tallies.</p>
  <ul>
    <li><code>POST /update</code> &mdash; report a classification</li>
    <li><code>GET /count</code> &mdash; current counts</li>
    <li><code>GET /history?days=7</code> &mdash; per-day records</li>
  </ul>
</body>
</html>
"#;

/// IndexController serves the landing page.
pub struct IndexController;

impl IndexController {
    /// Creates a new index controller.
    pub fn new() -> Self {
        Self
    }
}

impl Default for IndexController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for IndexController {
    fn add_route(&self, router: Router) -> Router {
        router.route("/", get(|| async { Html(INDEX_HTML) }))
    }
}
