//! HTTP route handlers for the preview server.
//!
//! HTML pages get the shared navigation injected on every request, with the
//! link for the requested path highlighted. Other files are served as is.

use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

use crate::helpers::{IoResultExt, RouteResult, is_html, validate_segment};
use crate::state::AppState;

/// Site root
pub async fn index(State(state): State<Arc<AppState>>) -> RouteResult<Html<String>> {
    render_page(&state, "index.html", "/").await
}

/// Top-level site file
pub async fn site_file(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> RouteResult<Response> {
    validate_segment(&name)?;

    if is_html(&name) {
        let path = format!("/{name}");
        return Ok(render_page(&state, &name, &path).await?.into_response());
    }

    let bytes = tokio::fs::read(state.site_file(&name)).await.or_not_found(&name)?;
    let mime = mime_guess::from_path(&name).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response())
}

async fn render_page(state: &AppState, name: &str, request_path: &str) -> RouteResult<Html<String>> {
    let bytes = tokio::fs::read(state.site_file(name)).await.or_not_found(name)?;
    let html = String::from_utf8_lossy(&bytes).into_owned();

    match state.injector.inject(&html, request_path) {
        Some(injected) => Ok(Html(injected)),
        None => {
            debug!("{} has no navigation placeholder", name);
            Ok(Html(html))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use sitepdf_core::ExportConfig;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>Overview</title></head>
<body><div id="header-placeholder"></div><main><h1>Overview</h1></main></body></html>"#;

    fn app() -> (TempDir, Router) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), PAGE).unwrap();
        std::fs::write(dir.path().join("overview.html"), PAGE).unwrap();
        std::fs::write(dir.path().join("plain.html"), "<p>plain</p>").unwrap();
        std::fs::write(dir.path().join("logo.svg"), "<svg></svg>").unwrap();

        let config = ExportConfig {
            site_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let state = Arc::new(AppState::new(&config).unwrap());
        let router = Router::new()
            .route("/", get(index))
            .route("/{name}", get(site_file))
            .with_state(state);
        (dir, router)
    }

    async fn get_body(router: Router, uri: &str) -> (StatusCode, String, Option<String>) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap(), content_type)
    }

    #[tokio::test]
    async fn test_index_gets_navigation() {
        let (_dir, router) = app();
        let (status, body, _) = get_body(router, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("nav-links"));
        assert!(body.contains("WindCatcher"));
    }

    #[tokio::test]
    async fn test_page_highlights_its_link() {
        let (_dir, router) = app();
        let (status, body, _) = get_body(router, "/overview.html").await;

        assert_eq!(status, StatusCode::OK);
        let document = sitepdf_core::html::parse_document(&body);
        let active: Vec<String> = document
            .select(".nav-links a.active")
            .unwrap()
            .map(|a| a.attributes.borrow().get("data-page").unwrap_or_default().to_string())
            .collect();
        assert_eq!(active, vec!["overview".to_string()]);
    }

    #[tokio::test]
    async fn test_page_without_placeholder_served_unchanged() {
        let (_dir, router) = app();
        let (status, body, _) = get_body(router, "/plain.html").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<p>plain</p>");
    }

    #[tokio::test]
    async fn test_asset_content_type() {
        let (_dir, router) = app();
        let (status, body, content_type) = get_body(router, "/logo.svg").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<svg></svg>");
        assert_eq!(content_type.as_deref(), Some("image/svg+xml"));
    }

    #[tokio::test]
    async fn test_missing_page_is_404() {
        let (_dir, router) = app();
        let (status, _, _) = get_body(router, "/nope.html").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_parent_segment_rejected() {
        let (_dir, router) = app();
        let (status, _, _) = get_body(router, "/..secret").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
