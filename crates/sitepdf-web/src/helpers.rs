//! Helper types and traits for cleaner route handlers.

use axum::http::StatusCode;
use std::io::ErrorKind;
use std::path::Path;

/// Standard result type for route handlers.
pub type RouteResult<T> = Result<T, (StatusCode, String)>;

/// Extension trait for converting I/O results into HTTP errors.
pub trait IoResultExt<T> {
    /// Missing files become 404 Not Found, anything else 500.
    fn or_not_found(self, name: &str) -> RouteResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn or_not_found(self, name: &str) -> RouteResult<T> {
        self.map_err(|e| match e.kind() {
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, format!("{name} not found")),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        })
    }
}

/// Validate a single path segment taken from the URL.
///
/// Returns 400 Bad Request for anything that could leave the site root.
pub fn validate_segment(segment: &str) -> RouteResult<()> {
    if segment.is_empty()
        || segment == "."
        || segment.contains("..")
        || segment.contains(['/', '\\'])
        || Path::new(segment).is_absolute()
    {
        Err((StatusCode::BAD_REQUEST, format!("Invalid path: {segment}")))
    } else {
        Ok(())
    }
}

pub fn is_html(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}
