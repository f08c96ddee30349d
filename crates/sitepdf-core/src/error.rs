use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for sitepdf-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Site input (missing stylesheet, missing pages in strict mode)
/// - HTML parsing and template rendering
/// - Rendering engine lifecycle (launch, navigation, readiness, export)
/// - Configuration operations (loading, validation)
/// - General I/O operations
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Site Errors
    // ==========================================================================
    /// The shared stylesheet could not be read
    #[error("failed to read stylesheet {path}: {reason}")]
    StylesheetMissing { path: PathBuf, reason: String },

    /// Configured pages are absent from the site root (strict mode only)
    #[error("missing pages in {}: {}", site_dir.display(), pages.join(", "))]
    MissingPages { site_dir: PathBuf, pages: Vec<String> },

    /// The site root directory does not exist or cannot be resolved
    #[error("invalid site directory {path}: {reason}")]
    SiteDir { path: PathBuf, reason: String },

    /// No page of the configured list could be loaded
    #[error("no pages could be loaded from {0}")]
    NoPages(PathBuf),

    // ==========================================================================
    // HTML Errors
    // ==========================================================================
    /// A path could not be expressed as a file:// URL
    #[error("cannot build file URL for {0}")]
    FileUrl(PathBuf),

    /// Failed to render an askama template
    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),

    // ==========================================================================
    // Rendering Engine Errors
    // ==========================================================================
    /// The headless browser could not be started
    #[error("failed to launch rendering engine: {0}")]
    EngineLaunch(String),

    /// The engine could not load the combined document
    #[error("rendering engine failed to load {url}: {reason}")]
    EngineNavigation { url: String, reason: String },

    /// The in-page readiness probe did not report completion
    #[error("rendering engine did not report the document as ready: {0}")]
    EngineNotReady(String),

    /// PDF export failed
    #[error("PDF export failed: {0}")]
    EngineExport(String),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
