use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Identifier a navigation link declares for the page it points at
/// (`data-page` in the injected markup), e.g. `overview` or `section-01`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageKey(pub String);

impl PageKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PageKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PageKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One entry of the shared navigation header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub href: String,
    pub label: String,
    pub page_key: PageKey,
}

impl NavLink {
    pub fn new(href: impl Into<String>, label: impl Into<String>, page_key: impl Into<PageKey>) -> Self {
        Self {
            href: href.into(),
            label: label.into(),
            page_key: page_key.into(),
        }
    }
}

/// Physical page size of the exported document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    Letter,
    Legal,
}

impl PaperSize {
    /// Width and height in inches, as the engine's print API expects
    pub const fn dimensions_in(self) -> (f64, f64) {
        match self {
            Self::A4 => (8.27, 11.69),
            Self::A3 => (11.69, 16.54),
            Self::Letter => (8.5, 11.0),
            Self::Legal => (8.5, 14.0),
        }
    }

    /// Name used in the CSS `@page { size: ... }` rule
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::A3 => "A3",
            Self::Letter => "letter",
            Self::Legal => "legal",
        }
    }
}

/// Convert millimetres to inches
pub const fn mm_to_in(mm: f64) -> f64 {
    mm / 25.4
}

/// PDF page layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfConfig {
    #[serde(default)]
    pub paper: PaperSize,

    #[serde(default = "default_vertical_margin")]
    pub margin_top_mm: f64,

    #[serde(default = "default_vertical_margin")]
    pub margin_bottom_mm: f64,

    #[serde(default = "default_horizontal_margin")]
    pub margin_left_mm: f64,

    #[serde(default = "default_horizontal_margin")]
    pub margin_right_mm: f64,

    #[serde(default = "default_true")]
    pub print_background: bool,

    /// Static header line (defaults to the document title)
    pub header_title: Option<String>,
}

const fn default_vertical_margin() -> f64 {
    20.0
}

const fn default_horizontal_margin() -> f64 {
    18.0
}

const fn default_true() -> bool {
    true
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            paper: PaperSize::default(),
            margin_top_mm: default_vertical_margin(),
            margin_bottom_mm: default_vertical_margin(),
            margin_left_mm: default_horizontal_margin(),
            margin_right_mm: default_horizontal_margin(),
            print_background: true,
            header_title: None,
        }
    }
}

/// Headless browser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Chrome/Chromium binary (auto-detected when unset)
    pub chrome_path: Option<PathBuf>,

    /// Run Chrome with its sandbox enabled
    #[serde(default)]
    pub sandbox: bool,

    /// Timeout applied to each engine step (navigation, readiness, export)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra fixed delay after the readiness probe succeeds
    #[serde(default)]
    pub settle_delay_ms: u64,
}

const fn default_timeout_secs() -> u64 {
    60
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            sandbox: false,
            timeout_secs: default_timeout_secs(),
            settle_delay_ms: 0,
        }
    }
}

/// Shared navigation header configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_brand")]
    pub brand: String,

    /// Page key used when the current path has no final segment
    #[serde(default = "default_home_key")]
    pub home_key: PageKey,

    /// Id of the element that receives the navigation markup
    #[serde(default = "default_placeholder_id")]
    pub placeholder_id: String,

    #[serde(default = "default_nav_links")]
    pub links: Vec<NavLink>,
}

fn default_brand() -> String {
    "WindCatcher".to_string()
}

fn default_home_key() -> PageKey {
    PageKey::new("index")
}

fn default_placeholder_id() -> String {
    "header-placeholder".to_string()
}

fn default_nav_links() -> Vec<NavLink> {
    vec![
        NavLink::new("index.html", "Home", "index"),
        NavLink::new("overview.html", "Overview", "overview"),
        NavLink::new("section-01.html", "Inlet Design", "section-01"),
        NavLink::new("section-03.html", "Nose Cone", "section-03"),
        NavLink::new("section-04.html", "Vanes", "section-04"),
        NavLink::new("section-05.html", "MVG", "section-05"),
        NavLink::new("section-06.html", "Diffuser", "section-06"),
        NavLink::new("section-07.html", "Summary", "section-07"),
        NavLink::new("appendix.html", "Appendix", "appendix"),
        NavLink::new("citations.html", "Citations", "citations"),
    ]
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            brand: default_brand(),
            home_key: default_home_key(),
            placeholder_id: default_placeholder_id(),
            links: default_nav_links(),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Root of the generated site
    #[serde(default = "default_site_dir")]
    pub site_dir: PathBuf,

    /// Output PDF path (overwritten on every run)
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Shared stylesheet, relative to `site_dir`
    #[serde(default = "default_stylesheet")]
    pub stylesheet: PathBuf,

    /// Title of the combined document
    #[serde(default = "default_title")]
    pub title: String,

    /// Page files in document order
    #[serde(default = "default_pages")]
    pub pages: Vec<String>,

    /// Fail when a configured page is missing instead of skipping it
    #[serde(default)]
    pub strict: bool,

    /// Directory for the temporary combined document (current directory when unset)
    pub work_dir: Option<PathBuf>,

    #[serde(default)]
    pub pdf: PdfConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub navigation: NavigationConfig,
}

fn default_site_dir() -> PathBuf {
    PathBuf::from("site")
}

fn default_output() -> PathBuf {
    PathBuf::from("WindCatcher.pdf")
}

fn default_stylesheet() -> PathBuf {
    PathBuf::from("assets/css/main.css")
}

fn default_title() -> String {
    "WindCatcher — Technical Documentation".to_string()
}

fn default_pages() -> Vec<String> {
    [
        "index.html",
        "overview.html",
        "section-01.html",
        "section-03.html",
        "section-04.html",
        "section-05.html",
        "section-06.html",
        "section-07.html",
        "appendix.html",
        "citations.html",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            site_dir: default_site_dir(),
            output: default_output(),
            stylesheet: default_stylesheet(),
            title: default_title(),
            pages: default_pages(),
            strict: false,
            work_dir: None,
            pdf: PdfConfig::default(),
            engine: EngineConfig::default(),
            navigation: NavigationConfig::default(),
        }
    }
}

impl ExportConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::ConfigLoad(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations (~/.config/sitepdf/config.toml, ./sitepdf.toml)
    pub fn load() -> Self {
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("sitepdf").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        let local_config = PathBuf::from("sitepdf.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./sitepdf.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./sitepdf.toml: {}", e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    /// Check values a TOML file or CLI flag could have set out of range
    pub fn validate(&self) -> Result<()> {
        let margins = [
            ("pdf.margin_top_mm", self.pdf.margin_top_mm),
            ("pdf.margin_bottom_mm", self.pdf.margin_bottom_mm),
            ("pdf.margin_left_mm", self.pdf.margin_left_mm),
            ("pdf.margin_right_mm", self.pdf.margin_right_mm),
        ];
        for (field, value) in margins {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::ConfigInvalid {
                    field: field.to_string(),
                    reason: format!("must be a non-negative number, got {value}"),
                });
            }
        }

        if self.pages.is_empty() {
            return Err(Error::ConfigInvalid {
                field: "pages".to_string(),
                reason: "at least one page is required".to_string(),
            });
        }

        if self.engine.timeout_secs == 0 {
            return Err(Error::ConfigInvalid {
                field: "engine.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Absolute-or-relative path of the shared stylesheet
    pub fn stylesheet_path(&self) -> PathBuf {
        self.site_dir.join(&self.stylesheet)
    }

    /// Header line printed on every page
    pub fn header_title(&self) -> &str {
        self.pdf.header_title.as_deref().unwrap_or(&self.title)
    }
}
