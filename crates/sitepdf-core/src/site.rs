//! Checks of the configured page list against what the site root contains.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Result of comparing the page list with the site root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteReport {
    pub site_dir: PathBuf,
    /// Configured pages found on disk, in list order
    pub present: Vec<String>,
    /// Configured pages with no file behind them, in list order
    pub missing: Vec<String>,
    /// Top-level `.html` files not in the list, sorted
    pub unlisted: Vec<String>,
}

impl SiteReport {
    pub fn scan(site_dir: &Path, pages: &[String]) -> Result<Self> {
        let mut report = Self {
            site_dir: site_dir.to_path_buf(),
            ..Default::default()
        };

        for page in pages {
            if site_dir.join(page).is_file() {
                report.present.push(page.clone());
            } else {
                report.missing.push(page.clone());
            }
        }

        for entry in std::fs::read_dir(site_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_html = Path::new(&name)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));

            if is_html && entry.file_type()?.is_file() && !pages.contains(&name) {
                report.unlisted.push(name);
            }
        }
        report.unlisted.sort();

        Ok(report)
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Fail with the list of missing pages, if any
    pub fn ensure_complete(&self) -> Result<()> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(Error::MissingPages {
                site_dir: self.site_dir.clone(),
                pages: self.missing.clone(),
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pages(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_scan_reports_missing_and_unlisted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<main></main>").unwrap();
        std::fs::write(dir.path().join("draft.html"), "<main></main>").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let report = SiteReport::scan(dir.path(), &pages(&["index.html", "overview.html"])).unwrap();

        assert_eq!(report.present, vec!["index.html"]);
        assert_eq!(report.missing, vec!["overview.html"]);
        assert_eq!(report.unlisted, vec!["draft.html"]);
        assert!(!report.is_complete());

        let err = report.ensure_complete().unwrap_err();
        assert!(matches!(err, Error::MissingPages { ref pages, .. } if pages == &["overview.html"]));
    }

    #[test]
    fn test_complete_site() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "").unwrap();

        let report = SiteReport::scan(dir.path(), &pages(&["index.html"])).unwrap();

        assert!(report.is_complete());
        assert!(report.ensure_complete().is_ok());
        assert!(report.unlisted.is_empty());
    }
}
