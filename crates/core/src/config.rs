//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup (the binary reads the environment) and
//! then passed into the command layer. Library code never reads environment variables.

use crate::constants::{DEFAULT_DATA_FILE, DEFAULT_TEMPLATE_DIR, DEFAULT_TEMPLATE_NAME};
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    template_dir: PathBuf,
    default_template: String,
    default_data_file: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if any of the names is empty.
    pub fn new(
        template_dir: PathBuf,
        default_template: String,
        default_data_file: String,
    ) -> CoreResult<Self> {
        if template_dir.as_os_str().is_empty() {
            return Err(CoreError::InvalidInput(
                "template_dir cannot be empty".into(),
            ));
        }
        if default_template.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "default_template cannot be empty".into(),
            ));
        }
        if default_data_file.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "default_data_file cannot be empty".into(),
            ));
        }

        Ok(Self {
            template_dir,
            default_template,
            default_data_file,
        })
    }

    /// Defaults with the template directory replaced, if an override is given.
    ///
    /// A blank override is treated as absent.
    pub fn with_template_dir_override(override_dir: Option<String>) -> CoreResult<Self> {
        let template_dir = override_dir
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_DIR));

        Self::new(
            template_dir,
            DEFAULT_TEMPLATE_NAME.to_string(),
            DEFAULT_DATA_FILE.to_string(),
        )
    }

    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    pub fn default_template(&self) -> &str {
        &self.default_template
    }

    pub fn default_data_file(&self) -> &str {
        &self.default_data_file
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            default_template: DEFAULT_TEMPLATE_NAME.to_string(),
            default_data_file: DEFAULT_DATA_FILE.to_string(),
        }
    }
}

/// Locate a template file.
///
/// `requested` is used as given if it names a file; otherwise the same name is looked up
/// inside the configured template directory.
///
/// # Errors
///
/// Returns `CoreError::TemplateNotFound` naming both candidates if neither is a file.
pub fn resolve_template_path(config: &CoreConfig, requested: &Path) -> CoreResult<PathBuf> {
    if requested.is_file() {
        return Ok(requested.to_path_buf());
    }

    let fallback = config.template_dir().join(requested);
    if fallback.is_file() {
        tracing::debug!(
            "template {} not found, using {}",
            requested.display(),
            fallback.display()
        );
        return Ok(fallback);
    }

    Err(CoreError::TemplateNotFound {
        requested: requested.to_path_buf(),
        fallback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_for(dir: &Path) -> CoreConfig {
        CoreConfig::new(
            dir.to_path_buf(),
            DEFAULT_TEMPLATE_NAME.into(),
            DEFAULT_DATA_FILE.into(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_empty_names() {
        assert!(CoreConfig::new(PathBuf::new(), "a.xml".into(), "b.xml".into()).is_err());
        assert!(CoreConfig::new("t".into(), "  ".into(), "b.xml".into()).is_err());
        assert!(CoreConfig::new("t".into(), "a.xml".into(), String::new()).is_err());
    }

    #[test]
    fn test_template_dir_override() {
        let config = CoreConfig::with_template_dir_override(Some(" /srv/tpl ".into())).unwrap();
        assert_eq!(config.template_dir(), Path::new("/srv/tpl"));

        let config = CoreConfig::with_template_dir_override(Some("   ".into())).unwrap();
        assert_eq!(config.template_dir(), Path::new(DEFAULT_TEMPLATE_DIR));

        let config = CoreConfig::with_template_dir_override(None).unwrap();
        assert_eq!(config.default_template(), "default.xml");
        assert_eq!(config.default_data_file(), "resume.xml");
    }

    #[test]
    fn test_resolve_prefers_requested_path() {
        let dir = TempDir::new().unwrap();
        let direct = dir.path().join("mine.xml");
        std::fs::write(&direct, "x").unwrap();

        let resolved =
            resolve_template_path(&config_for(&dir.path().join("tpl")), &direct).unwrap();
        assert_eq!(resolved, direct);
    }

    #[test]
    fn test_resolve_falls_back_to_template_dir() {
        let dir = TempDir::new().unwrap();
        let templates = dir.path().join("tpl");
        std::fs::create_dir(&templates).unwrap();
        std::fs::write(templates.join("fancy.xml"), "x").unwrap();

        let resolved =
            resolve_template_path(&config_for(&templates), Path::new("fancy.xml")).unwrap();
        assert_eq!(resolved, templates.join("fancy.xml"));
    }

    #[test]
    fn test_resolve_missing_names_both_candidates() {
        let dir = TempDir::new().unwrap();
        let templates = dir.path().join("tpl");
        let err = resolve_template_path(&config_for(&templates), Path::new("nope.xml"))
            .unwrap_err();
        match err {
            CoreError::TemplateNotFound {
                requested,
                fallback,
            } => {
                assert_eq!(requested, PathBuf::from("nope.xml"));
                assert_eq!(fallback, templates.join("nope.xml"));
            }
            other => panic!("expected TemplateNotFound, got {other}"),
        }
    }
}
