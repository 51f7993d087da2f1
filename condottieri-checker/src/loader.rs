//! Directory-backed scenario loader.
//!
//! Layout: `<root>/settings/<slug>.json` and `<root>/scenarios/<slug>.json`.
use condottieri_scenarios::{Scenario, ScenarioLoader, Setting};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SETTINGS_DIR: &str = "settings";
const SCENARIOS_DIR: &str = "scenarios";
const DOCUMENT_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("{kind} '{slug}' not found at {}", path.display())]
    NotFound {
        kind: &'static str,
        slug: String,
        path: PathBuf,
    },
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} declares slug '{found}' but is named '{expected}'", path.display())]
    SlugMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
}

#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, dir: &str, slug: &str) -> PathBuf {
        self.root
            .join(dir)
            .join(format!("{slug}.{DOCUMENT_EXTENSION}"))
    }

    fn read_document(
        &self,
        kind: &'static str,
        dir: &str,
        slug: &str,
    ) -> Result<(PathBuf, String), LoaderError> {
        let path = self.document_path(dir, slug);
        if !path.is_file() {
            return Err(LoaderError::NotFound {
                kind,
                slug: slug.to_string(),
                path,
            });
        }
        log::debug!("loading {kind} from {}", path.display());
        match fs::read_to_string(&path) {
            Ok(text) => Ok((path, text)),
            Err(source) => Err(LoaderError::Io { path, source }),
        }
    }
}

fn check_slug(path: PathBuf, expected: &str, found: &str) -> Result<(), LoaderError> {
    if expected == found {
        Ok(())
    } else {
        Err(LoaderError::SlugMismatch {
            path,
            expected: expected.to_string(),
            found: found.to_string(),
        })
    }
}

impl ScenarioLoader for DirectoryLoader {
    type Error = LoaderError;

    fn load_setting(&self, slug: &str) -> Result<Setting, Self::Error> {
        let (path, text) = self.read_document("setting", SETTINGS_DIR, slug)?;
        let setting = Setting::from_json(&text).map_err(|source| LoaderError::Parse {
            path: path.clone(),
            source,
        })?;
        check_slug(path, slug, &setting.slug)?;
        Ok(setting)
    }

    fn load_scenario(&self, slug: &str) -> Result<Scenario, Self::Error> {
        let (path, text) = self.read_document("scenario", SCENARIOS_DIR, slug)?;
        let scenario = Scenario::from_json(&text).map_err(|source| LoaderError::Parse {
            path: path.clone(),
            source,
        })?;
        check_slug(path, slug, &scenario.slug)?;
        Ok(scenario)
    }

    fn scenario_slugs(&self) -> Result<Vec<String>, Self::Error> {
        let dir = self.root.join(SCENARIOS_DIR);
        let entries = fs::read_dir(&dir).map_err(|source| LoaderError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut slugs = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| LoaderError::Io {
                    path: dir.clone(),
                    source,
                })?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                slugs.push(stem.to_string());
            }
        }
        slugs.sort();
        Ok(slugs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_loader() -> DirectoryLoader {
        DirectoryLoader::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../data"))
    }

    fn temp_root(label: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "condottieri-loader-{label}-{}",
            std::process::id()
        ));
        fs::create_dir_all(root.join(SETTINGS_DIR)).unwrap();
        fs::create_dir_all(root.join(SCENARIOS_DIR)).unwrap();
        root
    }

    #[test]
    fn loads_sample_documents() {
        let loader = sample_loader();
        assert_eq!(loader.scenario_slugs().unwrap(), vec!["italy-1454".to_string()]);
        let scenario = loader.load_scenario("italy-1454").unwrap();
        let setting = loader.load_setting(&scenario.setting).unwrap();
        assert_eq!(setting.slug, "italy");
    }

    #[test]
    fn missing_documents_are_reported() {
        let loader = sample_loader();
        let err = loader.load_setting("atlantis").unwrap_err();
        assert!(matches!(err, LoaderError::NotFound { kind: "setting", .. }));
        assert!(err.to_string().contains("atlantis"));
    }

    #[test]
    fn parse_errors_keep_the_path() {
        let root = temp_root("parse");
        fs::write(root.join(SCENARIOS_DIR).join("bad.json"), "{ not json").unwrap();
        fs::write(root.join(SCENARIOS_DIR).join("notes.txt"), "ignored").unwrap();
        let loader = DirectoryLoader::new(&root);
        assert_eq!(loader.scenario_slugs().unwrap(), vec!["bad".to_string()]);
        let err = loader.load_scenario("bad").unwrap_err();
        assert!(matches!(err, LoaderError::Parse { .. }));
        assert!(err.to_string().contains("bad.json"));
        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn slug_must_match_file_name() {
        let root = temp_root("slug");
        fs::write(
            root.join(SETTINGS_DIR).join("italy.json"),
            r#"{"slug": "sicily", "title": "Sicily"}"#,
        )
        .unwrap();
        let loader = DirectoryLoader::new(&root);
        assert!(matches!(
            loader.load_setting("italy"),
            Err(LoaderError::SlugMismatch { .. })
        ));
        fs::remove_dir_all(root).ok();
    }
}
