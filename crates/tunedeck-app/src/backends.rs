use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tunedeck_core::config::{TunedeckConfig, load_config_or_default, resolve_config_dir};
use tunedeck_core::local::{CatalogSuggestionService, JsonFileConfigService, load_catalog};

use crate::App;

/// File-backed services rooted at the tunedeck config directory.
pub struct LocalBackends {
    pub config_dir: PathBuf,
    pub config: TunedeckConfig,
    pub settings: JsonFileConfigService,
    pub catalog: Arc<CatalogSuggestionService>,
}

impl LocalBackends {
    pub fn open() -> Result<Self> {
        let config_dir = resolve_config_dir().context("failed to resolve config directory")?;
        Self::open_in(&config_dir)
    }

    pub fn open_in(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join("config.toml");
        let config = load_config_or_default(&config_path).map_err(|error| {
            anyhow!(
                "invalid config at {}: {error}\nFix the config and retry.",
                config_path.display()
            )
        })?;

        let settings = JsonFileConfigService::new(config.settings_path(config_dir));
        let catalog_path = config.catalog_path(config_dir);
        let catalog = load_catalog(&catalog_path)
            .with_context(|| format!("failed to load catalog at {}", catalog_path.display()))?;

        tracing::debug!(
            config_dir = %config_dir.display(),
            settings = %settings.path().display(),
            artists = catalog.artists().len(),
            tags = catalog.tags().len(),
            "local backends opened"
        );

        Ok(Self {
            config_dir: config_dir.to_path_buf(),
            config,
            settings,
            catalog: Arc::new(catalog),
        })
    }

    pub fn app(&self) -> App<'_> {
        App::new(self.config.clone(), &self.settings, self.catalog.clone())
    }
}
