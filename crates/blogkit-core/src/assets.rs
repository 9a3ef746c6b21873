//! Build-time lookup of bundled module paths.
//!
//! In production the bundler writes `manifest.json` mapping logical asset
//! names to hashed output paths. A missing entry means the build is broken, so
//! lookups fail hard instead of emitting a dangling `<script>`.

use std::collections::HashMap;
use std::path::Path;

use crate::config::AssetSettings;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct AssetManifest {
    entries: Option<HashMap<String, String>>,
}

impl AssetManifest {
    /// Development mode: asset names are served as-is.
    pub fn passthrough() -> Self {
        Self { entries: None }
    }

    pub fn from_json(body: &str) -> Result<Self> {
        let entries: HashMap<String, String> =
            serde_json::from_str(body).map_err(|e| Error::InvalidConfig(format!("manifest.json: {e}")))?;
        Ok(Self { entries: Some(entries) })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path)
            .map_err(|source| Error::Io { path: path.display().to_string(), source })?;
        Self::from_json(&body)
    }

    pub fn from_settings(settings: &AssetSettings, base: &Path) -> Result<Self> {
        match (&settings.production, &settings.manifest) {
            (true, Some(manifest)) => Self::from_file(&crate::config::resolve_with_base(base, manifest)),
            (true, None) => Err(Error::InvalidConfig("production build without a manifest".into())),
            (false, _) => Ok(Self::passthrough()),
        }
    }

    pub fn resolve(&self, asset_name: &str) -> Result<String> {
        match &self.entries {
            None => Ok(asset_name.to_string()),
            Some(entries) => entries
                .get(asset_name)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("{asset_name} does not exist in manifest.json"))),
        }
    }

    pub fn module_tag(&self, asset_name: &str) -> Result<String> {
        let src = self.resolve(asset_name)?;
        Ok(format!(r#"<script type="module" src="{src}"></script>"#))
    }
}
