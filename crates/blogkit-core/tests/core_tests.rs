use std::fs;
use tempfile::TempDir;

use blogkit_core::assets::AssetManifest;
use blogkit_core::config::{AssetSettings, Config};
use blogkit_core::error::Error;

#[test]
fn settings_fall_back_to_defaults_without_files() {
    let tmp = TempDir::new().unwrap();
    let config = Config::load_from(tmp.path(), "test").expect("load");
    let settings = config.settings().expect("settings");

    assert_eq!(settings.demo.clear_delay_ms, 600);
    assert_eq!(settings.demo.show_text, "Demo");
    assert_eq!(settings.search.max_results, 8);
    assert!(!settings.assets.production);
}

#[test]
fn environment_overlay_overrides_base_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[search]\nmax_results = 5\nfeed = \"feed.json\"\n").unwrap();
    fs::write(tmp.path().join("config.test.toml"), "[search]\nmax_results = 3\n").unwrap();

    let config = Config::load_from(tmp.path(), "test").expect("load");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.search.max_results, 3, "overlay wins");
    assert_eq!(settings.search.feed, "feed.json", "base value survives");
    assert_eq!(config.get::<usize>("search.max_results").unwrap(), 3);
}

#[test]
fn zero_results_is_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[search]\nmax_results = 0\n").unwrap();
    assert!(Config::load_from(tmp.path(), "dev").is_err());
}

#[test]
fn production_manifest_lookup_is_fatal_when_missing() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("manifest.json"), r#"{"index.js":"/static/index-3f2a.js"}"#).unwrap();
    let settings = AssetSettings { production: true, manifest: Some("manifest.json".into()) };
    let manifest = AssetManifest::from_settings(&settings, tmp.path()).expect("manifest");

    assert_eq!(
        manifest.module_tag("index.js").unwrap(),
        r#"<script type="module" src="/static/index-3f2a.js"></script>"#
    );
    assert!(matches!(manifest.resolve("search.js"), Err(Error::NotFound(_))));
}

#[test]
fn development_manifest_passes_names_through() {
    let manifest = AssetManifest::passthrough();
    assert_eq!(manifest.resolve("/assets/index.js").unwrap(), "/assets/index.js");
}
