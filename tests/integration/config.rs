//! Configuration discovery and its effect on the registry.

use serial_test::serial;
use std::path::Path;
use wydra::config::EngineConfig;
use wydra::engine::Engine;
use wydra::host::BracketExpander;
use wydra::test_utils::{TemplateFixture, TestSite};

struct ConfigEnvGuard;

impl ConfigEnvGuard {
    fn set(path: &Path) -> Self {
        // SAFETY: every test touching WYDRA_CONFIG runs under #[serial]
        unsafe { std::env::set_var("WYDRA_CONFIG", path) };
        Self
    }
}

impl Drop for ConfigEnvGuard {
    fn drop(&mut self) {
        // SAFETY: see ConfigEnvGuard::set
        unsafe { std::env::remove_var("WYDRA_CONFIG") };
    }
}

#[test]
#[serial]
fn test_env_var_selects_config() {
    let site = TestSite::new().unwrap();
    let path = site.file("conf/site.toml", "prefixes = [\"sc\"]\ntemplate_paths = [\"../templates\"]\n").unwrap();
    site.fixture(&TemplateFixture::card()).unwrap();
    let _guard = ConfigEnvGuard::set(&path);

    let config = EngineConfig::load_or_default(None).unwrap();
    assert_eq!(config.prefixes, vec!["sc"]);

    let engine = Engine::new(config, BracketExpander::new().unwrap()).unwrap();
    assert_eq!(engine.expand("[sc-card]x[/sc-card]"), r#"<div class="card"><h2>Untitled</h2>x</div>"#);
    assert_eq!(engine.expand("[w-div]x[/w-div]"), "[w-div]x[/w-div]");
}

#[test]
#[serial]
fn test_env_var_pointing_nowhere_falls_back_to_defaults() {
    let site = TestSite::new().unwrap();
    let _guard = ConfigEnvGuard::set(&site.root().join("missing.toml"));

    let config = EngineConfig::load_or_default(None).unwrap();
    assert_eq!(config.max_depth, 5);
    assert_eq!(config.prefixes, vec!["wydra", "w"]);
}

#[test]
fn test_later_template_path_wins() {
    let site = TestSite::new().unwrap();
    site.template("note.tera", "first").unwrap();
    site.file("extra/note.html", "second").unwrap();

    let config = EngineConfig {
        template_paths: vec![site.templates_dir(), site.root().join("extra")],
        ..EngineConfig::default()
    };
    let engine = site.engine_with(config).unwrap();
    assert_eq!(engine.expand("[w-note]"), "second");
}

#[test]
fn test_save_and_reload_roundtrip_keeps_custom_values() {
    let site = TestSite::new().unwrap();
    let path = site.root().join("wydra.toml");

    let config = EngineConfig {
        tags: vec!["section".to_string(), "em".to_string()],
        max_depth: 2,
        template_paths: vec!["layouts".into()],
        dump_define: true,
        ..EngineConfig::default()
    };
    config.save(&path).unwrap();

    let loaded = EngineConfig::load(&path).unwrap();
    assert_eq!(loaded.tags, config.tags);
    assert_eq!(loaded.max_depth, 2);
    assert!(loaded.dump_define);
    assert_eq!(loaded.template_paths, vec![site.root().join("layouts")]);
}
