//! `init`, `list` and `resolve` through the binary.

use predicates::prelude::*;
use wydra::test_utils::{TemplateFixture, TestSite};

use crate::common::{site_with_config, wydra_command};

#[test]
fn test_init_creates_config_and_templates_dir() {
    let site = TestSite::new().unwrap();
    std::fs::remove_dir(site.templates_dir()).unwrap();

    wydra_command(&site)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created wydra.toml"));

    let config = std::fs::read_to_string(site.root().join("wydra.toml")).unwrap();
    assert!(config.contains("max_depth = 5"));
    assert!(site.templates_dir().is_dir());

    wydra_command(&site)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Use --force to overwrite"));

    wydra_command(&site).args(["init", "--force"]).assert().success();
}

#[test]
fn test_list_table() {
    let site = site_with_config("");
    site.fixture(&TemplateFixture::card()).unwrap();

    wydra_command(&site)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Code"))
        .stdout(predicate::str::contains("card"))
        .stdout(predicate::str::contains("template"))
        .stdout(predicate::str::contains("data-define"))
        .stdout(predicate::str::contains("Total: 7 markers"));
}

#[test]
fn test_list_json() {
    let site = site_with_config("prefixes = [\"x\"]\nmax_depth = 1\ntags = [\"div\"]\n");

    let output = wydra_command(&site).args(["list", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let catalog: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = catalog.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["code"], "define");
    assert_eq!(entries[0]["kind"], "data-define");
    assert_eq!(entries[1]["code"], "div");
    assert_eq!(entries[1]["aliases"], serde_json::json!(["x-div", "x-div-0", "x-div-1"]));
}

#[test]
fn test_resolve_known_and_unknown() {
    let site = site_with_config("");
    site.fixture(&TemplateFixture::menu()).unwrap();

    wydra_command(&site)
        .args(["resolve", "w-span-4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("span"))
        .stdout(predicate::str::contains("<span>"));

    wydra_command(&site)
        .args(["resolve", "wydra-menu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("menu.tera"));

    wydra_command(&site)
        .args(["resolve", "w-mneu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Did you mean"))
        .stderr(predicate::str::contains("w-menu"));
}

#[test]
fn test_invalid_config_is_reported() {
    let site = site_with_config("max_depth = 0\n");

    wydra_command(&site)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_depth must be at least 1"));
}

#[test]
fn test_explicit_missing_config() {
    let site = TestSite::new().unwrap();

    wydra_command(&site)
        .args(["--config", "nowhere/wydra.toml", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}
