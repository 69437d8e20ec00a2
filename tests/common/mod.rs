//! Shared helpers for the Wydra integration tests.

// Not every helper is used by every test module
#![allow(dead_code)]

use assert_cmd::Command;
use wydra::test_utils::TestSite;

/// `wydra` binary running inside the site root with a clean environment.
pub fn wydra_command(site: &TestSite) -> Command {
    let mut cmd = Command::cargo_bin("wydra").expect("wydra binary is built");
    cmd.current_dir(site.root())
        .env_remove("WYDRA_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// Site with a `wydra.toml` pointing at its template directory.
pub fn site_with_config(extra: &str) -> TestSite {
    let site = TestSite::new().expect("temp site");
    site.file("wydra.toml", &format!("template_paths = [\"templates\"]\n{extra}"))
        .expect("write config");
    site
}
