//! Whole-page rendering through the bracket host.

use predicates::prelude::*;
use wydra::test_utils::{TemplateFixture, TestSite, init_test_logging};

use crate::common::{site_with_config, wydra_command};

const PAGE: &str = "\
[w-define name=nav]
- title: Home
  url: /
- title: About
  url: /about
[/w-define]\
[w-menu from=nav]
[w-card title=\"Welcome\"][w-p]Hello [w-span class='who']reader[/w-span][/w-p][/w-card]";

fn site() -> TestSite {
    init_test_logging(None);
    let site = site_with_config("");
    site.fixture(&TemplateFixture::card()).unwrap();
    site.fixture(&TemplateFixture::menu()).unwrap();
    site.fixture(&TemplateFixture::list()).unwrap();
    site
}

#[test]
fn test_full_page_through_engine() {
    let site = site();
    let engine = site.engine().unwrap();

    let out = engine.expand(PAGE);
    assert_eq!(
        out,
        "<nav><a href=\"/\">Home</a><a href=\"/about\">About</a></nav>\n\
         <div class=\"card\"><h2>Welcome</h2><p>Hello <span class=\"who\">reader</span></p></div>"
    );
    assert_eq!(engine.depth(), 0);
    assert_eq!(engine.data_entries().len(), 1);
}

#[test]
fn test_same_element_nested_with_depth_aliases() {
    let engine = site().engine().unwrap();

    let out = engine.expand("[w-div-1 class=outer][w-div class=inner]x[/w-div][/w-div-1]");
    assert_eq!(out, r#"<div class="outer"><div class="inner">x</div></div>"#);

    let out = engine.expand("[w-div][w-div]y[/w-div][/w-div]");
    assert_eq!(out, "<div><div>y</div></div>");
}

#[test]
fn test_one_bad_marker_does_not_abort_the_page() {
    let site = site();
    site.fixture(&TemplateFixture::broken()).unwrap();
    let engine = site.engine().unwrap();

    let out = engine.expand("[w-p]a[/w-p][w-broken][w-unknown]b[w-p]c[/w-p]");
    assert_eq!(out, "<p>a</p>[w-unknown]b<p>c</p>");
}

#[test]
fn test_editor_mangled_data_block() {
    let engine = site().engine().unwrap();

    let out = engine.expand("[w-define name=people]&#8212; Ann<br />\n- Bob &amp; Co[/w-define]");
    assert_eq!(out, "");
    assert_eq!(
        engine.data("people").unwrap(),
        serde_yaml::from_str::<serde_yaml::Value>("[Ann, Bob & Co]").unwrap()
    );
}

#[test]
fn test_preformatted_data_block_keeps_entities() {
    let engine = site().engine().unwrap();

    let _ = engine.expand("[w-define name=raw]<p>x</p><pre>title: A &amp; B</pre>[/w-define]");
    assert_eq!(
        engine.data("raw").unwrap(),
        serde_yaml::from_str::<serde_yaml::Value>("title: A &amp; B").unwrap()
    );
}

#[test]
fn test_render_command_stdout() {
    let site = site();
    site.file("index.md", PAGE).unwrap();

    wydra_command(&site)
        .args(["render", "index.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<a href=\"/about\">About</a>"))
        .stdout(predicate::str::contains("<h2>Welcome</h2>"))
        .stdout(predicate::str::contains("[w-").not());
}

#[test]
fn test_render_command_with_pages_and_output() {
    let site = site();
    site.page("team.md", "- Ann\n- Bob").unwrap();
    site.file("index.md", "[w-list source-page=team][/w-list]").unwrap();

    wydra_command(&site)
        .args(["render", "index.md", "--pages", "pages", "--output", "out.html"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(site.root().join("out.html")).unwrap();
    assert_eq!(written, "<ul><li>Ann</li><li>Bob</li></ul>");
}

#[test]
fn test_render_command_reports_template_failures_on_stderr() {
    let site = site();
    site.fixture(&TemplateFixture::broken()).unwrap();
    site.file("index.md", "a[w-broken]b").unwrap();

    wydra_command(&site)
        .args(["render", "index.md"])
        .assert()
        .success()
        .stdout("ab")
        .stderr(predicate::str::contains("broken"));
}

#[test]
fn test_render_missing_file_fails() {
    let site = site();

    wydra_command(&site)
        .args(["render", "missing.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.md"));
}
