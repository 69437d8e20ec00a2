#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::core::WydraError;
    use crate::engine::{Engine, MarkerExpander};
    use crate::instance::Attributes;
    use crate::store::content_hash;
    use crate::test_utils::{TemplateFixture, TestSite, init_test_logging};
    use std::sync::{Arc, Mutex};

    fn site() -> TestSite {
        init_test_logging(None);
        TestSite::new().unwrap()
    }

    #[test]
    fn test_depth_suffixed_element() {
        let engine = site().engine().unwrap();
        let out = engine.dispatch_element(Attributes::new().with("id", "box"), "hi", "w-div-2");
        assert_eq!(out, r#"<div id="box">hi</div>"#);
    }

    #[test]
    fn test_element_attributes_are_escaped() {
        let engine = site().engine().unwrap();
        let attrs = Attributes::new().with("title", "a<b & \"c\"");
        assert_eq!(
            engine.dispatch("w-span", attrs, "x"),
            r#"<span title="a&lt;b &amp; &quot;c&quot;">x</span>"#
        );
    }

    #[test]
    fn test_generic_tag_over_expanded_content() {
        let engine = site().engine().unwrap();
        let attrs = Attributes::new().with_positional("section").with("class", "intro");
        let out = engine.dispatch("w-tag", attrs, "[w-span]x[/w-span]");
        assert_eq!(out, r#"<section class="intro"><span>x</span></section>"#);

        assert_eq!(engine.dispatch("w-tag", Attributes::new(), "plain"), "plain");
    }

    #[test]
    fn test_generic_tag_with_only_a_tag_name() {
        let engine = site().engine().unwrap();
        let attrs = Attributes::new().with_positional("section");
        let out = engine.dispatch("w-tag", attrs, "[w-p]a[/w-p][w-span]b[/w-span]");
        assert_eq!(out, "<section><p>a</p><span>b</span></section>");
    }

    #[test]
    fn test_every_registered_depth_alias_renders() {
        let site = site();
        let engine = site
            .engine_with(EngineConfig {
                max_depth: 12,
                ..site.config()
            })
            .unwrap();

        assert_eq!(engine.registry().resolve("w-div-10"), None);
        assert_eq!(engine.dispatch("w-div-10", Attributes::new().with("id", "box"), "hi"), "");
        for alias in engine.registry().aliases_of("div") {
            let out = engine.dispatch(alias, Attributes::new().with("id", "box"), "hi");
            assert_eq!(out, r#"<div id="box">hi</div>"#, "{alias}");
        }
    }

    #[test]
    fn test_pre_unwraps_before_expansion() {
        let engine = site().engine().unwrap();
        let out = engine.dispatch("w-pre", Attributes::new(), "<pre>raw: yaml: here</pre>");
        assert_eq!(out, "raw: yaml: here");

        let out = engine.dispatch("w-pre", Attributes::new(), "<pre>[w-span]a[/w-span]</pre>");
        assert_eq!(out, "<span>a</span>");
    }

    #[test]
    fn test_unresolvable_markers_emit_nothing() {
        let engine = site().engine().unwrap();
        assert_eq!(engine.dispatch("w-nothing", Attributes::new(), "x"), "");
        assert_eq!(engine.dispatch_element(Attributes::new(), "x", "w-card"), "");
        assert_eq!(engine.dispatch_template(Attributes::new(), "x", "w-div"), "");
        assert_eq!(engine.depth(), 0);
    }

    #[test]
    fn test_template_with_attributes_and_nested_content() {
        let site = site();
        site.fixture(&TemplateFixture::card()).unwrap();
        let engine = site.engine().unwrap();

        let out = engine.expand(r#"[w-card title="Hello" wide]Body [w-span]x[/w-span][/w-card]"#);
        assert_eq!(out, r#"<div class="card wide"><h2>Hello</h2>Body <span>x</span></div>"#);

        let out = engine.expand("[wydra-card]b[/wydra-card]");
        assert_eq!(out, r#"<div class="card"><h2>Untitled</h2>b</div>"#);
    }

    #[test]
    fn test_template_context_variables() {
        let site = site();
        site.template("ctx.html", r#"{{ tag }}|{{ attrs.id }}|{{ positional | join(sep=",") }}"#)
            .unwrap();
        let engine = site.engine().unwrap();

        assert_eq!(engine.expand("[w-ctx id=7 a b]"), "ctx|7|a,b");
    }

    #[test]
    fn test_template_yaml_body() {
        let site = site();
        site.fixture(&TemplateFixture::list()).unwrap();
        let engine = site.engine().unwrap();

        assert_eq!(engine.expand("[w-list]- a\n- b[/w-list]"), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_define_then_read_from_template() {
        let site = site();
        site.fixture(&TemplateFixture::menu()).unwrap();
        let engine = site.engine().unwrap();

        let page = "[w-define name=links]\n- title: Home\n  url: /\n- title: Blog\n  url: /blog\n[/w-define][w-menu from=links]";
        assert_eq!(
            engine.expand(page),
            r#"<nav><a href="/">Home</a><a href="/blog">Blog</a></nav>"#
        );
    }

    #[test]
    fn test_pluck_filter_in_template() {
        let site = site();
        site.template(
            "pick.tera",
            r#"{% set site = data(name="site") %}{{ site | pluck(path="nav.1.title", default="none") }}/{{ site | pluck(path="nav.7.title", default="none") }}"#,
        )
        .unwrap();
        let engine = site.engine().unwrap();

        let _ = engine.dispatch_define(
            Attributes::new().with("name", "site"),
            "nav:\n  - title: Home\n  - title: Blog",
        );
        assert_eq!(engine.dispatch("w-pick", Attributes::new(), ""), "Blog/none");
    }

    #[test]
    fn test_define_output_and_naming() {
        let site = site();
        let engine = site.engine().unwrap();

        let out = engine.dispatch_define(Attributes::new().with("name", "x"), "a: 1");
        assert_eq!(out, "");
        assert!(engine.data("x").is_some());

        // Without a name attribute the current page names the block
        let _ = engine.dispatch_define(Attributes::new(), "b: 2");
        let data = engine.data("home").unwrap();
        assert_eq!(data, serde_yaml::from_str::<serde_yaml::Value>("b: 2").unwrap());
    }

    #[test]
    fn test_define_dump_marker() {
        let site = site();
        let engine = site
            .engine_with(EngineConfig {
                dump_define: true,
                ..site.config()
            })
            .unwrap();

        let out = engine.dispatch_define(Attributes::new().with("name", "x"), "a: 1");
        assert_eq!(out, format!("wydra-instance-{} ", content_hash("a: 1", "x")));
    }

    #[test]
    fn test_define_collision_through_engine() {
        let engine = site().engine().unwrap();
        let _ = engine.dispatch_define(Attributes::new().with("name", "m"), "- a");
        let _ = engine.dispatch_define(Attributes::new().with("name", "m"), "- b");

        let entries = engine.data_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "m");
        assert_eq!(entries[1].key, format!("m-{}", entries[1].hash));
        assert_eq!(engine.data_by_key(&entries[1].key), engine.data(&entries[1].hash));

        engine.reset();
        assert!(engine.data_entries().is_empty());
    }

    #[test]
    fn test_source_page_replaces_content() {
        let site = site();
        site.fixture(&TemplateFixture::list()).unwrap();
        site.page("team.md", "- Ann\n- Bob").unwrap();
        let engine = site.engine().unwrap();

        assert_eq!(
            engine.expand("[w-list source-page=team]- ignored[/w-list]"),
            "<ul><li>Ann</li><li>Bob</li></ul>"
        );
    }

    #[test]
    fn test_missing_source_page_gives_empty_content() {
        let site = site();
        site.template("echo.tera", "({{ content() }})").unwrap();
        let engine = site.engine().unwrap();

        assert_eq!(engine.expand("[w-echo source-page=nobody]text[/w-echo]"), "()");
        assert_eq!(engine.expand("[w-echo source-page=\"\"]text[/w-echo]"), "(text)");
    }

    #[test]
    fn test_broken_template_emits_nothing_and_unwinds() {
        let site = site();
        site.fixture(&TemplateFixture::broken()).unwrap();
        site.template("strict.tera", "{{ undefined_variable }}").unwrap();
        let engine = site.engine().unwrap();

        assert_eq!(engine.expand("a[w-broken]b"), "ab");
        assert_eq!(engine.expand("[w-div][w-strict][/w-div]"), "<div></div>");
        assert_eq!(engine.depth(), 0);
    }

    #[test]
    fn test_template_removed_after_build() {
        let site = site();
        let path = site.template("gone.tera", "here").unwrap();
        let engine = site.engine().unwrap();
        assert_eq!(engine.dispatch("w-gone", Attributes::new(), ""), "here");

        std::fs::remove_file(path).unwrap();
        assert_eq!(engine.dispatch("w-gone", Attributes::new(), ""), "");
    }

    #[test]
    fn test_context_accessors_outside_a_handler() {
        let engine = site().engine().unwrap();
        assert!(matches!(engine.current(), Err(WydraError::EmptyStack)));
        assert!(matches!(engine.content(), Err(WydraError::EmptyStack)));
        assert!(matches!(engine.attr("x", None), Err(WydraError::EmptyStack)));
    }

    /// Records the depth and innermost code each time content is expanded.
    #[derive(Clone, Default)]
    struct Probe {
        seen: Arc<Mutex<Vec<(usize, String)>>>,
    }

    impl MarkerExpander for Probe {
        fn expand(&self, engine: &Engine, text: &str) -> String {
            let code = engine.current().map(|i| i.code).unwrap_or_default();
            self.seen.lock().unwrap().push((engine.depth(), code));

            if text == "nest" {
                engine.dispatch("w-span", Attributes::new().with("k", "v"), "leaf")
            } else {
                let attr = engine.attr("k", Some("none")).unwrap().unwrap();
                format!("{text}:{attr}")
            }
        }
    }

    #[test]
    fn test_stack_follows_nesting() {
        let probe = Probe::default();
        let site = site();
        let engine = Engine::builder(site.config()).expander(probe.clone()).build().unwrap();

        let out = engine.dispatch("w-div", Attributes::new(), "nest");
        assert_eq!(out, "<div><span k=\"v\">leaf:v</span></div>");
        assert_eq!(engine.depth(), 0);

        let seen = probe.seen.lock().unwrap().clone();
        assert_eq!(seen, vec![(1, "div".to_string()), (2, "span".to_string())]);
    }

    #[test]
    fn test_engine_clones_share_state() {
        let engine = site().engine().unwrap();
        let clone = engine.clone();
        let _ = clone.dispatch_define(Attributes::new().with("name", "shared"), "a: 1");
        assert!(engine.data("shared").is_some());
    }
}
