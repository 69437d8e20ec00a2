//! Stock templates used across tests.

/// A template file ready to be written into a [`TestSite`](super::TestSite).
#[derive(Debug, Clone)]
pub struct TemplateFixture {
    pub file_name: String,
    pub body: String,
}

impl TemplateFixture {
    pub fn new(file_name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            body: body.into(),
        }
    }

    /// `card`: wraps content, titled by the `title` attribute, `wide` flag.
    #[must_use]
    pub fn card() -> Self {
        Self::new(
            "card.tera",
            r#"<div class="card{% if attr(name="wide") %} wide{% endif %}"><h2>{{ attr(name="title", default="Untitled") }}</h2>{{ content() }}</div>"#,
        )
    }

    /// `list`: renders its YAML body as an unordered list.
    #[must_use]
    pub fn list() -> Self {
        Self::new("list.tera", "{% set items = yaml() %}<ul>{% for item in items %}<li>{{ item }}</li>{% endfor %}</ul>")
    }

    /// `menu`: renders the named data block given by the `from` attribute.
    #[must_use]
    pub fn menu() -> Self {
        Self::new(
            "menu.tera",
            r#"{% set block = attr(name="from") %}{% set links = data(name=block) %}<nav>{% for link in links %}<a href="{{ link.url }}">{{ link.title }}</a>{% endfor %}</nav>"#,
        )
    }

    /// `broken`: a template that does not parse.
    #[must_use]
    pub fn broken() -> Self {
        Self::new("broken.tera", "{% if %}never{% endif %}")
    }
}
