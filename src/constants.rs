//! Global constants used throughout the Wydra codebase.
//!
//! Defaults for the configuration surface, reserved marker codes and the
//! naming rules shared by the template scanner and the alias resolver.

/// Canonical prefix. Surface spellings look like `wydra-div`.
pub const PREFIX_CORE: &str = "wydra";

/// Shorthand prefix. Surface spellings look like `w-div`.
pub const PREFIX_SHORT: &str = "w";

/// Joins a prefix to a canonical code and a code to its depth suffix.
pub const NAME_SEPARATOR: char = '-';

/// Element markers registered when the configuration does not list any.
pub const DEFAULT_TAGS: &[&str] = &["pre", "tag", "div", "span", "p"];

/// Default upper bound for depth-suffixed element aliases.
///
/// With a bound of 5, `w-div-0` through `w-div-5` are registered.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Largest accepted depth bound. Depth suffixes are a single digit.
pub const MAX_DEPTH_LIMIT: usize = 9;

/// Reserved canonical code of the data definition marker.
pub const DEFINE_CODE: &str = "define";

/// Element marker that is rendered without wrapping, after unwrapping `<pre>`.
pub const PRE_TAG: &str = "pre";

/// Element marker whose first positional attribute names the real tag.
pub const GENERIC_TAG: &str = "tag";

/// Attribute that makes a template marker source its content from another page.
pub const SOURCE_PAGE_ATTR: &str = "source-page";

/// Attribute naming a data block defined with the define marker.
pub const DEFINE_NAME_ATTR: &str = "name";

/// Prefix of the visible token emitted by the define marker when dumping is on.
pub const DEFINE_MARKER_PREFIX: &str = "wydra-instance-";

/// First characters of template files the scanner ignores.
pub const EXCLUDED_FILE_PREFIXES: &[char] = &['.', '!', '~', '-'];

/// Recognised template file extensions in priority order.
///
/// When a directory holds `card.tera` and `card.html`, the `.tera` file wins.
pub const TEMPLATE_EXTENSIONS: &[&str] = &["tera", "html"];

/// Default template search path, relative to the configuration file.
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "wydra.toml";

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "WYDRA_CONFIG";

/// Em-dash entity that rich-text editors substitute for `-` in list markers.
pub const EM_DASH_ENTITY: &str = "&#8212;";

/// Line-break markup inserted by rich-text editors.
pub const LINE_BREAK_MARKUP: &str = "<br />";
